//! The kanban-client executable supports the following command line arguments:
//!
//! `kanban-client list [--addr IP-PORT]`
//!
//!     Print the board's tasks as the raw JSON array the server returned.
//!
//! `kanban-client add <TITLE> [DESCRIPTION] [--addr IP-PORT]`
//!
//!     Create a new task. Prints the id the server assigned.
//!
//! `kanban-client move <ID> <STATUS> [--addr IP-PORT]`
//!
//!     Move a task to a status column: 0 = TODO, 1 = DOING, 2 = DONE.
//!     Out-of-range values are clamped by the server.
//!
//! `kanban-client rm <ID> [--addr IP-PORT]`
//!
//!     Delete a task.
//!
//! `--addr` accepts an IP address, either v4 or v6, and a port number with
//! the format IP:PORT. If `--addr` is not specified then connect on
//! 127.0.0.1:8080. All commands print an error and return a non-zero exit
//! code on server error, or if IP-PORT does not parse as an address.

use std::net::SocketAddr;
use std::process::exit;

use clap::{crate_version, App, Arg, ArgMatches, SubCommand};
use kanban::{KanbanClient, KanbanError, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";

/// the operation requested on the command line
#[derive(Debug)]
enum Op {
    List,
    Add { title: String, description: String },
    Move { id: String, status: i64 },
    Rm { id: String },
}

/// [`Opt`] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    /// the server's ip:port
    addr: SocketAddr,
    op: Op,
}

impl Opt {
    /// validates the `addr` parameter is a valid IP address and port
    /// # Errors
    /// returns [`KanbanError::Parsing`] if one of the parameters is invalid
    fn build(addr: &str, op: Op) -> Result<Opt> {
        let addr: SocketAddr = addr.parse().map_err(|_| {
            KanbanError::Parsing(format!("could not parse {} into an IP address and port", addr))
        })?;

        Ok(Opt { addr, op })
    }
}

fn main() {
    // configure a subscriber that will log messages to STDERR
    subscriber_config();

    let matches = App::new("kanban-client")
        .version(crate_version!())
        .about("command line client for the task board server")
        .subcommands(vec![
            SubCommand::with_name("list").about("Print all tasks as a JSON array"),
            SubCommand::with_name("add")
                .about("Create a new task")
                .arg(Arg::with_name("TITLE").required(true).index(1))
                .arg(Arg::with_name("DESCRIPTION").index(2)),
            SubCommand::with_name("move")
                .about("Move a task to a status column (0=TODO, 1=DOING, 2=DONE)")
                .arg(Arg::with_name("ID").required(true).index(1))
                .arg(Arg::with_name("STATUS").required(true).index(2)),
            SubCommand::with_name("rm")
                .about("Delete a task")
                .arg(Arg::with_name("ID").required(true).index(1)),
        ])
        .arg(
            Arg::with_name("addr")
                .long("addr")
                .value_name("IP_ADDR:PORT")
                .help("sets the IP_ADDR:PORT of the server to connect to")
                .global(true)
                .default_value(DEFAULT_ADDRESS),
        )
        .get_matches();

    let result = parse_options(matches).and_then(run);
    if let Err(e) = result {
        eprintln!("{}", e);
        exit(1);
    }
}

/// runs the requested operation against the server
fn run(opt: Opt) -> Result<()> {
    let client = KanbanClient::connect(opt.addr);
    match opt.op {
        Op::List => {
            println!("{}", client.list()?);
        }
        Op::Add { title, description } => {
            let task = client.create(&title, &description)?;
            println!("{}", task.id);
        }
        Op::Move { id, status } => {
            let task = client.set_status(&id, status)?;
            println!("{} -> {}", task.id, task.status.as_int());
        }
        Op::Rm { id } => {
            client.remove(&id)?;
        }
    }
    Ok(())
}

/// parses the matches from the command line into an [`Opt`] struct
fn parse_options(matches: ArgMatches) -> Result<Opt> {
    let addr = matches.value_of("addr").unwrap();
    match matches.subcommand() {
        ("list", Some(_)) => Opt::build(addr, Op::List),
        ("add", Some(args)) => {
            let title = args.value_of("TITLE").map(String::from).unwrap();
            let description = args.value_of("DESCRIPTION").map(String::from).unwrap_or_default();
            Opt::build(addr, Op::Add { title, description })
        }
        ("move", Some(args)) => {
            let id = args.value_of("ID").map(String::from).unwrap();
            let status = args.value_of("STATUS").unwrap();
            let status: i64 = status.parse().map_err(|_| {
                KanbanError::Parsing(format!("could not parse status {} into an integer", status))
            })?;
            Opt::build(addr, Op::Move { id, status })
        }
        ("rm", Some(args)) => {
            let id = args.value_of("ID").map(String::from).unwrap();
            Opt::build(addr, Op::Rm { id })
        }
        _ => Err(KanbanError::Parsing(
            "no command given, try --help".to_string(),
        )),
    }
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
