//! this binary starts the task board server
//! to see the list of options, type: `kanban-server --help`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::exit;

use clap::{arg_enum, crate_version, value_t, App, Arg};
use kanban::{
    BoardStore, KanbanError, KanbanServer, NaiveThreadPool, RayonThreadPool, Result,
    SharedQueueThreadPool, TaskEngine, ThreadPool, DEFAULT_CAPACITY, DEFAULT_DATA_FILE,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

arg_enum! {
    #[allow(non_camel_case_types)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Pool {
        naive,
        shared,
        rayon
    }
}

const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_POOL: Pool = Pool::naive;
const DEFAULT_THREADS: u32 = 4;

/// [`Opt`] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    addr: SocketAddr,
    data_file: PathBuf,
    capacity: usize,
    pool: Pool,
    threads: u32,
}

impl Opt {
    /// validates the raw command line values
    /// returns `Ok(Opt)` if everything is valid
    /// # Errors
    /// returns [`KanbanError::Parsing`] if one of the parameters is invalid
    fn build(
        addr: &str,
        data_file: &str,
        capacity: &str,
        pool: Pool,
        threads: &str,
    ) -> Result<Opt> {
        let addr: SocketAddr = addr.parse().map_err(|_| {
            KanbanError::Parsing(format!("could not parse {} into an IP address and port", addr))
        })?;
        let capacity: usize = capacity.parse().map_err(|_| {
            KanbanError::Parsing(format!("could not parse capacity {} into an integer", capacity))
        })?;
        if capacity == 0 {
            return Err(KanbanError::Parsing("capacity must be at least 1".to_string()));
        }
        let threads: u32 = threads.parse().map_err(|_| {
            KanbanError::Parsing(format!("could not parse threads {} into an integer", threads))
        })?;
        if threads == 0 {
            return Err(KanbanError::Parsing("threads must be at least 1".to_string()));
        }

        Ok(Opt {
            addr,
            data_file: PathBuf::from(data_file),
            capacity,
            pool,
            threads,
        })
    }
}

fn main() {
    // set up a tracing subscriber to log to STDERR
    subscriber_config();

    let default_capacity = DEFAULT_CAPACITY.to_string();
    let default_threads = DEFAULT_THREADS.to_string();

    let matches = App::new("kanban-server")
        .version(crate_version!())
        .about("a task board server with flat-file persistence")
        .arg(
            Arg::with_name("addr")
                .long("addr")
                .value_name("IP_ADDR:PORT")
                .help("sets the IP_ADDR:PORT that the server listens on")
                .default_value(DEFAULT_ADDRESS),
        )
        .arg(
            Arg::with_name("data-file")
                .long("data-file")
                .value_name("PATH")
                .help("sets the file the board is persisted to")
                .default_value(DEFAULT_DATA_FILE),
        )
        .arg(
            Arg::with_name("capacity")
                .long("capacity")
                .value_name("N")
                .help("sets the maximum number of tasks the board can hold")
                .default_value(&default_capacity),
        )
        .arg(
            Arg::with_name("pool")
                .long("pool")
                .value_name("POOL_NAME")
                .help("sets the connection dispatch model: 'naive', 'shared' or 'rayon'")
                .default_value("naive"),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .value_name("N")
                .help("sets the worker count for the 'shared' and 'rayon' pools")
                .default_value(&default_threads),
        )
        .get_matches();

    let pool = value_t!(matches, "pool", Pool).ok().unwrap_or(DEFAULT_POOL);
    let opt = match Opt::build(
        matches.value_of("addr").unwrap(),
        matches.value_of("data-file").unwrap(),
        matches.value_of("capacity").unwrap(),
        pool,
        matches.value_of("threads").unwrap(),
    ) {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    if let Err(e) = run(opt) {
        eprintln!("{}", e);
        exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    info!("kanban-server {}", env!("CARGO_PKG_VERSION"));
    info!("dispatch pool: {} ({} threads)", opt.pool, opt.threads);
    info!(
        "persisting up to {} tasks in {:?}",
        opt.capacity, opt.data_file
    );

    let engine = BoardStore::open(&opt.data_file, opt.capacity);
    match opt.pool {
        Pool::naive => run_with_pool(engine, NaiveThreadPool::new(opt.threads)?, opt.addr),
        Pool::shared => run_with_pool(engine, SharedQueueThreadPool::new(opt.threads)?, opt.addr),
        Pool::rayon => run_with_pool(engine, RayonThreadPool::new(opt.threads)?, opt.addr),
    }
}

fn run_with_pool<E: TaskEngine, P: ThreadPool>(engine: E, pool: P, addr: SocketAddr) -> Result<()> {
    let server = KanbanServer::new(engine, pool);
    server.run(addr)
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        // all spans/events with a level higher than TRACE (e.g, debug, info, warn, etc.)
        // will be written to stderr.
        .with_max_level(Level::TRACE)
        // log to stderr instead of stdout
        .with_writer(std::io::stderr)
        // completes the builder.
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
