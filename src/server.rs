use std::io::{BufReader, BufWriter};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};

use tracing::{debug, error, info};

use crate::engine::TaskEngine;
use crate::http::{self, Response};
use crate::router;
use crate::thread_pool::ThreadPool;
use crate::Result;

/// The HTTP server in front of a task board storage engine.
///
/// It listens for connections on a socket address and hands each accepted
/// stream to the thread pool. Each pool job receives its own clone of the
/// [`TaskEngine`] handle, reads a single request, runs it through the
/// router and writes the response back with `Connection: close`.
pub struct KanbanServer<E: TaskEngine, P: ThreadPool> {
    /// the storage engine handle cloned into every connection job
    engine: E,
    /// the pool connection jobs are spawned onto
    pool: P,
}

impl<E: TaskEngine, P: ThreadPool> KanbanServer<E, P> {
    /// Create a new `KanbanServer` over the given engine and pool.
    pub fn new(engine: E, pool: P) -> Self {
        KanbanServer { engine, pool }
    }

    /// Binds `addr` and serves requests forever.
    ///
    /// # Errors
    /// returns an IO error when the address cannot be bound
    pub fn run<A: ToSocketAddrs>(self, addr: A) -> Result<()> {
        let listener = TcpListener::bind(addr)?;
        self.serve_on(listener)
    }

    /// Serves requests on an already bound listener. Split out from
    /// [`run`](KanbanServer::run) so callers can bind port 0 themselves
    /// and read the actual address before starting.
    ///
    /// Accept failures and per-connection failures are logged and do not
    /// stop the accept loop.
    pub fn serve_on(self, listener: TcpListener) -> Result<()> {
        info!("listening on {}", listener.local_addr()?);
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let engine = self.engine.clone();
                    self.pool.spawn(move || {
                        if let Err(e) = serve(engine, stream) {
                            error!("error serving client: {}", e);
                        }
                    });
                }
                Err(e) => error!("connection failed: {}", e),
            }
        }
        Ok(())
    }
}

/// Handles one connection: parse the request, dispatch it, answer, close.
/// A request that cannot be parsed at all is answered with a bare 400.
fn serve<E: TaskEngine>(engine: E, stream: TcpStream) -> Result<()> {
    let peer_addr = stream.peer_addr()?;
    let mut reader = BufReader::new(&stream);
    let mut writer = BufWriter::new(&stream);

    let request = match http::read_request(&mut reader) {
        Ok(Some(request)) => request,
        Ok(None) => return Ok(()),
        Err(e) => {
            debug!("malformed request from {}: {}", peer_addr, e);
            return http::write_response(&mut writer, &Response::empty(400));
        }
    };
    debug!("{} {} from {}", request.method, request.path, peer_addr);

    let response = router::dispatch(&engine, &request);
    debug!(
        "{} {} -> {} ({} bytes)",
        request.method,
        request.path,
        response.status,
        response.body.len()
    );
    http::write_response(&mut writer, &response)
}
