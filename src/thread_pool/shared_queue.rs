use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error};

use super::ThreadPool;
use crate::Result;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads consuming jobs from a shared unbounded
/// crossbeam channel. The pool itself is the single producer and the
/// workers are the consumers.
///
/// A worker that panics while running a job is replaced with a fresh
/// thread, so one bad connection cannot drain the pool. Replacement
/// failures are logged and lost; in the degenerate case of every worker
/// dying and no replacement starting, `spawn` panics on the closed
/// channel.
pub struct SharedQueueThreadPool {
    tx: Sender<Job>,
}

impl ThreadPool for SharedQueueThreadPool {
    fn new(threads: u32) -> Result<Self> {
        let (tx, rx) = channel::unbounded::<Job>();
        for _ in 0..threads {
            let worker = JobReceiver(rx.clone());
            thread::Builder::new().spawn(move || run_jobs(worker))?;
        }
        Ok(SharedQueueThreadPool { tx })
    }

    /// # Panics
    ///
    /// Panics if every worker has died and could not be replaced.
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .expect("no worker threads left in the pool");
    }
}

/// The receiving half a worker holds. Dropping it while panicking means
/// the worker died mid-job, so a replacement thread is started with a
/// clone of the receiver.
#[derive(Clone)]
struct JobReceiver(Receiver<Job>);

impl Drop for JobReceiver {
    fn drop(&mut self) {
        if thread::panicking() {
            debug!("worker panicked, starting a replacement");
            let worker = self.clone();
            if let Err(e) = thread::Builder::new().spawn(move || run_jobs(worker)) {
                error!("failed to replace worker thread: {}", e);
            }
        }
    }
}

/// worker loop: block on the channel, run whatever arrives, exit once the
/// pool (the sender) is gone
fn run_jobs(worker: JobReceiver) {
    while let Ok(job) = worker.0.recv() {
        job();
    }
    debug!("worker exiting, pool was dropped");
}
