use std::thread;

use super::ThreadPool;
use crate::Result;

/// Not actually a pool: every spawned job gets a brand new OS thread,
/// unbounded. This is the thread-per-connection model the server
/// defaults to.
pub struct NaiveThreadPool;

impl ThreadPool for NaiveThreadPool {
    fn new(_threads: u32) -> Result<Self> {
        Ok(NaiveThreadPool)
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        thread::spawn(job);
    }
}
