//! Thread pools for dispatching connection jobs.
//!
//! The server is generic over [`ThreadPool`] so the connection model can
//! be picked at startup: a thread per connection ([`NaiveThreadPool`],
//! the default and the model the board inherits from its origins), a
//! fixed pool fed by a shared queue ([`SharedQueueThreadPool`]), or a
//! rayon work-stealing pool ([`RayonThreadPool`]).

use crate::Result;

/// A pool that can run `'static` jobs on some set of threads.
pub trait ThreadPool {
    /// creates a pool with the given number of `threads`
    ///
    /// # Errors
    /// returns an error when the underlying threads could not be created
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// runs `job` on one of the pool's threads
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static;
}

mod naive;
mod rayon_pool;
mod shared_queue;

pub use self::naive::NaiveThreadPool;
pub use self::rayon_pool::RayonThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;
