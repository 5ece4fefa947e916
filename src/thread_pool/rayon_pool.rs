use tracing::debug;

use super::ThreadPool;
use crate::error::{KanbanError, Result};

/// A pool backed by rayon's work-stealing [`rayon::ThreadPool`].
pub struct RayonThreadPool {
    pool: rayon::ThreadPool,
}

impl ThreadPool for RayonThreadPool {
    fn new(threads: u32) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .build()
            .map_err(|e| KanbanError::Parsing(format!("could not build thread pool: {}", e)))?;
        debug!("created rayon pool with {} threads", threads);

        Ok(RayonThreadPool { pool })
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pool.spawn(job);
    }
}
