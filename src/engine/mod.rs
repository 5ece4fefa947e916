//! This module provides the storage engine behind the task board.
//! [`TaskEngine`] is the seam the server and router work against, and
//! [`BoardStore`] is the flat-file backed implementation used in
//! production. The trait is kept narrow so an alternative backend could
//! be dropped in without touching the HTTP side.

use crate::task::Task;
use crate::Result;

/// A trait for the basic functionality of a task board storage engine.
///
/// Implementations are cloned into every connection thread, so they must
/// be cheap to clone and internally synchronized.
pub trait TaskEngine: Clone + Send + 'static {
    /// returns all live tasks in insertion order
    fn list(&self) -> Result<Vec<Task>>;

    /// appends a new task with the given `title` and `description`,
    /// status `Todo` and a freshly stamped creation time
    ///
    /// # Errors
    ///
    /// Returns `KanbanError::CapacityExceeded` if the board is full.
    fn create(&self, title: String, description: String) -> Result<Task>;

    /// clamps `raw_status` into the valid range and stores it on the task
    /// with the given `id`, returning the updated task
    ///
    /// # Errors
    ///
    /// Returns `KanbanError::TaskNotFound` if no live task has that `id`.
    fn update_status(&self, id: &str, raw_status: i64) -> Result<Task>;

    /// removes the task with the given `id`, shifting every later task one
    /// position toward the front so the board stays dense and ordered
    ///
    /// # Errors
    ///
    /// Returns `KanbanError::TaskNotFound` if no live task has that `id`.
    fn remove(&self, id: &str) -> Result<()>;
}

mod board;

pub use self::board::BoardStore;
