use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::TaskEngine;
use crate::error::{KanbanError, Result};
use crate::flatfile;
use crate::task::{now_ms, Status, Task};

/// The flat-file backed task store.
///
/// Tasks live in an in-memory vector in insertion order, bounded by a
/// fixed capacity. Every mutation rewrites the data file while the store
/// lock is held, so the file on disk always reflects a single consistent
/// snapshot. A write failure is logged and swallowed; the in-memory
/// mutation stands and the caller still sees success, which means disk can
/// lag memory until the next successful save.
///
/// The store is a handle around shared state. Cloning it is cheap and all
/// clones see the same board.
#[derive(Debug, Clone)]
pub struct BoardStore {
    inner: Arc<Mutex<Board>>,
}

#[derive(Debug)]
struct Board {
    tasks: Vec<Task>,
    capacity: usize,
    data_path: PathBuf,
}

impl BoardStore {
    /// opens a store persisted at `data_path`, holding at most `capacity`
    /// tasks. A missing file starts an empty board; an unreadable file is
    /// logged and also starts an empty board.
    pub fn open(data_path: impl Into<PathBuf>, capacity: usize) -> BoardStore {
        let data_path = data_path.into();
        let tasks = match flatfile::load(&data_path, capacity) {
            Ok(tasks) => tasks,
            Err(e) => {
                error!("could not read {:?}, starting empty: {}", data_path, e);
                Vec::new()
            }
        };
        info!("loaded {} task(s) from {:?}", tasks.len(), data_path);

        BoardStore {
            inner: Arc::new(Mutex::new(Board {
                tasks,
                capacity,
                data_path,
            })),
        }
    }

    /// the number of live tasks on the board
    pub fn len(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    /// true when the board holds no tasks
    pub fn is_empty(&self) -> bool {
        self.inner.lock().tasks.is_empty()
    }

    /// the path of the data file backing this store
    pub fn data_path(&self) -> PathBuf {
        self.inner.lock().data_path.clone()
    }

    /// opens a store in `dir` using the default file name `data_tasks.csv`
    pub fn open_in(dir: &Path, capacity: usize) -> BoardStore {
        BoardStore::open(dir.join(crate::DEFAULT_DATA_FILE), capacity)
    }
}

impl TaskEngine for BoardStore {
    fn list(&self) -> Result<Vec<Task>> {
        Ok(self.inner.lock().tasks.clone())
    }

    fn create(&self, title: String, description: String) -> Result<Task> {
        let mut board = self.inner.lock();
        if board.tasks.len() >= board.capacity {
            return Err(KanbanError::CapacityExceeded(board.capacity));
        }
        let task = Task {
            id: board.next_id(),
            title,
            description,
            status: Status::Todo,
            created_at_ms: now_ms(),
        };
        board.tasks.push(task.clone());
        debug!("created task {}", task.id);
        board.persist();
        Ok(task)
    }

    fn update_status(&self, id: &str, raw_status: i64) -> Result<Task> {
        let mut board = self.inner.lock();
        let idx = board.find_index(id).ok_or(KanbanError::TaskNotFound)?;
        board.tasks[idx].status = Status::from_clamped(raw_status);
        let task = board.tasks[idx].clone();
        debug!("task {} moved to status {}", task.id, task.status.as_int());
        board.persist();
        Ok(task)
    }

    fn remove(&self, id: &str) -> Result<()> {
        let mut board = self.inner.lock();
        let idx = board.find_index(id).ok_or(KanbanError::TaskNotFound)?;
        // Vec::remove shifts every later element down one position
        board.tasks.remove(idx);
        debug!("removed task {}", id);
        board.persist();
        Ok(())
    }
}

impl Board {
    /// linear scan for the position of a live task id
    fn find_index(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// generates an 8 character hex token, re-rolling until it does not
    /// collide with a live id
    fn next_id(&self) -> String {
        loop {
            let token = format!("{:08x}", rand::random::<u32>());
            if self.find_index(&token).is_none() {
                return token;
            }
        }
    }

    /// rewrites the data file; a failure keeps the in-memory state as the
    /// source of truth until the next successful save
    fn persist(&self) {
        if let Err(e) = flatfile::save(&self.data_path, &self.tasks) {
            error!("could not persist board to {:?}: {}", self.data_path, e);
        }
    }
}
