use std::time::{SystemTime, UNIX_EPOCH};

/// The three columns of the board. A task always sits in exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// the task has not been started
    Todo,
    /// the task is in progress
    Doing,
    /// the task is finished
    Done,
}

impl Status {
    /// converts a raw integer into a `Status`, clamping out-of-range values
    /// into the valid 0..=2 range. Negative values become `Todo`, values
    /// above 2 become `Done`.
    pub fn from_clamped(raw: i64) -> Status {
        match raw {
            i if i <= 0 => Status::Todo,
            1 => Status::Doing,
            _ => Status::Done,
        }
    }

    /// the numeric form used on the wire and in the data file
    pub fn as_int(self) -> i64 {
        match self {
            Status::Todo => 0,
            Status::Doing => 1,
            Status::Done => 2,
        }
    }
}

/// A single task record, the only entity the board stores.
///
/// `id` and `created_at_ms` are assigned at creation time and never change.
/// `title` and `description` are immutable after creation as well; the only
/// mutable field is `status`, and only through the store's status-update
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// short opaque token, unique among live records
    pub id: String,
    /// required, non-blank at creation
    pub title: String,
    /// free text, may be empty
    pub description: String,
    /// current board column
    pub status: Status,
    /// creation timestamp, milliseconds since the unix epoch
    pub created_at_ms: i64,
}

/// milliseconds since the unix epoch
pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
