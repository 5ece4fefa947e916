use thiserror::Error;

/// type alias for all operations in this crate that can fail with a [`KanbanError`]
pub type Result<T> = std::result::Result<T, KanbanError>;

/// The error variants used throughout the board server and client.
/// Lower level errors from third party crates are wrapped where they occur.
#[derive(Error, Debug)]
pub enum KanbanError {
    /// no live task carries the requested id
    #[error("not found")]
    TaskNotFound,

    /// the store already holds its maximum number of tasks
    #[error("board is full, capacity is {0} tasks")]
    CapacityExceeded(usize),

    /// invalid input from the command line or a malformed wire message
    #[error("{0}")]
    Parsing(String),

    /// the server answered a client request with a non-success status
    #[error("server returned {status}: {message}")]
    Api {
        /// the HTTP status code of the response
        status: u16,
        /// the `error` field of the response body, or the raw body
        message: String,
    },

    /// variant for errors caused by file or socket IO
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
