#![deny(missing_docs)]
//! A single-process task board: an HTTP JSON API plus a small browser UI
//! over an in-memory, flat-file persisted store of tasks.
//!
//! This crate provides the [`BoardStore`] engine itself, as well as a
//! [`kanban-server`] and [`kanban-client`] executable that can be used to
//! run and talk to a board. Data moves between client and server as JSON
//! over plain HTTP/1.1 on a blocking TCP socket.
//!
//! ## Supported Operations
//! The board supports four operations over `/api/tasks`:
//!
//! - `GET` the full ordered list of tasks
//! - `POST` a new task (title required, description optional)
//! - `PATCH` a task's status between TODO(0), DOING(1) and DONE(2)
//! - `DELETE` a task by id
//!
//! See the [`TaskEngine`] trait and the [`router`] module for the exact
//! request/response contract.
//!
//! ## BoardStore
//! [`BoardStore`] is the implementor of the [`TaskEngine`] trait and the
//! brains of the operation. It is responsible for:
//! - keeping the live tasks in an in-memory vector, in insertion order,
//!   bounded by a configurable capacity
//! - generating short unique ids for new tasks
//! - persisting the whole board to a `;`-delimited flat file after every
//!   mutation, and loading it back at start-up
//! - serializing concurrent access behind a single lock, so connection
//!   threads can all hold a cloned handle
//!
//! ## Data file
//! The board is persisted to a single UTF-8 text file (`data_tasks.csv`
//! by default) with the header `id;titulo;descricao;status;criadoEm` and
//! one `;`-separated row per task. Fields containing the delimiter, a
//! quote or a newline are quoted CSV-style with inner quotes doubled. The
//! file is rewritten in full on every mutation; it is the only durability
//! mechanism there is. See the [`flatfile`] module.
//!
//! ## Wire JSON
//! Task objects cross the wire as `{"id":...,"titulo":...,"descricao":...,
//! "status":...,"criadoEm":...}`. Both the encoder and the request-body
//! field extractor are deliberately minimal, hand-rolled and flat-only,
//! and live isolated in the [`json`] module.
//!
//! ## Client / Server
//! [`KanbanServer`] accepts connections and dispatches each one onto a
//! [`ThreadPool`] implementation; [`KanbanClient`] opens one connection
//! per request. Both are driven by the [`kanban-server`] and
//! [`kanban-client`] binaries.
//!
//! [`kanban-server`]: ../kanban_server/index.html
//! [`kanban-client`]: ../kanban_client/index.html

pub use client::KanbanClient;
pub use engine::{BoardStore, TaskEngine};
pub use error::{KanbanError, Result};
pub use http::{Request, Response};
pub use server::KanbanServer;
pub use task::{Status, Task};
pub use thread_pool::{NaiveThreadPool, RayonThreadPool, SharedQueueThreadPool, ThreadPool};

/// the data file name used when none is configured
pub const DEFAULT_DATA_FILE: &str = "data_tasks.csv";

/// the port the server listens on when none is configured
pub const DEFAULT_PORT: u16 = 8080;

/// the task capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 5000;

mod client;
mod engine;
mod error;
pub mod flatfile;
mod http;
pub mod json;
pub mod router;
mod server;
mod task;
pub mod thread_pool;
