use std::io::{BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpStream};

use crate::error::{KanbanError, Result};
use crate::http::{self, Response};
use crate::json;
use crate::task::{Status, Task};

/// `KanbanClient` talks to a running board server over its HTTP API.
///
/// The server closes the connection after every response, so the client
/// opens a fresh connection per operation rather than holding one open.
pub struct KanbanClient {
    addr: SocketAddr,
}

impl KanbanClient {
    /// creates a client for the server at the given `addr`
    pub fn connect(addr: SocketAddr) -> Self {
        KanbanClient { addr }
    }

    /// fetches all tasks and returns the raw JSON array exactly as the
    /// server sent it
    ///
    /// # Errors
    /// `KanbanError::Api` for a non-200 response, `KanbanError::Io` when
    /// the server is unreachable
    pub fn list(&self) -> Result<String> {
        let response = self.request("GET", "/api/tasks", None)?;
        expect_status(response, 200).map(|r| r.body)
    }

    /// creates a task and returns it as the server recorded it
    ///
    /// # Errors
    /// `KanbanError::Api` carrying the server's error message on a 400,
    /// for example a blank title
    pub fn create(&self, title: &str, description: &str) -> Result<Task> {
        let body = format!(
            "{{\"titulo\":\"{}\",\"descricao\":\"{}\"}}",
            json::escape(title),
            json::escape(description),
        );
        let response = self.request("POST", "/api/tasks", Some(&body))?;
        task_from_body(&expect_status(response, 200)?.body)
    }

    /// moves the task with `id` to `status` and returns the updated task
    ///
    /// # Errors
    /// `KanbanError::Api` with status 404 when the id is unknown
    pub fn set_status(&self, id: &str, status: i64) -> Result<Task> {
        let path = format!("/api/tasks/{}/status", id);
        let body = format!("{{\"status\":{}}}", status);
        let response = self.request("PATCH", &path, Some(&body))?;
        task_from_body(&expect_status(response, 200)?.body)
    }

    /// deletes the task with `id`
    ///
    /// # Errors
    /// `KanbanError::Api` with status 404 when the id is unknown
    pub fn remove(&self, id: &str) -> Result<()> {
        let path = format!("/api/tasks/{}", id);
        let response = self.request("DELETE", &path, None)?;
        expect_status(response, 204).map(|_| ())
    }

    /// opens a connection, writes one request and reads the response
    fn request(&self, method: &str, path: &str, body: Option<&str>) -> Result<Response> {
        let stream = TcpStream::connect(self.addr)?;
        let mut writer = BufWriter::new(&stream);

        write!(writer, "{} {} HTTP/1.1\r\nHost: {}\r\n", method, path, self.addr)?;
        let body = body.unwrap_or("");
        if !body.is_empty() {
            write!(writer, "Content-Type: application/json; charset=utf-8\r\n")?;
        }
        write!(
            writer,
            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )?;
        writer.flush()?;

        let mut reader = BufReader::new(&stream);
        http::read_response(&mut reader)
    }
}

/// maps any unexpected status into `KanbanError::Api`, using the body's
/// `error` field as the message when there is one
fn expect_status(response: Response, expected: u16) -> Result<Response> {
    if response.status == expected {
        Ok(response)
    } else {
        let message = json::extract_field(&response.body, "error")
            .unwrap_or_else(|| response.body.clone());
        Err(KanbanError::Api {
            status: response.status,
            message,
        })
    }
}

/// reconstructs a task from a response body using the minimal codec
fn task_from_body(body: &str) -> Result<Task> {
    let field = |key: &str| {
        json::extract_field(body, key)
            .ok_or_else(|| KanbanError::Parsing(format!("response is missing {:?}: {}", key, body)))
    };
    let status = field("status")?
        .trim()
        .parse::<i64>()
        .map_err(|_| KanbanError::Parsing(format!("unreadable status in response: {}", body)))?;
    let created_at_ms = field("criadoEm")?
        .trim()
        .parse::<i64>()
        .map_err(|_| KanbanError::Parsing(format!("unreadable timestamp in response: {}", body)))?;

    Ok(Task {
        id: field("id")?,
        title: field("titulo")?,
        description: field("descricao")?,
        status: Status::from_clamped(status),
        created_at_ms,
    })
}
