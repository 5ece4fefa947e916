//! The HTTP/1.1 wire types exchanged between client and server, plus the
//! blocking read/write helpers both sides share. Only the small slice of
//! HTTP the board needs is implemented: a request line, headers of which
//! just `Content-Length` matters, and a byte-counted body. Every response
//! carries `Connection: close` and the server serves one request per
//! connection.

use std::io::{BufRead, Read, Write};

use crate::error::{KanbanError, Result};

/// A parsed incoming HTTP request.
#[derive(Debug)]
pub struct Request {
    /// the HTTP method verb, uppercase as received
    pub method: String,
    /// the request path, no URL-decoding beyond what the peer sent
    pub path: String,
    /// the request body decoded as UTF-8 (lossy)
    pub body: String,
}

/// An HTTP response ready to be written to the wire.
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    /// the HTTP status code
    pub status: u16,
    /// the `Content-Type` header value, omitted when `None`
    pub content_type: Option<String>,
    /// the response body
    pub body: String,
}

impl Response {
    /// a response carrying a JSON body
    pub fn json(status: u16, body: impl Into<String>) -> Response {
        Response {
            status,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    /// a 200 response carrying an HTML body
    pub fn html(body: impl Into<String>) -> Response {
        Response {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    /// a response with the given status and no body or content type
    pub fn empty(status: u16) -> Response {
        Response {
            status,
            content_type: None,
            body: String::new(),
        }
    }
}

/// the reason phrase for the status codes this server actually emits
fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Reads one request from the stream.
///
/// Returns `Ok(None)` when the peer closed the connection before sending a
/// request line.
///
/// # Errors
/// returns `KanbanError::Parsing` on a malformed request line and IO
/// errors from the underlying stream
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Option<Request>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| KanbanError::Parsing(format!("malformed request line: {:?}", line)))?
        .to_string();
    let path = parts
        .next()
        .ok_or_else(|| KanbanError::Parsing(format!("malformed request line: {:?}", line)))?
        .to_string();

    let content_length = read_headers(reader)?;
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    Ok(Some(Request {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    }))
}

/// Writes `response` to the stream and flushes it.
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write!(
        writer,
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason(response.status)
    )?;
    if let Some(ct) = &response.content_type {
        write!(writer, "Content-Type: {}\r\n", ct)?;
    }
    write!(
        writer,
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        response.body.len()
    )?;
    writer.write_all(response.body.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Reads one response from the stream (client side).
///
/// # Errors
/// returns `KanbanError::Parsing` when the status line is malformed
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    // "HTTP/1.1 200 OK"
    let status = line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| KanbanError::Parsing(format!("malformed status line: {:?}", line)))?;

    let content_length = read_headers(reader)?;
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    Ok(Response {
        status,
        content_type: None,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// consumes header lines up to the blank separator, returning the value of
/// `Content-Length` (0 when absent or unparsable)
fn read_headers<R: BufRead>(reader: &mut R) -> Result<usize> {
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    Ok(content_length)
}
