//! Maps method + path onto store operations and store results onto HTTP
//! responses. The router is stateless; every piece of request state it
//! needs arrives in the [`Request`] and every failure is translated into
//! a status code here so nothing escapes to the connection loop.

use tracing::error;

use crate::engine::TaskEngine;
use crate::error::{KanbanError, Result};
use crate::http::{Request, Response};
use crate::json;

/// the board page served at `/`
const INDEX_HTML: &str = include_str!("../assets/index.html");

const ERR_NOT_FOUND: &str = "{\"error\":\"not found\"}";
const ERR_SERVER: &str = "{\"error\":\"server\"}";
const ERR_TITLE_REQUIRED: &str = "{\"error\":\"titulo obrigatório\"}";
const ERR_STATUS_MISSING: &str = "{\"error\":\"status ausente\"}";

/// Dispatches one request against the engine and produces the response,
/// absorbing every error into the wire taxonomy: unknown ids become 404,
/// anything else becomes a generic 500 with the detail kept server-side.
pub fn dispatch<E: TaskEngine>(engine: &E, request: &Request) -> Response {
    match route(engine, request) {
        Ok(response) => response,
        Err(KanbanError::TaskNotFound) => Response::json(404, ERR_NOT_FOUND),
        Err(e) => {
            error!("{} {} failed: {}", request.method, request.path, e);
            Response::json(500, ERR_SERVER)
        }
    }
}

fn route<E: TaskEngine>(engine: &E, request: &Request) -> Result<Response> {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => Ok(Response::html(INDEX_HTML)),
        ("GET", "/api/tasks") => Ok(Response::json(200, json::encode_tasks(&engine.list()?))),
        ("POST", "/api/tasks") => create_task(engine, &request.body),
        ("PATCH", path) => match task_id_for_status(path) {
            Some(id) => update_status(engine, id, &request.body),
            None => Ok(Response::empty(404)),
        },
        ("DELETE", path) => match path.strip_prefix("/api/tasks/") {
            Some(id) if !id.is_empty() && !id.contains('/') => {
                engine.remove(id)?;
                Ok(Response::json(204, ""))
            }
            _ => Ok(Response::empty(404)),
        },
        _ => Ok(Response::empty(404)),
    }
}

/// extracts `{id}` from `/api/tasks/{id}/status` by plain prefix/suffix
/// stripping, no decoding
fn task_id_for_status(path: &str) -> Option<&str> {
    path.strip_prefix("/api/tasks/")
        .and_then(|rest| rest.strip_suffix("/status"))
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

fn create_task<E: TaskEngine>(engine: &E, body: &str) -> Result<Response> {
    let title = json::extract_field(body, "titulo");
    let description = json::extract_field(body, "descricao").unwrap_or_default();
    match title {
        Some(title) if !title.trim().is_empty() => {
            let task = engine.create(title, description)?;
            Ok(Response::json(200, json::encode_task(&task)))
        }
        _ => Ok(Response::json(400, ERR_TITLE_REQUIRED)),
    }
}

fn update_status<E: TaskEngine>(engine: &E, id: &str, body: &str) -> Result<Response> {
    let raw = match json::extract_field(body, "status") {
        Some(raw) => raw,
        None => return Ok(Response::json(400, ERR_STATUS_MISSING)),
    };
    let status = raw.trim().parse::<i64>().unwrap_or(0);
    let task = engine.update_status(id, status)?;
    Ok(Response::json(200, json::encode_task(&task)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Status, Task};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// a canned engine so the routing table can be exercised without a
    /// file-backed store
    #[derive(Clone)]
    struct StubEngine {
        full: Arc<AtomicBool>,
    }

    impl StubEngine {
        fn new() -> StubEngine {
            StubEngine {
                full: Arc::new(AtomicBool::new(false)),
            }
        }

        fn task(id: &str) -> Task {
            Task {
                id: id.to_string(),
                title: "stub".to_string(),
                description: String::new(),
                status: Status::Todo,
                created_at_ms: 1,
            }
        }
    }

    impl TaskEngine for StubEngine {
        fn list(&self) -> Result<Vec<Task>> {
            Ok(vec![Self::task("aaaa0001")])
        }

        fn create(&self, title: String, _description: String) -> Result<Task> {
            if self.full.load(Ordering::SeqCst) {
                return Err(KanbanError::CapacityExceeded(1));
            }
            Ok(Task {
                title,
                ..Self::task("bbbb0002")
            })
        }

        fn update_status(&self, id: &str, raw_status: i64) -> Result<Task> {
            if id == "known001" {
                Ok(Task {
                    status: Status::from_clamped(raw_status),
                    ..Self::task(id)
                })
            } else {
                Err(KanbanError::TaskNotFound)
            }
        }

        fn remove(&self, id: &str) -> Result<()> {
            if id == "known001" {
                Ok(())
            } else {
                Err(KanbanError::TaskNotFound)
            }
        }
    }

    fn req(method: &str, path: &str, body: &str) -> Request {
        Request {
            method: method.to_string(),
            path: path.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn root_serves_html() {
        let resp = dispatch(&StubEngine::new(), &req("GET", "/", ""));
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
        assert!(resp.body.contains("<html"));
    }

    #[test]
    fn list_returns_json_array() {
        let resp = dispatch(&StubEngine::new(), &req("GET", "/api/tasks", ""));
        assert_eq!(resp.status, 200);
        assert!(resp.body.starts_with('['));
        assert!(resp.body.contains("\"id\":\"aaaa0001\""));
    }

    #[test]
    fn create_requires_title() {
        let engine = StubEngine::new();
        for body in ["{}", "{\"descricao\":\"x\"}", "{\"titulo\":\"  \"}"] {
            let resp = dispatch(&engine, &req("POST", "/api/tasks", body));
            assert_eq!(resp.status, 400, "body {:?}", body);
            assert_eq!(resp.body, ERR_TITLE_REQUIRED);
        }
    }

    #[test]
    fn create_returns_task_json() {
        let resp = dispatch(
            &StubEngine::new(),
            &req("POST", "/api/tasks", "{\"titulo\":\"Buy milk\"}"),
        );
        assert_eq!(resp.status, 200);
        assert!(resp.body.contains("\"titulo\":\"Buy milk\""));
        assert!(resp.body.contains("\"status\":0"));
    }

    #[test]
    fn capacity_surfaces_as_generic_server_error() {
        let engine = StubEngine::new();
        engine.full.store(true, Ordering::SeqCst);
        let resp = dispatch(&engine, &req("POST", "/api/tasks", "{\"titulo\":\"x\"}"));
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, ERR_SERVER);
    }

    #[test]
    fn patch_requires_status_field() {
        let resp = dispatch(
            &StubEngine::new(),
            &req("PATCH", "/api/tasks/known001/status", "{}"),
        );
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body, ERR_STATUS_MISSING);
    }

    #[test]
    fn patch_clamps_and_returns_task() {
        let resp = dispatch(
            &StubEngine::new(),
            &req("PATCH", "/api/tasks/known001/status", "{\"status\": 7}"),
        );
        assert_eq!(resp.status, 200);
        assert!(resp.body.contains("\"status\":2"));
    }

    #[test]
    fn patch_unknown_id_is_404_with_error_body() {
        let resp = dispatch(
            &StubEngine::new(),
            &req("PATCH", "/api/tasks/zzz/status", "{\"status\":1}"),
        );
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body, ERR_NOT_FOUND);
    }

    #[test]
    fn delete_known_id_is_204() {
        let resp = dispatch(&StubEngine::new(), &req("DELETE", "/api/tasks/known001", ""));
        assert_eq!(resp.status, 204);
        assert_eq!(resp.body, "");
    }

    #[test]
    fn delete_unknown_id_is_404() {
        let resp = dispatch(&StubEngine::new(), &req("DELETE", "/api/tasks/zzz", ""));
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body, ERR_NOT_FOUND);
    }

    #[test]
    fn unmapped_routes_are_empty_404() {
        let engine = StubEngine::new();
        for (method, path) in [
            ("GET", "/nope"),
            ("PUT", "/api/tasks"),
            ("POST", "/api/tasks/xx/status"),
            ("PATCH", "/api/tasks"),
            ("DELETE", "/api/tasks/"),
        ] {
            let resp = dispatch(&engine, &req(method, path, ""));
            assert_eq!(resp.status, 404, "{} {}", method, path);
            assert_eq!(resp.body, "", "{} {}", method, path);
        }
    }

    #[test]
    fn status_id_extraction_is_textual() {
        assert_eq!(task_id_for_status("/api/tasks/ab12cd34/status"), Some("ab12cd34"));
        assert_eq!(task_id_for_status("/api/tasks//status"), None);
        assert_eq!(task_id_for_status("/api/tasks/a/b/status"), None);
        assert_eq!(task_id_for_status("/api/tasks/status"), None);
    }
}
