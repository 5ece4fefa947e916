//! Minimal JSON encoding and field extraction for the task wire format.
//!
//! Neither direction is a general-purpose JSON implementation and neither
//! tries to be. Tasks are encoded with the five wire fields in a fixed
//! order, and request bodies are treated as a single flat object whose
//! string-valued fields can be looked up by key. Nested objects, arrays
//! and unicode escapes are not supported. Everything else in the crate
//! goes through this module when it touches wire JSON, so swapping in a
//! real JSON library later would only touch these functions.

use crate::task::Task;

/// encodes a single task as a JSON object with the fields
/// `id`, `titulo`, `descricao`, `status`, `criadoEm`, in that order
pub fn encode_task(task: &Task) -> String {
    format!(
        "{{\"id\":\"{}\",\"titulo\":\"{}\",\"descricao\":\"{}\",\"status\":{},\"criadoEm\":{}}}",
        escape(&task.id),
        escape(&task.title),
        escape(&task.description),
        task.status.as_int(),
        task.created_at_ms,
    )
}

/// encodes a slice of tasks as a JSON array of task objects
pub fn encode_tasks(tasks: &[Task]) -> String {
    let mut out = String::from("[");
    for (i, task) in tasks.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&encode_task(task));
    }
    out.push(']');
    out
}

/// escapes a string for embedding in a JSON string literal.
/// Backslash, double quote and newline are escaped; carriage returns are
/// dropped entirely.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// looks up `key` in a flat JSON object and returns its value with
/// surrounding quotes stripped, or `None` when the key is absent or the
/// body does not parse as a flat object.
///
/// The body is split on top-level commas with a quote-toggle scan; a quote
/// immediately preceded by a backslash does not toggle, so commas inside
/// string values (escaped quotes included) are not split points. Each pair
/// is then split on its first `:`.
pub fn extract_field(body: &str, key: &str) -> Option<String> {
    let mut s = body.trim();
    s = s.strip_prefix('{').unwrap_or(s);
    s = s.strip_suffix('}').unwrap_or(s);

    let mut parts: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut prev = '\0';
    for c in s.chars() {
        if c == '"' && prev != '\\' {
            in_quotes = !in_quotes;
        }
        if c == ',' && !in_quotes {
            parts.push(std::mem::take(&mut cur));
        } else {
            cur.push(c);
        }
        prev = c;
    }
    if !cur.is_empty() {
        parts.push(cur);
    }

    for pair in &parts {
        let colon = match pair.find(':') {
            Some(i) if i > 0 => i,
            _ => continue,
        };
        let k = strip_quotes(&pair[..colon]);
        if k == key {
            return Some(strip_quotes(&pair[colon + 1..]));
        }
    }
    None
}

/// trims a raw key or value and, when it is surrounded by double quotes,
/// removes them and unescapes `\"` back into `"`
fn strip_quotes(s: &str) -> String {
    let t = s.trim();
    if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
        t[1..t.len() - 1].replace("\\\"", "\"")
    } else {
        t.to_string()
    }
}
