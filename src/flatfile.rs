//! The delimited text format the board is persisted in.
//!
//! One header line, then one line per task with fields separated by `;`.
//! A field containing the delimiter, a double quote or a newline is
//! wrapped in double quotes with inner quotes doubled. The whole file is
//! rewritten on every save; there is no incremental append.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::warn;

use crate::error::Result;
use crate::task::{now_ms, Status, Task};

/// the fixed first line of every data file
pub const HEADER: &str = "id;titulo;descricao;status;criadoEm";

/// Rewrites the data file at `path` from scratch with the given tasks,
/// creating parent directories as needed.
///
/// # Errors
/// returns an IO error if the directories or the file could not be written
pub fn save(path: &Path, tasks: &[Task]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", HEADER)?;
    for task in tasks {
        writeln!(
            writer,
            "{};{};{};{};{}",
            escape_field(&task.id),
            escape_field(&task.title),
            escape_field(&task.description),
            task.status.as_int(),
            task.created_at_ms,
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads tasks from the data file at `path`, stopping once `capacity`
/// records have been read.
///
/// A missing file yields an empty list. Blank lines, the header line and
/// lines that parse to fewer than five fields are skipped. An unparsable
/// status falls back to 0 and an unparsable timestamp falls back to the
/// current time. A read failure mid-file keeps whatever was loaded so far.
///
/// # Errors
/// returns an IO error only when an existing file could not be opened
pub fn load(path: &Path, capacity: usize) -> Result<Vec<Task>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(File::open(path)?);
    let mut tasks: Vec<Task> = Vec::new();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("stopped reading {:?} early: {}", path, e);
                break;
            }
        };
        if line.trim().is_empty() || line.starts_with("id;") {
            continue;
        }
        let fields = split_line(&line);
        if fields.len() < 5 {
            continue;
        }
        if tasks.len() >= capacity {
            break;
        }
        tasks.push(Task {
            id: fields[0].clone(),
            title: fields[1].clone(),
            description: fields[2].clone(),
            status: Status::from_clamped(parse_int_or(&fields[3], 0)),
            created_at_ms: parse_int_or(&fields[4], now_ms()),
        });
    }
    Ok(tasks)
}

/// quotes a field when it contains the delimiter, a quote or a newline,
/// doubling any inner quotes
fn escape_field(s: &str) -> String {
    if s.contains(';') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// splits one data line into fields, tracking quote state char by char.
/// Inside quotes a doubled quote is an escaped quote and a lone quote
/// closes the field; outside quotes `;` separates fields.
fn split_line(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cur.push(c);
            }
        } else {
            match c {
                ';' => out.push(std::mem::take(&mut cur)),
                '"' => in_quotes = true,
                _ => cur.push(c),
            }
        }
    }
    out.push(cur);
    out
}

fn parse_int_or(s: &str, default: i64) -> i64 {
    s.trim().parse().unwrap_or(default)
}
