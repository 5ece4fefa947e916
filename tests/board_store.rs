//! Integration tests for the flat-file codec and the board store,
//! exercised through real files in temporary directories.

use std::collections::HashSet;
use std::fs;

use kanban::flatfile;
use kanban::{BoardStore, Status, Task, TaskEngine};
use tempfile::TempDir;

fn task(id: &str, title: &str, description: &str, status: Status, created: i64) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        created_at_ms: created,
    }
}

#[test]
fn file_round_trip_preserves_records_and_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.csv");
    let tasks = vec![
        task("aaaa0001", "plain title", "plain description", Status::Todo, 1),
        task("aaaa0002", "semi;colon", "quote \"inside\"", Status::Doing, 2),
        task("aaaa0003", "unicode café ✓", "", Status::Done, 3),
        task("aaaa0004", "both;\"at once\"", "x;y;z", Status::Todo, 4),
    ];

    flatfile::save(&path, &tasks).unwrap();
    let loaded = flatfile::load(&path, 100).unwrap();

    assert_eq!(loaded, tasks);
}

#[test]
fn file_starts_with_the_fixed_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.csv");
    flatfile::save(&path, &[task("aaaa0001", "t", "", Status::Todo, 1)]).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("id;titulo;descricao;status;criadoEm"));
    assert_eq!(lines.next(), Some("aaaa0001;t;;0;1"));
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("board.csv");
    flatfile::save(&path, &[]).unwrap();
    assert!(path.exists());
}

#[test]
fn missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let loaded = flatfile::load(&dir.path().join("nothing.csv"), 100).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn malformed_lines_are_skipped_and_bad_numbers_fall_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.csv");
    fs::write(
        &path,
        "id;titulo;descricao;status;criadoEm\n\
         aaaa0001;good;desc;1;100\n\
         only;three;fields\n\
         \n\
         aaaa0002;odd numbers;;nine;not-a-time\n",
    )
    .unwrap();

    let loaded = flatfile::load(&path, 100).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, "aaaa0001");
    assert_eq!(loaded[0].status, Status::Doing);
    assert_eq!(loaded[1].status, Status::Todo);
    // unparsable timestamp defaults to "now"
    assert!(loaded[1].created_at_ms > 100);
}

#[test]
fn out_of_range_status_is_clamped_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.csv");
    fs::write(
        &path,
        "id;titulo;descricao;status;criadoEm\n\
         aaaa0001;low;;-4;1\n\
         aaaa0002;high;;12;2\n",
    )
    .unwrap();

    let loaded = flatfile::load(&path, 100).unwrap();
    assert_eq!(loaded[0].status, Status::Todo);
    assert_eq!(loaded[1].status, Status::Done);
}

#[test]
fn load_stops_at_capacity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.csv");
    let tasks: Vec<Task> = (0..5)
        .map(|i| task(&format!("aaaa000{}", i), "t", "", Status::Todo, i))
        .collect();
    flatfile::save(&path, &tasks).unwrap();

    let loaded = flatfile::load(&path, 3).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[2].id, "aaaa0002");
}

#[test]
fn created_ids_are_pairwise_distinct() {
    let dir = TempDir::new().unwrap();
    let store = BoardStore::open(dir.path().join("board.csv"), 1000);

    let mut seen = HashSet::new();
    for i in 0..300 {
        let task = store.create(format!("task {}", i), String::new()).unwrap();
        assert_eq!(task.id.len(), 8);
        assert!(seen.insert(task.id), "duplicate id handed out");
    }
}

#[test]
fn concurrent_creates_stay_consistent() {
    let dir = TempDir::new().unwrap();
    let store = BoardStore::open(dir.path().join("board.csv"), 1000);

    crossbeam_utils::thread::scope(|s| {
        for worker in 0..8 {
            let handle = store.clone();
            s.spawn(move |_| {
                for i in 0..25 {
                    handle
                        .create(format!("worker {} task {}", worker, i), String::new())
                        .unwrap();
                }
            });
        }
    })
    .unwrap();

    let tasks = store.list().unwrap();
    assert_eq!(tasks.len(), 200);
    let ids: HashSet<String> = tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids.len(), 200);

    // the file reflects the final state
    let reloaded = flatfile::load(&store.data_path(), 1000).unwrap();
    assert_eq!(reloaded.len(), 200);
}

#[test]
fn delete_compaction_shifts_later_records_down() {
    let dir = TempDir::new().unwrap();
    let store = BoardStore::open(dir.path().join("board.csv"), 100);
    let ids: Vec<String> = (0..6)
        .map(|i| store.create(format!("task {}", i), String::new()).unwrap().id)
        .collect();

    store.remove(&ids[1]).unwrap();

    let after: Vec<String> = store.list().unwrap().into_iter().map(|t| t.id).collect();
    let expected: Vec<String> = ids
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 1)
        .map(|(_, id)| id.clone())
        .collect();
    assert_eq!(after, expected);

    // reopening from disk sees the same compacted order
    let reopened = BoardStore::open(dir.path().join("board.csv"), 100);
    let reloaded: Vec<String> = reopened.list().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(reloaded, expected);
}

#[test]
fn capacity_boundary_rejects_create_without_mutation() {
    let dir = TempDir::new().unwrap();
    let store = BoardStore::open(dir.path().join("board.csv"), 3);
    for i in 0..3 {
        store.create(format!("task {}", i), String::new()).unwrap();
    }

    let before: Vec<String> = store.list().unwrap().into_iter().map(|t| t.id).collect();
    assert!(store.create("one too many".into(), String::new()).is_err());
    let after: Vec<String> = store.list().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(before, after);
}
