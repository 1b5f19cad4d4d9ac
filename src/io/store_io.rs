use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::task::{Task, TaskId, TaskRecord, is_blank};

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Task cannot be empty")]
    EmptyText,
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path}: task {index} has empty text")]
    BlankRecord { path: PathBuf, index: usize },
    #[error("{path}: duplicate task id {id}")]
    DuplicateId { path: PathBuf, id: TaskId },
    #[error("{path}: task ids are exhausted")]
    IdOverflow { path: PathBuf },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Directory that holds the data file and its sidecar files (lock, state, recovery log)
pub fn data_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Read the persisted task file. A missing file is an empty list.
///
/// Records without an `id` get one after the largest id present, in file order.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let records: Vec<TaskRecord> = match serde_json::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            recovery::log_recovery(
                &data_dir(path),
                RecoveryEntry::new(RecoveryCategory::Parse, "task file could not be parsed")
                    .field("Source", path.display().to_string())
                    .field("Error", e.to_string())
                    .body(content),
            );
            return Err(StoreError::Parse {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    records_to_tasks(path, records)
}

fn records_to_tasks(path: &Path, records: Vec<TaskRecord>) -> Result<Vec<Task>, StoreError> {
    let overflow = || StoreError::IdOverflow {
        path: path.to_path_buf(),
    };
    let mut next = records
        .iter()
        .filter_map(|r| r.id.map(|id| id.0))
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(overflow)?;

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());
    for (index, rec) in records.into_iter().enumerate() {
        if is_blank(&rec.text) {
            return Err(StoreError::BlankRecord {
                path: path.to_path_buf(),
                index,
            });
        }
        let id = match rec.id {
            Some(id) => id,
            None => {
                let id = TaskId(next);
                next = next.checked_add(1).ok_or_else(overflow)?;
                id
            }
        };
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId {
                path: path.to_path_buf(),
                id,
            });
        }
        tasks.push(Task {
            id,
            text: rec.text,
            completed: rec.completed,
        });
    }
    Ok(tasks)
}

/// Serialize tasks to the on-disk JSON layout
pub fn serialize_tasks(tasks: &[Task]) -> Result<String, StoreError> {
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from).collect();
    let mut out = serde_json::to_string_pretty(&records)?;
    out.push('\n');
    Ok(out)
}

/// Rewrite the whole task file. On failure the unsaved content goes to the
/// recovery log before the error is returned.
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    let content = serialize_tasks(tasks)?;
    let dir = data_dir(path);

    let result = fs::create_dir_all(&dir)
        .and_then(|_| recovery::atomic_write(path, content.as_bytes()));
    if let Err(e) = result {
        recovery::log_recovery(
            &dir,
            RecoveryEntry::new(RecoveryCategory::Write, "task file write failed")
                .field("Target", path.display().to_string())
                .field("Error", e.to_string())
                .body(content),
        );
        return Err(StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Task> {
        let mut done = Task::new(TaskId(2), "Walk the dog");
        done.completed = true;
        vec![Task::new(TaskId(1), "Buy milk"), done]
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let tasks = read_tasks(&tmp.path().join("tasks.json")).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn write_then_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        write_tasks(&path, &sample()).unwrap();
        assert_eq!(read_tasks(&path).unwrap(), sample());
    }

    #[test]
    fn serialized_layout() {
        let out = serialize_tasks(&sample()).unwrap();
        insta::assert_snapshot!(out, @r#"
        [
          {
            "id": 1,
            "text": "Buy milk",
            "completed": false
          },
          {
            "id": 2,
            "text": "Walk the dog",
            "completed": true
          }
        ]
        "#);
    }

    #[test]
    fn empty_list_serializes_to_empty_array() {
        assert_eq!(serialize_tasks(&[]).unwrap(), "[]\n");
    }

    #[test]
    fn legacy_records_get_sequential_ids() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"text": "a", "completed": false}, {"text": "b", "completed": true}]"#,
        )
        .unwrap();

        let tasks = read_tasks(&path).unwrap();
        assert_eq!(tasks[0].id, TaskId(1));
        assert_eq!(tasks[1].id, TaskId(2));
        assert!(tasks[1].completed);
    }

    #[test]
    fn missing_ids_follow_largest_present_id() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, r#"[{"text": "a"}, {"id": 7, "text": "b"}]"#).unwrap();

        let tasks = read_tasks(&path).unwrap();
        assert_eq!(tasks[0].id, TaskId(8));
        assert_eq!(tasks[1].id, TaskId(7));
    }

    #[test]
    fn malformed_file_is_an_error_and_logged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, "not json {{{").unwrap();

        let err = read_tasks(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));

        let entries = recovery::read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Parse);
        assert_eq!(entries[0].body, "not json {{{");
    }

    #[test]
    fn blank_record_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, r#"[{"text": "ok"}, {"text": "  "}]"#).unwrap();
        let err = read_tasks(&path).unwrap_err();
        assert!(matches!(err, StoreError::BlankRecord { index: 1, .. }));
    }

    #[test]
    fn duplicate_ids_are_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, r#"[{"id": 1, "text": "a"}, {"id": 1, "text": "b"}]"#).unwrap();
        let err = read_tasks(&path).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { id: TaskId(1), .. }));
    }

    #[test]
    fn largest_possible_id_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, r#"[{"id": 18446744073709551615, "text": "a"}]"#).unwrap();
        let err = read_tasks(&path).unwrap_err();
        assert!(matches!(err, StoreError::IdOverflow { .. }));
    }

    #[test]
    fn legacy_records_after_near_max_id_are_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id": 18446744073709551614, "text": "a"}, {"text": "b"}, {"text": "c"}]"#,
        )
        .unwrap();
        let err = read_tasks(&path).unwrap_err();
        assert!(matches!(err, StoreError::IdOverflow { .. }));
    }

    #[test]
    fn write_creates_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/tasks.json");
        write_tasks(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn failed_write_is_logged() {
        let tmp = TempDir::new().unwrap();
        // A directory in place of the data file makes the rename fail
        let path = tmp.path().join("tasks.json");
        fs::create_dir(&path).unwrap();

        let err = write_tasks(&path, &sample()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));

        let entries = recovery::read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert!(entries[0].body.contains("Buy milk"));
    }

    #[test]
    fn data_dir_of_bare_file_name_is_cwd() {
        assert_eq!(data_dir(Path::new("tasks.json")), PathBuf::from("."));
        assert_eq!(data_dir(Path::new("/a/b/tasks.json")), PathBuf::from("/a/b"));
    }
}
