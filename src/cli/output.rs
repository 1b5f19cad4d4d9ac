use serde::Serialize;

use crate::model::task::Task;
use crate::ops::TaskCounts;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Serialize)]
pub struct RemovedJson {
    pub removed: Vec<u64>,
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.0,
        text: task.text.clone(),
        completed: task.completed,
    }
}

pub fn stats_to_json(counts: TaskCounts) -> StatsJson {
    StatsJson {
        total: counts.total,
        completed: counts.completed,
        pending: counts.pending,
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One listing line: `[x] #3  Buy milk`
pub fn format_task_line(task: &Task, id_width: usize) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    format!(
        "[{}] {:<width$}  {}",
        check,
        task.id.to_string(),
        task.text,
        width = id_width
    )
}

/// Format a full listing; ids are padded to a common width
pub fn format_task_listing<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<String> {
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let id_width = tasks
        .iter()
        .map(|t| t.id.to_string().len())
        .max()
        .unwrap_or(0);
    tasks
        .iter()
        .map(|t| format_task_line(t, id_width))
        .collect()
}

pub fn format_stats(counts: TaskCounts) -> String {
    format!(
        "{} tasks: {} pending, {} completed",
        counts.total, counts.pending, counts.completed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskId;

    #[test]
    fn listing_pads_ids() {
        let mut done = Task::new(TaskId(10), "Walk the dog");
        done.completed = true;
        let tasks = vec![Task::new(TaskId(2), "Buy milk"), done];

        let lines = format_task_listing(&tasks);
        assert_eq!(lines, vec!["[ ] #2   Buy milk", "[x] #10  Walk the dog"]);
    }

    #[test]
    fn empty_listing() {
        let none: Vec<Task> = Vec::new();
        assert!(format_task_listing(&none).is_empty());
    }

    #[test]
    fn stats_line() {
        let counts = TaskCounts {
            total: 3,
            completed: 1,
            pending: 2,
        };
        assert_eq!(format_stats(counts), "3 tasks: 2 pending, 1 completed");
    }

    #[test]
    fn task_json_fields() {
        let value = serde_json::to_value(task_to_json(&Task::new(TaskId(4), "x"))).unwrap();
        assert_eq!(value, serde_json::json!({"id": 4, "text": "x", "completed": false}));
    }
}
