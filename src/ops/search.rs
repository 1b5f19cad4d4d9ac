use std::ops::Range;

use regex::Regex;

use crate::model::task::{Task, TaskId};

/// A task whose text matched a search pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub task_id: TaskId,
    /// Display index in the store
    pub index: usize,
    /// Byte ranges of the matches within the task text
    pub spans: Vec<Range<usize>>,
}

/// Compile a user pattern case-insensitively. Invalid regex syntax falls
/// back to a literal match.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Search task texts, in display order.
pub fn search_tasks(tasks: &[Task], re: &Regex) -> Vec<SearchHit> {
    tasks
        .iter()
        .enumerate()
        .filter_map(|(index, task)| {
            let spans: Vec<Range<usize>> =
                re.find_iter(&task.text).map(|m| m.start()..m.end()).collect();
            if spans.is_empty() {
                None
            } else {
                Some(SearchHit {
                    task_id: task.id,
                    index,
                    spans,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new(TaskId(1), "Buy milk"),
            Task::new(TaskId(2), "Call mom"),
            Task::new(TaskId(3), "Milk the cow, buy MILK"),
        ]
    }

    #[test]
    fn case_insensitive_hits_in_order() {
        let re = compile_pattern("milk").unwrap();
        let hits = search_tasks(&tasks(), &re);
        let ids: Vec<TaskId> = hits.iter().map(|h| h.task_id).collect();
        assert_eq!(ids, vec![TaskId(1), TaskId(3)]);
        assert_eq!(hits[0].spans, vec![4..8]);
        assert_eq!(hits[1].index, 2);
        assert_eq!(hits[1].spans.len(), 2);
    }

    #[test]
    fn invalid_regex_falls_back_to_literal() {
        let list = vec![Task::new(TaskId(1), "fix (parser"), Task::new(TaskId(2), "other")];
        let re = compile_pattern("(parser").unwrap();
        let hits = search_tasks(&list, &re);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].task_id, TaskId(1));
    }

    #[test]
    fn regex_syntax_is_honored() {
        let re = compile_pattern("^call").unwrap();
        let hits = search_tasks(&tasks(), &re);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].task_id, TaskId(2));
    }

    #[test]
    fn empty_pattern_compiles_to_none() {
        assert!(compile_pattern("").is_none());
    }
}
