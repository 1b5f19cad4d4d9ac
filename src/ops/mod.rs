pub mod search;
pub mod task_store;

pub use task_store::{TaskCounts, TaskStore};
