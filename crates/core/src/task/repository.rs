//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;

use super::model::Task;
use crate::Result;

/// Repository interface for task CRUD operations
///
/// Lookups by id fail with [`Error::TaskNotFound`](crate::Error::TaskNotFound)
/// when the task is absent. Returned tasks are copies; mutations go through
/// [`update`](TaskRepository::update) or
/// [`toggle_done`](TaskRepository::toggle_done).
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a task, assigning the next free id when `task.id` is zero
    ///
    /// Fails with `TaskAlreadyExists` when an explicit id is already in use.
    async fn insert(&self, task: Task) -> Result<Task>;

    /// Get all tasks in insertion order
    async fn find_all(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn find_by_id(&self, id: i64) -> Result<Task>;

    /// Replace an existing task
    async fn update(&self, task: Task) -> Result<Task>;

    /// Delete a task by ID
    async fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Flip the done flag of a task and return the stored result
    ///
    /// The default reads then writes in two separate calls, so a concurrent
    /// update or delete can slip in between. Repositories that can do better
    /// should override it with a single critical section.
    async fn toggle_done(&self, id: i64) -> Result<Task> {
        let mut task = self.find_by_id(id).await?;
        task.done = !task.done;
        self.update(task).await
    }
}
