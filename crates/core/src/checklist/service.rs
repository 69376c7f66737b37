//! Checklist service
//!
//! Orchestrates repository calls into the application's use cases.

use async_trait::async_trait;
use std::sync::Arc;

use crate::task::{Task, TaskRepository};
use crate::{Error, Result};

/// Outcome of an upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    pub task: Task,
    /// True when no task with the id existed and a new one was inserted
    pub created: bool,
}

/// Application service for a list of tasks
///
/// `TaskNotFound`, `TaskAlreadyExists` and `InvalidInput` are returned as
/// is so callers can branch on them. Every other failure is wrapped with
/// the operation that failed.
#[async_trait]
pub trait ChecklistService: Send + Sync {
    /// Store a new task and return it with its assigned id
    async fn save(&self, task: Task) -> Result<Task>;

    /// List all tasks in storage order
    async fn list(&self) -> Result<Vec<Task>>;

    /// Flip the done flag of a task
    async fn toggle_done(&self, id: i64) -> Result<()>;

    /// Remove a task
    async fn remove(&self, id: i64) -> Result<()>;

    /// Accept a replacement task
    ///
    /// Currently a no-op: the task is handed back without touching storage.
    /// Use [`upsert`](ChecklistService::upsert) to actually replace a task.
    async fn update(&self, task: Task) -> Result<Task>;

    /// Replace the task with `task.id`, inserting it when it does not exist
    async fn upsert(&self, task: Task) -> Result<Upserted>;
}

/// Default [`ChecklistService`] backed by any [`TaskRepository`]
#[derive(Clone)]
pub struct Checklist {
    repository: Arc<dyn TaskRepository>,
}

impl Checklist {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ChecklistService for Checklist {
    async fn save(&self, task: Task) -> Result<Task> {
        self.repository
            .insert(task)
            .await
            .map_err(|e| e.context("save task"))
    }

    async fn list(&self) -> Result<Vec<Task>> {
        self.repository
            .find_all()
            .await
            .map_err(|e| e.context("list tasks"))
    }

    async fn toggle_done(&self, id: i64) -> Result<()> {
        self.repository
            .toggle_done(id)
            .await
            .map(|_| ())
            .map_err(|e| e.context("toggle task"))
    }

    async fn remove(&self, id: i64) -> Result<()> {
        self.repository
            .delete_by_id(id)
            .await
            .map_err(|e| e.context("delete task"))
    }

    async fn update(&self, task: Task) -> Result<Task> {
        Ok(task)
    }

    async fn upsert(&self, task: Task) -> Result<Upserted> {
        match self.repository.update(task.clone()).await {
            Ok(task) => Ok(Upserted {
                task,
                created: false,
            }),
            Err(Error::TaskNotFound) => {
                let task = self
                    .repository
                    .insert(task)
                    .await
                    .map_err(|e| e.context("create task"))?;
                Ok(Upserted {
                    task,
                    created: true,
                })
            }
            Err(e) => Err(e.context("update task")),
        }
    }
}
