//! In-memory task storage implementation
//!
//! Tasks live in process memory for the lifetime of the repository. Useful
//! for tests and for running the service locally without persistence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::RwLock;

use super::model::Task;
use super::repository::TaskRepository;
use crate::{Error, Result};

/// Ordered task list with id bookkeeping
///
/// `used` holds every id ever handed out or explicitly claimed, including
/// ids of removed tasks, so ids are never reused. `counter` is the last id
/// minted automatically. All lookups are linear scans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "TaskTableSnapshot", into = "TaskTableSnapshot")]
pub(crate) struct TaskTable {
    tasks: Vec<Task>,
    used: HashSet<i64>,
    counter: i64,
}

/// On-disk form of a [`TaskTable`]
#[derive(Serialize, Deserialize)]
struct TaskTableSnapshot {
    #[serde(default)]
    counter: i64,
    tasks: Vec<Task>,
}

impl TryFrom<TaskTableSnapshot> for TaskTable {
    type Error = String;

    fn try_from(snapshot: TaskTableSnapshot) -> std::result::Result<Self, Self::Error> {
        let mut used = HashSet::with_capacity(snapshot.tasks.len());
        for task in &snapshot.tasks {
            if task.id <= 0 {
                return Err(format!("stored task has invalid id {}", task.id));
            }
            if !used.insert(task.id) {
                return Err(format!("stored task id {} is duplicated", task.id));
            }
        }
        Ok(Self {
            tasks: snapshot.tasks,
            used,
            counter: snapshot.counter.max(0),
        })
    }
}

impl From<TaskTable> for TaskTableSnapshot {
    fn from(table: TaskTable) -> Self {
        Self {
            counter: table.counter,
            tasks: table.tasks,
        }
    }
}

impl TaskTable {
    pub(crate) fn insert(&mut self, mut task: Task) -> Result<Task> {
        if task.id < 0 {
            return Err(Error::InvalidInput(format!(
                "task id must be positive, got {}",
                task.id
            )));
        }

        if task.has_id() {
            if !self.used.insert(task.id) {
                return Err(Error::TaskAlreadyExists);
            }
        } else {
            let mut next = self.next_id(self.counter)?;
            while self.used.contains(&next) {
                next = self.next_id(next)?;
            }
            self.counter = next;
            self.used.insert(next);
            task.id = next;
        }

        self.tasks.push(task.clone());
        Ok(task)
    }

    pub(crate) fn all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub(crate) fn get(&self, id: i64) -> Result<Task> {
        self.position(id).map(|i| self.tasks[i].clone())
    }

    pub(crate) fn replace(&mut self, task: Task) -> Result<Task> {
        let i = self.position(task.id)?;
        self.tasks[i] = task.clone();
        Ok(task)
    }

    pub(crate) fn remove(&mut self, id: i64) -> Result<()> {
        let i = self.position(id)?;
        self.tasks.remove(i);
        Ok(())
    }

    pub(crate) fn toggle(&mut self, id: i64) -> Result<Task> {
        let i = self.position(id)?;
        let task = &mut self.tasks[i];
        task.done = !task.done;
        Ok(task.clone())
    }

    fn next_id(&self, after: i64) -> Result<i64> {
        after
            .checked_add(1)
            .ok_or_else(|| Error::Storage("task id counter exhausted".to_string()))
    }

    fn position(&self, id: i64) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound)
    }
}

/// In-memory task repository guarded by a reader/writer lock
#[derive(Default)]
pub struct InMemoryTaskRepository {
    table: RwLock<TaskTable>,
}

impl InMemoryTaskRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: Task) -> Result<Task> {
        self.table.write().await.insert(task)
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.table.read().await.all())
    }

    async fn find_by_id(&self, id: i64) -> Result<Task> {
        self.table.read().await.get(id)
    }

    async fn update(&self, task: Task) -> Result<Task> {
        self.table.write().await.replace(task)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.table.write().await.remove(id)
    }

    async fn toggle_done(&self, id: i64) -> Result<Task> {
        self.table.write().await.toggle(id)
    }
}
