//! File-based task storage implementation
//!
//! Stores tasks as JSON in a file on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::memory_store::TaskTable;
use super::model::Task;
use super::repository::TaskRepository;
use crate::Result;

/// File-based task repository using JSON
///
/// Every mutation is applied to a copy of the table and written to disk
/// before it becomes visible, so a failed write leaves the store unchanged.
pub struct FileTaskRepository {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of the file contents
    table: RwLock<TaskTable>,
}

impl FileTaskRepository {
    /// Create a new FileTaskRepository
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            TaskTable::default()
        };

        tracing::debug!("Loaded task file {:?}", path);

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Path of the backing JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a table to disk
    async fn persist(&self, table: &TaskTable) -> Result<()> {
        let content = serde_json::to_string_pretty(table)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Run a mutation against a copy of the table and commit it once persisted
    async fn mutate<T>(&self, op: impl FnOnce(&mut TaskTable) -> Result<T>) -> Result<T> {
        let mut table = self.table.write().await;
        let mut next = table.clone();
        let out = op(&mut next)?;
        self.persist(&next).await?;
        *table = next;
        Ok(out)
    }
}

#[async_trait]
impl TaskRepository for FileTaskRepository {
    async fn insert(&self, task: Task) -> Result<Task> {
        self.mutate(|table| table.insert(task)).await
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.table.read().await.all())
    }

    async fn find_by_id(&self, id: i64) -> Result<Task> {
        self.table.read().await.get(id)
    }

    async fn update(&self, task: Task) -> Result<Task> {
        self.mutate(|table| table.replace(task)).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.mutate(|table| table.remove(id)).await
    }

    async fn toggle_done(&self, id: i64) -> Result<Task> {
        self.mutate(|table| table.toggle(id)).await
    }
}
