//! Logging decorator for the checklist service

use async_trait::async_trait;
use std::time::Instant;

use super::service::{ChecklistService, Upserted};
use crate::task::Task;
use crate::Result;

/// Wraps a [`ChecklistService`] and emits one tracing event per call
pub struct LoggingService<S> {
    inner: S,
}

impl<S: ChecklistService> LoggingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn log_outcome<T>(method: &str, started: Instant, result: &Result<T>) {
    let took = started.elapsed();
    match result {
        Ok(_) => tracing::info!(method, ?took, "checklist call succeeded"),
        Err(err) => tracing::warn!(method, ?took, %err, "checklist call failed"),
    }
}

#[async_trait]
impl<S: ChecklistService> ChecklistService for LoggingService<S> {
    async fn save(&self, task: Task) -> Result<Task> {
        let started = Instant::now();
        tracing::debug!(name = %task.name, "save");
        let result = self.inner.save(task).await;
        log_outcome("save", started, &result);
        result
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let started = Instant::now();
        let result = self.inner.list().await;
        log_outcome("list", started, &result);
        result
    }

    async fn toggle_done(&self, id: i64) -> Result<()> {
        let started = Instant::now();
        tracing::debug!(id, "toggle_done");
        let result = self.inner.toggle_done(id).await;
        log_outcome("toggle_done", started, &result);
        result
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let started = Instant::now();
        tracing::debug!(id, "remove");
        let result = self.inner.remove(id).await;
        log_outcome("remove", started, &result);
        result
    }

    async fn update(&self, task: Task) -> Result<Task> {
        let started = Instant::now();
        tracing::debug!(id = task.id, "update");
        let result = self.inner.update(task).await;
        log_outcome("update", started, &result);
        result
    }

    async fn upsert(&self, task: Task) -> Result<Upserted> {
        let started = Instant::now();
        tracing::debug!(id = task.id, name = %task.name, "upsert");
        let result = self.inner.upsert(task).await;
        if let Ok(outcome) = &result {
            tracing::debug!(id = outcome.task.id, created = outcome.created, "upsert applied");
        }
        log_outcome("upsert", started, &result);
        result
    }
}
