//! Application state

use std::sync::Arc;

use todo_core::checklist::{Checklist, ChecklistService, LoggingService};
use todo_core::task::{FileTaskRepository, InMemoryTaskRepository, TaskRepository};

use crate::config::Storage;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: Arc<dyn ChecklistService>,
    storage: &'static str,
}

impl AppState {
    /// Create a new AppState with the configured task storage
    pub async fn new(storage: &Storage) -> todo_core::Result<Self> {
        let repository: Arc<dyn TaskRepository> = match storage {
            Storage::Memory => Arc::new(InMemoryTaskRepository::new()),
            Storage::File(path) => {
                tracing::info!("Using task file: {:?}", path);
                Arc::new(FileTaskRepository::new(path).await?)
            }
        };

        Ok(Self::with_repository(repository, storage.kind()))
    }

    /// Create an AppState around an existing repository
    pub fn with_repository(repository: Arc<dyn TaskRepository>, storage: &'static str) -> Self {
        let service = LoggingService::new(Checklist::new(repository));
        Self {
            inner: Arc::new(AppStateInner {
                service: Arc::new(service),
                storage,
            }),
        }
    }

    /// Get reference to the checklist service
    pub fn service(&self) -> &dyn ChecklistService {
        self.inner.service.as_ref()
    }

    /// Name of the storage backend in use
    pub fn storage(&self) -> &'static str {
        self.inner.storage
    }
}
