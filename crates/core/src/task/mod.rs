//! Task module
//!
//! This module contains the task entity and its repositories.

mod file_store;
mod memory_store;
mod model;
mod repository;

pub use file_store::FileTaskRepository;
pub use memory_store::InMemoryTaskRepository;
pub use model::*;
pub use repository::TaskRepository;
