//! Checklist module
//!
//! Application service for interacting with a list of tasks.

mod logging;
mod service;

pub use logging::LoggingService;
pub use service::{Checklist, ChecklistService, Upserted};
