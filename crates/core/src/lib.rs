//! Core library for the checklist service
//!
//! This crate contains the core business logic, including:
//! - The task entity and its storage interface
//! - In-memory and file-backed task repositories
//! - The checklist service and its logging decorator

pub mod checklist;
pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
