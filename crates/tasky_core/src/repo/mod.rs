//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task storage contract consumed by services.
//! - Isolate SQLite details from business rules.
//!
//! # Invariants
//! - Repository writes enforce `Task::validate()` before persistence.
//! - Storage errors propagate unchanged; no retries happen here.

pub mod memory_repo;
pub mod task_repo;
