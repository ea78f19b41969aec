//! Domain model for task tracking.
//!
//! # Responsibility
//! - Define the task entity and the value types it is built from.
//! - Expose a per-entity field-accessor table used by query evaluation and
//!   storage mapping.
//!
//! # Invariants
//! - Every persisted task is identified by a repository-assigned `TaskId`.
//! - Timestamps are Unix epoch milliseconds everywhere in core.

pub mod field;
pub mod priority;
pub mod task;
pub mod timestamp;
pub mod value;
