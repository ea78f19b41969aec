//! Core use-case services.
//!
//! # Responsibility
//! - Express task lifecycle rules in terms of predicates and ordering.
//! - Keep CLI and other front ends decoupled from storage details.

pub mod clock;
pub mod task_manager;
