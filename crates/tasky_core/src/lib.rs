//! Core domain logic for Tasky.
//! This crate is the single source of truth for task relevance rules and the
//! query filter algebra they are expressed in.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::field::{FieldAccessor, FieldError, Record};
pub use model::priority::{ParsePriorityError, TaskPriority, PRIORITY_CODES};
pub use model::task::{RecurringTaskId, Task, TaskId, TaskValidationError};
pub use model::timestamp::Timestamp;
pub use model::value::Value;
pub use query::{
    compile, evaluate, less_than_or_null, Combinator, Comparison, Predicate, QueryError,
    QueryResult, SqlParam, WhereClause,
};
pub use repo::memory_repo::InMemoryTaskRepository;
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::clock::{Clock, ManualClock, SystemClock};
pub use service::task_manager::{
    relevant_tasks_predicate, sort_by_priority, ManagerResult, TaskManager, TaskManagerError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
