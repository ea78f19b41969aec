//! Task lifecycle use-cases.
//!
//! # Responsibility
//! - Create, complete, reopen, postpone and reprioritize tasks.
//! - Define which tasks are relevant right now, as one composed predicate.
//! - Order task lists by priority.
//!
//! # Invariants
//! - Each operation does at most one repository read and one write.
//! - Relevant tasks are open, due (or undated) and not postponed into the
//!   future, evaluated against a single `now` per call.
//! - Priority sorting is stable: ties keep repository order.

use crate::model::priority::TaskPriority;
use crate::model::task::{Task, TaskId};
use crate::model::timestamp::Timestamp;
use crate::query::{less_than_or_null, Predicate, QueryError, QueryResult};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::service::clock::{Clock, SystemClock};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, TaskManagerError>;

/// Error returned by task manager operations.
#[derive(Debug)]
pub enum TaskManagerError {
    /// Title was empty or whitespace only.
    InvalidTitle,
    /// No task exists with this id.
    NotFound(TaskId),
    /// Predicate construction failed.
    Query(QueryError),
    /// Storage failure, propagated unchanged.
    Repo(RepoError),
}

impl Display for TaskManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "task title cannot be empty"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Query(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidTitle | Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for TaskManagerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<QueryError> for TaskManagerError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

/// Builds the relevance predicate for the instant `now`:
/// `done_on IS NULL AND (due_date < now OR due_date IS NULL)
///  AND (postponed_until < now OR postponed_until IS NULL)`.
pub fn relevant_tasks_predicate(now: Timestamp) -> QueryResult<Predicate> {
    let open = Predicate::is_null(Task::DONE_ON)?;
    let due = less_than_or_null(Task::DUE_DATE, now)?;
    let not_postponed = less_than_or_null(Task::POSTPONED_UNTIL, now)?;
    Ok(open.and(due).and(not_postponed))
}

/// Stable ascending sort by priority sort index.
pub fn sort_by_priority(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| task.priority.sort_index());
}

/// Task use-case service over a repository and a clock.
pub struct TaskManager<R: TaskRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository> TaskManager<R, SystemClock> {
    /// Creates a manager that reads wall-clock time.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: TaskRepository, C: Clock> TaskManager<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Creates and stores an open task with normal priority.
    ///
    /// `due_date = None` makes the task due immediately.
    pub fn create_task(
        &self,
        title: impl Into<String>,
        due_date: Option<Timestamp>,
    ) -> ManagerResult<Task> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskManagerError::InvalidTitle);
        }

        let mut task = Task::new(title, self.clock.now());
        task.due_date = due_date;
        self.repo.insert_task(&mut task)?;

        info!(
            "event=task_create module=service status=ok task_id={} has_due_date={}",
            task.id.unwrap_or_default(),
            task.due_date.is_some()
        );
        Ok(task)
    }

    /// Fetches one task by id.
    ///
    /// # Errors
    /// - `NotFound` when no task has this id.
    pub fn get_task(&self, id: TaskId) -> ManagerResult<Task> {
        let filter = Predicate::equals(Task::ID, id)?;
        match self.repo.query_tasks(&filter)?.into_iter().next() {
            Some(task) => Ok(task),
            None => {
                warn!("event=task_lookup module=service status=error task_id={id} error_code=not_found");
                Err(TaskManagerError::NotFound(id))
            }
        }
    }

    /// Marks a task done as of now.
    pub fn set_task_done(&self, id: TaskId) -> ManagerResult<()> {
        let now = self.clock.now();
        self.modify_task(id, "task_done", |task| task.done_on = Some(now))
    }

    /// Reopens a done task.
    pub fn revert_task_done(&self, id: TaskId) -> ManagerResult<()> {
        self.modify_task(id, "task_revert_done", |task| task.done_on = None)
    }

    /// Hides a task until `until`.
    ///
    /// Past instants are accepted; they simply have no postponing effect.
    pub fn postpone_task(&self, id: TaskId, until: Timestamp) -> ManagerResult<()> {
        self.modify_task(id, "task_postpone", |task| {
            task.postponed_until = Some(until)
        })
    }

    pub fn change_task_priority(&self, id: TaskId, priority: TaskPriority) -> ManagerResult<()> {
        self.modify_task(id, "task_priority", |task| task.priority = priority)
    }

    /// Returns the tasks to show the user now, highest priority first.
    pub fn get_relevant_tasks(&self) -> ManagerResult<Vec<Task>> {
        let filter = relevant_tasks_predicate(self.clock.now())?;
        let mut tasks = self.repo.query_tasks(&filter)?;
        sort_by_priority(&mut tasks);
        Ok(tasks)
    }

    /// Returns every stored task, highest priority first.
    pub fn list_all_tasks(&self) -> ManagerResult<Vec<Task>> {
        let mut tasks = self.repo.query_tasks(&Predicate::Always)?;
        sort_by_priority(&mut tasks);
        Ok(tasks)
    }

    fn modify_task(
        &self,
        id: TaskId,
        event: &str,
        apply: impl FnOnce(&mut Task),
    ) -> ManagerResult<()> {
        let mut task = self.get_task(id)?;
        apply(&mut task);
        self.repo.update_task(&task)?;
        info!("event={event} module=service status=ok task_id={id}");
        Ok(())
    }
}
