//! In-memory task repository.
//!
//! # Responsibility
//! - Provide a storage-free `TaskRepository` for tests and embedding.
//! - Evaluate predicates with the in-memory evaluator.
//!
//! # Invariants
//! - Stored tasks are copies; callers never alias repository state.
//! - Query results keep insertion order; updates replace in place.
//! - Generated ids start at `FIRST_GENERATED_ID` so small fixed ids stay
//!   free for tasks seeded through `with_tasks`.
//! - Generated ids never collide with seeded ids.

use crate::model::task::{Task, TaskId};
use crate::query::{evaluate, Predicate};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use std::cell::{Cell, RefCell};

pub const FIRST_GENERATED_ID: TaskId = 10_000;

/// Single-threaded in-memory task store.
#[derive(Debug)]
pub struct InMemoryTaskRepository {
    tasks: RefCell<Vec<Task>>,
    next_id: Cell<TaskId>,
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: RefCell::new(Vec::new()),
            next_id: Cell::new(FIRST_GENERATED_ID),
        }
    }

    /// Seeds the store with already identified tasks.
    ///
    /// # Errors
    /// - `MissingId` when a seeded task has no id; use `insert_task` for those.
    /// - `AlreadyInserted` when two seeded tasks share an id.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> RepoResult<Self> {
        let repo = Self::new();
        {
            let mut stored = repo.tasks.borrow_mut();
            for task in tasks {
                let id = task.id.ok_or(RepoError::MissingId)?;
                if stored.iter().any(|existing| existing.id == Some(id)) {
                    return Err(RepoError::AlreadyInserted(id));
                }
                if id >= repo.next_id.get() {
                    repo.next_id.set(id + 1);
                }
                stored.push(task);
            }
        }
        Ok(repo)
    }

    /// Snapshot of every stored task in storage order.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn insert_task(&self, task: &mut Task) -> RepoResult<()> {
        task.validate()?;
        if let Some(id) = task.id {
            return Err(RepoError::AlreadyInserted(id));
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        task.id = Some(id);
        self.tasks.borrow_mut().push(task.clone());
        Ok(())
    }

    fn query_tasks(&self, predicate: &Predicate) -> RepoResult<Vec<Task>> {
        Ok(self
            .tasks
            .borrow()
            .iter()
            .filter(|task| evaluate(predicate, *task))
            .cloned()
            .collect())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;
        let id = task.id.ok_or(RepoError::MissingId)?;

        let mut tasks = self.tasks.borrow_mut();
        let stored = tasks
            .iter_mut()
            .find(|stored| stored.id == Some(id))
            .ok_or(RepoError::NotFound(id))?;
        *stored = task.clone();
        Ok(())
    }
}
