//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Store and retrieve tasks through predicate queries.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - `insert_task` assigns the id exactly once; inserting a task that already
//!   has an id is rejected.
//! - Column lists are derived from the task field-accessor table.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::field::{FieldAccessor, Record};
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::model::timestamp::Timestamp;
use crate::model::value::Value;
use crate::query::{compile, Predicate, SqlParam};
use log::debug;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_TABLE: &str = "task";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    /// Update targeted an id with no stored task.
    NotFound(TaskId),
    /// Update of a task that was never inserted.
    MissingId,
    /// Insert of a task that already carries an id.
    AlreadyInserted(TaskId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::MissingId => write!(f, "task has no id; insert it before updating"),
            Self::AlreadyInserted(id) => write!(f, "task already inserted with id {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::MissingId | Self::AlreadyInserted(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract consumed by the task manager.
pub trait TaskRepository {
    /// Stores a new task and writes the assigned id back into `task`.
    fn insert_task(&self, task: &mut Task) -> RepoResult<()>;
    /// Returns tasks matching `predicate` in storage-defined order.
    fn query_tasks(&self, predicate: &Predicate) -> RepoResult<Vec<Task>>;
    /// Replaces all stored fields of the task with the same id.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn insert_task(&self, task: &mut Task) -> RepoResult<()> {
        (**self).insert_task(task)
    }

    fn query_tasks(&self, predicate: &Predicate) -> RepoResult<Vec<Task>> {
        (**self).query_tasks(predicate)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        (**self).update_task(task)
    }
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &mut Task) -> RepoResult<()> {
        task.validate()?;
        if let Some(id) = task.id {
            return Err(RepoError::AlreadyInserted(id));
        }

        let columns = writable_columns();
        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {TASK_TABLE} ({}) VALUES ({placeholders});",
            column_names(columns.iter().copied()).join(", ")
        );

        self.conn
            .execute(&sql, params_from_iter(column_params(&columns, task)))?;
        task.id = Some(self.conn.last_insert_rowid());
        Ok(())
    }

    fn query_tasks(&self, predicate: &Predicate) -> RepoResult<Vec<Task>> {
        let (where_text, params) = compile(predicate).into_parts();
        let sql = format!(
            "SELECT {} FROM {TASK_TABLE} WHERE {where_text} ORDER BY {} ASC;",
            column_names(Task::fields().iter()).join(", "),
            Task::ID
        );
        debug!(
            "event=task_query module=repo status=start where=\"{where_text}\" param_count={}",
            params.len()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;
        let id = task.id.ok_or(RepoError::MissingId)?;

        let columns = writable_columns();
        let assignments = column_names(columns.iter().copied())
            .iter()
            .enumerate()
            .map(|(index, name)| format!("{name} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {TASK_TABLE} SET {assignments} WHERE {} = ?{};",
            Task::ID,
            columns.len() + 1
        );

        let mut params = column_params(&columns, task);
        params.push(SqlParam::Integer(id));
        let changed = self.conn.execute(&sql, params_from_iter(params))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

type TaskField = FieldAccessor<Task>;

fn writable_columns() -> Vec<&'static TaskField> {
    Task::fields()
        .iter()
        .filter(|accessor| accessor.name != Task::ID)
        .collect()
}

fn column_names<'a>(columns: impl IntoIterator<Item = &'a TaskField>) -> Vec<&'static str> {
    columns.into_iter().map(|accessor| accessor.name).collect()
}

fn column_params(columns: &[&'static TaskField], task: &Task) -> Vec<SqlParam> {
    columns
        .iter()
        .map(|accessor| SqlParam::from(&(accessor.get)(task)))
        .collect()
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let mut task = Task::new(String::new(), Timestamp::from_millis(0));
    for (index, accessor) in Task::fields().iter().enumerate() {
        let value = match row.get::<_, SqlValue>(index)? {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(integer) => Value::Integer(integer),
            SqlValue::Text(text) => Value::Text(text),
            SqlValue::Real(_) | SqlValue::Blob(_) => {
                return Err(RepoError::InvalidData(format!(
                    "unexpected column type in {TASK_TABLE}.{}",
                    accessor.name
                )));
            }
        };
        (accessor.set)(&mut task, value)
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    }
    task.validate()?;
    Ok(task)
}
