//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its lifecycle helpers.
//! - Publish the task field-accessor table and field names.
//!
//! # Invariants
//! - `id` is `None` until the repository assigns it and never changes after.
//! - `done_on.is_some()` is the single source of truth for the done state.
//! - `created_on` is set once at creation.
//! - `title` is never blank for persisted tasks.

use crate::model::field::{self, FieldAccessor, Record};
use crate::model::priority::TaskPriority;
use crate::model::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Repository-assigned task identifier.
pub type TaskId = i64;

/// Identifier of a recurring task template.
pub type RecurringTaskId = i64;

/// A unit of work the user wants to get done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<TaskId>,
    pub title: String,
    pub created_on: Timestamp,
    /// `None` while the task is open.
    pub done_on: Option<Timestamp>,
    /// Task is hidden until this instant; past values have no effect.
    pub postponed_until: Option<Timestamp>,
    /// `None` means due immediately.
    pub due_date: Option<Timestamp>,
    pub priority: TaskPriority,
    /// Carried for storage compatibility; core never interprets it.
    pub created_from_recurring_task_id: Option<RecurringTaskId>,
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    pub const ID: &'static str = "id";
    pub const TITLE: &'static str = "title";
    pub const CREATED_ON: &'static str = "created_on";
    pub const DONE_ON: &'static str = "done_on";
    pub const PRIORITY: &'static str = "priority";
    pub const POSTPONED_UNTIL: &'static str = "postponed_until";
    pub const CREATED_FROM_RECURRING_TASK_ID: &'static str = "created_from_recurring_task_id";
    pub const DUE_DATE: &'static str = "due_date";

    /// Creates an open, unsaved task with default priority.
    pub fn new(title: impl Into<String>, created_on: Timestamp) -> Self {
        Self {
            id: None,
            title: title.into(),
            created_on,
            done_on: None,
            postponed_until: None,
            due_date: None,
            priority: TaskPriority::default(),
            created_from_recurring_task_id: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done_on.is_some()
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

static TASK_FIELDS: [FieldAccessor<Task>; 8] = [
    FieldAccessor {
        name: Task::ID,
        get: |task| task.id.into(),
        set: |task, value| {
            task.id = field::optional_integer(Task::ID, value)?;
            Ok(())
        },
    },
    FieldAccessor {
        name: Task::TITLE,
        get: |task| task.title.clone().into(),
        set: |task, value| {
            task.title = field::text(Task::TITLE, value)?;
            Ok(())
        },
    },
    FieldAccessor {
        name: Task::CREATED_ON,
        get: |task| task.created_on.into(),
        set: |task, value| {
            task.created_on = field::timestamp(Task::CREATED_ON, value)?;
            Ok(())
        },
    },
    FieldAccessor {
        name: Task::DONE_ON,
        get: |task| task.done_on.into(),
        set: |task, value| {
            task.done_on = field::optional_timestamp(Task::DONE_ON, value)?;
            Ok(())
        },
    },
    FieldAccessor {
        name: Task::PRIORITY,
        get: |task| task.priority.into(),
        set: |task, value| {
            task.priority = field::priority(Task::PRIORITY, value)?;
            Ok(())
        },
    },
    FieldAccessor {
        name: Task::POSTPONED_UNTIL,
        get: |task| task.postponed_until.into(),
        set: |task, value| {
            task.postponed_until = field::optional_timestamp(Task::POSTPONED_UNTIL, value)?;
            Ok(())
        },
    },
    FieldAccessor {
        name: Task::CREATED_FROM_RECURRING_TASK_ID,
        get: |task| task.created_from_recurring_task_id.into(),
        set: |task, value| {
            task.created_from_recurring_task_id =
                field::optional_integer(Task::CREATED_FROM_RECURRING_TASK_ID, value)?;
            Ok(())
        },
    },
    FieldAccessor {
        name: Task::DUE_DATE,
        get: |task| task.due_date.into(),
        set: |task, value| {
            task.due_date = field::optional_timestamp(Task::DUE_DATE, value)?;
            Ok(())
        },
    },
];

impl Record for Task {
    fn fields() -> &'static [FieldAccessor<Self>] {
        &TASK_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskValidationError};
    use crate::model::field::Record;
    use crate::model::priority::TaskPriority;
    use crate::model::timestamp::Timestamp;
    use crate::model::value::Value;

    fn sample() -> Task {
        let mut task = Task::new("Buy milk", Timestamp::from_millis(100));
        task.id = Some(7);
        task.due_date = Some(Timestamp::from_millis(500));
        task.priority = TaskPriority::High;
        task
    }

    #[test]
    fn new_task_is_open_unsaved_and_normal_priority() {
        let task = Task::new("Buy milk", Timestamp::from_millis(100));
        assert_eq!(task.id, None);
        assert!(!task.is_done());
        assert_eq!(task.priority, TaskPriority::Normal);
        assert_eq!(task.created_on, Timestamp::from_millis(100));
    }

    #[test]
    fn validate_rejects_blank_title() {
        let task = Task::new("  ", Timestamp::from_millis(0));
        assert_eq!(task.validate(), Err(TaskValidationError::EmptyTitle));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn field_table_names_are_unique_ignoring_case() {
        let fields = Task::fields();
        for (index, accessor) in fields.iter().enumerate() {
            for other in &fields[index + 1..] {
                assert!(!accessor.name.eq_ignore_ascii_case(other.name));
            }
        }
        assert_eq!(fields.len(), 8);
    }

    #[test]
    fn field_lookup_ignores_case() {
        let task = sample();
        assert_eq!(task.field_value("DUE_DATE"), Some(Timestamp::from_millis(500).into()));
        assert_eq!(task.field_value("Id"), Some(Value::Integer(7)));
        assert_eq!(task.field_value("done_on"), Some(Value::Null));
        assert_eq!(task.field_value("no_such_field"), None);
    }

    #[test]
    fn setters_roundtrip_every_field_through_getters() {
        let source = sample();
        let mut target = Task::new("placeholder", Timestamp::from_millis(0));
        for accessor in Task::fields() {
            (accessor.set)(&mut target, (accessor.get)(&source)).unwrap();
        }
        assert_eq!(target, source);
    }

    #[test]
    fn rejected_value_leaves_field_untouched() {
        let mut task = sample();
        let accessor = Task::field(Task::TITLE).unwrap();
        assert!((accessor.set)(&mut task, Value::Integer(3)).is_err());
        assert_eq!(task.title, "Buy milk");
    }
}
