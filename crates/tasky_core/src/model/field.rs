//! Explicit field-accessor tables for domain entities.
//!
//! # Responsibility
//! - Map logical field names to typed getter/setter pairs per entity.
//! - Convert between dynamically typed `Value`s and entity field types.
//!
//! # Invariants
//! - Field names are unique per entity, compared case-insensitively.
//! - Field names double as storage column names.
//! - Setters never partially apply: a rejected value leaves the field as is.

use crate::model::priority::TaskPriority;
use crate::model::timestamp::Timestamp;
use crate::model::value::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Typed accessor pair for one named field of `T`.
pub struct FieldAccessor<T> {
    pub name: &'static str,
    pub get: fn(&T) -> Value,
    pub set: fn(&mut T, Value) -> Result<(), FieldError>,
}

/// Entity with a static field-accessor table.
pub trait Record: Sized + 'static {
    fn fields() -> &'static [FieldAccessor<Self>];

    /// Finds an accessor by name, ignoring ASCII case.
    fn field(name: &str) -> Option<&'static FieldAccessor<Self>> {
        Self::fields()
            .iter()
            .find(|accessor| accessor.name.eq_ignore_ascii_case(name))
    }

    /// Reads a field by name; `None` when the entity has no such field.
    fn field_value(&self, name: &str) -> Option<Value> {
        Self::field(name).map(|accessor| (accessor.get)(self))
    }
}

/// Error raised when a value cannot be stored into a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    NullNotAllowed(&'static str),
    UnknownCode {
        field: &'static str,
        code: i64,
    },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field `{field}` expects {expected}, got {found}"),
            Self::NullNotAllowed(field) => write!(f, "field `{field}` cannot be null"),
            Self::UnknownCode { field, code } => {
                write!(f, "field `{field}` has unknown code {code}")
            }
        }
    }
}

impl Error for FieldError {}

pub(crate) fn text(field: &'static str, value: Value) -> Result<String, FieldError> {
    match value {
        Value::Text(text) => Ok(text),
        Value::Null => Err(FieldError::NullNotAllowed(field)),
        other => Err(mismatch(field, "text", &other)),
    }
}

pub(crate) fn optional_integer(
    field: &'static str,
    value: Value,
) -> Result<Option<i64>, FieldError> {
    match value {
        Value::Integer(integer) => Ok(Some(integer)),
        Value::Null => Ok(None),
        other => Err(mismatch(field, "integer", &other)),
    }
}

/// Accepts timestamps directly or as raw epoch-millisecond integers.
pub(crate) fn optional_timestamp(
    field: &'static str,
    value: Value,
) -> Result<Option<Timestamp>, FieldError> {
    match value {
        Value::Timestamp(timestamp) => Ok(Some(timestamp)),
        Value::Integer(millis) => Ok(Some(Timestamp::from_millis(millis))),
        Value::Null => Ok(None),
        other => Err(mismatch(field, "timestamp", &other)),
    }
}

pub(crate) fn timestamp(field: &'static str, value: Value) -> Result<Timestamp, FieldError> {
    optional_timestamp(field, value)?.ok_or(FieldError::NullNotAllowed(field))
}

/// Accepts priorities directly or as their persisted integer code.
pub(crate) fn priority(field: &'static str, value: Value) -> Result<TaskPriority, FieldError> {
    match value {
        Value::Priority(priority) => Ok(priority),
        Value::Integer(code) => {
            TaskPriority::from_code(code).ok_or(FieldError::UnknownCode { field, code })
        }
        Value::Null => Err(FieldError::NullNotAllowed(field)),
        other => Err(mismatch(field, "priority", &other)),
    }
}

fn mismatch(field: &'static str, expected: &'static str, found: &Value) -> FieldError {
    FieldError::TypeMismatch {
        field,
        expected,
        found: found.kind_name(),
    }
}
