//! Query filter algebra.
//!
//! # Responsibility
//! - Build composable predicates over entity fields.
//! - Execute one predicate tree two ways: in-memory evaluation and SQL
//!   compilation, through independent visitors.
//!
//! # Invariants
//! - For any predicate and record, evaluation and the compiled SQL select
//!   the same records.
//! - Compiled parameters line up one-to-one with `?` placeholders.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod compile;
pub mod evaluate;
pub mod predicate;

pub use compile::{compile, SqlParam, WhereClause};
pub use evaluate::evaluate;
pub use predicate::{less_than_or_null, Combinator, Comparison, FieldPredicate, Predicate};

pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while building predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Malformed predicate construction input.
    InvalidArgument(String),
    /// Operator text that names no known comparison.
    UnsupportedComparison(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid predicate argument: {message}"),
            Self::UnsupportedComparison(operator) => {
                write!(f, "unsupported comparison `{operator}`")
            }
        }
    }
}

impl Error for QueryError {}
