//! Predicate tree shared by in-memory evaluation and SQL compilation.
//!
//! # Responsibility
//! - Represent filter conditions independent of where they execute.
//! - Validate leaf construction once, so both visitors can trust the tree.
//!
//! # Invariants
//! - Predicates are immutable; `and`/`or` build new nodes.
//! - Field names are plain identifiers (`[A-Za-z_][A-Za-z0-9_]*`).
//! - A value-consuming comparison always carries a non-null value.
//! - A value-less comparison always carries `Value::Null`.

use crate::model::value::Value;
use crate::query::{QueryError, QueryResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid field name regex"));

/// Comparison applied by a leaf predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equals,
    LessThan,
    IsNull,
}

impl Comparison {
    /// SQL operator text.
    pub fn sql_operator(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::LessThan => "<",
            Self::IsNull => "IS NULL",
        }
    }

    /// Whether the comparison needs an expected value.
    pub fn uses_value(self) -> bool {
        match self {
            Self::Equals | Self::LessThan => true,
            Self::IsNull => false,
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_operator())
    }
}

impl FromStr for Comparison {
    type Err = QueryError;

    /// Parses operator names (`equals`, `less_than`, `is_null`) or SQL symbols.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "=" | "eq" | "equals" => Ok(Self::Equals),
            "<" | "lt" | "less_than" => Ok(Self::LessThan),
            "is_null" | "isnull" => Ok(Self::IsNull),
            _ => Err(QueryError::UnsupportedComparison(value.to_string())),
        }
    }
}

/// Boolean operator joining two predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Combines two already computed results.
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Self::And => left && right,
            Self::Or => left || right,
        }
    }
}

/// Single-field condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPredicate {
    field: String,
    comparison: Comparison,
    expected: Value,
}

impl FieldPredicate {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Expected value; `Value::Null` for value-less comparisons.
    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

/// Filter condition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every record.
    Always,
    Field(FieldPredicate),
    Composite {
        left: Box<Predicate>,
        right: Box<Predicate>,
        combinator: Combinator,
    },
}

impl Predicate {
    /// Builds a validated single-field predicate.
    ///
    /// The value is ignored for comparisons that do not consume one.
    ///
    /// # Errors
    /// - `InvalidArgument` when `field` is empty or not a plain identifier.
    /// - `InvalidArgument` when `comparison` needs a value and `expected` is null.
    pub fn new(
        field: impl Into<String>,
        comparison: Comparison,
        expected: impl Into<Value>,
    ) -> QueryResult<Self> {
        let field = field.into();
        if field.is_empty() {
            return Err(QueryError::InvalidArgument(
                "field name cannot be empty".to_string(),
            ));
        }
        if !FIELD_NAME_RE.is_match(&field) {
            return Err(QueryError::InvalidArgument(format!(
                "field name `{field}` is not a plain identifier"
            )));
        }

        let expected = if comparison.uses_value() {
            let expected = expected.into();
            if expected.is_null() {
                return Err(QueryError::InvalidArgument(format!(
                    "comparison `{comparison}` on `{field}` requires a value; use IsNull for null checks"
                )));
            }
            expected
        } else {
            Value::Null
        };

        Ok(Self::Field(FieldPredicate {
            field,
            comparison,
            expected,
        }))
    }

    pub fn equals(field: impl Into<String>, expected: impl Into<Value>) -> QueryResult<Self> {
        Self::new(field, Comparison::Equals, expected)
    }

    pub fn less_than(field: impl Into<String>, expected: impl Into<Value>) -> QueryResult<Self> {
        Self::new(field, Comparison::LessThan, expected)
    }

    pub fn is_null(field: impl Into<String>) -> QueryResult<Self> {
        Self::new(field, Comparison::IsNull, Value::Null)
    }

    /// Both `self` and `other` must match.
    pub fn and(self, other: Predicate) -> Predicate {
        self.combine(other, Combinator::And)
    }

    /// At least one of `self` and `other` must match.
    pub fn or(self, other: Predicate) -> Predicate {
        self.combine(other, Combinator::Or)
    }

    fn combine(self, other: Predicate, combinator: Combinator) -> Predicate {
        Predicate::Composite {
            left: Box::new(self),
            right: Box::new(other),
            combinator,
        }
    }
}

/// Matches when `field` is null or strictly less than `expected`.
pub fn less_than_or_null(
    field: impl Into<String>,
    expected: impl Into<Value>,
) -> QueryResult<Predicate> {
    let field = field.into();
    let less_than = Predicate::less_than(field.clone(), expected)?;
    Ok(less_than.or(Predicate::is_null(field)?))
}

#[cfg(test)]
mod tests {
    use super::{less_than_or_null, Combinator, Comparison, Predicate};
    use crate::model::value::Value;
    use crate::query::QueryError;

    #[test]
    fn new_rejects_empty_field_name() {
        let err = Predicate::equals("", 1).unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument(_)));
    }

    #[test]
    fn new_rejects_non_identifier_field_name() {
        for name in ["title; DROP TABLE task", "1abc", "due date", "a.b"] {
            let err = Predicate::is_null(name).unwrap_err();
            assert!(matches!(err, QueryError::InvalidArgument(_)), "{name}");
        }
    }

    #[test]
    fn value_consuming_comparisons_reject_null() {
        let err = Predicate::equals("title", Value::Null).unwrap_err();
        match err {
            QueryError::InvalidArgument(message) => assert!(message.contains("IsNull")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(Predicate::less_than("due_date", None::<i64>).is_err());
    }

    #[test]
    fn is_null_discards_any_value() {
        let predicate = Predicate::new("done_on", Comparison::IsNull, 42).unwrap();
        match predicate {
            Predicate::Field(leaf) => assert_eq!(leaf.expected(), &Value::Null),
            other => panic!("unexpected predicate: {other:?}"),
        }
    }

    #[test]
    fn and_wraps_both_sides_without_touching_them() {
        let left = Predicate::equals("id", 1).unwrap();
        let right = Predicate::is_null("done_on").unwrap();
        let combined = left.clone().and(right.clone());
        assert_eq!(
            combined,
            Predicate::Composite {
                left: Box::new(left),
                right: Box::new(right),
                combinator: Combinator::And,
            }
        );
    }

    #[test]
    fn less_than_or_null_builds_or_of_both_checks() {
        let predicate = less_than_or_null("due_date", 10).unwrap();
        let expected = Predicate::less_than("due_date", 10)
            .unwrap()
            .or(Predicate::is_null("due_date").unwrap());
        assert_eq!(predicate, expected);
    }

    #[test]
    fn comparison_parses_names_and_symbols() {
        assert_eq!("=".parse::<Comparison>().unwrap(), Comparison::Equals);
        assert_eq!("Less Than".parse::<Comparison>().unwrap(), Comparison::LessThan);
        assert_eq!("is-null".parse::<Comparison>().unwrap(), Comparison::IsNull);
        let err = "LIKE".parse::<Comparison>().unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedComparison(ref op) if op == "LIKE"));
    }

    #[test]
    fn combinator_apply_matches_boolean_operators() {
        for left in [false, true] {
            for right in [false, true] {
                assert_eq!(Combinator::And.apply(left, right), left && right);
                assert_eq!(Combinator::Or.apply(left, right), left || right);
            }
        }
    }
}
