//! Predicate compilation to parameterized SQL `WHERE` fragments.
//!
//! # Invariants
//! - Parameters appear in exactly the order of their `?` placeholders.
//! - Leaf text is `<field> <op> ?`, or `<field> IS NULL` without a placeholder.
//! - Composite text is `(<left>) <AND|OR> (<right>)`.

use crate::model::value::Value;
use crate::query::predicate::{FieldPredicate, Predicate};
use rusqlite::types::{ToSql, ToSqlOutput};
use std::fmt::{Display, Formatter};

/// Serialized positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Null,
    Integer(i64),
    Text(String),
}

impl From<&Value> for SqlParam {
    /// Timestamps become epoch milliseconds, bools `0`/`1`, priorities their
    /// persisted code.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Integer(integer) => Self::Integer(*integer),
            Value::Text(text) => Self::Text(text.clone()),
            Value::Bool(flag) => Self::Integer(i64::from(*flag)),
            Value::Timestamp(timestamp) => Self::Integer(timestamp.as_millis()),
            Value::Priority(priority) => Self::Integer(priority.to_code()),
        }
    }
}

impl Display for SqlParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(integer) => write!(f, "{integer}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::from(rusqlite::types::Null),
            Self::Integer(integer) => ToSqlOutput::from(*integer),
            Self::Text(text) => ToSqlOutput::from(text.as_str()),
        })
    }
}

/// Rendered `WHERE` text plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    text: String,
    params: Vec<SqlParam>,
}

impl WhereClause {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn placeholder_count(&self) -> usize {
        self.text.matches('?').count()
    }

    pub fn into_parts(self) -> (String, Vec<SqlParam>) {
        (self.text, self.params)
    }
}

/// Compiles `predicate` into SQL text and ordered parameters.
pub fn compile(predicate: &Predicate) -> WhereClause {
    let mut clause = WhereClause {
        text: String::new(),
        params: Vec::new(),
    };
    render(predicate, &mut clause);
    clause
}

fn render(predicate: &Predicate, clause: &mut WhereClause) {
    match predicate {
        Predicate::Always => clause.text.push_str("1 = 1"),
        Predicate::Field(leaf) => render_field(leaf, clause),
        Predicate::Composite {
            left,
            right,
            combinator,
        } => {
            clause.text.push('(');
            render(left, clause);
            clause.text.push_str(") ");
            clause.text.push_str(combinator.sql_keyword());
            clause.text.push_str(" (");
            render(right, clause);
            clause.text.push(')');
        }
    }
}

fn render_field(leaf: &FieldPredicate, clause: &mut WhereClause) {
    let comparison = leaf.comparison();
    clause.text.push_str(leaf.field());
    clause.text.push(' ');
    clause.text.push_str(comparison.sql_operator());
    if comparison.uses_value() {
        clause.text.push_str(" ?");
        clause.params.push(SqlParam::from(leaf.expected()));
    }
}

#[cfg(test)]
mod tests {
    use super::{compile, SqlParam};
    use crate::model::priority::TaskPriority;
    use crate::model::timestamp::Timestamp;
    use crate::model::value::Value;
    use crate::query::predicate::Predicate;

    #[test]
    fn leaf_with_value_renders_placeholder_and_param() {
        let clause = compile(&Predicate::equals("title", "VALUE").unwrap());
        assert_eq!(clause.text(), "title = ?");
        assert_eq!(clause.params(), &[SqlParam::Text("VALUE".to_string())]);
    }

    #[test]
    fn is_null_renders_without_placeholder_or_param() {
        let clause = compile(&Predicate::is_null("done_on").unwrap());
        assert_eq!(clause.text(), "done_on IS NULL");
        assert!(clause.params().is_empty());
    }

    #[test]
    fn composite_renders_parenthesized_sides_in_order() {
        let predicate = Predicate::less_than("due_date", Timestamp::from_millis(99))
            .unwrap()
            .or(Predicate::is_null("due_date").unwrap())
            .and(Predicate::equals("priority", TaskPriority::High).unwrap());
        let clause = compile(&predicate);
        assert_eq!(
            clause.text(),
            "((due_date < ?) OR (due_date IS NULL)) AND (priority = ?)"
        );
        assert_eq!(
            clause.params(),
            &[SqlParam::Integer(99), SqlParam::Integer(2)]
        );
        assert_eq!(clause.placeholder_count(), clause.params().len());
    }

    #[test]
    fn params_serialize_by_type() {
        assert_eq!(SqlParam::from(&Value::Bool(true)), SqlParam::Integer(1));
        assert_eq!(SqlParam::from(&Value::Bool(false)), SqlParam::Integer(0));
        assert_eq!(
            SqlParam::from(&Value::Timestamp(Timestamp::from_millis(1_700_000_000_000))),
            SqlParam::Integer(1_700_000_000_000)
        );
        assert_eq!(
            SqlParam::from(&Value::Priority(TaskPriority::Low)),
            SqlParam::Integer(0)
        );
        assert_eq!(SqlParam::Integer(42).to_string(), "42");
    }

    #[test]
    fn always_renders_tautology() {
        let clause = compile(&Predicate::Always);
        assert_eq!(clause.text(), "1 = 1");
        assert_eq!(clause.placeholder_count(), 0);
    }
}
