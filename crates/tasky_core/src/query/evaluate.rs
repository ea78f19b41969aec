//! In-memory predicate evaluation.
//!
//! # Invariants
//! - A field missing from the target is a non-match, never an error.
//! - Evaluation is pure: no side effects, same inputs give the same answer.
//! - Values compare in their stored form (`SqlParam`) under SQLite column
//!   rules, so a leaf selects the same records here as its compiled SQL.

use crate::model::field::Record;
use crate::model::value::Value;
use crate::query::compile::SqlParam;
use crate::query::predicate::{Comparison, Predicate};
use std::cmp::Ordering;

/// Returns whether `target` satisfies `predicate`.
pub fn evaluate<R: Record>(predicate: &Predicate, target: &R) -> bool {
    match predicate {
        Predicate::Always => true,
        Predicate::Field(leaf) => match target.field_value(leaf.field()) {
            Some(actual) => compare(leaf.comparison(), leaf.expected(), &actual),
            None => false,
        },
        Predicate::Composite {
            left,
            right,
            combinator,
        } => combinator.apply(evaluate(left, target), evaluate(right, target)),
    }
}

fn compare(comparison: Comparison, expected: &Value, actual: &Value) -> bool {
    let column = SqlParam::from(actual);
    let ordering = || compare_column(&column, SqlParam::from(expected));
    match comparison {
        Comparison::Equals => ordering() == Some(Ordering::Equal),
        Comparison::LessThan => ordering() == Some(Ordering::Less),
        Comparison::IsNull => column == SqlParam::Null,
    }
}

/// Orders a stored column value against a bound operand.
///
/// The column's storage kind stands in for its affinity: integer columns
/// read numeric-looking text as a number, text columns read integers as
/// text. Remaining integer/text pairs order integers first. Nulls are
/// unordered.
fn compare_column(column: &SqlParam, operand: SqlParam) -> Option<Ordering> {
    match (column, operand) {
        (SqlParam::Null, _) | (_, SqlParam::Null) => None,
        (SqlParam::Integer(left), SqlParam::Integer(right)) => Some(left.cmp(&right)),
        (SqlParam::Text(left), SqlParam::Text(right)) => {
            Some(left.as_bytes().cmp(right.as_bytes()))
        }
        (SqlParam::Text(left), SqlParam::Integer(right)) => {
            Some(left.as_bytes().cmp(right.to_string().as_bytes()))
        }
        (SqlParam::Integer(left), SqlParam::Text(right)) => match numeric_text(&right) {
            Some(Numeric::Integer(right)) => Some(left.cmp(&right)),
            Some(Numeric::Real(right)) => (*left as f64).partial_cmp(&right),
            None => Some(Ordering::Less),
        },
    }
}

enum Numeric {
    Integer(i64),
    Real(f64),
}

/// Parses text the way an integer column's numeric affinity does.
fn numeric_text(text: &str) -> Option<Numeric> {
    let trimmed = text.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Numeric::Integer(integer));
    }
    let plain = !trimmed.is_empty()
        && trimmed.chars().any(|ch| ch.is_ascii_digit())
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-'));
    if !plain {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|real| real.is_finite())
        .map(Numeric::Real)
}

#[cfg(test)]
mod tests {
    use super::evaluate;
    use crate::model::priority::TaskPriority;
    use crate::model::task::Task;
    use crate::model::timestamp::Timestamp;
    use crate::query::predicate::Predicate;

    fn task() -> Task {
        let mut task = Task::new("Buy milk", Timestamp::from_millis(1_000));
        task.id = Some(3);
        task.due_date = Some(Timestamp::from_millis(5_000));
        task
    }

    #[test]
    fn equals_matches_structurally() {
        let task = task();
        assert!(evaluate(&Predicate::equals("id", 3).unwrap(), &task));
        assert!(evaluate(&Predicate::equals("title", "Buy milk").unwrap(), &task));
        assert!(!evaluate(&Predicate::equals("title", "buy milk").unwrap(), &task));
        assert!(evaluate(
            &Predicate::equals("priority", TaskPriority::Normal).unwrap(),
            &task
        ));
    }

    #[test]
    fn equals_never_matches_null_actual() {
        let task = task();
        let predicate = Predicate::equals("done_on", Timestamp::from_millis(0)).unwrap();
        assert!(!evaluate(&predicate, &task));
    }

    #[test]
    fn is_null_is_the_null_check() {
        let task = task();
        assert!(evaluate(&Predicate::is_null("done_on").unwrap(), &task));
        assert!(!evaluate(&Predicate::is_null("due_date").unwrap(), &task));
    }

    #[test]
    fn less_than_is_strict_and_false_for_null() {
        let task = task();
        let due = |millis| Predicate::less_than("due_date", Timestamp::from_millis(millis)).unwrap();
        assert!(evaluate(&due(5_001), &task));
        assert!(!evaluate(&due(5_000), &task));
        assert!(!evaluate(
            &Predicate::less_than("postponed_until", Timestamp::from_millis(i64::MAX)).unwrap(),
            &task
        ));
    }

    #[test]
    fn less_than_on_priority_uses_persisted_code() {
        let task = task();
        assert!(evaluate(&Predicate::less_than("priority", TaskPriority::High).unwrap(), &task));
        assert!(!evaluate(&Predicate::less_than("priority", TaskPriority::Low).unwrap(), &task));
    }

    #[test]
    fn integer_values_match_timestamps_and_priority_codes() {
        let task = task();
        assert!(evaluate(&Predicate::less_than("due_date", 10_000_i64).unwrap(), &task));
        assert!(!evaluate(&Predicate::less_than("due_date", 5_000_i64).unwrap(), &task));
        assert!(evaluate(&Predicate::equals("created_on", 1_000_i64).unwrap(), &task));
        assert!(evaluate(&Predicate::equals("priority", 1_i64).unwrap(), &task));
        assert!(!evaluate(&Predicate::equals("priority", 2_i64).unwrap(), &task));
    }

    #[test]
    fn text_operands_follow_column_affinity() {
        let task = task();
        assert!(evaluate(&Predicate::equals("id", " 3 ").unwrap(), &task));
        assert!(evaluate(&Predicate::less_than("due_date", "5000.5").unwrap(), &task));
        assert!(!evaluate(&Predicate::less_than("due_date", "900").unwrap(), &task));
        assert!(evaluate(&Predicate::less_than("due_date", "soon").unwrap(), &task));
        assert!(!evaluate(&Predicate::equals("due_date", "soon").unwrap(), &task));
        assert!(!evaluate(&Predicate::less_than("title", 5).unwrap(), &task));
        assert!(evaluate(&Predicate::equals("title", "Buy milk").unwrap(), &task));
    }

    #[test]
    fn missing_field_is_a_silent_non_match() {
        let task = task();
        assert!(!evaluate(&Predicate::is_null("assignee").unwrap(), &task));
        let either = Predicate::is_null("assignee")
            .unwrap()
            .or(Predicate::equals("id", 3).unwrap());
        assert!(evaluate(&either, &task));
    }

    #[test]
    fn field_names_match_case_insensitively() {
        let task = task();
        assert!(evaluate(&Predicate::is_null("DONE_ON").unwrap(), &task));
    }

    #[test]
    fn always_matches_everything() {
        assert!(evaluate(&Predicate::Always, &task()));
    }
}
