//! Condition expression parsing for `where`
//!
//! A condition maps a dot-notation field path to an expression of one or
//! more `||`-separated alternatives. Each alternative may carry a leading
//! comparison operator; without one it is an implicit equality test.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::value::{as_text, compare_with_operand};

static OPERATOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([<>]=?|=|%)(.+)$").expect("operator pattern is valid"));

/// Comparison operator extracted from a sub-expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    /// Case-insensitive substring match
    Contains,
}

impl CompareOp {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Gte),
            "<=" => Some(CompareOp::Lte),
            "=" => Some(CompareOp::Eq),
            "%" => Some(CompareOp::Contains),
            _ => None,
        }
    }
}

/// One `||`-alternative of a condition expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCondition {
    pub op: CompareOp,
    pub operand: String,
}

impl SubCondition {
    /// Parses a single alternative, extracting a leading operator when
    /// present. Anything without an operator is an equality operand.
    fn parse(raw: &str) -> Self {
        if let Some(captures) = OPERATOR_PATTERN.captures(raw) {
            if let Some(op) = CompareOp::from_symbol(&captures[1]) {
                return Self {
                    op,
                    operand: captures[2].trim().to_string(),
                };
            }
        }
        Self {
            op: CompareOp::Eq,
            operand: raw.to_string(),
        }
    }

    /// Whether a resolved record value satisfies this alternative.
    pub fn matches(&self, value: &Value) -> bool {
        use std::cmp::Ordering;

        match self.op {
            CompareOp::Gt => compare_with_operand(value, &self.operand) == Ordering::Greater,
            CompareOp::Lt => compare_with_operand(value, &self.operand) == Ordering::Less,
            CompareOp::Gte => compare_with_operand(value, &self.operand) != Ordering::Less,
            CompareOp::Lte => compare_with_operand(value, &self.operand) != Ordering::Greater,
            CompareOp::Eq => compare_with_operand(value, &self.operand) == Ordering::Equal,
            CompareOp::Contains => as_text(value)
                .to_lowercase()
                .contains(&self.operand.to_lowercase()),
        }
    }
}

/// A parsed condition: a field path plus its OR-alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub path: String,
    pub alternatives: Vec<SubCondition>,
}

impl Condition {
    /// Parses `expression` into trimmed OR-alternatives.
    pub fn parse(path: &str, expression: &str) -> Self {
        let alternatives = expression
            .split("||")
            .map(str::trim)
            .map(SubCondition::parse)
            .collect();
        Self {
            path: path.to_string(),
            alternatives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_implicit_equality() {
        let condition = Condition::parse("name", "Alice");
        assert_eq!(condition.alternatives.len(), 1);
        assert_eq!(condition.alternatives[0].op, CompareOp::Eq);
        assert_eq!(condition.alternatives[0].operand, "Alice");
    }

    #[test]
    fn test_operator_extraction() {
        let condition = Condition::parse("age", ">=18");
        assert_eq!(condition.alternatives[0].op, CompareOp::Gte);
        assert_eq!(condition.alternatives[0].operand, "18");

        let condition = Condition::parse("name", "%ali");
        assert_eq!(condition.alternatives[0].op, CompareOp::Contains);
    }

    #[test]
    fn test_or_split_and_trim() {
        let condition = Condition::parse("n", " 2 || >5 ||%x ");
        assert_eq!(condition.alternatives.len(), 3);
        assert_eq!(condition.alternatives[0].op, CompareOp::Eq);
        assert_eq!(condition.alternatives[0].operand, "2");
        assert_eq!(condition.alternatives[1].op, CompareOp::Gt);
        assert_eq!(condition.alternatives[1].operand, "5");
        assert_eq!(condition.alternatives[2].op, CompareOp::Contains);
        assert_eq!(condition.alternatives[2].operand, "x");
    }

    #[test]
    fn test_bare_operator_is_literal_equality() {
        // ">" with no operand does not match the operator pattern
        let condition = Condition::parse("n", ">");
        assert_eq!(condition.alternatives[0].op, CompareOp::Eq);
        assert_eq!(condition.alternatives[0].operand, ">");
    }

    #[test]
    fn test_numeric_matching() {
        let gt = Condition::parse("n", ">5");
        assert!(gt.alternatives[0].matches(&json!(10)));
        assert!(!gt.alternatives[0].matches(&json!(3)));
        assert!(gt.alternatives[0].matches(&json!("10")));
    }

    #[test]
    fn test_substring_matching_is_case_insensitive() {
        let like = Condition::parse("name", "%DER");
        assert!(like.alternatives[0].matches(&json!("Derry")));
        assert!(!like.alternatives[0].matches(&json!("Bangor")));
    }
}
