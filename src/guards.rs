//! Expression shape guards
//!
//! An *expression* is a record with exactly one key, e.g. `{"!": {...}}` or
//! `{"[]": ["age", 18, 65]}`. The guards here tell whether a raw value has the
//! shape expected for an operator or predicate symbol. They are pure and
//! opt-in: the parser does not call them.

use crate::errors::value_kind;
use crate::symbols::{Operator, Predicate, get_operator_for_symbol, get_predicate_for_symbol};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Source of per-key validators for [`is_expression_with`]
pub trait Validators {
    /// Validate the value held under `key`; `None` when no validator exists
    /// for that key.
    fn validate(&self, key: &str, value: &Value) -> Option<bool>;
}

/// The operator or predicate a symbol stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Operator(Operator),
    Predicate(Predicate),
}

impl ExpressionKind {
    /// Resolve a symbol through the operator table, then the predicate table
    pub fn for_symbol(symbol: &str) -> Option<Self> {
        get_operator_for_symbol(symbol)
            .map(ExpressionKind::Operator)
            .or_else(|| get_predicate_for_symbol(symbol).map(ExpressionKind::Predicate))
    }

    /// Whether `value` is a valid operand for this kind
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ExpressionKind::Operator(Operator::Not) => is_expression(value),
            ExpressionKind::Operator(Operator::And | Operator::Or) => is_expression_array(value),
            ExpressionKind::Predicate(Predicate::Between) => {
                value.as_array().is_some_and(|items| items.len() == 3)
            }
            ExpressionKind::Predicate(Predicate::Among) => value.is_array(),
            ExpressionKind::Predicate(Predicate::Less | Predicate::More) => {
                value.is_object() || value.is_array()
            }
            ExpressionKind::Predicate(
                Predicate::Equal
                | Predicate::Different
                | Predicate::Like
                | Predicate::LessEqual
                | Predicate::MoreEqual,
            ) => true,
        }
    }

    /// Human readable description of the operand [`accepts`](Self::accepts) expects
    pub fn expectation(self) -> &'static str {
        match self {
            ExpressionKind::Operator(Operator::Not) => "an expression",
            ExpressionKind::Operator(Operator::And | Operator::Or) => {
                "a non-empty array of expressions"
            }
            ExpressionKind::Predicate(Predicate::Between) => "an array of 3 values",
            ExpressionKind::Predicate(Predicate::Among) => "an array",
            ExpressionKind::Predicate(Predicate::Less | Predicate::More) => {
                "a record or an array"
            }
            ExpressionKind::Predicate(_) => "any value",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ExpressionKind::Operator(operator) => operator.symbol(),
            ExpressionKind::Predicate(predicate) => predicate.symbol(),
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionKind::Operator(operator) => f.write_str(operator.name()),
            ExpressionKind::Predicate(predicate) => f.write_str(predicate.name()),
        }
    }
}

/// A set of kinds validates every symbol of those kinds, synonyms included
impl Validators for [ExpressionKind] {
    fn validate(&self, key: &str, value: &Value) -> Option<bool> {
        let kind = ExpressionKind::for_symbol(key)?;
        self.contains(&kind).then(|| kind.accepts(value))
    }
}

/// Explicit symbol to validator table
impl Validators for [(&str, fn(&Value) -> bool)] {
    fn validate(&self, key: &str, value: &Value) -> Option<bool> {
        self.iter()
            .find(|(symbol, _)| *symbol == key)
            .map(|(_, validator)| validator(value))
    }
}

/// Tells whether the provided value is a record with exactly one key
pub fn is_expression(value: &Value) -> bool {
    single_entry(value).is_some()
}

/// Like [`is_expression`], the single key must also pass its validator
pub fn is_expression_with<V: Validators + ?Sized>(value: &Value, validators: &V) -> bool {
    single_entry(value)
        .and_then(|(key, operand)| validators.validate(key, operand))
        .unwrap_or(false)
}

/// Tells whether the provided value is a non-empty array of expressions
pub fn is_expression_array(value: &Value) -> bool {
    non_empty_array(value).is_some_and(|items| items.iter().all(is_expression))
}

pub fn is_expression_array_with<V: Validators + ?Sized>(value: &Value, validators: &V) -> bool {
    non_empty_array(value).is_some_and(|items| {
        items
            .iter()
            .all(|item| is_expression_with(item, validators))
    })
}

fn single_entry(value: &Value) -> Option<(&str, &Value)> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.iter().next().map(|(key, operand)| (key.as_str(), operand))
}

fn non_empty_array(value: &Value) -> Option<&Vec<Value>> {
    value.as_array().filter(|items| !items.is_empty())
}

pub const NEGATION: &[ExpressionKind] = &[ExpressionKind::Operator(Operator::Not)];
pub const CONJUNCTION: &[ExpressionKind] = &[ExpressionKind::Operator(Operator::And)];
pub const DISJUNCTION: &[ExpressionKind] = &[ExpressionKind::Operator(Operator::Or)];
pub const EQUALITY: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::Equal)];
pub const DIFFERENCE: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::Different)];
pub const LIKENESS: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::Like)];
pub const STRICT_INFERIORITY: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::Less)];
pub const INFERIORITY: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::LessEqual)];
pub const STRICT_SUPERIORITY: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::More)];
pub const SUPERIORITY: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::MoreEqual)];
pub const BETWEEN: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::Between)];
pub const AMONG: &[ExpressionKind] = &[ExpressionKind::Predicate(Predicate::Among)];

/// Union of the operator guards
pub static OPERATION: LazyLock<Vec<ExpressionKind>> =
    LazyLock::new(|| [NEGATION, CONJUNCTION, DISJUNCTION].concat());

/// Union of the predicate guards
pub static PREDICATE: LazyLock<Vec<ExpressionKind>> = LazyLock::new(|| {
    [
        EQUALITY,
        DIFFERENCE,
        LIKENESS,
        STRICT_INFERIORITY,
        INFERIORITY,
        STRICT_SUPERIORITY,
        SUPERIORITY,
        BETWEEN,
        AMONG,
    ]
    .concat()
});

/// `{"!": e}`
pub fn is_negation_expression(value: &Value) -> bool {
    is_expression_with(value, NEGATION)
}

/// `{"&&": [e1, e2, ...]}`
pub fn is_conjunction_expression(value: &Value) -> bool {
    is_expression_with(value, CONJUNCTION)
}

/// `{"||": [e1, e2, ...]}`
pub fn is_disjunction_expression(value: &Value) -> bool {
    is_expression_with(value, DISJUNCTION)
}

pub fn is_equality_expression(value: &Value) -> bool {
    is_expression_with(value, EQUALITY)
}

pub fn is_difference_expression(value: &Value) -> bool {
    is_expression_with(value, DIFFERENCE)
}

pub fn is_like_expression(value: &Value) -> bool {
    is_expression_with(value, LIKENESS)
}

pub fn is_less_expression(value: &Value) -> bool {
    is_expression_with(value, STRICT_INFERIORITY)
}

pub fn is_less_equal_expression(value: &Value) -> bool {
    is_expression_with(value, INFERIORITY)
}

pub fn is_more_expression(value: &Value) -> bool {
    is_expression_with(value, STRICT_SUPERIORITY)
}

pub fn is_more_equal_expression(value: &Value) -> bool {
    is_expression_with(value, SUPERIORITY)
}

/// `{"[]": [V1, V2, V3]}`
pub fn is_between_expression(value: &Value) -> bool {
    is_expression_with(value, BETWEEN)
}

/// `{"{}": [V1, V2, ...]}`
pub fn is_among_expression(value: &Value) -> bool {
    is_expression_with(value, AMONG)
}

/// Negation, conjunction or disjunction expression
pub fn is_operation_expression(value: &Value) -> bool {
    is_expression_with(value, OPERATION.as_slice())
}

/// Expression keyed by any predicate symbol
pub fn is_predicate_expression(value: &Value) -> bool {
    is_expression_with(value, PREDICATE.as_slice())
}

/// A symbol-keyed operand with the wrong shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeViolation {
    /// Slash separated location of the operand, e.g. `/&&/0/[]`
    pub path: String,
    pub symbol: String,
    pub kind: ExpressionKind,
    pub expected: &'static str,
    pub found: &'static str,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}) expects {}, got {}",
            self.path, self.symbol, self.kind, self.expected, self.found
        )
    }
}

/// Walk a raw condition expression and report every malformed operand
///
/// Predicate symbols are checked with their guard. Operator symbols are
/// checked against what the parser can consume (null, a record or an array of
/// records), since parser input lets operators share a record with fields.
pub fn check_shapes(value: &Value) -> Vec<ShapeViolation> {
    let mut violations = Vec::new();
    collect_violations(value, "", &mut violations);
    violations
}

fn collect_violations(value: &Value, path: &str, violations: &mut Vec<ShapeViolation>) {
    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_violations(item, &format!("{}/{}", path, index), violations);
            }
        }
        Value::Object(map) => {
            for (key, operand) in map {
                let operand_path = format!("{}/{}", path, key);
                if let Some(kind) = ExpressionKind::for_symbol(key) {
                    let (valid, expected) = match kind {
                        ExpressionKind::Operator(_) => (
                            is_parsable_operand(operand),
                            "null, a record or an array of records",
                        ),
                        ExpressionKind::Predicate(_) => (kind.accepts(operand), kind.expectation()),
                    };
                    if !valid {
                        violations.push(ShapeViolation {
                            path: operand_path.clone(),
                            symbol: key.clone(),
                            kind,
                            expected,
                            found: value_kind(operand),
                        });
                    }
                }
                collect_violations(operand, &operand_path, violations);
            }
        }
        _ => {}
    }
}

fn is_parsable_operand(value: &Value) -> bool {
    match value {
        Value::Null | Value::Object(_) => true,
        Value::Array(items) => items.iter().all(Value::is_object),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expression_requires_exactly_one_key() {
        assert!(is_expression(&json!({"X": [1, 2, 3]})));
        assert!(!is_expression(&json!({"X": [1, 2, 3], "Y": [4, 5, 6]})));
        assert!(!is_expression(&json!({})));
        assert!(!is_expression(&json!([{"X": 1}])));
        assert!(!is_expression(&Value::Null));
    }

    #[test]
    fn test_explicit_validator_table() {
        let is_record_or_array: fn(&Value) -> bool = |value| value.is_object() || value.is_array();
        let negation = json!({"!": {"=": [{"A": [1, 2, 3]}]}});

        assert!(is_expression_with(&negation, &[("!", is_record_or_array)][..]));
        assert!(!is_expression_with(&negation, &[("&", is_record_or_array)][..]));
    }

    #[test]
    fn test_kinds_cover_synonyms() {
        assert!(is_negation_expression(&json!({"¬": {"A": 1}})));
        assert!(is_conjunction_expression(&json!({"∧": [{"A": 1}]})));
        assert!(is_difference_expression(&json!({"!=": 3})));
        assert!(is_more_equal_expression(&json!({">=": 3})));
    }

    #[test]
    fn test_predicate_arity() {
        assert!(is_between_expression(&json!({"[]": ["age", 18, 65]})));
        assert!(!is_between_expression(&json!({"[]": [18, 65]})));
        assert!(is_among_expression(&json!({"{}": []})));
        assert!(!is_among_expression(&json!({"{}": "a"})));
        assert!(is_less_expression(&json!({"<": {"age": 18}})));
        assert!(!is_less_expression(&json!({"<": 18})));
    }

    #[test]
    fn test_check_shapes_reports_paths() {
        let violations = check_shapes(&json!({
            "&&": [
                {"[]": {"age": [18, 65]}, "name": "x"},
                {"!": 5}
            ]
        }));

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].path, "/&&/0/[]");
        assert_eq!(violations[0].kind, ExpressionKind::Predicate(Predicate::Between));
        assert_eq!(violations[0].found, "a record");
        assert_eq!(violations[1].path, "/&&/1/!");
        assert_eq!(violations[1].kind, ExpressionKind::Operator(Operator::Not));
    }

    #[test]
    fn test_check_shapes_accepts_parser_input() {
        assert!(check_shapes(&json!({
            "&&": [{
                "ANIMAL.breed": "*shepard",
                "!": {"PERMIT.acknowledged": null},
                "||": [{"expiryDate": null}, {"expiryDate": [null, "2024-01-01"]}]
            }]
        }))
        .is_empty());
    }
}
