//! Raw expression parsing
//!
//! A raw expression is a record, or an array of records, whose keys are either
//! operator symbols (their value being a nested expression) or field keys
//! (their value being the compared value):
//!
//! ```text
//! {
//!   "&&": [{
//!     "ANIMAL.breed": "*shepard",
//!     "OWNER.id": 34087346,
//!     "!": { "PERMIT.acknowledged": null },
//!     "||": [{ "expiryDate": null }, { "expiryDate": [null, "2024-06-01"] }]
//!   }]
//! }
//! ```
//!
//! Repeating a field key with another value opens a new predicate set, which
//! is how `{"||": [{"A": 1}, {"A": null}]}` reads as "A = 1 or A is null".

use crate::condition::{Condition, ConditionElement, PredicateSet};
use crate::errors::{ConditionError, ParseTextError};
use crate::normalizer::normalize;
use crate::symbols::{Operator, get_operator_for_symbol};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse an expression into a normalized condition, fragments joined by `AND`
pub fn parse_condition(expression: &Value) -> Result<ConditionElement, ConditionError> {
    parse(expression, Operator::And)
}

/// Parse an expression into a normalized condition
///
/// Null yields an empty condition. Any other value that is not a record nor
/// an array of records is rejected, at any depth.
pub fn parse(expression: &Value, operator: Operator) -> Result<ConditionElement, ConditionError> {
    let result = parse_at(expression, operator, "")?;
    debug!(operator = %operator, "parsed condition expression");
    Ok(result)
}

/// Parse a JSON5 text, as typed by users, into a normalized condition
pub fn parse_str(text: &str, operator: Operator) -> Result<ConditionElement, ParseTextError> {
    let expression: Value =
        json5::from_str(text).map_err(|e| ParseTextError::Syntax(e.to_string()))?;
    Ok(parse(&expression, operator)?)
}

fn parse_at(
    expression: &Value,
    operator: Operator,
    path: &str,
) -> Result<ConditionElement, ConditionError> {
    let fragments: Vec<(String, &Map<String, Value>)> = match expression {
        Value::Null => return Ok(ConditionElement::Condition(Condition::empty(operator))),
        Value::Object(record) => vec![(path.to_string(), record)],
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let item_path = format!("{}/{}", path, index);
                match item {
                    Value::Object(record) => Ok((item_path, record)),
                    other => Err(ConditionError::invalid_expression(&item_path, other)),
                }
            })
            .collect::<Result<_, _>>()?,
        other => return Err(ConditionError::invalid_expression(path, other)),
    };

    let mut builder = ConditionBuilder::new(operator);
    for (fragment_path, fragment) in fragments {
        for (key, value) in fragment {
            match get_operator_for_symbol(key) {
                Some(sub_operator) => {
                    let sub_path = format!("{}/{}", fragment_path, key);
                    builder.push_sub_condition(parse_at(value, sub_operator, &sub_path)?);
                }
                None => builder.push_field(key, value),
            }
        }
    }

    Ok(normalize(&builder.finish()))
}

/// Accumulates the elements of a condition while its fragments are read
struct ConditionBuilder {
    condition: Condition,
    open: PredicateSet,
}

impl ConditionBuilder {
    fn new(operator: Operator) -> Self {
        Self {
            condition: Condition::empty(operator),
            open: PredicateSet::new(),
        }
    }

    /// Push the open predicate set and start a fresh one
    fn close_open_set(&mut self) {
        let set = std::mem::take(&mut self.open);
        self.condition.elements.push(ConditionElement::PredicateSet(set));
    }

    fn push_sub_condition(&mut self, element: ConditionElement) {
        if !self.open.is_empty() {
            self.close_open_set();
        }
        self.condition.elements.push(element);
    }

    fn push_field(&mut self, key: &str, value: &Value) {
        if !self.open.accepts(key, value) {
            self.close_open_set();
        }
        self.open.insert(key, value.clone());
    }

    /// The open set is always pushed, even empty, so every fragment group
    /// ends with its predicate set.
    fn finish(mut self) -> Condition {
        self.close_open_set();
        self.condition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(value: Value) -> ConditionElement {
        PredicateSet::try_from(value).unwrap().into()
    }

    #[test]
    fn test_null_yields_empty_condition() {
        assert_eq!(
            parse(&Value::Null, Operator::Or).unwrap(),
            ConditionElement::from(Condition::empty(Operator::Or))
        );
    }

    #[test]
    fn test_scalar_is_rejected() {
        let err = parse_condition(&json!("A = 1")).unwrap_err();
        assert_eq!(
            err,
            ConditionError::InvalidExpression {
                path: "/".to_string(),
                found: "a string".to_string()
            }
        );
    }

    #[test]
    fn test_nested_scalar_is_rejected_with_path() {
        let err = parse_condition(&json!({"&&": [{"A": 1}, {"!": 3}]})).unwrap_err();
        assert_eq!(
            err,
            ConditionError::InvalidExpression {
                path: "/&&/1/!".to_string(),
                found: "a number".to_string()
            }
        );
    }

    #[test]
    fn test_repeated_key_opens_new_set() {
        assert_eq!(
            parse(&json!([{"A": 1}, {"A": null}]), Operator::Or).unwrap(),
            ConditionElement::from(Condition::or(vec![
                set(json!({"A": 1})),
                set(json!({"A": null}))
            ]))
        );
    }

    #[test]
    fn test_repeated_key_with_same_value_is_merged() {
        assert_eq!(
            parse_condition(&json!([{"A": 1, "B": 2}, {"A": 1}])).unwrap(),
            set(json!({"A": 1, "B": 2}))
        );
    }

    #[test]
    fn test_parse_str_reads_json5() {
        let parsed = parse_str(r#"{ "||": [{ A: 1 }, { A: null }] }"#, Operator::And).unwrap();
        assert_eq!(
            parsed,
            ConditionElement::from(Condition::or(vec![
                set(json!({"A": 1})),
                set(json!({"A": null}))
            ]))
        );
        assert!(matches!(
            parse_str("{ A: ", Operator::And),
            Err(ParseTextError::Syntax(_))
        ));
    }
}
