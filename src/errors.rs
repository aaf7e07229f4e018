use thiserror::Error;

/// Errors raised while turning a raw expression into a condition tree
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConditionError {
    /// The expression (or one of its nested sub-expressions) is neither null,
    /// a record nor an array of records.
    #[error("Invalid condition expression at '{path}': expected a record or an array, got {found}")]
    InvalidExpression { path: String, found: String },
}

impl ConditionError {
    pub(crate) fn invalid_expression(path: &str, value: &serde_json::Value) -> Self {
        ConditionError::InvalidExpression {
            path: if path.is_empty() {
                "/".to_string()
            } else {
                path.to_string()
            },
            found: value_kind(value).to_string(),
        }
    }
}

/// Failure to read a user-typed (JSON5) expression
#[derive(Debug, Error)]
pub enum ParseTextError {
    #[error("Invalid expression syntax: {0}")]
    Syntax(String),
    #[error(transparent)]
    Condition(#[from] ConditionError),
}

/// Raised when two entries of a symbol table claim the same textual symbol
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Symbol already used! \"{symbol}\" ({existing})")]
pub struct DuplicateSymbolError {
    pub symbol: String,
    /// Debug name of the entry that registered the symbol first
    pub existing: String,
}

/// Raised when parsing an operator or predicate from text that no table knows
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {kind} symbol: '{symbol}'")]
pub struct UnknownSymbolError {
    pub kind: &'static str,
    pub symbol: String,
}

/// Short name of a JSON value's kind, used in error messages
pub fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "a record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_expression_message() {
        let err = ConditionError::invalid_expression("", &json!(42));
        assert_eq!(
            err.to_string(),
            "Invalid condition expression at '/': expected a record or an array, got a number"
        );
    }

    #[test]
    fn test_duplicate_symbol_message() {
        let err = DuplicateSymbolError {
            symbol: "&".to_string(),
            existing: "And".to_string(),
        };
        assert_eq!(err.to_string(), "Symbol already used! \"&\" (And)");
    }
}
