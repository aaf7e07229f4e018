use super::table::SymbolTable;
use crate::errors::UnknownSymbolError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Logical operators linking the elements of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Negation; canonical "!", variation "¬"
    Not,
    /// Conjunction; canonical "&&", variations "&", "∧", "·"
    And,
    /// Disjunction; canonical "||", variations "|", "∨", "+"
    Or,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Operator::Not, Operator::And, Operator::Or];

    /// Symbols accepted for this operator, canonical first
    pub const fn symbols(self) -> &'static [&'static str] {
        match self {
            Operator::Not => &["!", "¬"],
            Operator::And => &["&&", "&", "∧", "·"],
            Operator::Or => &["||", "|", "∨", "+"],
        }
    }

    /// Canonical symbol of this operator
    pub const fn symbol(self) -> &'static str {
        self.symbols()[0]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operator::Not => "NOT",
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

/// Operator symbol table, built once on first use
pub static OPERATOR_SYMBOLS: LazyLock<SymbolTable<Operator>> =
    LazyLock::new(|| SymbolTable::new(&Operator::ALL.map(|operator| (operator, operator.symbols()))));

/// Returns the symbols representing the given operator, canonical first
pub fn get_operator_symbols(operator: Operator) -> &'static [&'static str] {
    OPERATOR_SYMBOLS.symbols_of(operator)
}

/// Returns the operator corresponding to the provided symbol
pub fn get_operator_for_symbol(symbol: &str) -> Option<Operator> {
    OPERATOR_SYMBOLS.value_for(symbol)
}

/// Normalizes the provided operator symbol
pub fn normalize_operator_symbol(symbol: &str) -> Option<Operator> {
    get_operator_for_symbol(symbol)
}

pub fn is_operator_symbol(symbol: &str) -> bool {
    OPERATOR_SYMBOLS.contains(symbol)
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = UnknownSymbolError;

    /// Accepts any operator symbol as well as the operator names ("and", "OR", ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(operator) = get_operator_for_symbol(s) {
            return Ok(operator);
        }
        Operator::ALL
            .into_iter()
            .find(|operator| operator.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSymbolError {
                kind: "operator",
                symbol: s.to_string(),
            })
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        symbol.parse().map_err(serde::de::Error::custom)
    }
}
