use super::table::SymbolTable;
use crate::errors::UnknownSymbolError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Comparison kinds a field constraint can be tagged with
///
/// The normalizer never interprets these: they only matter to the shape
/// guards and to downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// "is equal"
    Equal,
    /// "is different" = "is *not* equal"
    Different,
    /// "is like"
    Like,
    /// "is less than"
    Less,
    /// "is less than or equal" = "is *not* more"
    LessEqual,
    /// "is more than"
    More,
    /// "is more than or equal" = "is *not* less"
    MoreEqual,
    /// "is between"
    Between,
    /// "is among"
    Among,
}

impl Predicate {
    pub const ALL: [Predicate; 9] = [
        Predicate::Equal,
        Predicate::Different,
        Predicate::Like,
        Predicate::Less,
        Predicate::LessEqual,
        Predicate::More,
        Predicate::MoreEqual,
        Predicate::Between,
        Predicate::Among,
    ];

    /// Symbols accepted for this predicate, canonical first
    pub const fn symbols(self) -> &'static [&'static str] {
        match self {
            Predicate::Equal => &["="],
            Predicate::Different => &["≠", "!="],
            Predicate::Like => &["~"],
            Predicate::Less => &["<"],
            Predicate::LessEqual => &["≤", "<="],
            Predicate::More => &[">"],
            Predicate::MoreEqual => &["≥", ">="],
            Predicate::Between => &["[]"],
            Predicate::Among => &["{}"],
        }
    }

    pub const fn symbol(self) -> &'static str {
        self.symbols()[0]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Predicate::Equal => "EQUAL",
            Predicate::Different => "DIFFERENT",
            Predicate::Like => "LIKE",
            Predicate::Less => "LESS",
            Predicate::LessEqual => "LESS_EQUAL",
            Predicate::More => "MORE",
            Predicate::MoreEqual => "MORE_EQUAL",
            Predicate::Between => "BETWEEN",
            Predicate::Among => "AMONG",
        }
    }
}

/// Predicate symbol table, built once on first use
pub static PREDICATE_SYMBOLS: LazyLock<SymbolTable<Predicate>> = LazyLock::new(|| {
    SymbolTable::new(&Predicate::ALL.map(|predicate| (predicate, predicate.symbols())))
});

/// Returns the symbols representing the given predicate, canonical first
pub fn get_predicate_symbols(predicate: Predicate) -> &'static [&'static str] {
    PREDICATE_SYMBOLS.symbols_of(predicate)
}

/// Returns the predicate corresponding to the provided symbol
pub fn get_predicate_for_symbol(symbol: &str) -> Option<Predicate> {
    PREDICATE_SYMBOLS.value_for(symbol)
}

/// Normalizes the provided predicate symbol
pub fn normalize_predicate_symbol(symbol: &str) -> Option<Predicate> {
    get_predicate_for_symbol(symbol)
}

pub fn is_predicate_symbol(symbol: &str) -> bool {
    PREDICATE_SYMBOLS.contains(symbol)
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Predicate {
    type Err = UnknownSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(predicate) = get_predicate_for_symbol(s) {
            return Ok(predicate);
        }
        Predicate::ALL
            .into_iter()
            .find(|predicate| predicate.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSymbolError {
                kind: "predicate",
                symbol: s.to_string(),
            })
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        symbol.parse().map_err(serde::de::Error::custom)
    }
}
