use crate::errors::DuplicateSymbolError;
use std::collections::HashMap;
use std::fmt::Debug;

/// Injective mapping between textual symbols and the values they stand for
///
/// Each value owns an ordered list of symbols: the canonical one first, then
/// its synonyms. A symbol belongs to at most one value.
#[derive(Debug, Clone)]
pub struct SymbolTable<T: 'static> {
    entries: Vec<(T, &'static [&'static str])>,
    by_symbol: HashMap<&'static str, T>,
    symbols: Vec<&'static str>,
}

impl<T: Copy + PartialEq + Debug> SymbolTable<T> {
    /// Build a table, failing on the first symbol registered twice
    pub fn try_new(entries: &[(T, &'static [&'static str])]) -> Result<Self, DuplicateSymbolError> {
        let mut by_symbol = HashMap::new();
        let mut symbols = Vec::new();

        for (value, value_symbols) in entries {
            for symbol in value_symbols.iter() {
                if let Some(existing) = by_symbol.insert(*symbol, *value) {
                    return Err(DuplicateSymbolError {
                        symbol: symbol.to_string(),
                        existing: format!("{:?}", existing),
                    });
                }
                symbols.push(*symbol);
            }
        }

        Ok(Self {
            entries: entries.to_vec(),
            by_symbol,
            symbols,
        })
    }

    /// Build a table from static data
    ///
    /// # Panics
    ///
    /// Panics when two entries share a symbol: the static data is corrupted
    /// and initialization must not complete.
    pub fn new(entries: &[(T, &'static [&'static str])]) -> Self {
        match Self::try_new(entries) {
            Ok(table) => table,
            Err(err) => panic!("corrupted symbol table: {}", err),
        }
    }

    /// Symbols of the given value, canonical first
    pub fn symbols_of(&self, value: T) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == value)
            .map(|(_, symbols)| *symbols)
            .unwrap_or(&[])
    }

    /// Value registered for the given symbol, synonyms included
    pub fn value_for(&self, symbol: &str) -> Option<T> {
        self.by_symbol.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.by_symbol.contains_key(symbol)
    }

    /// Every registered symbol, in registration order
    pub fn symbols(&self) -> &[&'static str] {
        &self.symbols
    }

    /// Registered values with their symbols, in registration order
    pub fn entries(&self) -> impl Iterator<Item = (T, &'static [&'static str])> + '_ {
        self.entries.iter().copied()
    }
}
