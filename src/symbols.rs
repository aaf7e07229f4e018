//! Static symbol tables for logical operators and comparison predicates
//!
//! Every operator and predicate has one canonical symbol and any number of
//! synonyms. Both tables are built once, on first use, and are read-only
//! afterwards. Registering the same symbol twice within a table is a defect
//! of the static data and aborts construction.
//!
//! ```text
//! NOT  !   ¬            EQUAL       =
//! AND  &&  &  ∧  ·      DIFFERENT   ≠  !=
//! OR   ||  |  ∨  +      LIKE        ~
//!                       LESS        <
//!                       LESS_EQUAL  ≤  <=
//!                       MORE        >
//!                       MORE_EQUAL  ≥  >=
//!                       BETWEEN     []
//!                       AMONG       {}
//! ```

mod operator;
mod predicate;
mod table;

pub use operator::{
    OPERATOR_SYMBOLS, Operator, get_operator_for_symbol, get_operator_symbols, is_operator_symbol,
    normalize_operator_symbol,
};
pub use predicate::{
    PREDICATE_SYMBOLS, Predicate, get_predicate_for_symbol, get_predicate_symbols,
    is_predicate_symbol, normalize_predicate_symbol,
};
pub use table::SymbolTable;

/// Force construction of both symbol tables
///
/// Calling this at startup moves a corrupted-table panic to a predictable
/// point instead of the first parse.
pub fn init() {
    std::sync::LazyLock::force(&OPERATOR_SYMBOLS);
    std::sync::LazyLock::force(&PREDICATE_SYMBOLS);
}
