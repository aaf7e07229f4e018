//! Canonical condition tree
//!
//! A condition pairs a logical operator with an ordered list of elements, each
//! element being either a nested condition or a predicate set. The serialized
//! form is the one consumers compare and store:
//!
//! ```text
//! {"operator": "&&", "elements": [{"OWNER.id": 34087346}, {"operator": "!", "elements": [...]}]}
//! ```

mod predicate_set;

use crate::symbols::Operator;
use serde::{Deserialize, Serialize};

pub use predicate_set::PredicateSet;

/// Logical operator applied to an ordered sequence of elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    pub operator: Operator,
    /// Order is significant: predicate sets first, nested conditions after,
    /// each group in the order it was built.
    pub elements: Vec<ConditionElement>,
}

/// Either a nested condition or a flat predicate set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionElement {
    Condition(Condition),
    PredicateSet(PredicateSet),
}

impl Condition {
    pub fn new(operator: Operator, elements: Vec<ConditionElement>) -> Self {
        Self { operator, elements }
    }

    /// Condition with no element
    pub fn empty(operator: Operator) -> Self {
        Self::new(operator, Vec::new())
    }

    pub fn and(elements: Vec<ConditionElement>) -> Self {
        Self::new(Operator::And, elements)
    }

    pub fn or(elements: Vec<ConditionElement>) -> Self {
        Self::new(Operator::Or, elements)
    }

    pub fn not(element: impl Into<ConditionElement>) -> Self {
        Self::new(Operator::Not, vec![element.into()])
    }

    pub fn is_conjunction(&self) -> bool {
        self.operator == Operator::And
    }

    /// Nesting depth of conditions, this one counting as 1
    pub fn depth(&self) -> usize {
        1 + self
            .elements
            .iter()
            .filter_map(ConditionElement::as_condition)
            .map(Condition::depth)
            .max()
            .unwrap_or(0)
    }
}

impl ConditionElement {
    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            ConditionElement::Condition(condition) => Some(condition),
            ConditionElement::PredicateSet(_) => None,
        }
    }

    pub fn as_predicate_set(&self) -> Option<&PredicateSet> {
        match self {
            ConditionElement::Condition(_) => None,
            ConditionElement::PredicateSet(set) => Some(set),
        }
    }

    /// Whether this element is a condition, optionally with the given operator
    pub fn is_condition(&self, operator: Option<Operator>) -> bool {
        match self {
            ConditionElement::Condition(condition) => {
                operator.is_none_or(|operator| condition.operator == operator)
            }
            ConditionElement::PredicateSet(_) => false,
        }
    }
}

impl From<Condition> for ConditionElement {
    fn from(condition: Condition) -> Self {
        ConditionElement::Condition(condition)
    }
}

impl From<PredicateSet> for ConditionElement {
    fn from(set: PredicateSet) -> Self {
        ConditionElement::PredicateSet(set)
    }
}
