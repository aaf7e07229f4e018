//! Condition normalization
//!
//! Reduces a condition tree to its canonical minimal form so that equivalent
//! trees compare equal. The pass is depth-first and post-order:
//!
//! 1. nested conditions are normalized first;
//! 2. a child sharing its parent's operator is spliced into the parent
//!    (`(A || B) || C` → `A || B || C`), except under `NOT`;
//! 3. predicate sets are merged into the first bucket that neither lacks a
//!    clashing value nor repeats one, a new bucket being opened otherwise;
//! 4. elements are reassembled as predicate buckets followed by conditions;
//! 5. `AND`/`OR` nodes left with a single condition, or a single predicate set
//!    of at most one field, are replaced by that element;
//! 6. at the root, an `AND` left with a single element is replaced by it.
//!
//! `NOT` nodes are never collapsed and always keep exactly one element.
//!
//! Bucket order follows traversal order and is part of the output contract.

use crate::condition::{Condition, ConditionElement, PredicateSet};
use crate::symbols::Operator;
use serde_json::Value;
use tracing::trace;

/// Normalize a root condition
pub fn normalize(condition: &Condition) -> ConditionElement {
    normalize_with_siblings(condition, None)
}

/// Normalize a condition nested among `sibling_count` other elements
pub fn normalize_nested(condition: &Condition, sibling_count: usize) -> ConditionElement {
    normalize_with_siblings(condition, Some(sibling_count))
}

/// Normalize any element; a bare predicate set is already canonical
pub fn normalize_element(element: &ConditionElement) -> ConditionElement {
    match element {
        ConditionElement::Condition(condition) => normalize(condition),
        ConditionElement::PredicateSet(set) => ConditionElement::PredicateSet(set.clone()),
    }
}

/// Reduce the provided condition to its simplest form
///
/// `sibling_count` is `None` for the root call only; it enables the final
/// unwrapping of a single-element conjunction.
pub fn normalize_with_siblings(
    condition: &Condition,
    sibling_count: Option<usize>,
) -> ConditionElement {
    let operator = condition.operator;
    let element_count = condition.elements.len();
    let mut buckets = Buckets::default();

    for element in &condition.elements {
        match element {
            ConditionElement::Condition(sub_condition) => {
                let simplified =
                    normalize_with_siblings(sub_condition, Some(element_count.saturating_sub(1)));
                buckets.allocate_simplified(operator, simplified);
            }
            ConditionElement::PredicateSet(set) => buckets.allocate_predicate_set(set),
        }
    }

    let mut elements = buckets.into_elements();

    if operator == Operator::Not && elements.len() > 1 {
        // Negation applies to the conjunction of its elements
        let conjunction = Condition::and(elements);
        elements = vec![normalize_with_siblings(&conjunction, Some(0))];
    }

    let mut result = ConditionElement::Condition(Condition::new(operator, elements));

    // Operations expecting several operands, like "and" and "or", can be
    // dropped when a single operand is left.
    // { "||": [{ "&&": [{ "A": 1, "B": 2 }] }] } → { "&&": [{ "A": 1, "B": 2 }] }
    if operator != Operator::Not {
        result = collapse(result);
    }

    if sibling_count.is_none() {
        result = unwrap_root_conjunction(result);
    }

    trace!(
        operator = %operator,
        element_count,
        root = sibling_count.is_none(),
        "normalized condition"
    );
    result
}

fn collapse(element: ConditionElement) -> ConditionElement {
    let ConditionElement::Condition(mut condition) = element else {
        return element;
    };
    if condition.elements.len() != 1 {
        return ConditionElement::Condition(condition);
    }

    let collapsible = match &condition.elements[0] {
        ConditionElement::Condition(_) => true,
        ConditionElement::PredicateSet(set) => set.len() <= 1,
    };
    match condition.elements.pop() {
        Some(sole) if collapsible => sole,
        Some(sole) => {
            condition.elements.push(sole);
            ConditionElement::Condition(condition)
        }
        None => ConditionElement::Condition(condition),
    }
}

fn unwrap_root_conjunction(element: ConditionElement) -> ConditionElement {
    match element {
        ConditionElement::Condition(mut condition)
            if condition.is_conjunction() && condition.elements.len() == 1 =>
        {
            match condition.elements.pop() {
                Some(sole) => sole,
                None => ConditionElement::Condition(condition),
            }
        }
        other => other,
    }
}

/// Working set of a condition being normalized
#[derive(Debug, Default)]
struct Buckets {
    predicate_sets: Vec<PredicateSet>,
    conditions: Vec<Condition>,
}

impl Buckets {
    /// Route a normalized child of a condition using `operator`
    fn allocate_simplified(&mut self, operator: Operator, simplified: ConditionElement) {
        match simplified {
            ConditionElement::Condition(sub_condition)
                if sub_condition.operator == operator && operator != Operator::Not =>
            {
                self.allocate_sub_condition(sub_condition);
            }
            ConditionElement::Condition(sub_condition) => self.conditions.push(sub_condition),
            ConditionElement::PredicateSet(set) => self.allocate_predicate_set(&set),
        }
    }

    /// Splice the elements of a same-operator child
    fn allocate_sub_condition(&mut self, sub_condition: Condition) {
        for sub_element in sub_condition.elements {
            match sub_element {
                ConditionElement::Condition(condition) => self.conditions.push(condition),
                ConditionElement::PredicateSet(set) => self.allocate_predicate_set(&set),
            }
        }
    }

    /// Allocate the fields of a predicate set so that existing fields are
    /// neither repeated (same value) nor overwritten (different value)
    ///
    /// ```text
    /// set     = { "A": 1, "B": 2, "C": 3 }
    /// buckets = [{ "A": 1, "B": 1 }]
    ///         → [{ "A": 1, "B": 1, "C": 3 }, { "B": 2 }]
    /// ```
    fn allocate_predicate_set(&mut self, set: &PredicateSet) {
        for (key, value) in set {
            self.allocate_field(key, value);
        }
    }

    fn allocate_field(&mut self, key: &str, value: &Value) {
        match self
            .predicate_sets
            .iter_mut()
            .find(|bucket| bucket.accepts(key, value))
        {
            Some(bucket) => {
                bucket.insert(key, value.clone());
            }
            None => {
                let mut bucket = PredicateSet::new();
                bucket.insert(key, value.clone());
                self.predicate_sets.push(bucket);
            }
        }
    }

    fn into_elements(self) -> Vec<ConditionElement> {
        self.predicate_sets
            .into_iter()
            .map(ConditionElement::PredicateSet)
            .chain(self.conditions.into_iter().map(ConditionElement::Condition))
            .collect()
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
    fn test_merge_keeps_first_fit_order() {
        let mut buckets = Buckets::default();
        buckets.allocate_predicate_set(&json!({"A": 1, "B": 1}).try_into().unwrap());
        buckets.allocate_predicate_set(&json!({"A": 1, "B": 2, "C": 3}).try_into().unwrap());

        assert_eq!(
            buckets.into_elements(),
            vec![set(json!({"A": 1, "B": 1, "C": 3})), set(json!({"B": 2}))]
        );
    }

    #[test]
    fn test_empty_predicate_set_adds_no_bucket() {
        let condition = Condition::or(vec![set(json!({})), set(json!({"A": 1, "B": 2}))]);
        assert_eq!(
            normalize(&condition),
            ConditionElement::from(Condition::or(vec![set(json!({"A": 1, "B": 2}))]))
        );
    }

    #[test]
    fn test_empty_condition_is_kept() {
        let condition = Condition::empty(Operator::Or);
        assert_eq!(normalize(&condition), ConditionElement::from(condition));
    }

    #[test]
    fn test_nested_conjunction_is_not_unwrapped() {
        let condition = Condition::and(vec![set(json!({"A": 1, "B": 2}))]);
        assert_eq!(
            normalize_nested(&condition, 2),
            ConditionElement::from(condition.clone())
        );
        assert_eq!(normalize(&condition), set(json!({"A": 1, "B": 2})));
    }

    #[test]
    fn test_input_is_left_untouched() {
        let condition = Condition::and(vec![
            Condition::and(vec![set(json!({"A": 1})), set(json!({"B": 2}))]).into(),
            set(json!({"A": 1})),
        ]);
        let snapshot = condition.clone();

        let _ = normalize(&condition);
        assert_eq!(condition, snapshot);
    }
}
