//! Traversal of normalized condition trees
//!
//! Consumers such as query builders receive trees through these traits. The
//! visiting order is stable: a condition's elements are visited in array
//! order, which for a normalized tree means its predicate sets (in bucket
//! creation order) and then its nested conditions (in the same order).

mod display;

use crate::condition::{Condition, ConditionElement, PredicateSet};
use crate::symbols::Operator;

pub use display::DisplayProcessor;

/// Double-dispatch visitor over a condition tree
///
/// Implementors usually override [`process_predicate_set`] only, and
/// sometimes [`process_condition`] to emit grouping around nested elements.
///
/// [`process_predicate_set`]: ConditionProcessor::process_predicate_set
/// [`process_condition`]: ConditionProcessor::process_condition
pub trait ConditionProcessor<A> {
    /// Dispatch an element of `condition` to the matching method
    fn process_element(
        &self,
        element: &ConditionElement,
        condition: &Condition,
        accumulator: &mut A,
    ) {
        match element {
            ConditionElement::Condition(nested) => self.process_condition(nested, accumulator),
            ConditionElement::PredicateSet(set) => {
                self.process_predicate_set(set, condition, accumulator)
            }
        }
    }

    fn process_condition(&self, condition: &Condition, accumulator: &mut A) {
        for element in &condition.elements {
            self.process_element(element, condition, accumulator);
        }
    }

    /// Customization point; does nothing by default
    fn process_predicate_set(
        &self,
        _predicates: &PredicateSet,
        _condition: &Condition,
        _accumulator: &mut A,
    ) {
    }

    /// Process the result of a parse or a normalization
    ///
    /// A bare predicate set is handled as the sole element of an implicit
    /// conjunction.
    fn process(&self, root: &ConditionElement, accumulator: &mut A) {
        match root {
            ConditionElement::Condition(condition) => {
                self.process_condition(condition, accumulator)
            }
            ConditionElement::PredicateSet(set) => {
                let implicit = Condition::empty(Operator::And);
                self.process_predicate_set(set, &implicit, accumulator);
            }
        }
    }
}

/// Processor relying on every default method
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConditionProcessor;

impl<A> ConditionProcessor<A> for DefaultConditionProcessor {}

/// Shallow traversal: one visitor call per element of a condition
pub trait ConditionWalker {
    fn walk<F>(&self, condition: &Condition, visitor: F)
    where
        F: FnMut(&ConditionElement, &Condition);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConditionWalker;

impl ConditionWalker for DefaultConditionWalker {
    fn walk<F>(&self, condition: &Condition, mut visitor: F)
    where
        F: FnMut(&ConditionElement, &Condition),
    {
        for element in &condition.elements {
            visitor(element, condition);
        }
    }
}
