use super::ConditionProcessor;
use crate::condition::{Condition, ConditionElement, PredicateSet};
use crate::symbols::{Operator, get_predicate_for_symbol};
use colored::Colorize;
use serde_json::Value;

/// Renders a condition tree as a parenthesized, human readable string
///
/// ```text
/// (ANIMAL.breed = "*shepard" && OWNER.id = 34087346) && !(PERMIT.acknowledged = null)
/// ```
///
/// Fields of a predicate set are joined with the operator of the condition
/// holding it (`&&` under a negation).
#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayProcessor {
    colored: bool,
}

impl DisplayProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn render(&self, root: &ConditionElement) -> String {
        let mut output = String::new();
        self.process(root, &mut output);
        output
    }

    fn paint_operator(&self, symbol: &str) -> String {
        if self.colored {
            symbol.yellow().bold().to_string()
        } else {
            symbol.to_string()
        }
    }

    fn paint_field(&self, field: &str) -> String {
        if self.colored {
            field.cyan().to_string()
        } else {
            field.to_string()
        }
    }

    fn render_field(&self, key: &str, value: &Value) -> Vec<String> {
        let Some(predicate) = get_predicate_for_symbol(key) else {
            return vec![self.comparison(key, "=", value)];
        };
        let symbol = predicate.symbol();

        match value {
            // { "~": { "description": "fish" } }
            Value::Object(operands) => operands
                .iter()
                .map(|(field, operand)| self.comparison(field, symbol, operand))
                .collect(),
            // { "=": ["flag", false] }, { "{}": ["value", 1, 2, 3] }
            Value::Array(items) if items.len() >= 2 && items[0].is_string() => {
                let field = items[0].as_str().unwrap_or_default();
                let operand = if items.len() == 2 {
                    items[1].clone()
                } else {
                    Value::Array(items[1..].to_vec())
                };
                vec![self.comparison(field, symbol, &operand)]
            }
            other => vec![format!("{} {}", self.paint_operator(symbol), other)],
        }
    }

    fn comparison(&self, field: &str, symbol: &str, operand: &Value) -> String {
        format!(
            "{} {} {}",
            self.paint_field(field),
            self.paint_operator(symbol),
            operand
        )
    }
}

fn junction(operator: Operator) -> &'static str {
    match operator {
        Operator::Or => Operator::Or.symbol(),
        Operator::And | Operator::Not => Operator::And.symbol(),
    }
}

impl ConditionProcessor<String> for DisplayProcessor {
    fn process_condition(&self, condition: &Condition, accumulator: &mut String) {
        if condition.operator == Operator::Not {
            accumulator.push_str(&self.paint_operator(Operator::Not.symbol()));
        }
        accumulator.push('(');
        for (index, element) in condition.elements.iter().enumerate() {
            if index > 0 {
                accumulator.push(' ');
                accumulator.push_str(&self.paint_operator(junction(condition.operator)));
                accumulator.push(' ');
            }
            self.process_element(element, condition, accumulator);
        }
        accumulator.push(')');
    }

    fn process_predicate_set(
        &self,
        predicates: &PredicateSet,
        condition: &Condition,
        accumulator: &mut String,
    ) {
        let parts: Vec<String> = predicates
            .iter()
            .flat_map(|(key, value)| self.render_field(key, value))
            .collect();
        let separator = format!(" {} ", self.paint_operator(junction(condition.operator)));
        let grouped = parts.len() > 1 && condition.elements.len() > 1;

        if grouped {
            accumulator.push('(');
        }
        accumulator.push_str(&parts.join(&separator));
        if grouped {
            accumulator.push(')');
        }
    }
}
