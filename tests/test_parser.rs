// Parser behavior on complete expressions: parse_condition reads a raw
// expression and returns its normalized condition tree.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use condition_engine::errors::ConditionError;
    use condition_engine::{
        Condition, ConditionElement, Operator, PredicateSet, parse, parse_condition, parse_str,
    };
    use serde_json::{Value, json};

    fn set(value: Value) -> ConditionElement {
        PredicateSet::try_from(value).unwrap().into()
    }

    // Date leaves travel as RFC 3339 strings
    fn date() -> Value {
        Value::String(
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0)
                .unwrap()
                .to_rfc3339(),
        )
    }

    #[test]
    fn test_parse_nested_condition() {
        let date = date();
        let condition = parse_condition(&json!({
            "&&": [{
                "ANIMAL.breed": "*shepard",
                "OWNER.id": 34087346,
                "!": { "PERMIT.acknowledged": null },
                "|": [{ "expiryDate": null }, { "expiryDate": [null, date] }]
            }]
        }))
        .unwrap();

        assert_eq!(
            condition,
            ConditionElement::from(Condition::and(vec![
                set(json!({"ANIMAL.breed": "*shepard", "OWNER.id": 34087346})),
                Condition::not(set(json!({"PERMIT.acknowledged": null}))).into(),
                Condition::or(vec![
                    set(json!({"expiryDate": null})),
                    set(json!({"expiryDate": [null, date]})),
                ])
                .into(),
            ]))
        );
    }

    #[test]
    fn test_parse_operator_symbol_variations() {
        let date = date();
        let condition = parse_condition(&json!({
            "&": [{
                "∧": { "ANIMAL.breed": "*shepard", "OWNER.id": 34087346 },
                "¬": { "PERMIT.acknowledged": null },
                "|": [{ "expiryDate": null }, { "expiryDate": [null, date] }],
                "∨": [{ "expiryDate": null }, { "expiryDate": [date, null] }]
            }]
        }))
        .unwrap();

        assert_eq!(
            condition,
            ConditionElement::from(Condition::and(vec![
                set(json!({"ANIMAL.breed": "*shepard", "OWNER.id": 34087346})),
                Condition::not(set(json!({"PERMIT.acknowledged": null}))).into(),
                Condition::or(vec![
                    set(json!({"expiryDate": null})),
                    set(json!({"expiryDate": [null, date]})),
                ])
                .into(),
                Condition::or(vec![
                    set(json!({"expiryDate": null})),
                    set(json!({"expiryDate": [date, null]})),
                ])
                .into(),
            ]))
        );
    }

    #[test]
    fn test_canonical_and_synonym_symbols_parse_alike() {
        let canonical = parse_condition(&json!({
            "&&": [{ "A": 1 }, { "||": [{ "B": 1 }, { "B": 2 }] }, { "!": { "C": null } }]
        }))
        .unwrap();
        let synonyms = parse_condition(&json!({
            "·": [{ "A": 1 }, { "+": [{ "B": 1 }, { "B": 2 }] }, { "¬": { "C": null } }]
        }))
        .unwrap();

        assert_eq!(canonical, synonyms);
    }

    #[test]
    fn test_predicate_symbols_are_plain_fields() {
        let date = date();
        let condition = parse_condition(&json!({
            "&&": [{
                "~": { "ANIMAL.breed": "*shepard" },
                "≠": { "OWNER.id": 34087346 },
                "!": { "PERMIT.acknowledged": null },
                "||": [{ "expiryDate": null }, { "expiryDate": [null, date] }]
            }]
        }))
        .unwrap();

        assert_eq!(
            condition,
            ConditionElement::from(Condition::and(vec![
                set(json!({
                    "~": {"ANIMAL.breed": "*shepard"},
                    "≠": {"OWNER.id": 34087346}
                })),
                Condition::not(set(json!({"PERMIT.acknowledged": null}))).into(),
                Condition::or(vec![
                    set(json!({"expiryDate": null})),
                    set(json!({"expiryDate": [null, date]})),
                ])
                .into(),
            ]))
        );
    }

    #[test]
    fn test_fields_mixed_with_operator_records() {
        let date = date();
        let condition = parse_condition(&json!({
            "value": [1, 2, 3],
            "flag": false,
            "missing": null,
            "date": date,
            "&": [
                { "|": { "categoryId": 123, "categoryType": ["book", "magazine"] } },
                { "|": { "~": { "description": "fish" }, "description": null } }
            ]
        }))
        .unwrap();

        assert_eq!(
            condition,
            ConditionElement::from(Condition::and(vec![
                set(json!({"value": [1, 2, 3], "flag": false, "missing": null, "date": date})),
                Condition::or(vec![set(json!({
                    "categoryId": 123,
                    "categoryType": ["book", "magazine"]
                }))])
                .into(),
                Condition::or(vec![set(json!({
                    "~": {"description": "fish"},
                    "description": null
                }))])
                .into(),
            ]))
        );
    }

    #[test]
    fn test_repeated_predicate_symbol_splits_sets() {
        let date = date();
        for symbol in ["{}", "()"] {
            let condition = parse_condition(&json!({
                "&": [
                    { symbol: ["value", 1, 2, 3] },
                    { "=": ["flag", false] },
                    { "=": ["missing", null] },
                    { "=": ["date", date] }
                ]
            }))
            .unwrap();

            assert_eq!(
                condition,
                ConditionElement::from(Condition::and(vec![
                    set(json!({symbol: ["value", 1, 2, 3], "=": ["flag", false]})),
                    set(json!({"=": ["missing", null]})),
                    set(json!({"=": ["date", date]})),
                ])),
                "symbol {symbol}"
            );
        }
    }

    #[test]
    fn test_disjunction_root_operator() {
        let condition = parse(&json!([{ "A": 1 }, { "A": 2 }, { "B": 3 }]), Operator::Or).unwrap();
        assert_eq!(
            condition,
            ConditionElement::from(Condition::or(vec![
                set(json!({"A": 1, "B": 3})),
                set(json!({"A": 2}))
            ]))
        );
    }

    #[test]
    fn test_single_field_collapses_to_predicate_set() {
        assert_eq!(parse_condition(&json!({"A": 1})).unwrap(), set(json!({"A": 1})));
        assert_eq!(
            parse(&json!({"A": 1}), Operator::Or).unwrap(),
            set(json!({"A": 1}))
        );
    }

    #[test]
    fn test_negation_root_operator_is_kept() {
        assert_eq!(
            parse(&json!({"A": 1}), Operator::Not).unwrap(),
            ConditionElement::from(Condition::not(set(json!({"A": 1}))))
        );
    }

    #[test]
    fn test_empty_record_yields_empty_condition() {
        assert_eq!(
            parse_condition(&json!({})).unwrap(),
            ConditionElement::from(Condition::empty(Operator::And))
        );
    }

    #[test]
    fn test_null_operand_yields_empty_nested_condition() {
        assert_eq!(
            parse_condition(&json!({"A": 1, "||": null})).unwrap(),
            ConditionElement::from(Condition::and(vec![
                set(json!({"A": 1})),
                Condition::empty(Operator::Or).into()
            ]))
        );
    }

    #[test]
    fn test_non_record_array_item_is_rejected() {
        let err = parse_condition(&json!({"||": [{"A": 1}, 2]})).unwrap_err();
        assert_eq!(
            err,
            ConditionError::InvalidExpression {
                path: "/||/1".to_string(),
                found: "a number".to_string()
            }
        );
        assert!(err.to_string().contains("/||/1"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let expression = json!({"&&": [{"A": 1}, {"&&": [{"A": 1}, {"B": 2}]}]});
        let snapshot = expression.clone();
        let _ = parse_condition(&expression).unwrap();
        assert_eq!(expression, snapshot);
    }

    #[test]
    fn test_parse_str_accepts_comments_and_unquoted_keys() {
        let text = r#"
            {
              // animals of any shepherd breed
              "ANIMAL.breed": "*shepard",
              "||": [{ expiryDate: null }, { expiryDate: [null, "2024-06-01"] }],
            }
        "#;
        let condition = parse_str(text, Operator::And).unwrap();
        assert_eq!(
            condition,
            ConditionElement::from(Condition::and(vec![
                set(json!({"ANIMAL.breed": "*shepard"})),
                Condition::or(vec![
                    set(json!({"expiryDate": null})),
                    set(json!({"expiryDate": [null, "2024-06-01"]})),
                ])
                .into(),
            ]))
        );
    }
}
