//! Property-based tests for submission validation
//!
//! These tests verify invariants that hold for every submission run
//! through the submission validator.


use proptest::prelude::*;
use serde_json::{json, Value};

use formfill_core::validation::REQUIRED_MESSAGE;
use formfill_core::{
    validate_submission, FieldCommon, FieldDefinition, FormSchema, NumberField, SubmissionData,
    TextField,
};
use test_support::fixed_clock;

/// Schema of `count` number fields `n0..n{count}`, each bounded to [0, 10]
fn numbers_schema(count: usize, required: bool) -> FormSchema {
    let fields: Vec<FieldDefinition> = (0..count)
        .map(|i| {
            let mut common = FieldCommon::new(format!("n{}", i), format!("Number {}", i));
            common.required = required;
            FieldDefinition::Number(NumberField {
                common,
                min: Some(0.0),
                max: Some(10.0),
                step: None,
            })
        })
        .collect();

    FormSchema {
        title: "Numbers".to_string(),
        description: None,
        submit_button_label: "Submit".to_string(),
        after_submit_config: Default::default(),
        order: fields.iter().map(|f| f.name().to_string()).collect(),
        fields,
    }
}

/// Strategy for an arbitrary JSON answer
fn answer_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-50i64..50).prop_map(Value::from),
        "[a-z0-9@. ]{0,12}".prop_map(Value::from),
        prop::collection::vec("[a-c]{1}", 0..3).prop_map(|v| json!(v)),
    ]
}

proptest! {
    /// Property: validating the same pair twice yields the same report
    #[test]
    fn prop_validation_is_idempotent(
        answers in prop::collection::vec(answer_strategy(), 1..8)
    ) {
        let schema = numbers_schema(answers.len(), true);
        let data: SubmissionData = answers
            .into_iter()
            .enumerate()
            .map(|(i, v)| (format!("n{}", i), v))
            .collect();
        let clock = fixed_clock();

        let first = validate_submission(&schema, &data, &clock);
        let second = validate_submission(&schema, &data, &clock);
        prop_assert_eq!(first, second);
    }

    /// Property: N invalid and M valid fields give exactly N error keys
    #[test]
    fn prop_error_keys_match_invalid_fields(
        valid in prop::collection::vec(0i64..=10, 0..6),
        invalid in prop::collection::vec(11i64..1000, 0..6)
    ) {
        let schema = numbers_schema(valid.len() + invalid.len(), true);
        let data: SubmissionData = valid
            .iter()
            .chain(invalid.iter())
            .enumerate()
            .map(|(i, v)| (format!("n{}", i), json!(v)))
            .collect();

        let report = validate_submission(&schema, &data, &fixed_clock());
        prop_assert_eq!(report.failed_fields(), invalid.len());
        prop_assert_eq!(report.is_valid(), invalid.is_empty());
    }

    /// Property: a blank required field gets only the required message
    #[test]
    fn prop_blank_required_field_has_single_message(
        blank in prop_oneof![Just(None), Just(Some(Value::Null)), Just(Some(json!("")))],
        min_length in 1usize..5
    ) {
        let field = FieldDefinition::Text(TextField {
            common: FieldCommon::new("answer", "Answer").required(),
            min_length: Some(min_length),
            ..TextField::default()
        });
        let schema = FormSchema {
            title: "One".to_string(),
            description: None,
            submit_button_label: "Submit".to_string(),
            after_submit_config: Default::default(),
            fields: vec![field],
            order: vec!["answer".to_string()],
        };
        let mut data = SubmissionData::new();
        if let Some(value) = blank {
            data.insert("answer".to_string(), value);
        }

        let report = validate_submission(&schema, &data, &fixed_clock());
        prop_assert_eq!(
            report.messages_for("answer").map(<[String]>::to_vec),
            Some(vec![REQUIRED_MESSAGE.to_string()])
        );
    }

    /// Property: absent optional fields never produce errors
    #[test]
    fn prop_absent_optional_fields_are_silent(count in 1usize..10) {
        let schema = numbers_schema(count, false);
        let report = validate_submission(&schema, &SubmissionData::new(), &fixed_clock());
        prop_assert!(report.is_valid());
    }
}
