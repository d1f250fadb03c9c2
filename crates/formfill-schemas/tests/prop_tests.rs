//! Property-based tests for form schema validation
//!
//! These tests verify that the validator behaves predictably across a wide
//! range of generated documents.

use proptest::prelude::*;
use serde_json::{json, Value};
use formfill_schemas::{create_form_schema_validator, SchemaValidator};

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,50}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 10, 5, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            proptest::collection::hash_map("[a-zA-Z_][a-zA-Z0-9_]{0,20}", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for well-formed field names
fn field_names_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::hash_set("[a-z_][a-z0-9_]{0,12}", 1..8)
        .prop_map(|names| names.into_iter().collect())
}

fn schema_for(names: &[String]) -> Value {
    let fields: Vec<Value> = names
        .iter()
        .map(|name| json!({"type": "text", "name": name, "label": name}))
        .collect();

    json!({
        "title": "Generated",
        "afterSubmitConfig": {"title": "Thanks", "text": "Done."},
        "fields": fields,
        "order": names,
    })
}

proptest! {
    #[test]
    fn prop_arbitrary_values_never_panic(value in json_value_strategy()) {
        let validator = create_form_schema_validator().unwrap();
        let _ = validator.validate(&value);
    }

    #[test]
    fn prop_generated_schemas_are_valid(names in field_names_strategy()) {
        let validator = create_form_schema_validator().unwrap();
        let schema = schema_for(&names);
        prop_assert!(validator.validate(&schema).is_ok());
    }

    #[test]
    fn prop_dropping_from_order_is_reported(names in field_names_strategy()) {
        let validator = create_form_schema_validator().unwrap();
        let mut schema = schema_for(&names);
        let dropped = names[0].clone();
        schema["order"] = json!(names[1..].to_vec());

        let errors = validator.validate(&schema).unwrap_err();
        let messages = errors.messages_at("$.order");
        prop_assert_eq!(messages.len(), 1);
        prop_assert!(messages[0].contains(&dropped));

        prop_assert!(validator.validate_partial(&schema).is_ok());
    }

    #[test]
    fn prop_strict_reports_at_least_partial(value in json_value_strategy()) {
        let validator = create_form_schema_validator().unwrap();
        let strict = validator.validate(&value).err().map_or(0, |e| e.len());
        let partial = validator.validate_partial(&value).err().map_or(0, |e| e.len());
        prop_assert!(strict >= partial);
    }
}
