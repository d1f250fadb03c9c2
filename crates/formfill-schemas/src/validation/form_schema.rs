//! Form schema validation with authoring rules
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult};
use jsonschema::Validator;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// JSON Schema (draft 2020-12) describing the structure of a form schema
pub const FORM_SCHEMA_JSON_SCHEMA: &str = include_str!("../../schemas/form-schema.schema.json");

const COMPARISON_MODES: [&str; 4] = ["equals", "contains", "startsWith", "endsWith"];

/// Validator for form schema documents
pub struct FormSchemaValidator {
    schema: Arc<Value>,
    compiled: Validator,
}

impl fmt::Debug for FormSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSchemaValidator")
            .field("schema_id", &self.schema.get("$id"))
            .finish_non_exhaustive()
    }
}

impl FormSchemaValidator {
    /// Compile the embedded JSON Schema
    pub fn new() -> ValidationResult<Self> {
        let schema: Value = serde_json::from_str(FORM_SCHEMA_JSON_SCHEMA).map_err(|e| {
            ValidationError::new("$", format!("Embedded JSON Schema is not valid JSON: {}", e))
        })?;
        Self::from_schema(schema)
    }

    /// Compile a caller-provided JSON Schema
    pub fn from_schema(schema: Value) -> ValidationResult<Self> {
        let compiled = jsonschema::validator_for(&schema)
            .map_err(|e| ValidationError::new("$", format!("Failed to compile JSON Schema: {}", e)))?;

        Ok(Self {
            schema: Arc::new(schema),
            compiled,
        })
    }

    /// Get the loaded JSON Schema
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    fn check_structure(&self, doc: &Value, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        for error in self.compiled.iter_errors(doc) {
            let pointer = error.instance_path.to_string();
            let path = join_pointer(&ctx.path, &pointer);
            errors.add(ValidationError::with_violation(
                path.clone(),
                error.to_string(),
                ValidationError::create_violation("json_schema", "a document matching the form schema definition", path),
            ));
        }
    }

    /// Form-level rules of partial mode
    fn check_form(&self, doc: &Map<String, Value>, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        if doc.get("title").and_then(Value::as_str).is_some_and(is_blank) {
            errors.add(ctx.child("title").error("The form title is required."));
        }

        if let Some(after) = doc.get("afterSubmitConfig").and_then(Value::as_object) {
            let after_ctx = ctx.child("afterSubmitConfig");
            if after.get("title").and_then(Value::as_str).is_some_and(is_blank) {
                errors.add(after_ctx.child("title").error(
                    "Please enter a thank-you title or short heading that users will see after submitting the form.",
                ));
            }
            if after.get("text").and_then(Value::as_str).is_some_and(is_blank) {
                errors.add(after_ctx.child("text").error(
                    "Please write a short message that users will see after submitting the form. This could be a thank-you note or next steps.",
                ));
            }
        }

        if let Some(fields) = doc.get("fields").and_then(Value::as_array) {
            let fields_ctx = ctx.child("fields");
            if fields.is_empty() {
                errors.add(fields_ctx.error("Please add at least 1 question/field in your form."));
            }

            let mut seen = HashSet::new();
            for (i, field) in fields.iter().enumerate() {
                let field_ctx = fields_ctx.child_index(i);
                if let Some(field) = field.as_object() {
                    self.check_field(field, &field_ctx, errors);

                    if let Some(name) = field.get("name").and_then(Value::as_str) {
                        if !name.is_empty() && !seen.insert(name) {
                            errors.add(ValidationError::with_violation(
                                field_ctx.child("name").path,
                                format!("Field names must be unique, found duplicate '{}'.", name),
                                ValidationError::create_violation("unique_field_name", "a name used once", name),
                            ));
                        }
                    }
                }
            }
        }
    }

    /// Per-field rules of partial mode
    fn check_field(&self, field: &Map<String, Value>, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        if let Some(name) = field.get("name").and_then(Value::as_str) {
            if let Err(error) = ValidationHelpers::validate_identifier(name, &ctx.child("name")) {
                errors.add(error);
            }
        }

        if field.get("label").and_then(Value::as_str).is_some_and(is_blank) {
            errors.add(ctx.child("label").error("Please enter a question or label."));
        }

        let kind = field.get("type").and_then(Value::as_str).unwrap_or_default();
        match kind {
            "text" | "textarea" => {
                let lengths = (number(field, "minLength"), number(field, "maxLength"));
                if let (Some(min), Some(max)) = lengths {
                    if min > max {
                        errors.add(ctx.child("minLength").error("Minimum length cannot be greater than maximum length."));
                    }
                }

                let mode = field.get("validationType").and_then(Value::as_str).unwrap_or("none");
                let operand = field.get("validationValue").and_then(Value::as_str).unwrap_or_default();
                if kind == "text" && COMPARISON_MODES.contains(&mode) && operand.is_empty() {
                    errors.add(ctx.child("validationValue").error("Please enter a value to compare with."));
                }
            }
            "number" => {
                if let (Some(min), Some(max)) = (number(field, "min"), number(field, "max")) {
                    if min > max {
                        errors.add(ctx.child("min").error("Minimum value cannot be greater than maximum value."));
                    }
                }
            }
            "date" | "dateRange" => {
                for key in ["minDate", "maxDate"] {
                    if let Some(limit) = field.get(key).and_then(Value::as_str) {
                        if let Err(error) = ValidationHelpers::parse_date_limit(limit, &ctx.child(key)) {
                            errors.add(error);
                        }
                    }
                }
            }
            "file" => {
                if field.get("allowedFileTypes").and_then(Value::as_array).is_some_and(Vec::is_empty) {
                    errors.add(ctx.child("allowedFileTypes").error("Please choose at least one allowed file type."));
                }
                if number(field, "maxSizeMB").is_some_and(|size| size <= 0.0) {
                    errors.add(ctx.child("maxSizeMB").error("Maximum file size must be greater than 0 MB."));
                }
            }
            "select" => {
                if let Some(options) = field.get("options").and_then(Value::as_array) {
                    let options_ctx = ctx.child("options");
                    if options.is_empty() {
                        errors.add(options_ctx.error("Please add at least one option."));
                    }
                    let repeated = ValidationHelpers::duplicates(options.iter().filter_map(Value::as_str));
                    if !repeated.is_empty() {
                        errors.add(ValidationError::with_violation(
                            options_ctx.path,
                            "All dropdown options must be different from each other.",
                            ValidationError::create_violation("unique_options", "distinct options", repeated.join(", ")),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    /// Cross-field rules of strict mode
    fn check_cross_field(&self, doc: &Map<String, Value>, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        let fields: Vec<&Map<String, Value>> = doc
            .get("fields")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default();

        if let Some(order) = doc.get("order").and_then(Value::as_array) {
            let order_ctx = ctx.child("order");
            let order: Vec<&str> = order.iter().filter_map(Value::as_str).collect();
            let names: Vec<&str> = fields
                .iter()
                .filter_map(|f| f.get("name").and_then(Value::as_str))
                .collect();

            if !ValidationHelpers::duplicates(order.iter().copied()).is_empty() {
                errors.add(order_ctx.error("Order must have unique field names, found duplicate fields."));
            }

            let missing = unique_missing(&names, &order);
            if !missing.is_empty() {
                errors.add(order_ctx.error(format!(
                    "Some fields are missing in the order: {}. Please add them to the field order.",
                    missing.join(", ")
                )));
            }

            let extra = unique_missing(&order, &names);
            if !extra.is_empty() {
                errors.add(order_ctx.error(format!(
                    "These fields don't exist: {}. Please remove them from the field order.",
                    extra.join(", ")
                )));
            }
        }

        let fields_ctx = ctx.child("fields");
        for (i, field) in fields.iter().enumerate() {
            let field_ctx = fields_ctx.child_index(i);
            let kind = field.get("type").and_then(Value::as_str).unwrap_or_default();

            if matches!(kind, "date" | "dateRange") {
                let min = literal_date(field, "minDate", &field_ctx);
                let max = literal_date(field, "maxDate", &field_ctx);
                if let (Some(min), Some(max)) = (min, max) {
                    if min > max {
                        errors.add(field_ctx.child("minDate").error("The earliest date cannot be after the latest date."));
                    }
                }
            }

            if kind == "dateRange" {
                if let Some(gap) = field.get("gapInDays").and_then(Value::as_object) {
                    // A zero maximum leaves the range unbounded
                    let max = number(gap, "max").filter(|max| *max > 0.0);
                    if let (Some(min), Some(max)) = (number(gap, "min"), max) {
                        if min > max {
                            errors.add(field_ctx.child("gapInDays").error("Minimum gap cannot be greater than maximum gap."));
                        }
                    }
                }
            }
        }
    }
}

impl SchemaValidator for FormSchemaValidator {
    type Input = Value;

    fn validate_with_context(&self, doc: &Value, ctx: &ValidationContext) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check_structure(doc, ctx, &mut errors);

        if let Some(object) = doc.as_object() {
            if ctx.mode.checks_fields() {
                self.check_form(object, ctx, &mut errors);
            }
            if ctx.mode.checks_cross_field() {
                self.check_cross_field(object, ctx, &mut errors);
            }
        }

        errors.into_result()
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn number(object: &Map<String, Value>, key: &str) -> Option<f64> {
    object.get(key).and_then(Value::as_f64)
}

fn literal_date(field: &Map<String, Value>, key: &str, ctx: &ValidationContext) -> Option<chrono::NaiveDate> {
    let limit = field.get(key).and_then(Value::as_str)?;
    ValidationHelpers::parse_date_limit(limit, ctx).ok().flatten()
}

/// Entries of `from` absent from `within`, each listed once
fn unique_missing<'a>(from: &[&'a str], within: &[&str]) -> Vec<&'a str> {
    let mut missing: Vec<&str> = Vec::new();
    for &name in from {
        if !within.contains(&name) && !missing.contains(&name) {
            missing.push(name);
        }
    }
    missing
}

/// Append a JSON pointer (`/fields/0/name`) to a JSON path (`$`)
fn join_pointer(base: &str, pointer: &str) -> String {
    let mut path = base.to_string();
    for token in pointer.split('/').filter(|t| !t.is_empty()) {
        let token = token.replace("~1", "/").replace("~0", "~");
        if token.chars().all(|c| c.is_ascii_digit()) {
            path.push_str(&format!("[{}]", token));
        } else {
            path.push('.');
            path.push_str(&token);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_schema_compiles() {
        let validator = FormSchemaValidator::new().unwrap();
        assert_eq!(validator.schema()["title"], "FormSchema");
    }

    #[test]
    fn test_join_pointer() {
        assert_eq!(join_pointer("$", "/fields/0/name"), "$.fields[0].name");
        assert_eq!(join_pointer("$[3]", ""), "$[3]");
        assert_eq!(join_pointer("$", "/a~1b"), "$.a/b");
    }

    #[test]
    fn test_unique_missing() {
        assert_eq!(unique_missing(&["a", "b", "b", "c"], &["a"]), vec!["b", "c"]);
    }
}
