//! Whole-submission validation
//!
//! Every field of the schema is visited in declaration order, so a single
//! pass reports all failing fields at once. Keys of the submission that the
//! schema does not declare are ignored.
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use tracing::debug;

use super::dispatch::validator_for;
use super::types::{ValidationReport, REQUIRED_MESSAGE};
use crate::dates::Clock;
use crate::types::{FieldDefinition, FormSchema, SubmissionData};

/// Validates raw submissions against one schema
#[derive(Debug, Clone, Copy)]
pub struct SubmissionValidator<'a> {
    schema: &'a FormSchema,
    clock: &'a dyn Clock,
}

impl<'a> SubmissionValidator<'a> {
    pub fn new(schema: &'a FormSchema, clock: &'a dyn Clock) -> Self {
        Self { schema, clock }
    }

    /// Validate every field and collect the failures
    pub fn validate(&self, data: &SubmissionData) -> ValidationReport {
        let mut report = ValidationReport::new();

        for field in &self.schema.fields {
            if let Some(message) = self.check_field(field, data.get(field.name())) {
                debug!(field = field.name(), kind = %field.kind(), %message, "Field rejected");
                report.record(field.name(), message);
            }
        }

        report
    }

    /// Check one field's answer.
    ///
    /// Absent, `null` and empty-string answers count as unanswered: they fail
    /// required fields and are skipped otherwise.
    pub fn check_field(&self, field: &FieldDefinition, value: Option<&Value>) -> Option<String> {
        match value.filter(|v| !is_blank(v)) {
            None if field.is_required() => Some(REQUIRED_MESSAGE.to_string()),
            None => None,
            Some(answer) => validator_for(field, self.clock).validate(answer).err(),
        }
    }
}

/// Whether a raw answer counts as unanswered
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Convenience wrapper around [`SubmissionValidator::validate`]
pub fn validate_submission(
    schema: &FormSchema,
    data: &SubmissionData,
    clock: &dyn Clock,
) -> ValidationReport {
    SubmissionValidator::new(schema, clock).validate(data)
}
