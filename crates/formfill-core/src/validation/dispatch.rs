//! Validator selection by field kind
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use super::date_validators::{DateRangeValidator, DateValidator};
use super::field_validators::{
    CheckboxValidator, FileValidator, NumberValidator, SelectValidator, TextAreaValidator,
    TextValidator,
};
use super::types::FieldValidator;
use crate::dates::Clock;
use crate::types::FieldDefinition;

/// Pick the validator for a field definition.
///
/// The field kind set is closed: an unknown `type` tag never reaches this
/// point because it fails schema deserialization.
pub fn validator_for<'a>(
    field: &'a FieldDefinition,
    clock: &'a dyn Clock,
) -> Box<dyn FieldValidator + 'a> {
    match field {
        FieldDefinition::Text(f) => Box::new(TextValidator::new(f)),
        FieldDefinition::TextArea(f) => Box::new(TextAreaValidator::new(f)),
        FieldDefinition::Number(f) => Box::new(NumberValidator::new(f)),
        FieldDefinition::Checkbox(f) => Box::new(CheckboxValidator::new(f)),
        FieldDefinition::Date(f) => Box::new(DateValidator::new(f, clock)),
        FieldDefinition::DateRange(f) => Box::new(DateRangeValidator::new(f, clock)),
        FieldDefinition::File(f) => Box::new(FileValidator::new(f)),
        FieldDefinition::Select(f) => Box::new(SelectValidator::new(f)),
    }
}
