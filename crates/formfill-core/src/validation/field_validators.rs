//! Field validators for scalar, choice and file answers
//!
//! Each validator borrows its field definition and stops at the first
//! failing rule. Length limits of zero are treated as absent.
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::types::{FieldResult, FieldValidator, REQUIRED_MESSAGE};
use crate::types::{
    CheckboxField, FileDescriptor, FileField, NumberField, SelectField, TextAreaField, TextField,
    TextValidationType,
};

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
static PHONE_PATTERN: OnceLock<Regex> = OnceLock::new();
static PINCODE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("static pattern compiles"))
}

fn limit(value: Option<usize>) -> Option<usize> {
    value.filter(|n| *n > 0)
}

/// Single-line text
#[derive(Debug, Clone, Copy)]
pub struct TextValidator<'a> {
    field: &'a TextField,
}

impl<'a> TextValidator<'a> {
    pub fn new(field: &'a TextField) -> Self {
        Self { field }
    }

    fn check_format(&self, text: &str) -> FieldResult {
        let mode = self.field.validation_type;
        if mode.is_comparison() {
            return self.check_comparison(mode, text);
        }

        match mode {
            TextValidationType::Email => {
                if pattern(&EMAIL_PATTERN, r"^\S+@\S+\.\S+$").is_match(text) {
                    Ok(())
                } else {
                    Err("That doesn't look like a valid email.".to_string())
                }
            }
            TextValidationType::Phone => {
                if pattern(&PHONE_PATTERN, r"^\+?[0-9]{7,15}$").is_match(text) {
                    Ok(())
                } else {
                    Err("Please enter a valid 10 digit phone number.".to_string())
                }
            }
            TextValidationType::Url => url::Url::parse(text)
                .map(|_| ())
                .map_err(|_| "Please enter a valid link or web address.".to_string()),
            TextValidationType::Pincode => {
                if pattern(&PINCODE_PATTERN, r"^[0-9]{5,6}$").is_match(text) {
                    Ok(())
                } else {
                    Err("Please enter a valid pin code (5-6 digits).".to_string())
                }
            }
            _ => Ok(()),
        }
    }

    /// Case-sensitive comparison against `validationValue`
    fn check_comparison(&self, mode: TextValidationType, text: &str) -> FieldResult {
        let operand = self.field.validation_value.as_deref().unwrap_or_default();

        let (matches, message) = match mode {
            TextValidationType::Equals => (text == operand, "Your answer must match exactly"),
            TextValidationType::Contains => (text.contains(operand), "Your answer must include"),
            TextValidationType::StartsWith => {
                (text.starts_with(operand), "Your answer should begin with")
            }
            TextValidationType::EndsWith => (text.ends_with(operand), "Your answer should end with"),
            _ => (true, ""),
        };

        if matches {
            Ok(())
        } else {
            Err(format!("{}: \"{}\".", message, operand))
        }
    }
}

impl FieldValidator for TextValidator<'_> {
    fn validate(&self, value: &Value) -> FieldResult {
        let text = value
            .as_str()
            .ok_or_else(|| "Please enter a valid response.".to_string())?;
        let length = text.chars().count();

        if let Some(min) = limit(self.field.min_length) {
            if length < min {
                return Err(format!("Please enter at least {} character(s).", min));
            }
        }

        if let Some(max) = limit(self.field.max_length) {
            if length > max {
                return Err(format!("Please keep your answer under {} characters.", max));
            }
        }

        self.check_format(text)
    }
}

/// Multi-line text
#[derive(Debug, Clone, Copy)]
pub struct TextAreaValidator<'a> {
    field: &'a TextAreaField,
}

impl<'a> TextAreaValidator<'a> {
    pub fn new(field: &'a TextAreaField) -> Self {
        Self { field }
    }
}

impl FieldValidator for TextAreaValidator<'_> {
    fn validate(&self, value: &Value) -> FieldResult {
        let text = value
            .as_str()
            .ok_or_else(|| "Please enter some text.".to_string())?;
        let length = text.chars().count();

        if limit(self.field.min_length).is_some_and(|min| length < min) {
            return Err(
                "Your response seems a bit short. Could you please add a little more detail?"
                    .to_string(),
            );
        }

        if limit(self.field.max_length).is_some_and(|max| length > max) {
            return Err(
                "Your response is a bit long. Please shorten it to make it easier to read."
                    .to_string(),
            );
        }

        Ok(())
    }
}

/// Numeric answers; `step` is not enforced
#[derive(Debug, Clone, Copy)]
pub struct NumberValidator<'a> {
    field: &'a NumberField,
}

impl<'a> NumberValidator<'a> {
    pub fn new(field: &'a NumberField) -> Self {
        Self { field }
    }
}

impl FieldValidator for NumberValidator<'_> {
    fn validate(&self, value: &Value) -> FieldResult {
        let number = value
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| "Please enter a valid number.".to_string())?;

        if let Some(min) = self.field.min {
            if number < min {
                return Err(format!("The number must be at least {}.", min));
            }
        }

        if let Some(max) = self.field.max {
            if number > max {
                return Err(format!("The number must be {} or less.", max));
            }
        }

        Ok(())
    }
}

/// Checkbox and toggle answers
#[derive(Debug, Clone, Copy)]
pub struct CheckboxValidator<'a> {
    field: &'a CheckboxField,
}

impl<'a> CheckboxValidator<'a> {
    pub fn new(field: &'a CheckboxField) -> Self {
        Self { field }
    }
}

impl FieldValidator for CheckboxValidator<'_> {
    fn validate(&self, value: &Value) -> FieldResult {
        let checked = value.as_bool().ok_or_else(|| "Invalid value.".to_string())?;

        // A required checkbox must be ticked, not merely answered.
        if self.field.common.required && !checked {
            return Err(REQUIRED_MESSAGE.to_string());
        }

        Ok(())
    }
}

/// Single and multiple choice answers
#[derive(Debug, Clone, Copy)]
pub struct SelectValidator<'a> {
    field: &'a SelectField,
}

impl<'a> SelectValidator<'a> {
    pub fn new(field: &'a SelectField) -> Self {
        Self { field }
    }

    fn is_option(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|choice| self.field.has_option(choice))
    }
}

impl FieldValidator for SelectValidator<'_> {
    fn validate(&self, value: &Value) -> FieldResult {
        if !self.field.multiple {
            return if self.is_option(value) {
                Ok(())
            } else {
                Err("Please select a valid option from the list.".to_string())
            };
        }

        let choices = value
            .as_array()
            .filter(|choices| !choices.is_empty())
            .ok_or_else(|| "Please choose at least one option.".to_string())?;

        match choices.iter().find(|choice| !self.is_option(choice)) {
            Some(invalid) => {
                let shown = invalid
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| invalid.to_string());
                Err(format!(
                    "\"{}\" is not a valid choice. Please select from the available options.",
                    shown
                ))
            }
            None => Ok(()),
        }
    }
}

/// File descriptors (name, size, media type) of pending uploads
#[derive(Debug, Clone, Copy)]
pub struct FileValidator<'a> {
    field: &'a FileField,
}

impl<'a> FileValidator<'a> {
    pub fn new(field: &'a FileField) -> Self {
        Self { field }
    }
}

impl FieldValidator for FileValidator<'_> {
    fn validate(&self, value: &Value) -> FieldResult {
        let file = FileDescriptor::from_value(value)
            .ok_or_else(|| "Please upload a valid file.".to_string())?;

        let allowed = &self.field.allowed_file_types;
        if !allowed.iter().any(|category| category.accepts(&file.media_type)) {
            let readable: Vec<&str> = allowed.iter().map(|category| category.label()).collect();
            return Err(format!(
                "This file type isn't supported. You can upload: {}.",
                readable.join(", ")
            ));
        }

        let max_mb = self.field.max_size_mb;
        if max_mb > 0.0 && file.size_mb() > max_mb {
            return Err(format!(
                "This file is too large. Maximum allowed size is {} MB.",
                max_mb
            ));
        }

        Ok(())
    }
}
