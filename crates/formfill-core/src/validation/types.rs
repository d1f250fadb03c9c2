//! Core validation types
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::types::FieldErrors;

/// Message recorded for a required field with no answer
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Outcome of checking one value: the first failing rule's message
pub type FieldResult = std::result::Result<(), String>;

/// Checks a single present, non-empty value against one field's rules
pub trait FieldValidator {
    fn validate(&self, value: &Value) -> FieldResult;
}

/// Field errors gathered over a whole submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: FieldErrors,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message under a field name
    pub fn record(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    /// Number of fields with at least one message
    pub fn failed_fields(&self) -> usize {
        self.errors.len()
    }

    pub fn messages_for(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.is_valid() { 1 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("valid", &self.is_valid())?;
        if !self.is_valid() {
            map.serialize_entry("errors", &self.errors)?;
        }
        map.end()
    }
}
