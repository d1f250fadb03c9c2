//! Base validation trait and common utilities
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult};
use chrono::{DateTime, NaiveDate};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How many rule layers to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Structure, per-field and cross-field rules
    #[default]
    Strict,
    /// Structure and per-field rules
    Partial,
    /// JSON Schema structure only
    Basic,
}

impl ValidationMode {
    /// Whether per-field rules run
    pub fn checks_fields(self) -> bool {
        matches!(self, ValidationMode::Strict | ValidationMode::Partial)
    }

    /// Whether cross-field rules run
    pub fn checks_cross_field(self) -> bool {
        self == ValidationMode::Strict
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationMode::Strict => "strict",
            ValidationMode::Partial => "partial",
            ValidationMode::Basic => "basic",
        })
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "partial" => Ok(ValidationMode::Partial),
            "basic" => Ok(ValidationMode::Basic),
            other => Err(format!("unknown validation mode '{}'", other)),
        }
    }
}

/// Current location and mode while walking a document
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Current JSON path
    pub path: String,
    pub mode: ValidationMode,
}

impl ValidationContext {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: "$".to_string(),
            mode,
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, path_segment.as_ref()),
            mode: self.mode,
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            mode: self.mode,
        }
    }

    /// Error located at this context
    pub fn error(&self, message: impl Into<String>) -> ValidationError {
        ValidationError::new(&self.path, message)
    }
}

/// Base trait for document validators
pub trait SchemaValidator {
    /// The type being validated
    type Input;

    /// Validate with all rules
    fn validate(&self, input: &Self::Input) -> Result<(), ValidationErrors> {
        let context = ValidationContext::new(ValidationMode::Strict);
        self.validate_with_context(input, &context)
    }

    /// Validate with specific context and mode
    fn validate_with_context(
        &self,
        input: &Self::Input,
        context: &ValidationContext,
    ) -> Result<(), ValidationErrors>;

    /// Validate structure and per-field rules
    fn validate_partial(&self, input: &Self::Input) -> Result<(), ValidationErrors> {
        let context = ValidationContext::new(ValidationMode::Partial);
        self.validate_with_context(input, &context)
    }

    /// Validate structure only
    fn validate_basic(&self, input: &Self::Input) -> Result<(), ValidationErrors> {
        let context = ValidationContext::new(ValidationMode::Basic);
        self.validate_with_context(input, &context)
    }

    /// Collect all validation errors (non-failing)
    fn collect_errors(&self, input: &Self::Input) -> ValidationErrors {
        self.validate(input).err().unwrap_or_default()
    }
}

/// Helper functions for common validation patterns
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Names must start with a letter or underscore and continue with
    /// letters, digits or underscores
    pub fn validate_identifier(name: &str, context: &ValidationContext) -> ValidationResult<()> {
        if name.is_empty() {
            return Err(context.error("Please enter a value."));
        }

        let mut chars = name.chars();
        let head_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if head_ok && tail_ok {
            Ok(())
        } else {
            Err(ValidationError::with_violation(
                &context.path,
                "This can only use letters, numbers, and underscores (no spaces or symbols).",
                ValidationError::create_violation(
                    "identifier",
                    "letters, digits and underscores, not starting with a digit",
                    name,
                ),
            ))
        }
    }

    /// Parse a date limit; `Ok(None)` for the relative presets
    pub fn parse_date_limit(
        limit: &str,
        context: &ValidationContext,
    ) -> ValidationResult<Option<NaiveDate>> {
        match limit {
            "none" | "yesterday" | "today" | "tomorrow" => Ok(None),
            literal => NaiveDate::parse_from_str(literal, "%Y-%m-%d")
                .ok()
                .or_else(|| {
                    DateTime::parse_from_rfc3339(literal)
                        .ok()
                        .map(|d| d.date_naive())
                })
                .map(Some)
                .ok_or_else(|| {
                    ValidationError::with_violation(
                        &context.path,
                        "Please enter a valid date like '2025-09-11' or select from today, yesterday, or tomorrow.",
                        ValidationError::create_violation(
                            "date_limit",
                            "none, yesterday, today, tomorrow or YYYY-MM-DD",
                            literal,
                        ),
                    )
                }),
        }
    }

    /// Values appearing more than once, in first-repeat order
    pub fn duplicates<'a, I>(values: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut repeated = Vec::new();

        for value in values {
            if !seen.insert(value) && !repeated.contains(&value) {
                repeated.push(value);
            }
        }

        repeated
    }
}
