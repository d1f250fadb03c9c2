//! Validation module for form schema documents
//!
//! Schemas are checked in layers, selected by [`ValidationMode`]:
//!
//! - **Basic**: JSON Schema structure only
//! - **Partial**: Structure + per-field authoring rules
//! - **Strict**: Structure + per-field + cross-field rules (field order,
//!   date bounds, day gaps)
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod form_schema;

// Re-export commonly used types
pub use base::{SchemaValidator, ValidationContext, ValidationHelpers, ValidationMode};
pub use error::{ValidationError, ValidationErrors, ValidationResult, Violation};
pub use form_schema::{FormSchemaValidator, FORM_SCHEMA_JSON_SCHEMA};

/// Convenience function to create a form schema validator
///
/// # Examples
///
/// ```rust
/// use formfill_schemas::validation::{create_form_schema_validator, SchemaValidator};
/// use serde_json::json;
///
/// let validator = create_form_schema_validator().unwrap();
/// let schema = json!({
///     "title": "Contact",
///     "afterSubmitConfig": {"title": "Thanks", "text": "We will reply soon."},
///     "fields": [{"type": "text", "name": "email", "label": "Email"}],
///     "order": ["email"]
/// });
///
/// assert!(validator.validate(&schema).is_ok());
/// ```
pub fn create_form_schema_validator() -> ValidationResult<FormSchemaValidator> {
    FormSchemaValidator::new()
}

/// Validation configuration for batch operations
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Validation mode to use
    pub mode: ValidationMode,
    /// Whether to stop at the first failing document
    pub fail_fast: bool,
    /// Maximum number of errors to collect (0 = unlimited)
    pub max_errors: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::with_mode(ValidationMode::Strict)
    }
}

impl ValidationConfig {
    pub fn with_mode(mode: ValidationMode) -> Self {
        Self {
            mode,
            fail_fast: false,
            max_errors: 0,
        }
    }

    pub fn strict() -> Self {
        Self::with_mode(ValidationMode::Strict)
    }

    pub fn partial() -> Self {
        Self::with_mode(ValidationMode::Partial)
    }

    pub fn basic() -> Self {
        Self::with_mode(ValidationMode::Basic)
    }

    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of errors to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// Validate several form schema documents; paths are prefixed with the
/// document index (`$[1].fields[0].name`)
pub fn validate_form_schemas_batch(
    schemas: &[serde_json::Value],
    config: &ValidationConfig,
) -> Result<(), ValidationErrors> {
    let validator = create_form_schema_validator()?;

    let mut errors = ValidationErrors::new();
    let context = ValidationContext::new(config.mode);

    for (i, schema) in schemas.iter().enumerate() {
        if let Err(found) = validator.validate_with_context(schema, &context.child_index(i)) {
            errors.merge(found);

            if config.fail_fast {
                break;
            }

            if config.max_errors > 0 && errors.len() >= config.max_errors {
                errors.truncate(config.max_errors);
                break;
            }
        }
    }

    errors.into_result()
}
