//! Formfill Schemas - JSON Schema definition and authoring validators
//!
//! Form schemas are authored by people and consumed by the submission
//! engine in `formfill-core`. This crate checks a schema document before it
//! is stored, reporting every problem with a JSON path and a message that
//! can be shown to the author.
//!
//! ## Quick Start
//!
//! ```rust
//! use formfill_schemas::{create_form_schema_validator, SchemaValidator};
//! use serde_json::json;
//!
//! let validator = create_form_schema_validator().unwrap();
//!
//! let schema = json!({
//!     "title": "Event signup",
//!     "afterSubmitConfig": {"title": "See you there", "text": "Check your inbox."},
//!     "fields": [
//!         {"type": "text", "name": "name", "label": "Your name", "required": true},
//!         {"type": "date", "name": "day", "label": "Day", "minDate": "today"}
//!     ],
//!     "order": ["name", "day"]
//! });
//!
//! match validator.validate(&schema) {
//!     Ok(_) => println!("Valid form schema!"),
//!     Err(e) => println!("Validation error: {}", e),
//! }
//! ```
//!
//! ## Validation Modes
//!
//! - **Basic**: JSON Schema validation only
//! - **Partial**: Schema + per-field rules (identifiers, labels, bounds, options)
//! - **Strict**: Schema + all rules, including the field order and date bounds
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

pub mod loader;
pub mod validation;

// Re-export commonly used types for convenience
pub use loader::{load_document, parse_document, DocumentFormat, LoaderError, LoaderResult};
pub use validation::{
    ValidationError, ValidationErrors, ValidationResult, ValidationMode, Violation,
    SchemaValidator, ValidationContext, ValidationHelpers,
    FormSchemaValidator, create_form_schema_validator, FORM_SCHEMA_JSON_SCHEMA,
    ValidationConfig, validate_form_schemas_batch,
};
