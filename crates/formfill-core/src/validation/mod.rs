//! Validation of submitted answers against a form schema
//!
//! The validator is organized into focused modules:
//! - `types`: The field validator capability and the aggregated report
//! - `field_validators`: Text, textarea, number, checkbox, file and select rules
//! - `date_validators`: Date and date-range rules
//! - `dispatch`: Selection of the validator for a field definition
//! - `core`: Whole-submission validation with the required-field rule
//! - `tests`: Test suite
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

pub mod types;
pub mod core;
pub mod dispatch;
pub mod field_validators;
pub mod date_validators;

// Re-export public API
pub use types::{FieldResult, FieldValidator, ValidationReport, REQUIRED_MESSAGE};
pub use core::{validate_submission, SubmissionValidator};
pub use dispatch::validator_for;
