//! Formfill Core - Schema-driven validation and submission of form data
//!
//! This crate validates raw answers against a declarative form schema,
//! persists accepted submissions and hands back upload URLs for file fields.
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Core Types**: Form schema, field kinds, submissions and outcomes
//! - **Validation**: One validator per field kind, aggregated per submission
//! - **Orchestration**: `FormFillingService::fill_form`, over pluggable ports
//! - **Backends**: In-memory and REST implementations of the ports
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use formfill_core::{FormFillingService, MemoryBackend, SubmissionData};
//!
//! async fn example() {
//!     let service = FormFillingService::from_backend(Arc::new(MemoryBackend::new()));
//!     let outcome = service.fill_form("contact", &SubmissionData::new()).await;
//!     println!("{}", serde_json::to_string(&outcome).unwrap_or_default());
//! }
//! ```

pub mod dates;
pub mod error;
pub mod filling;
pub mod http;
pub mod memory;
pub mod ports;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use dates::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use filling::{FormFillingService, Stage};
pub use memory::MemoryBackend;
pub use ports::{upload_path, SchemaSource, SubmissionStore, UploadTargetService};
pub use types::{
    // Schema
    FormSchema, PostSubmitConfig, FieldCommon, FieldDefinition, FieldKind,

    // Field kinds
    TextField, TextValidationType, TextAreaField, NumberField, CheckboxField, CheckboxUi,
    DateField, DateRangeField, DateLimit, DayGap, FileField, FileCategory, SelectField,

    // Submissions
    SubmissionData, FileDescriptor, StoredSubmission,

    // Outcomes
    SubmissionOutcome, FieldErrors, UploadTargets, FORM_ERROR_KEY,
};
pub use validation::{validate_submission, SubmissionValidator, ValidationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_form_error_key() {
        let outcome = SubmissionOutcome::form_error("Form not found");
        assert!(outcome.errors().unwrap().contains_key(FORM_ERROR_KEY));
    }
}
