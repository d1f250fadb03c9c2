//! Error types for the Formfill core library
//!
//! This module defines the error handling system for Formfill, using
//! thiserror for ergonomic error definitions and anyhow for opaque sources
//! coming from collaborators (stores, HTTP transport).
//!
//! Per-field validation failures are *not* errors in this sense: they are
//! plain messages collected into a [`crate::ValidationReport`]. The variants
//! below describe infrastructure and schema-integrity faults, which the
//! orchestrator normalizes into a single `_form` message.

use thiserror::Error;

/// Main error type for Formfill operations
#[derive(Error, Debug)]
pub enum Error {
    /// No schema is registered for the requested form type
    #[error("Form not found")]
    SchemaNotFound { form_type: String },

    /// The schema source could not be reached or answered with an error
    #[error("Unable to load form: {message}")]
    SchemaSource {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The schema is malformed (unknown field kind, bad constraint values)
    #[error("Invalid form schema retrieved: {message}")]
    InvalidSchema { message: String },

    /// The submission store rejected or failed to persist a record
    #[error("Unable to submit form: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Object storage could not issue an upload target
    #[error("Could not create upload target for '{path}': {message}")]
    UploadTarget { path: String, message: String },

    /// HTTP transport errors talking to a remote backend
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid schema error
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Create a configuration error without a source
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error without a source
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Whether the error means the schema itself cannot be trusted
    pub fn is_schema_integrity(&self) -> bool {
        matches!(self, Self::SchemaNotFound { .. } | Self::InvalidSchema { .. })
    }

    /// Message safe to show end users under the `_form` key.
    ///
    /// Details (status codes, store messages) stay in logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::SchemaNotFound { .. } => "Form not found",
            Self::InvalidSchema { .. } => "Invalid form schema retrieved.",
            Self::SchemaSource { .. } => "Unable to load form.",
            Self::Persistence { .. } => "Unable to submit form.",
            _ => "Failed to submit form.",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            message: source.to_string(),
            source,
        }
    }
}
