//! Shared utilities for command handlers

use crate::error::{Error, Result};
use formfill_core::{FormSchema, SubmissionData};
use formfill_schemas::load_document;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Read a JSON or YAML document
pub fn read_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let document = load_document(path)?;
    debug!(path = %path.display(), "Document loaded");
    Ok(document)
}

/// Read a submission; the document must be an object keyed by field name
pub fn read_submission(path: &Path) -> Result<SubmissionData> {
    match read_document(path)? {
        Value::Object(data) => Ok(data),
        _ => Err(Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "an object of answers keyed by field name".to_string(),
        }),
    }
}

/// Turn a checked schema document into the engine's schema type
pub fn into_form_schema(document: Value) -> Result<FormSchema> {
    Ok(FormSchema::from_value(document)?)
}
