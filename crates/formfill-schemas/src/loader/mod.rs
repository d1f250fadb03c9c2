//! Loading form schema documents from disk
//!
//! Documents are read as YAML or JSON, chosen by file extension, and
//! normalized to `serde_json::Value` so the validators see one format.
//!
//! # Example Usage
//!
//! ```no_run
//! use formfill_schemas::loader::load_document;
//! use std::path::Path;
//!
//! let schema = load_document(Path::new("forms/contact.yaml"))?;
//! println!("{}", serde_json::to_string_pretty(&schema)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use parser::{DocumentFormat, DocumentParser};

use serde_json::Value;
use std::path::Path;

/// Read and parse one schema document
pub fn load_document(path: &Path) -> LoaderResult<Value> {
    DocumentParser::new().parse_file(path)
}

/// Parse document text whose format is already known
pub fn parse_document(content: &str, format: DocumentFormat, path: &Path) -> LoaderResult<Value> {
    DocumentParser::new().parse_content(content, format, path)
}
