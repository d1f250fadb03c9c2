//! Interfaces to the external collaborators of the orchestrator
//!
//! Implementations live in [`crate::memory`] (in-process) and
//! [`crate::http`] (REST backend). Tests plug in their own stand-ins.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FormSchema, SubmissionData};

/// Folder under which every upload target is created
pub const UPLOAD_ROOT: &str = "form-submissions";

/// Resolves the schema registered for a form type
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch the schema, failing with [`crate::Error::SchemaNotFound`] when
    /// nothing is registered under `form_type`
    async fn fetch_schema(&self, form_type: &str) -> Result<FormSchema>;
}

/// Persists accepted submissions
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Store one record and return its generated id
    async fn insert_submission(&self, form_type: &str, data: &SubmissionData) -> Result<String>;
}

/// Issues short-lived upload URLs in object storage
#[async_trait]
pub trait UploadTargetService: Send + Sync {
    async fn create_upload_target(&self, path: &str) -> Result<String>;
}

/// Storage path of one uploaded file
pub fn upload_path(submission_id: &str, field_name: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        UPLOAD_ROOT, submission_id, field_name, file_name
    )
}
