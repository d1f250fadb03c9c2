//! In-process backend implementing every collaborator port
//!
//! Schemas are registered up front, submissions are kept in a vector and
//! upload targets are synthesized URLs. Used by the CLI's offline mode and
//! by tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ports::{SchemaSource, SubmissionStore, UploadTargetService};
use crate::types::{FormSchema, StoredSubmission, SubmissionData};

const DEFAULT_UPLOAD_BASE_URL: &str = "memory://uploads";

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| Error::internal("in-memory backend lock poisoned"))
}

/// Backend holding schemas and submissions in memory
#[derive(Debug)]
pub struct MemoryBackend {
    schemas: Mutex<HashMap<String, FormSchema>>,
    submissions: Mutex<Vec<StoredSubmission>>,
    insert_calls: AtomicUsize,
    upload_base_url: String,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            schemas: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            insert_calls: AtomicUsize::new(0),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
        }
    }

    /// Prefix of the synthesized upload URLs
    pub fn with_upload_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.upload_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Register a schema at construction time
    pub fn with_schema(mut self, form_type: impl Into<String>, schema: FormSchema) -> Self {
        if let Ok(schemas) = self.schemas.get_mut() {
            schemas.insert(form_type.into(), schema);
        }
        self
    }

    /// Snapshot of the stored submissions, oldest first
    pub fn submissions(&self) -> Result<Vec<StoredSubmission>> {
        Ok(lock(&self.submissions)?.clone())
    }

    /// Number of `insert_submission` calls received
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaSource for MemoryBackend {
    async fn fetch_schema(&self, form_type: &str) -> Result<FormSchema> {
        lock(&self.schemas)?
            .get(form_type)
            .cloned()
            .ok_or_else(|| Error::SchemaNotFound {
                form_type: form_type.to_string(),
            })
    }
}

#[async_trait]
impl SubmissionStore for MemoryBackend {
    async fn insert_submission(&self, form_type: &str, data: &SubmissionData) -> Result<String> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let id = Uuid::new_v4().to_string();
        lock(&self.submissions)?.push(StoredSubmission {
            id: id.clone(),
            form_type: form_type.to_string(),
            form_data: data.clone(),
        });

        debug!(submission_id = %id, form_type, "Stored submission in memory");
        Ok(id)
    }
}

#[async_trait]
impl UploadTargetService for MemoryBackend {
    async fn create_upload_target(&self, path: &str) -> Result<String> {
        Ok(format!(
            "{}/{}?token={}",
            self.upload_base_url,
            path,
            Uuid::new_v4().simple()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> FormSchema {
        FormSchema::from_value(json!({
            "title": "Feedback",
            "fields": [{"type": "textarea", "name": "comment", "label": "Comment"}],
            "order": ["comment"]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_registered_and_missing_schema() {
        let backend = MemoryBackend::new().with_schema("feedback", schema());

        assert_eq!(backend.fetch_schema("feedback").await.unwrap().title, "Feedback");
        assert!(matches!(
            backend.fetch_schema("survey").await,
            Err(Error::SchemaNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_records_submission() {
        let backend = MemoryBackend::new();
        let data = json!({"comment": "Great"}).as_object().cloned().unwrap();

        let id = backend.insert_submission("feedback", &data).await.unwrap();
        let stored = backend.submissions().unwrap();

        assert_eq!(backend.insert_calls(), 1);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].form_data["comment"], "Great");
    }

    #[tokio::test]
    async fn test_upload_target_embeds_path() {
        let backend = MemoryBackend::new().with_upload_base_url("https://files.test/");
        let url = backend
            .create_upload_target("form-submissions/1/cv/a.pdf")
            .await
            .unwrap();
        assert!(url.starts_with("https://files.test/form-submissions/1/cv/a.pdf?token="));
    }
}
