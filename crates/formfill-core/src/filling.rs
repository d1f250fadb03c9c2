//! Submission orchestrator
//!
//! [`FormFillingService::fill_form`] drives one submission through
//! fetch, validate, persist and upload-target derivation. Every failure,
//! including a panic inside a collaborator, is folded into a
//! [`SubmissionOutcome`]; nothing escapes to the caller.
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use futures::future::join_all;
use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::dates::{Clock, SystemClock};
use crate::error::Error;
use crate::ports::{upload_path, SchemaSource, SubmissionStore, UploadTargetService};
use crate::types::{FileDescriptor, FormSchema, SubmissionData, SubmissionOutcome, UploadTargets};
use crate::validation::{SubmissionValidator, ValidationReport};

/// Message returned when a submission fails for an unexpected reason
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "Failed to submit form.";

/// Pipeline stage, reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Validating,
    Persisting,
    DerivingUploads,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Validating => "validating",
            Stage::Persisting => "persisting",
            Stage::DerivingUploads => "deriving_uploads",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why the pipeline stopped early
enum Halt {
    Rejected(ValidationReport),
    Fault(Stage, Error),
}

/// Validates and stores form submissions
#[derive(Clone)]
pub struct FormFillingService {
    schemas: Arc<dyn SchemaSource>,
    store: Arc<dyn SubmissionStore>,
    uploads: Arc<dyn UploadTargetService>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for FormFillingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormFillingService")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl FormFillingService {
    /// Create a service over three collaborators, reading "today" from the
    /// system clock
    pub fn new(
        schemas: Arc<dyn SchemaSource>,
        store: Arc<dyn SubmissionStore>,
        uploads: Arc<dyn UploadTargetService>,
    ) -> Self {
        Self {
            schemas,
            store,
            uploads,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a service over one backend that implements every port
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SchemaSource + SubmissionStore + UploadTargetService + 'static,
    {
        Self::new(backend.clone(), backend.clone(), backend)
    }

    /// Replace the clock used to resolve relative date limits
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch the schema of `form_type`, validate `data` against it, persist
    /// it and hand back upload URLs for its file fields.
    #[instrument(skip(self, data), fields(fields = data.len()))]
    pub async fn fill_form(&self, form_type: &str, data: &SubmissionData) -> SubmissionOutcome {
        let pipeline = AssertUnwindSafe(self.run(form_type, data)).catch_unwind();

        match pipeline.await {
            Ok(Ok(presigned_urls)) => {
                info!(stage = %Stage::Done, uploads = presigned_urls.len(), "Submission accepted");
                SubmissionOutcome::Accepted { presigned_urls }
            }
            Ok(Err(Halt::Rejected(report))) => {
                info!(
                    stage = %Stage::Failed,
                    failed_fields = report.failed_fields(),
                    "Submission rejected"
                );
                SubmissionOutcome::Rejected {
                    errors: report.into_errors(),
                }
            }
            Ok(Err(Halt::Fault(stage, err))) => {
                error!(stage = %Stage::Failed, during = %stage, error = %err, "Submission failed");
                SubmissionOutcome::form_error(err.public_message())
            }
            Err(_) => {
                error!(stage = %Stage::Failed, "Submission pipeline panicked");
                SubmissionOutcome::form_error(UNEXPECTED_FAILURE_MESSAGE)
            }
        }
    }

    async fn run(&self, form_type: &str, data: &SubmissionData) -> Result<UploadTargets, Halt> {
        debug!(stage = %Stage::Fetching);
        let schema = self
            .schemas
            .fetch_schema(form_type)
            .await
            .map_err(|err| Halt::Fault(Stage::Fetching, err))?;

        debug!(stage = %Stage::Validating, fields = schema.fields.len());
        let report = SubmissionValidator::new(&schema, self.clock.as_ref()).validate(data);
        if !report.is_valid() {
            return Err(Halt::Rejected(report));
        }

        debug!(stage = %Stage::Persisting);
        let submission_id = self
            .store
            .insert_submission(form_type, data)
            .await
            .map_err(|err| match err {
                Error::Persistence { .. } => Halt::Fault(Stage::Persisting, err),
                other => Halt::Fault(
                    Stage::Persisting,
                    Error::Persistence {
                        message: other.to_string(),
                        source: Some(anyhow::Error::new(other)),
                    },
                ),
            })?;

        debug!(stage = %Stage::DerivingUploads, %submission_id);
        Ok(self.derive_upload_targets(&submission_id, &schema, data).await)
    }

    /// Request one upload URL per answered file field, concurrently.
    /// Fields whose request fails are left out.
    async fn derive_upload_targets(
        &self,
        submission_id: &str,
        schema: &FormSchema,
        data: &SubmissionData,
    ) -> UploadTargets {
        let requests = schema
            .file_fields()
            .filter_map(|field| {
                let file = data.get(field.name()).and_then(FileDescriptor::from_value)?;
                Some((field.name(), upload_path(submission_id, field.name(), &file.name)))
            })
            .map(|(field_name, path)| async move {
                match self.uploads.create_upload_target(&path).await {
                    Ok(url) => Some((field_name.to_string(), url)),
                    Err(err) => {
                        warn!(field = field_name, %path, error = %err, "Could not create upload target");
                        None
                    }
                }
            });

        join_all(requests).await.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_form_type() {
        let service = FormFillingService::from_backend(Arc::new(MemoryBackend::new()));
        let outcome = service.fill_form("missing", &SubmissionData::new()).await;

        assert_eq!(outcome, SubmissionOutcome::form_error("Form not found"));
    }

    #[tokio::test]
    async fn test_accepts_and_persists() {
        let schema = FormSchema::from_value(json!({
            "title": "Newsletter",
            "fields": [{"type": "text", "name": "email", "label": "Email",
                        "required": true, "validationType": "email"}],
            "order": ["email"]
        }))
        .unwrap();
        let backend = Arc::new(MemoryBackend::new().with_schema("newsletter", schema));
        let service = FormFillingService::from_backend(backend.clone());

        let data = json!({"email": "ada@example.org"}).as_object().cloned().unwrap();
        let outcome = service.fill_form("newsletter", &data).await;

        assert!(outcome.is_valid());
        assert!(outcome.presigned_urls().unwrap().is_empty());
        assert_eq!(backend.submissions().unwrap().len(), 1);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::DerivingUploads.to_string(), "deriving_uploads");
    }
}
