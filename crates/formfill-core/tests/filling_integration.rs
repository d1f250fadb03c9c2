//! End-to-end tests of the submission orchestrator with stand-in collaborators


use serde_json::json;
use std::sync::Arc;

use formfill_core::{
    FormFillingService, MemoryBackend, SubmissionOutcome, FORM_ERROR_KEY,
};
use test_support::*;

fn service(
    schemas: Arc<dyn formfill_core::SchemaSource>,
    store: Arc<dyn formfill_core::SubmissionStore>,
    uploads: Arc<dyn formfill_core::UploadTargetService>,
) -> FormFillingService {
    FormFillingService::new(schemas, store, uploads).with_clock(Arc::new(fixed_clock()))
}

#[tokio::test]
async fn test_valid_submission_returns_upload_url_per_file() {
    let store = Arc::new(CountingStore::default());
    let uploads = Arc::new(SigningUploads::default());
    let service = service(
        Arc::new(StaticSchemas(job_application_schema())),
        store.clone(),
        uploads.clone(),
    );

    let outcome = service.fill_form("job-application", &valid_application()).await;

    let urls = outcome.presigned_urls().expect("accepted");
    assert_eq!(urls.len(), 1);
    assert_eq!(
        urls["resume"],
        "https://uploads.test/form-submissions/sub-1/resume/ada-cv.pdf"
    );
    assert_eq!(store.calls(), 1);
    assert_eq!(uploads.requests(), 1);
}

#[tokio::test]
async fn test_upload_failure_is_not_fatal() {
    let mut data = valid_application();
    data.insert(
        "portfolio".to_string(),
        json!({"name": "shots.png", "size": 4096, "type": "image/png"}),
    );

    let service = service(
        Arc::new(StaticSchemas(job_application_schema())),
        Arc::new(CountingStore::default()),
        Arc::new(SigningUploads::failing_for(&["resume"])),
    );

    let outcome = service.fill_form("job-application", &data).await;

    let urls = outcome.presigned_urls().expect("accepted");
    assert!(!urls.contains_key("resume"));
    assert!(urls.contains_key("portfolio"));
}

#[tokio::test]
async fn test_every_upload_failing_yields_empty_map() {
    let service = service(
        Arc::new(StaticSchemas(job_application_schema())),
        Arc::new(CountingStore::default()),
        Arc::new(SigningUploads::failing_for(&["resume", "portfolio"])),
    );

    let outcome = service.fill_form("job-application", &valid_application()).await;

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"valid": true, "presignedUrls": {}})
    );
}

#[tokio::test]
async fn test_schema_fetch_failure_skips_persistence() {
    let store = Arc::new(CountingStore::default());
    let service = service(
        Arc::new(UnreachableSchemas),
        store.clone(),
        Arc::new(SigningUploads::default()),
    );

    let outcome = service.fill_form("job-application", &valid_application()).await;

    let errors = outcome.errors().expect("rejected");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[FORM_ERROR_KEY], vec!["Unable to load form."]);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_unknown_field_kind_is_invalid_schema() {
    let store = Arc::new(CountingStore::default());
    let uploads = Arc::new(SigningUploads::default());
    let service = service(Arc::new(MalformedSchemas), store.clone(), uploads.clone());

    let outcome = service.fill_form("job-application", &valid_application()).await;

    assert_eq!(
        outcome,
        SubmissionOutcome::form_error("Invalid form schema retrieved.")
    );
    assert_eq!(store.calls(), 0);
    assert_eq!(uploads.requests(), 0);
}

#[tokio::test]
async fn test_invalid_submission_reports_all_fields_without_persisting() {
    let store = Arc::new(CountingStore::default());
    let uploads = Arc::new(SigningUploads::default());
    let service = service(
        Arc::new(StaticSchemas(job_application_schema())),
        store.clone(),
        uploads.clone(),
    );

    let mut data = valid_application();
    data.insert("email".to_string(), json!("ada at example"));
    data.insert("role".to_string(), json!("design"));
    data.insert("consent".to_string(), json!(false));
    data.remove("resume");

    let outcome = service.fill_form("job-application", &data).await;
    let errors = outcome.errors().expect("rejected");

    let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["consent", "email", "resume", "role"]);
    assert_eq!(errors["resume"], vec!["This field is required."]);
    assert_eq!(errors["consent"], vec!["This field is required."]);
    assert_eq!(store.calls(), 0);
    assert_eq!(uploads.requests(), 0);
}

#[tokio::test]
async fn test_persistence_failure_is_generic() {
    let service = service(
        Arc::new(StaticSchemas(job_application_schema())),
        Arc::new(CountingStore::failing()),
        Arc::new(SigningUploads::default()),
    );

    let outcome = service.fill_form("job-application", &valid_application()).await;

    assert_eq!(outcome, SubmissionOutcome::form_error("Unable to submit form."));
}

#[tokio::test]
async fn test_panicking_collaborator_is_contained() {
    let service = service(
        Arc::new(StaticSchemas(job_application_schema())),
        Arc::new(PanickingStore),
        Arc::new(SigningUploads::default()),
    );

    let outcome = service.fill_form("job-application", &valid_application()).await;

    assert_eq!(outcome, SubmissionOutcome::form_error("Failed to submit form."));
}

#[tokio::test]
async fn test_memory_backend_round_trip() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_upload_base_url("https://files.test")
            .with_schema("job-application", job_application_schema()),
    );
    let service =
        FormFillingService::from_backend(backend.clone()).with_clock(Arc::new(fixed_clock()));

    let outcome = service.fill_form("job-application", &valid_application()).await;
    assert!(outcome.is_valid());

    let stored = backend.submissions().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].form_type, "job-application");

    let expected_prefix = format!(
        "https://files.test/form-submissions/{}/resume/ada-cv.pdf?token=",
        stored[0].id
    );
    assert!(outcome.presigned_urls().unwrap()["resume"].starts_with(&expected_prefix));

    let missing = service.fill_form("survey", &valid_application()).await;
    assert_eq!(missing, SubmissionOutcome::form_error("Form not found"));
    assert_eq!(backend.insert_calls(), 1);
}
