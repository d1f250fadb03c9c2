// Tests for output formatting
//
// Human renderings are checked directly; machine formats must keep the
// wire shapes of the core types.

use super::*;
use formfill_core::types::UploadTargets;
use formfill_schemas::Violation;
use std::cell::RefCell;
use std::rc::Rc;

/// Writer whose contents stay readable after the OutputWriter takes it
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn sample_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(ValidationError::new("$.title", "The form title is required."));
    errors.add(ValidationError::with_violation(
        "$.fields[2].options",
        "All dropdown options must be different from each other.",
        Violation {
            rule: "unique_options".to_string(),
            expected: "distinct options".to_string(),
            actual: "Red".to_string(),
        },
    ));
    errors
}

fn rejected_report() -> ValidationReport {
    let mut report = ValidationReport::new();
    report.record("email", "That doesn't look like a valid email.");
    report.record("consent", "This field is required.");
    report
}

#[test]
fn test_validation_errors_human() {
    let formatted = format_validation_errors_human(&sample_errors());

    assert!(formatted.starts_with("✗ 2 problem(s) found"));
    assert!(formatted.contains("1. 📍 Path: $.title"));
    assert!(formatted.contains("💬 The form title is required."));
    assert!(formatted.contains("• Rule: unique_options"));
    assert!(formatted.contains("Actual: Red"));
}

#[test]
fn test_validation_errors_json() {
    let formatted = OutputFormat::Json
        .format_validation_errors(&sample_errors())
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();

    assert_eq!(value["errors"][1]["path"], "$.fields[2].options");
    assert_eq!(value["errors"][1]["schema_violations"][0]["rule"], "unique_options");
}

#[test]
fn test_report_human() {
    assert_eq!(format_report_human(&ValidationReport::new()), "✓ Submission is valid\n");

    let formatted = format_report_human(&rejected_report());
    assert!(formatted.starts_with("✗ 2 field(s) failed validation"));
    // Fields are listed in name order
    let consent = formatted.find("• consent: This field is required.").unwrap();
    let email = formatted.find("• email: That doesn't look like a valid email.").unwrap();
    assert!(consent < email);
}

#[test]
fn test_outcome_human() {
    let mut urls = UploadTargets::new();
    urls.insert("resume".to_string(), "https://uploads.test/resume".to_string());
    let accepted = SubmissionOutcome::Accepted { presigned_urls: urls };

    let formatted = format_outcome_human(&accepted);
    assert!(formatted.starts_with("✓ Submission accepted"));
    assert!(formatted.contains("resume: https://uploads.test/resume"));

    let failed = SubmissionOutcome::form_error("Form not found");
    assert_eq!(format_outcome_human(&failed), "✗ Form not found\n");

    let rejected = SubmissionOutcome::Rejected {
        errors: rejected_report().into_errors(),
    };
    assert!(format_outcome_human(&rejected).contains("2 field(s) with errors"));
}

#[test]
fn test_outcome_keeps_wire_shape() {
    let outcome = SubmissionOutcome::form_error("Unable to submit form.");
    let formatted = OutputFormat::Json.format_outcome(&outcome).unwrap();

    assert_eq!(
        formatted,
        r#"{"valid":false,"errors":{"_form":["Unable to submit form."]}}"#
    );

    let yaml = OutputFormat::Yaml.format_outcome(&outcome).unwrap();
    assert!(yaml.contains("valid: false"));
}

#[test]
fn test_writer_redacts_data() {
    let buffer = SharedBuffer::default();
    let mut writer = OutputWriter::with_writer(OutputFormat::Json, Box::new(buffer.clone()));

    writer
        .data(&serde_json::json!({"service_key": "sk-live-123456", "bucket": "user-uploads"}))
        .unwrap();

    let written = buffer.contents();
    assert!(written.contains("\"service_key\":\"***\""));
    assert!(!written.contains("sk-live-123456"));
}

#[test]
fn test_messages_only_in_human_mode() {
    let buffer = SharedBuffer::default();
    let mut writer = OutputWriter::with_writer(OutputFormat::Json, Box::new(buffer.clone()));
    writer.info("Checking schema").unwrap();
    writer.success("✓ Form schema is valid").unwrap();
    assert!(buffer.contents().is_empty());

    let buffer = SharedBuffer::default();
    let mut writer = OutputWriter::with_writer(OutputFormat::Human, Box::new(buffer.clone()));
    writer.info("Checking schema").unwrap();
    writer.warning("Config already exists").unwrap();
    assert_eq!(
        buffer.contents(),
        "INFO: Checking schema\nWARNING: Config already exists\n"
    );
}
