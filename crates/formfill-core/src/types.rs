//! Core types and data structures for the Formfill engine
//!
//! This module defines the declarative form schema (fields, constraints and
//! metadata) exactly as it is authored and stored, the raw submission shape,
//! and the outcome handed back to callers of the orchestrator.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::dates::parse_calendar_date;
use crate::error::{Error, Result};

/// Error-map key used for failures that concern the whole form
pub const FORM_ERROR_KEY: &str = "_form";

/// Raw user answers keyed by field name
pub type SubmissionData = Map<String, Value>;

/// Field name to ordered list of human-readable messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// File-field name to short-lived upload URL
pub type UploadTargets = BTreeMap<String, String>;

/// Complete declarative description of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    /// Form title
    pub title: String,

    /// Optional introduction shown above the fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Label of the submit button
    #[serde(default = "default_submit_label")]
    pub submit_button_label: String,

    /// What the user sees once the form is accepted
    #[serde(default)]
    pub after_submit_config: PostSubmitConfig,

    /// Field definitions
    pub fields: Vec<FieldDefinition>,

    /// Display order of the fields, by name
    #[serde(default)]
    pub order: Vec<String>,
}

fn default_submit_label() -> String {
    "Submit".to_string()
}

impl FormSchema {
    /// Build a schema from an untyped document, e.g. a stored JSON column.
    ///
    /// Unknown field kinds and malformed constraints are reported as
    /// [`Error::InvalidSchema`].
    pub fn from_value(value: Value) -> Result<Self> {
        let schema: FormSchema =
            serde_json::from_value(value).map_err(|e| Error::invalid_schema(e.to_string()))?;

        if schema.fields.is_empty() {
            return Err(Error::invalid_schema("schema declares no fields"));
        }

        Ok(schema)
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Fields of kind `file`
    pub fn file_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.kind() == FieldKind::File)
    }
}

/// Message shown after a successful submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSubmitConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub allow_resubmit: bool,
}

/// Attributes shared by every field kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCommon {
    /// Stable identifier-safe name, unique within a schema
    pub name: String,

    /// Question or label shown to the user
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldCommon {
    /// Create the common attributes for a field
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A single question of a form, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldDefinition {
    #[serde(rename = "text")]
    Text(TextField),
    #[serde(rename = "textarea")]
    TextArea(TextAreaField),
    #[serde(rename = "number")]
    Number(NumberField),
    #[serde(rename = "checkbox")]
    Checkbox(CheckboxField),
    #[serde(rename = "date")]
    Date(DateField),
    #[serde(rename = "dateRange")]
    DateRange(DateRangeField),
    #[serde(rename = "file")]
    File(FileField),
    #[serde(rename = "select")]
    Select(SelectField),
}

/// Field kind tag without its constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    TextArea,
    Number,
    Checkbox,
    Date,
    DateRange,
    File,
    Select,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Number => "number",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Date => "date",
            FieldKind::DateRange => "dateRange",
            FieldKind::File => "file",
            FieldKind::Select => "select",
        };
        f.write_str(tag)
    }
}

impl FieldDefinition {
    /// Attributes shared by all kinds
    pub fn common(&self) -> &FieldCommon {
        match self {
            FieldDefinition::Text(f) => &f.common,
            FieldDefinition::TextArea(f) => &f.common,
            FieldDefinition::Number(f) => &f.common,
            FieldDefinition::Checkbox(f) => &f.common,
            FieldDefinition::Date(f) => &f.common,
            FieldDefinition::DateRange(f) => &f.common,
            FieldDefinition::File(f) => &f.common,
            FieldDefinition::Select(f) => &f.common,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn is_required(&self) -> bool {
        self.common().required
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldDefinition::Text(_) => FieldKind::Text,
            FieldDefinition::TextArea(_) => FieldKind::TextArea,
            FieldDefinition::Number(_) => FieldKind::Number,
            FieldDefinition::Checkbox(_) => FieldKind::Checkbox,
            FieldDefinition::Date(_) => FieldKind::Date,
            FieldDefinition::DateRange(_) => FieldKind::DateRange,
            FieldDefinition::File(_) => FieldKind::File,
            FieldDefinition::Select(_) => FieldKind::Select,
        }
    }
}

/// Single-line text input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    #[serde(flatten)]
    pub common: FieldCommon,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Format or comparison rule applied after the length checks
    #[serde(default)]
    pub validation_type: TextValidationType,

    /// Operand of the comparison modes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_value: Option<String>,
}

/// Format and comparison modes of a text field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextValidationType {
    #[default]
    None,
    Email,
    Phone,
    Url,
    Pincode,
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

impl TextValidationType {
    /// Whether the mode compares against `validationValue`
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TextValidationType::Equals
                | TextValidationType::Contains
                | TextValidationType::StartsWith
                | TextValidationType::EndsWith
        )
    }
}

/// Multi-line text input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAreaField {
    #[serde(flatten)]
    pub common: FieldCommon,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// Numeric input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberField {
    #[serde(flatten)]
    pub common: FieldCommon,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Input increment, a rendering hint only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// Checkbox or toggle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxField {
    #[serde(flatten)]
    pub common: FieldCommon,

    #[serde(default)]
    pub default_checked: bool,

    #[serde(default)]
    pub ui_type: CheckboxUi,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckboxUi {
    #[default]
    Checkbox,
    Toggle,
}

/// Bound of a date field, either relative to the current day or absolute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateLimit {
    #[default]
    None,
    Yesterday,
    Today,
    Tomorrow,
    On(NaiveDate),
}

impl FromStr for DateLimit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(DateLimit::None),
            "yesterday" => Ok(DateLimit::Yesterday),
            "today" => Ok(DateLimit::Today),
            "tomorrow" => Ok(DateLimit::Tomorrow),
            other => parse_calendar_date(other).map(DateLimit::On).ok_or_else(|| {
                format!(
                    "invalid date limit '{}': expected none, yesterday, today, tomorrow or a date like 2025-09-11",
                    other
                )
            }),
        }
    }
}

impl fmt::Display for DateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateLimit::None => f.write_str("none"),
            DateLimit::Yesterday => f.write_str("yesterday"),
            DateLimit::Today => f.write_str("today"),
            DateLimit::Tomorrow => f.write_str("tomorrow"),
            DateLimit::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for DateLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Single calendar date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateField {
    #[serde(flatten)]
    pub common: FieldCommon,

    #[serde(default)]
    pub min_date: DateLimit,

    #[serde(default)]
    pub max_date: DateLimit,
}

/// Start and end dates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeField {
    #[serde(flatten)]
    pub common: FieldCommon,

    #[serde(default)]
    pub min_date: DateLimit,

    #[serde(default)]
    pub max_date: DateLimit,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_in_days: Option<DayGap>,
}

/// Allowed length of a date range, in whole days
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DayGap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// File upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileField {
    #[serde(flatten)]
    pub common: FieldCommon,

    #[serde(default)]
    pub allowed_file_types: Vec<FileCategory>,

    #[serde(rename = "maxSizeMB", default = "default_max_size_mb")]
    pub max_size_mb: f64,
}

fn default_max_size_mb() -> f64 {
    5.0
}

impl Default for FileField {
    fn default() -> Self {
        Self {
            common: FieldCommon::default(),
            allowed_file_types: Vec::new(),
            max_size_mb: default_max_size_mb(),
        }
    }
}

/// Family of accepted media types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Pdf,
    Doc,
    Excel,
    Csv,
}

impl FileCategory {
    /// Whether a declared media type belongs to this category
    pub fn accepts(self, media_type: &str) -> bool {
        match self {
            FileCategory::Image => media_type.starts_with("image/"),
            FileCategory::Pdf => media_type == "application/pdf",
            FileCategory::Doc => {
                media_type.contains("msword")
                    || media_type.contains("officedocument.wordprocessingml")
            }
            FileCategory::Excel => {
                media_type.contains("excel") || media_type.contains("spreadsheetml")
            }
            FileCategory::Csv => media_type == "text/csv",
        }
    }

    /// Name shown to end users
    pub fn label(self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Pdf => "PDF",
            FileCategory::Doc => "Word document",
            FileCategory::Excel => "Excel file",
            FileCategory::Csv => "CSV file",
        }
    }
}

/// Dropdown with fixed options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectField {
    #[serde(flatten)]
    pub common: FieldCommon,

    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub multiple: bool,
}

impl SelectField {
    pub fn has_option(&self, candidate: &str) -> bool {
        self.options.iter().any(|option| option == candidate)
    }
}

/// Descriptor of a file the user intends to upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,

    /// Size in bytes
    pub size: f64,

    /// Declared media type, e.g. `image/png`
    #[serde(rename = "type", alias = "mimeType", default)]
    pub media_type: String,
}

impl FileDescriptor {
    /// Read a descriptor from a raw submission value.
    ///
    /// Returns `None` unless the value is an object with a non-empty `name`
    /// and a non-negative numeric `size`. A missing or non-string media type
    /// reads as empty.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let name = object.get("name")?.as_str().filter(|n| !n.is_empty())?;
        let size = object.get("size")?.as_f64().filter(|s| *s >= 0.0)?;
        let media_type = object
            .get("type")
            .or_else(|| object.get("mimeType"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        Some(Self {
            name: name.to_string(),
            size,
            media_type: media_type.to_string(),
        })
    }

    /// Size converted to megabytes
    pub fn size_mb(&self) -> f64 {
        self.size / (1024.0 * 1024.0)
    }
}

/// A persisted, accepted submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: String,
    pub form_type: String,
    pub form_data: SubmissionData,
}

/// Result of one `fill_form` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "OutcomeWire", try_from = "OutcomeWire")]
pub enum SubmissionOutcome {
    /// Submission validated and persisted
    Accepted { presigned_urls: UploadTargets },
    /// Submission refused, with per-field (or `_form`) messages
    Rejected { errors: FieldErrors },
}

impl SubmissionOutcome {
    /// An outcome carrying a single form-level message
    pub fn form_error(message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(FORM_ERROR_KEY.to_string(), vec![message.into()]);
        SubmissionOutcome::Rejected { errors }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    /// Error mapping, `None` for accepted submissions
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmissionOutcome::Rejected { errors } => Some(errors),
            SubmissionOutcome::Accepted { .. } => None,
        }
    }

    /// Upload targets, `None` for rejected submissions
    pub fn presigned_urls(&self) -> Option<&UploadTargets> {
        match self {
            SubmissionOutcome::Accepted { presigned_urls } => Some(presigned_urls),
            SubmissionOutcome::Rejected { .. } => None,
        }
    }
}

/// Wire shape: `{valid, presignedUrls}` or `{valid, errors}`
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeWire {
    valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    presigned_urls: Option<UploadTargets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl From<SubmissionOutcome> for OutcomeWire {
    fn from(outcome: SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Accepted { presigned_urls } => OutcomeWire {
                valid: true,
                presigned_urls: Some(presigned_urls),
                errors: None,
            },
            SubmissionOutcome::Rejected { errors } => OutcomeWire {
                valid: false,
                presigned_urls: None,
                errors: Some(errors),
            },
        }
    }
}

impl TryFrom<OutcomeWire> for SubmissionOutcome {
    type Error = String;

    fn try_from(wire: OutcomeWire) -> std::result::Result<Self, Self::Error> {
        match (wire.valid, wire.errors) {
            (true, None) => Ok(SubmissionOutcome::Accepted {
                presigned_urls: wire.presigned_urls.unwrap_or_default(),
            }),
            (true, Some(_)) => Err("a valid outcome cannot carry errors".to_string()),
            (false, Some(errors)) => Ok(SubmissionOutcome::Rejected { errors }),
            (false, None) => Err("an invalid outcome must carry errors".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact_schema() -> Value {
        json!({
            "title": "Contact us",
            "afterSubmitConfig": {"title": "Thanks", "text": "We will reply soon"},
            "fields": [
                {"type": "text", "name": "email", "label": "Email", "required": true,
                 "validationType": "email"},
                {"type": "dateRange", "name": "stay", "label": "Stay",
                 "minDate": "today", "maxDate": "2030-12-31", "gapInDays": {"min": 1, "max": 14}},
                {"type": "file", "name": "resume", "label": "Resume",
                 "allowedFileTypes": ["pdf", "doc"]}
            ],
            "order": ["resume", "email", "stay"]
        })
    }

    #[test]
    fn test_schema_from_value() {
        let schema = FormSchema::from_value(contact_schema()).unwrap();
        assert_eq!(schema.submit_button_label, "Submit");
        assert_eq!(schema.fields.len(), 3);

        match &schema.fields[0] {
            FieldDefinition::Text(text) => {
                assert!(text.common.required);
                assert_eq!(text.validation_type, TextValidationType::Email);
            }
            other => panic!("Expected text field, got {:?}", other),
        }

        match &schema.fields[1] {
            FieldDefinition::DateRange(range) => {
                assert_eq!(range.min_date, DateLimit::Today);
                assert_eq!(
                    range.max_date,
                    DateLimit::On(NaiveDate::from_ymd_opt(2030, 12, 31).unwrap())
                );
                assert_eq!(range.gap_in_days.unwrap().max, Some(14.0));
            }
            other => panic!("Expected dateRange field, got {:?}", other),
        }

        match &schema.fields[2] {
            FieldDefinition::File(file) => assert_eq!(file.max_size_mb, 5.0),
            other => panic!("Expected file field, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_kind_is_invalid_schema() {
        let mut raw = contact_schema();
        raw["fields"][0]["type"] = json!("signature");

        let err = FormSchema::from_value(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema { .. }));
    }

    #[test]
    fn test_malformed_date_limit_is_invalid_schema() {
        let mut raw = contact_schema();
        raw["fields"][1]["minDate"] = json!("next week");

        assert!(matches!(
            FormSchema::from_value(raw),
            Err(Error::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_file_fields() {
        let schema = FormSchema::from_value(contact_schema()).unwrap();
        let names: Vec<&str> = schema.file_fields().map(|f| f.name()).collect();
        assert_eq!(names, vec!["resume"]);
    }

    #[test]
    fn test_date_limit_round_trip_text() {
        assert_eq!("tomorrow".parse::<DateLimit>().unwrap(), DateLimit::Tomorrow);
        let limit: DateLimit = "2025-09-11T08:30:00Z".parse().unwrap();
        assert_eq!(limit.to_string(), "2025-09-11");
    }

    #[test]
    fn test_file_categories() {
        assert!(FileCategory::Image.accepts("image/png"));
        assert!(!FileCategory::Pdf.accepts("application/pdf+x"));
        assert!(FileCategory::Doc.accepts(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
        assert!(FileCategory::Excel.accepts("application/vnd.ms-excel"));
        assert!(FileCategory::Csv.accepts("text/csv"));
    }

    #[test]
    fn test_file_descriptor_from_value() {
        let file = FileDescriptor::from_value(&json!({
            "name": "a.png", "size": 1024, "mimeType": "image/png"
        }))
        .unwrap();
        assert_eq!(file.media_type, "image/png");

        assert!(FileDescriptor::from_value(&json!({"name": "", "size": 1})).is_none());
        assert!(FileDescriptor::from_value(&json!({"name": "a", "size": -1})).is_none());
        assert!(FileDescriptor::from_value(&json!("a.png")).is_none());
    }

    #[test]
    fn test_outcome_wire_shape() {
        let mut urls = UploadTargets::new();
        urls.insert("resume".to_string(), "https://files/upload".to_string());
        let accepted = SubmissionOutcome::Accepted { presigned_urls: urls };
        assert_eq!(
            serde_json::to_value(&accepted).unwrap(),
            json!({"valid": true, "presignedUrls": {"resume": "https://files/upload"}})
        );

        let rejected = SubmissionOutcome::form_error("Form not found");
        let wire = serde_json::to_value(&rejected).unwrap();
        assert_eq!(wire, json!({"valid": false, "errors": {"_form": ["Form not found"]}}));

        let back: SubmissionOutcome = serde_json::from_value(wire).unwrap();
        assert_eq!(back, rejected);
        assert!(serde_json::from_value::<SubmissionOutcome>(json!({"valid": false})).is_err());
    }
}
