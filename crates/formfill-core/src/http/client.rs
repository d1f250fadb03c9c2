//! REST backend over reqwest
//!
//! Schemas live in a forms table (`schema` column keyed by `form_type`),
//! submissions are inserted into a submissions table, and upload targets
//! are signed URLs issued by the storage API.

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::http::{AuthHandler, BackendConfig, HttpError, ServiceKeyAuth};
use crate::ports::{SchemaSource, SubmissionStore, UploadTargetService};
use crate::types::{FormSchema, SubmissionData};

/// Backend talking to the REST and storage APIs of one project
pub struct RestBackend {
    /// Underlying reqwest client
    client: ReqwestClient,
    /// Authentication handler
    auth: Arc<dyn AuthHandler>,
    config: BackendConfig,
    base: Url,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RestBackend {
    /// Create a backend; no request is sent until a port is used
    pub fn new(config: BackendConfig) -> Result<Self> {
        config.validate()?;
        let base = config.base()?;

        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Http {
                message: format!("Failed to create HTTP client: {}", e),
                status_code: None,
                source: Some(e.into()),
            })?;

        let auth = Arc::new(ServiceKeyAuth::new(config.service_key.clone()));

        Ok(Self {
            client,
            auth,
            config,
            base,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::configuration("Backend URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET` endpoint returning the schema row of a form type
    pub fn schema_url(&self, form_type: &str) -> Result<Url> {
        let mut url = self.endpoint(&["rest", "v1", self.config.forms_table.as_str()])?;
        url.query_pairs_mut()
            .append_pair("select", "schema")
            .append_pair("form_type", &format!("eq.{}", form_type));
        Ok(url)
    }

    /// `POST` endpoint inserting a submission and returning its id
    pub fn submissions_url(&self) -> Result<Url> {
        let mut url = self.endpoint(&["rest", "v1", self.config.submissions_table.as_str()])?;
        url.query_pairs_mut().append_pair("select", "id");
        Ok(url)
    }

    /// `POST` endpoint signing an upload URL for a storage path
    pub fn upload_sign_url(&self, path: &str) -> Result<Url> {
        let mut segments = vec!["storage", "v1", "object", "upload", "sign", self.config.bucket.as_str()];
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
        self.endpoint(&segments)
    }

    /// Turn the storage API's answer into an absolute upload URL
    pub fn resolve_signed_url(&self, body: &Value) -> Result<String> {
        let relative = body
            .get("url")
            .or_else(|| body.get("signedURL"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::from(HttpError::malformed(
                    "Storage response carries no upload URL",
                    Some(body.clone()),
                ))
            })?;

        if relative.starts_with("http://") || relative.starts_with("https://") {
            return Ok(relative.to_string());
        }

        Ok(format!(
            "{}/storage/v1/{}",
            self.base.as_str().trim_end_matches('/'),
            relative.trim_start_matches('/')
        ))
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let mut headers = HashMap::new();
        self.auth.apply_auth(&mut headers)?;

        let request = headers
            .into_iter()
            .fold(request, |request, (name, value)| request.header(name, value));

        let response = request.send().await.map_err(HttpError::from_request_error)?;

        if !response.status().is_success() {
            return Err(HttpError::from_response(response).await.into());
        }

        let body = response.text().await.map_err(HttpError::from_request_error)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            HttpError::malformed(format!("Failed to parse response as JSON: {}", e), None).into()
        })
    }
}

/// Pick the schema out of the rows returned for one form type
pub fn parse_schema_rows(form_type: &str, rows: Value) -> Result<FormSchema> {
    let mut rows = match rows {
        Value::Array(rows) => rows,
        other => {
            return Err(Error::SchemaSource {
                message: format!("expected a list of rows, got {}", other),
                source: None,
            })
        }
    };

    match rows.len() {
        0 => Err(Error::SchemaNotFound {
            form_type: form_type.to_string(),
        }),
        1 => {
            let schema = rows
                .swap_remove(0)
                .get_mut("schema")
                .map(Value::take)
                .unwrap_or(Value::Null);
            FormSchema::from_value(schema)
        }
        count => Err(Error::SchemaSource {
            message: format!("{} schemas registered for form type '{}'", count, form_type),
            source: None,
        }),
    }
}

/// Read the generated id from an insert response
pub fn parse_inserted_id(body: &Value) -> Result<String> {
    let row = match body {
        Value::Array(rows) => rows.first(),
        Value::Object(_) => Some(body),
        _ => None,
    };

    match row.and_then(|row| row.get("id")) {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(Error::Persistence {
            message: format!("insert response carries no id: {}", body),
            source: None,
        }),
    }
}

fn wrap(error: Error) -> Option<anyhow::Error> {
    Some(anyhow::Error::new(error))
}

#[async_trait]
impl SchemaSource for RestBackend {
    async fn fetch_schema(&self, form_type: &str) -> Result<FormSchema> {
        let url = self.schema_url(form_type)?;
        debug!(%url, "Fetching form schema");

        let rows = self
            .send_json(self.client.get(url))
            .await
            .map_err(|e| Error::SchemaSource {
                message: e.to_string(),
                source: wrap(e),
            })?;

        parse_schema_rows(form_type, rows)
    }
}

#[async_trait]
impl SubmissionStore for RestBackend {
    async fn insert_submission(&self, form_type: &str, data: &SubmissionData) -> Result<String> {
        let url = self.submissions_url()?;
        debug!(%url, form_type, "Inserting submission");

        let body = json!([{ "form_type": form_type, "form_data": data }]);
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(&body);

        let inserted = self
            .send_json(request)
            .await
            .map_err(|e| Error::Persistence {
                message: e.to_string(),
                source: wrap(e),
            })?;

        parse_inserted_id(&inserted)
    }
}

#[async_trait]
impl UploadTargetService for RestBackend {
    async fn create_upload_target(&self, path: &str) -> Result<String> {
        let url = self.upload_sign_url(path)?;
        debug!(%url, "Requesting signed upload URL");

        let body = self
            .send_json(self.client.post(url).json(&json!({})))
            .await
            .map_err(|e| Error::UploadTarget {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        self.resolve_signed_url(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        RestBackend::new(BackendConfig::new("https://project.example.co/", "sk-test")).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(RestBackend::new(BackendConfig::default()).is_err());
    }

    #[test]
    fn test_schema_url() {
        let url = backend().schema_url("job application").unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.example.co/rest/v1/forms?select=schema&form_type=eq.job+application"
        );
    }

    #[test]
    fn test_submissions_url() {
        assert_eq!(
            backend().submissions_url().unwrap().as_str(),
            "https://project.example.co/rest/v1/form_submissions?select=id"
        );
    }

    #[test]
    fn test_upload_sign_url_encodes_segments() {
        let url = backend()
            .upload_sign_url("form-submissions/7/resume/my cv.pdf")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.example.co/storage/v1/object/upload/sign/user-uploads/form-submissions/7/resume/my%20cv.pdf"
        );
    }

    #[test]
    fn test_resolve_signed_url() {
        let backend = backend();
        let url = backend
            .resolve_signed_url(&json!({"url": "/object/upload/sign/user-uploads/a.pdf?token=abc"}))
            .unwrap();
        assert_eq!(
            url,
            "https://project.example.co/storage/v1/object/upload/sign/user-uploads/a.pdf?token=abc"
        );
        assert!(backend.resolve_signed_url(&json!({})).is_err());
    }

    #[test]
    fn test_parse_schema_rows() {
        let rows = json!([{ "schema": {
            "title": "Survey",
            "fields": [{"type": "checkbox", "name": "agree", "label": "Agree"}],
            "order": ["agree"]
        }}]);
        assert_eq!(parse_schema_rows("survey", rows).unwrap().title, "Survey");

        assert!(matches!(
            parse_schema_rows("survey", json!([])),
            Err(Error::SchemaNotFound { .. })
        ));
        assert!(matches!(
            parse_schema_rows("survey", json!([{"schema": null}])),
            Err(Error::InvalidSchema { .. })
        ));
        assert!(matches!(
            parse_schema_rows("survey", json!({"message": "oops"})),
            Err(Error::SchemaSource { .. })
        ));
    }

    #[test]
    fn test_parse_inserted_id() {
        assert_eq!(parse_inserted_id(&json!([{"id": 17}])).unwrap(), "17");
        assert_eq!(
            parse_inserted_id(&json!([{"id": "b7e1c6c2"}])).unwrap(),
            "b7e1c6c2"
        );
        assert!(matches!(
            parse_inserted_id(&json!([])),
            Err(Error::Persistence { .. })
        ));
    }
}
