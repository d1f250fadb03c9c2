//! HTTP error classification and normalization
//!
//! Normalizes REST and storage error bodies into a uniform error format

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Classification of HTTP errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClassification {
    /// Client errors (4xx)
    ClientError,
    /// Server errors (5xx)
    ServerError,
    /// Connection failures and timeouts
    NetworkError,
    /// Rate limiting
    RateLimitError,
    /// Rejected credentials
    AuthenticationError,
    /// Responses that do not match the expected shape
    MalformedResponse,
    Unknown,
}

/// Normalized HTTP error representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpError {
    /// HTTP status code if available
    pub status_code: Option<u16>,
    pub classification: ErrorClassification,
    /// Backend-specific error code, e.g. a Postgres SQLSTATE
    pub code: Option<String>,
    /// Human-readable error message
    pub message: String,
    /// Parsed error body
    pub details: Option<Value>,
}

impl HttpError {
    /// Create from a non-success reqwest Response
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_status_and_body(status, &body)
    }

    /// Create from a status code and raw body
    pub fn from_status_and_body(status: StatusCode, body: &str) -> Self {
        let details = serde_json::from_str::<Value>(body).ok();
        let (code, message) = Self::extract_backend_error(&details, body);

        Self {
            status_code: Some(status.as_u16()),
            classification: Self::classify_status(status),
            code,
            message,
            details,
        }
    }

    /// Create from a network/request error
    pub fn from_request_error(error: reqwest::Error) -> Self {
        let classification = if error.is_timeout() || error.is_connect() {
            ErrorClassification::NetworkError
        } else if error.is_decode() {
            ErrorClassification::MalformedResponse
        } else {
            ErrorClassification::Unknown
        };

        Self {
            status_code: error.status().map(|s| s.as_u16()),
            classification,
            code: None,
            message: error.to_string(),
            details: None,
        }
    }

    /// A success response whose body could not be used
    pub fn malformed(message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            status_code: None,
            classification: ErrorClassification::MalformedResponse,
            code: None,
            message: message.into(),
            details,
        }
    }

    /// Classify HTTP status code
    fn classify_status(status: StatusCode) -> ErrorClassification {
        match status.as_u16() {
            401 | 403 => ErrorClassification::AuthenticationError,
            429 => ErrorClassification::RateLimitError,
            400..=499 => ErrorClassification::ClientError,
            500..=599 => ErrorClassification::ServerError,
            _ => ErrorClassification::Unknown,
        }
    }

    /// Pull code and message out of REST (`{code, message, details, hint}`)
    /// and storage (`{statusCode, error, message}`) error bodies
    fn extract_backend_error(details: &Option<Value>, body: &str) -> (Option<String>, String) {
        if let Some(json) = details {
            let message = json.get("message").and_then(Value::as_str);

            if let Some(code) = json.get("code").and_then(Value::as_str) {
                return (Some(code.to_string()), message.unwrap_or(body).to_string());
            }

            if let Some(error) = json.get("error").and_then(Value::as_str) {
                return (
                    Some(error.to_string()),
                    message.unwrap_or(error).to_string(),
                );
            }

            if let Some(message) = message {
                return (None, message.to_string());
            }
        }

        (None, body.to_string())
    }

    pub fn classification(&self) -> ErrorClassification {
        self.classification
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP Error [{}]: {} (classification: {:?})",
            self.status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            self.message,
            self.classification
        )
    }
}

impl std::error::Error for HttpError {}

/// Convert HttpError to crate Error
impl From<HttpError> for crate::Error {
    fn from(http_error: HttpError) -> Self {
        crate::Error::Http {
            message: http_error.message.clone(),
            status_code: http_error.status_code,
            source: Some(anyhow::Error::new(http_error)),
        }
    }
}
