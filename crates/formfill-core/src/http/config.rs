//! Connection settings of the REST backend

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// Settings of a [`super::RestBackend`]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.example.co`
    pub base_url: String,
    /// Service key sent with every request
    pub service_key: String,
    /// Table holding one schema per form type
    pub forms_table: String,
    /// Table receiving accepted submissions
    pub submissions_table: String,
    /// Storage bucket for uploaded files
    pub bucket: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            service_key: String::new(),
            forms_table: "forms".to_string(),
            submissions_table: "form_submissions".to_string(),
            bucket: "user-uploads".to_string(),
            timeout_secs: 30,
        }
    }
}

// The service key never reaches logs.
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .field("forms_table", &self.forms_table)
            .field("submissions_table", &self.submissions_table)
            .field("bucket", &self.bucket)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: service_key.into(),
            ..Self::default()
        }
    }

    /// Parsed base URL, without a trailing slash
    pub fn base(&self) -> Result<Url> {
        let trimmed = self.base_url.trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|e| Error::Configuration {
            message: format!("Invalid backend URL '{}': {}", self.base_url, e),
            source: Some(e.into()),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration(format!(
                "Backend URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(url)
    }

    /// Check that the settings can be used to reach a backend
    pub fn validate(&self) -> Result<()> {
        self.base()?;

        if self.service_key.trim().is_empty() {
            return Err(Error::configuration(
                "Service key is empty. Set FORMFILL_SERVICE_KEY or backend.service_key",
            ));
        }

        for (name, value) in [
            ("forms_table", &self.forms_table),
            ("submissions_table", &self.submissions_table),
            ("bucket", &self.bucket),
        ] {
            if value.trim().is_empty() {
                return Err(Error::configuration(format!("{} cannot be empty", name)));
            }
        }

        if self.timeout_secs == 0 {
            return Err(Error::configuration("timeout_secs must be greater than 0"));
        }

        Ok(())
    }
}
