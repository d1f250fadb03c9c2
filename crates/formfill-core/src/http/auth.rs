//! Authentication of backend requests

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Applies credentials to outgoing request headers
pub trait AuthHandler: Send + Sync {
    /// Apply authentication to request headers
    fn apply_auth(&self, headers: &mut HashMap<String, String>) -> Result<()>;

    /// Validate that required credentials are available
    fn validate_credentials(&self) -> Result<()>;
}

/// Service key sent both as `apikey` and as a bearer token
#[derive(Clone)]
pub struct ServiceKeyAuth {
    service_key: String,
}

impl ServiceKeyAuth {
    pub fn new(service_key: impl Into<String>) -> Self {
        Self {
            service_key: service_key.into(),
        }
    }
}

impl std::fmt::Debug for ServiceKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKeyAuth").finish_non_exhaustive()
    }
}

impl AuthHandler for ServiceKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) -> Result<()> {
        self.validate_credentials()?;
        headers.insert("apikey".to_string(), self.service_key.clone());
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.service_key),
        );
        Ok(())
    }

    fn validate_credentials(&self) -> Result<()> {
        if self.service_key.trim().is_empty() {
            return Err(Error::configuration("Service key not configured"));
        }
        Ok(())
    }
}
