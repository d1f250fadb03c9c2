//! REST backend for a hosted Postgres REST API with object storage
//!
//! This module provides:
//! - Backend configuration (endpoints, tables, bucket, timeout)
//! - Service-key authentication headers
//! - Error classification and normalization of error bodies
//! - `RestBackend`, implementing every collaborator port over HTTP
//!
//! Requests are sent once; there is no retry or backoff.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;

pub use auth::{AuthHandler, ServiceKeyAuth};
pub use client::RestBackend;
pub use config::BackendConfig;
pub use error::{ErrorClassification, HttpError};

// Re-export commonly used types
pub use reqwest::StatusCode;
