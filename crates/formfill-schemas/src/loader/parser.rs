//! YAML and JSON document parsing
//!
//! Copyright (c) 2025 Formfill Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl DocumentFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(DocumentFormat::Yaml),
            Some("json") => Ok(DocumentFormat::Json),
            _ => Err(LoaderError::unsupported_format(path.to_path_buf())),
        }
    }

    pub fn primary_extension(&self) -> &'static str {
        match self {
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Json => "json",
        }
    }
}

/// Parser turning YAML or JSON text into a JSON value
#[derive(Debug, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a document file, detecting format from extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<Value> {
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        self.parse_content(&content, format, path)
    }

    /// Parse document content with explicit format
    pub fn parse_content(&self, content: &str, format: DocumentFormat, path: &Path) -> LoaderResult<Value> {
        match format {
            DocumentFormat::Yaml => self.parse_yaml(content, path),
            DocumentFormat::Json => self.parse_json(content, path),
        }
    }

    fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        // YAML errors carry line information; surface them before converting
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e))?;

        serde_json::to_value(yaml_value)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_json::from_str(content)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("contact.YML")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("contact.json")).unwrap(),
            DocumentFormat::Json
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("contact.toml")),
            Err(LoaderError::UnsupportedFormat { .. })
        ));
        assert!(DocumentFormat::from_path(Path::new("contact")).is_err());
    }

    #[test]
    fn test_yaml_and_json_agree() {
        let parser = DocumentParser::new();
        let path = PathBuf::from("inline");

        let yaml = parser
            .parse_content("title: Contact\norder: [email]\n", DocumentFormat::Yaml, &path)
            .unwrap();
        let json = parser
            .parse_content(r#"{"title": "Contact", "order": ["email"]}"#, DocumentFormat::Json, &path)
            .unwrap();

        assert_eq!(yaml, json);
    }

    #[test]
    fn test_parse_errors_keep_path() {
        let parser = DocumentParser::new();
        let path = PathBuf::from("broken.yaml");

        let error = parser
            .parse_content("title: [unclosed", DocumentFormat::Yaml, &path)
            .unwrap_err();
        assert!(matches!(error, LoaderError::YamlParseError { .. }));
        assert_eq!(error.path(), &path);
    }
}
