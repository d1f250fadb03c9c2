//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) for schema problems,
//! validation reports and submission outcomes.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use formfill_core::{SubmissionOutcome, ValidationReport, FORM_ERROR_KEY};
use formfill_core::types::FieldErrors;
use formfill_schemas::{ValidationError, ValidationErrors};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::trace;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format schema authoring problems
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;

    /// Format a local submission validation report
    fn format_report(&self, report: &ValidationReport) -> Result<String>;

    /// Format the outcome of a submission
    fn format_outcome(&self, outcome: &SubmissionOutcome) -> Result<String>;
}

impl OutputFormat {
    fn machine<T: Serialize>(&self, value: &T) -> Result<Option<String>> {
        Ok(match self {
            OutputFormat::Json => Some(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Some(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Some(serde_yaml::to_string(value)?),
            OutputFormat::Human => None,
        })
    }
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self.machine(value)? {
            Some(text) => Ok(text),
            // For human format, use pretty JSON as fallback
            None => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self.machine(errors)? {
            Some(text) => Ok(text),
            None => Ok(format_validation_errors_human(errors)),
        }
    }

    fn format_report(&self, report: &ValidationReport) -> Result<String> {
        match self.machine(report)? {
            Some(text) => Ok(text),
            None => Ok(format_report_human(report)),
        }
    }

    fn format_outcome(&self, outcome: &SubmissionOutcome) -> Result<String> {
        match self.machine(outcome)? {
            Some(text) => Ok(text),
            None => Ok(format_outcome_human(outcome)),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && format == OutputFormat::Human && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color: false,
            show_progress: false,
            quiet: false,
            writer,
        }
    }

    /// Turn progress spinners off regardless of the terminal
    pub fn disable_progress(&mut self) {
        self.show_progress = false;
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content.trim_end_matches('\n'))?;
        self.writer.flush()?;
        Ok(())
    }

    fn human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format, secrets redacted
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value);
        trace!("Outputting data: {}", value);

        let formatted = self.format.format(&value)?;
        self.writeln(&formatted)
    }

    /// Write schema authoring problems
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        let formatted = self.format.format_validation_errors(errors)?;
        self.writeln(&formatted)
    }

    /// Write a local validation report
    pub fn report(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_report(report)?;
        self.writeln(&formatted)
    }

    /// Write a submission outcome
    pub fn outcome(&mut self, outcome: &SubmissionOutcome) -> Result<()> {
        let formatted = self.format.format_outcome(outcome)?;
        self.writeln(&formatted)
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Format schema problems for human reading
fn format_validation_errors_human(errors: &ValidationErrors) -> String {
    let mut output = format!("✗ {} problem(s) found\n\n", errors.len());

    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("{}. {}", i + 1, format_validation_error_human(error)));
    }

    output
}

/// Format a single schema problem for human reading
fn format_validation_error_human(error: &ValidationError) -> String {
    let mut output = String::new();

    output.push_str(&format!("📍 Path: {}\n", error.path));
    output.push_str(&format!("   💬 {}\n", error.message));

    for violation in &error.schema_violations {
        output.push_str(&format!("   • Rule: {}\n", violation.rule));
        output.push_str(&format!("     Expected: {}\n", violation.expected));
        output.push_str(&format!("     Actual: {}\n", violation.actual));
    }

    output
}

/// Format a validation report for human reading
fn format_report_human(report: &ValidationReport) -> String {
    if report.is_valid() {
        return "✓ Submission is valid\n".to_string();
    }

    let mut output = format!("✗ {} field(s) failed validation\n\n", report.failed_fields());
    output.push_str(&format_field_errors(report.errors()));
    output
}

/// Format a submission outcome for human reading
fn format_outcome_human(outcome: &SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Accepted { presigned_urls } => {
            let mut output = "✓ Submission accepted\n".to_string();
            if !presigned_urls.is_empty() {
                output.push_str("\nUpload URLs:\n");
                for (field, url) in presigned_urls {
                    output.push_str(&format!("  {}: {}\n", field, url));
                }
            }
            output
        }
        SubmissionOutcome::Rejected { errors } => match errors.get(FORM_ERROR_KEY) {
            Some(messages) => format!("✗ {}\n", messages.join(" ")),
            None => {
                let mut output = format!("✗ Submission rejected: {} field(s) with errors\n\n", errors.len());
                output.push_str(&format_field_errors(errors));
                output
            }
        },
    }
}

fn format_field_errors(errors: &FieldErrors) -> String {
    let mut output = String::new();
    for (field, messages) in errors {
        for message in messages {
            output.push_str(&format!("  • {}: {}\n", field, message));
        }
    }
    output
}
