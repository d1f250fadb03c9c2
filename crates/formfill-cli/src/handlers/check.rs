//! Check command handler

use crate::cli::CheckArgs;
use crate::error::{Error, Result};
use crate::handlers::utils::read_document;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formfill_schemas::{create_form_schema_validator, SchemaValidator, ValidationContext, ValidationMode};
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Handle the check command
#[instrument(skip(output), fields(file = %args.schema.display(), mode = ?args.mode))]
pub fn handle_check(args: CheckArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("check_command", &format!("file: {}", args.schema.display()));
    output.info(&format!("Checking form schema: {}", args.schema.display()))?;

    let document = read_document(&args.schema)?;
    check_document(&document, args.mode.into(), output)?;

    output.success("✓ Form schema is valid")?;
    Ok(())
}

/// Run the authoring validator and print every problem found
pub(crate) fn check_document(document: &Value, mode: ValidationMode, output: &mut OutputWriter) -> Result<()> {
    let validator = create_form_schema_validator()
        .map_err(|e| Error::other(format!("Failed to create form schema validator: {}", e)))?;

    let result = {
        let _validation_timer = Timer::new("schema_validation");
        validator.validate_with_context(document, &ValidationContext::new(mode))
    };

    match result {
        Ok(()) => {
            info!(%mode, "Form schema passed");
            Ok(())
        }
        Err(errors) => {
            warn!(%mode, problems = errors.len(), "Form schema rejected");
            output.validation_errors(&errors)?;
            Err(Error::SchemaRejected {
                problems: errors.len(),
            })
        }
    }
}
