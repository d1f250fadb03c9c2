//! Validate command handler

use crate::cli::ValidateArgs;
use crate::error::{Error, Result};
use crate::handlers::check::check_document;
use crate::handlers::utils::{into_form_schema, read_document, read_submission};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formfill_core::{validate_submission, Clock, FixedClock, SystemClock};
use formfill_schemas::ValidationMode;
use tracing::{debug, info, instrument};

/// Handle the validate command
#[instrument(skip(output), fields(schema = %args.schema.display(), submission = %args.submission.display()))]
pub fn handle_validate(args: ValidateArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("validate_command");

    let document = read_document(&args.schema)?;
    check_document(&document, ValidationMode::Strict, output)?;
    let schema = into_form_schema(document)?;

    let data = read_submission(&args.submission)?;
    output.info(&format!(
        "Validating {} answer(s) against '{}'",
        data.len(),
        schema.title
    ))?;

    let clock: Box<dyn Clock> = match args.today {
        Some(today) => Box::new(FixedClock::new(today)),
        None => Box::new(SystemClock),
    };
    debug!(today = %clock.today(), "Resolved relative date limits");

    let report = validate_submission(&schema, &data, clock.as_ref());
    output.report(&report)?;

    if report.is_valid() {
        info!("Submission is valid");
        Ok(())
    } else {
        Err(Error::SubmissionRejected {
            fields: report.failed_fields(),
        })
    }
}
