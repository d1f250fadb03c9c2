//! Submit command handler

use crate::cli::SubmitArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::handlers::check::check_document;
use crate::handlers::utils::{into_form_schema, read_document, read_submission};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formfill_core::http::RestBackend;
use formfill_core::{FormFillingService, MemoryBackend, SubmissionOutcome, FORM_ERROR_KEY};
use formfill_schemas::ValidationMode;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Handle the submit command
#[instrument(skip(config, output), fields(form_type = %args.form_type, dry_run = args.dry_run))]
pub async fn handle_submit(args: SubmitArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("submit_command", &args.form_type);

    let data = read_submission(&args.submission)?;

    let (service, memory) = if args.dry_run {
        let path = args
            .schema
            .as_deref()
            .ok_or_else(|| Error::invalid_args("--dry-run needs --schema"))?;
        let document = read_document(path)?;
        check_document(&document, ValidationMode::Strict, output)?;

        let backend = Arc::new(MemoryBackend::new().with_schema(args.form_type.clone(), into_form_schema(document)?));
        output.info("Dry run: answers are stored in memory only")?;
        (FormFillingService::from_backend(backend.clone()), Some(backend))
    } else {
        let mut backend = config.backend()?;
        if let Some(base_url) = args.base_url {
            backend.base_url = base_url;
        }
        info!(base_url = %backend.base_url, "Submitting to backend");
        let backend = Arc::new(RestBackend::new(backend)?);
        (FormFillingService::from_backend(backend), None)
    };

    let spinner = output.spinner(&format!("Submitting '{}'...", args.form_type));
    let outcome = service.fill_form(&args.form_type, &data).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if let Some(memory) = memory {
        if let Some(stored) = memory.submissions()?.last() {
            output.info(&format!("Stored as submission {}", stored.id))?;
        }
    }

    output.outcome(&outcome)?;

    match &outcome {
        SubmissionOutcome::Accepted { presigned_urls } => {
            info!(uploads = presigned_urls.len(), "Submission accepted");
            Ok(())
        }
        SubmissionOutcome::Rejected { errors } => match errors.get(FORM_ERROR_KEY) {
            Some(messages) => Err(Error::SubmissionFailed {
                message: messages.join(" "),
            }),
            None => {
                warn!(fields = errors.len(), "Submission rejected");
                Err(Error::SubmissionRejected { fields: errors.len() })
            }
        },
    }
}
