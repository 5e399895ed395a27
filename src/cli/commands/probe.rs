//! Probe command: transcript availability check.

use crate::cli::preflight::{self, Operation};
use crate::cli::{content_preview, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the probe command.
pub async fn run_probe(video_id: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Probe, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidblog doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching transcript...");
    let report = orchestrator.probe(video_id).await;
    spinner.finish_and_clear();

    Output::header(&format!("Transcript probe: {}", report.video_id));
    if report.transcript_available {
        Output::kv("Available", "yes");
        if let Some(length) = report.transcript_length {
            Output::kv("Length", &format!("{} characters", length));
        }
        if let Some(preview) = &report.preview {
            Output::kv("Preview", &content_preview(preview, 400));
        }
    } else {
        Output::kv("Available", "no");
        if let Some(error) = &report.error {
            Output::kv("Reason", error);
        }
    }

    Ok(())
}
