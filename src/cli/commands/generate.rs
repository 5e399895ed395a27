//! Generate command: standalone video-to-blog conversion.

use crate::cli::preflight::{self, Operation};
use crate::cli::{format_elapsed, Output};
use crate::config::Settings;
use crate::error::{BlogError, ErrorKind, Result};
use crate::orchestrator::{GenerationRequest, GenerationResult, Orchestrator};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// How often the foreground refreshes the elapsed-time readout.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Run the generate command.
pub async fn run_generate(
    url: Option<String>,
    output: Option<String>,
    show_steps: bool,
    languages: Option<Vec<String>>,
    mut settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Generate, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidblog doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(languages) = languages {
        settings.transcript.languages = languages;
    }

    let video_url = match url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let output_path = output
        .map(|p| Settings::expand_path(&p))
        .unwrap_or_else(|| settings.output_path());

    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let request = GenerationRequest::new(video_url.trim());

    Output::info(&format!("Processing: {}", request.video_url));

    let result = match run_with_progress(orchestrator, request).await {
        Ok(result) => result,
        Err(e) => {
            report_failure(&e);
            return Err(e.into());
        }
    };

    if show_steps {
        Output::section("Transcript", &result.transcript.text);
        Output::section("Outline", result.outline.as_str());
        println!();
    }

    write_article(&output_path, &result)?;

    Output::success(&format!(
        "Blog saved to {} ({})",
        output_path.display(),
        format_elapsed(result.elapsed_seconds())
    ));

    Ok(())
}

/// Read a video URL from stdin.
fn prompt_for_url() -> anyhow::Result<String> {
    print!("Enter YouTube video URL: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let input = input.trim();
    if input.is_empty() {
        anyhow::bail!("No video URL entered");
    }
    Ok(input.to_string())
}

/// Run the pipeline on a background task while the foreground shows elapsed time.
///
/// The foreground never touches the task's values; it only waits on the join handle
/// with a short timeout and refreshes the spinner between waits.
pub async fn run_with_progress(
    orchestrator: Arc<Orchestrator>,
    request: GenerationRequest,
) -> Result<GenerationResult> {
    let started = Instant::now();
    let spinner = Output::spinner("Processing video...");

    let mut handle = tokio::spawn(async move { orchestrator.run(&request).await });

    let joined = loop {
        match tokio::time::timeout(POLL_INTERVAL, &mut handle).await {
            Ok(joined) => break joined,
            Err(_) => {
                let elapsed = started.elapsed().as_secs_f64();
                spinner.set_message(format!(
                    "Processing content with AI... ({} elapsed)",
                    format_elapsed(elapsed)
                ));
            }
        }
    };

    spinner.finish_and_clear();

    joined.map_err(|e| BlogError::Internal(format!("Pipeline task failed: {}", e)))?
}

/// Print a remediation hint for a pipeline failure.
fn report_failure(err: &BlogError) {
    match err.kind() {
        ErrorKind::InvalidReference => {
            Output::error(&err.to_string());
            Output::info("Expected a link like https://www.youtube.com/watch?v=... or https://youtu.be/...");
        }
        ErrorKind::TranscriptUnavailable => {
            Output::error(&err.to_string());
            Output::info("Some videos have no captions. Try another video or add languages with --languages.");
        }
        ErrorKind::GenerationFailure => {
            Output::error(&err.to_string());
            Output::info("Check that the generation backend is running and the model is available.");
        }
        ErrorKind::Internal => Output::error(&format!("Unexpected error: {}", err)),
    }
}

/// Write the article text to the output artifact.
pub fn write_article(path: &Path, result: &GenerationResult) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &result.article.text)?;
    info!("Wrote {} bytes to {}", result.article.text.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::orchestrator::test_support::{StubGenerator, StubSource, ARTICLE};

    fn orchestrator(fail_outline: bool) -> Arc<Orchestrator> {
        Arc::new(Orchestrator::with_components(
            Settings::default(),
            Prompts::default(),
            Arc::new(StubSource::ok()),
            Arc::new(StubGenerator::new(fail_outline)),
        ))
    }

    #[tokio::test]
    async fn test_background_run_returns_result() {
        let result = run_with_progress(
            orchestrator(false),
            GenerationRequest::new("https://youtu.be/dQw4w9WgXcQ"),
        )
        .await
        .unwrap();
        assert_eq!(result.article.as_str(), ARTICLE);
    }

    #[tokio::test]
    async fn test_background_run_keeps_error_kind() {
        let err = run_with_progress(
            orchestrator(true),
            GenerationRequest::new("https://youtu.be/dQw4w9WgXcQ"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GenerationFailure);
    }

    #[tokio::test]
    async fn test_write_article() {
        let result = run_with_progress(
            orchestrator(false),
            GenerationRequest::new("https://youtu.be/dQw4w9WgXcQ"),
        )
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("blog_post.txt");
        write_article(&path, &result).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ARTICLE);
    }
}
