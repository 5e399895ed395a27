//! Pipeline orchestrator for vidblog.
//!
//! Runs transcript extraction, outline generation and article composition strictly
//! in sequence. The first failing stage ends the run.

use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::generation::{Article, ArticleComposer, OpenAIGenerator, Outline, OutlineGenerator, TextGenerator};
use crate::transcript::{CaptionSource, Transcript, TranscriptExtractor, VideoId, YtDlpCaptionSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// A request to turn one video into a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub video_url: String,
}

impl GenerationRequest {
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Identifier of this run, as recorded in logs.
    pub run_id: Uuid,
    /// The reference exactly as the caller supplied it.
    pub video_url: String,
    pub transcript: Transcript,
    pub outline: Outline,
    pub article: Article,
    /// Wall-clock time for the whole pipeline.
    pub elapsed: Duration,
}

impl GenerationResult {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Outcome of a transcript-only availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub video_id: String,
    pub transcript_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The main orchestrator for the vidblog pipeline.
pub struct Orchestrator {
    settings: Settings,
    extractor: TranscriptExtractor,
    outline_generator: OutlineGenerator,
    composer: ArticleComposer,
}

impl Orchestrator {
    /// Create a new orchestrator backed by yt-dlp and the configured generation backend.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let source: Arc<dyn CaptionSource> =
            Arc::new(YtDlpCaptionSource::with_settings(&settings.transcript)?);

        info!(
            "Using model '{}' at {}",
            settings.generation.model, settings.generation.api_base
        );
        let generator: Arc<dyn TextGenerator> =
            Arc::new(OpenAIGenerator::with_settings(&settings.generation)?);

        Ok(Self::with_components(settings, prompts, source, generator))
    }

    /// Create an orchestrator with custom components.
    ///
    /// The same generator handle serves both the outline and the article stage.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        source: Arc<dyn CaptionSource>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let extractor = TranscriptExtractor::new(source, settings.transcript.languages.clone());
        let outline_generator = OutlineGenerator::new(generator.clone(), prompts.clone());
        let composer = ArticleComposer::new(generator, prompts);

        Self {
            settings,
            extractor,
            outline_generator,
            composer,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the full pipeline for one video reference.
    #[instrument(skip(self, request), fields(run_id = tracing::field::Empty, video_url = %request.video_url))]
    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let started = Instant::now();

        info!("Extracting transcript");
        let transcript = self.extractor.extract(&request.video_url).await?;
        debug!("Transcript stage took {:?}", started.elapsed());

        info!("Generating blog outline");
        let stage = Instant::now();
        let outline = self.outline_generator.generate_outline(&transcript).await?;
        debug!("Outline stage took {:?}", stage.elapsed());

        info!("Generating full blog post");
        let stage = Instant::now();
        let article = self.composer.compose_article(&outline, &transcript).await?;
        debug!("Article stage took {:?}", stage.elapsed());

        let elapsed = started.elapsed();
        info!("Blog generation completed in {:.2} seconds", elapsed.as_secs_f64());

        Ok(GenerationResult {
            run_id,
            video_url: request.video_url.clone(),
            transcript,
            outline,
            article,
            elapsed,
        })
    }

    /// Check transcript availability for a bare video identifier without generating.
    #[instrument(skip(self))]
    pub async fn probe(&self, video_id: &str) -> ProbeReport {
        let failed = |error: String| ProbeReport {
            video_id: video_id.to_string(),
            transcript_available: false,
            transcript_length: None,
            preview: None,
            error: Some(error),
        };

        let Ok(id) = VideoId::from_bare(video_id) else {
            return failed(format!(
                "Invalid video ID: '{}' is not an 11-character YouTube video ID",
                video_id.trim()
            ));
        };

        match self.extractor.extract_id(&id, self.extractor.languages()).await {
            Ok(transcript) => ProbeReport {
                video_id: video_id.to_string(),
                transcript_available: true,
                transcript_length: Some(transcript.char_len()),
                preview: Some(transcript.preview(self.settings.transcript.preview_chars)),
                error: None,
            },
            Err(e) => failed(e.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Stub collaborators with call counters.

    use crate::error::{BlogError, Result};
    use crate::generation::TextGenerator;
    use crate::transcript::{CaptionFragment, CaptionSource, Captions, VideoId};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    pub struct StubSource {
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl StubSource {
        pub fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CaptionSource for StubSource {
        async fn fetch_captions(&self, _video_id: &VideoId, languages: &[String]) -> Result<Captions> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BlogError::TranscriptUnavailable(
                    "Subtitles are disabled for this video".to_string(),
                ));
            }
            Ok(Captions {
                language: languages[0].clone(),
                fragments: vec![
                    CaptionFragment {
                        text: "rust makes systems programming".to_string(),
                        start_seconds: 0.0,
                        duration_seconds: 2.0,
                    },
                    CaptionFragment {
                        text: "approachable".to_string(),
                        start_seconds: 2.0,
                        duration_seconds: 1.0,
                    },
                ],
            })
        }
    }

    /// Answers outline requests and article requests with fixed strings, told apart
    /// by their system prompt. Counters record calls that ran to completion.
    pub struct StubGenerator {
        pub fail_outline: bool,
        pub fail_article: bool,
        pub delay: Option<Duration>,
        pub outline_calls: AtomicUsize,
        pub article_calls: AtomicUsize,
    }

    pub const OUTLINE: &str = "Title: Approachable Rust\n1. Ownership";
    pub const ARTICLE: &str = "# Approachable Rust\n\nRust makes systems programming approachable.";

    impl StubGenerator {
        pub fn new(fail_outline: bool) -> Self {
            Self {
                fail_outline,
                fail_article: false,
                delay: None,
                outline_calls: AtomicUsize::new(0),
                article_calls: AtomicUsize::new(0),
            }
        }

        pub fn failing_article() -> Self {
            Self {
                fail_article: true,
                ..Self::new(false)
            }
        }

        /// Sleep this long inside every call before answering.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn outline_calls(&self) -> usize {
            self.outline_calls.load(Ordering::SeqCst)
        }

        pub fn article_calls(&self) -> usize {
            self.article_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, system: &str, _user: &str) -> Result<String> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if system.contains("research assistant") {
                self.outline_calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_outline {
                    return Err(BlogError::Generation("request timed out".to_string()));
                }
                Ok(OUTLINE.to_string())
            } else {
                self.article_calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_article {
                    return Err(BlogError::Generation("model not found".to_string()));
                }
                Ok(ARTICLE.to_string())
            }
        }

        fn model(&self) -> &str {
            "stub"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::ErrorKind;

    fn orchestrator(source: Arc<StubSource>, generator: Arc<StubGenerator>) -> Orchestrator {
        Orchestrator::with_components(Settings::default(), Prompts::default(), source, generator)
    }

    #[tokio::test]
    async fn test_end_to_end_with_stubs() {
        let source = Arc::new(StubSource::ok());
        let generator = Arc::new(StubGenerator::new(false));
        let orchestrator = orchestrator(source.clone(), generator.clone());

        let request = GenerationRequest::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        let result = tokio_test::assert_ok!(orchestrator.run(&request).await);

        assert_eq!(result.article.as_str(), ARTICLE);
        assert_eq!(result.outline.as_str(), OUTLINE);
        assert_eq!(result.video_url, request.video_url);
        assert_eq!(result.transcript.video_id.as_str(), "dQw4w9WgXcQ");
        assert!(result.elapsed_seconds() >= 0.0);
        assert_eq!(source.calls(), 1);
        assert_eq!(generator.outline_calls(), 1);
        assert_eq!(generator.article_calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_reference_short_circuits() {
        let source = Arc::new(StubSource::ok());
        let generator = Arc::new(StubGenerator::new(false));
        let orchestrator = orchestrator(source.clone(), generator.clone());

        let err = orchestrator
            .run(&GenerationRequest::new("https://example.com/video"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidReference);
        assert_eq!(source.calls(), 0);
        assert_eq!(generator.outline_calls(), 0);
        assert_eq!(generator.article_calls(), 0);
    }

    #[tokio::test]
    async fn test_transcript_failure_short_circuits() {
        let source = Arc::new(StubSource::failing());
        let generator = Arc::new(StubGenerator::new(false));
        let orchestrator = orchestrator(source.clone(), generator.clone());

        let err = orchestrator
            .run(&GenerationRequest::new("https://youtu.be/dQw4w9WgXcQ"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TranscriptUnavailable);
        assert_eq!(source.calls(), 1);
        assert_eq!(generator.outline_calls(), 0);
        assert_eq!(generator.article_calls(), 0);
    }

    #[tokio::test]
    async fn test_outline_failure_skips_article() {
        let source = Arc::new(StubSource::ok());
        let generator = Arc::new(StubGenerator::new(true));
        let orchestrator = orchestrator(source.clone(), generator.clone());

        let err = orchestrator
            .run(&GenerationRequest::new("https://youtu.be/dQw4w9WgXcQ"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GenerationFailure);
        assert_eq!(generator.outline_calls(), 1);
        assert_eq!(generator.article_calls(), 0);
    }

    #[tokio::test]
    async fn test_article_failure_is_generation_failure() {
        let source = Arc::new(StubSource::ok());
        let generator = Arc::new(StubGenerator::failing_article());
        let orchestrator = orchestrator(source.clone(), generator.clone());

        let result = orchestrator
            .run(&GenerationRequest::new("https://youtu.be/dQw4w9WgXcQ"))
            .await;

        let err = tokio_test::assert_err!(result);
        assert_eq!(err.kind(), ErrorKind::GenerationFailure);
        assert!(err.to_string().contains("model not found"));
        assert_eq!(source.calls(), 1);
        assert_eq!(generator.outline_calls(), 1);
        assert_eq!(generator.article_calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let orchestrator = orchestrator(
            Arc::new(StubSource::ok()),
            Arc::new(StubGenerator::new(false)),
        );
        let request = GenerationRequest::new("https://youtu.be/dQw4w9WgXcQ");

        let first = tokio_test::assert_ok!(orchestrator.run(&request).await);
        let second = tokio_test::assert_ok!(orchestrator.run(&request).await);

        assert_eq!(first.article, second.article);
        assert_eq!(first.outline, second.outline);
        assert_eq!(first.transcript, second.transcript);
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn test_probe_reports_availability() {
        let orchestrator = orchestrator(
            Arc::new(StubSource::ok()),
            Arc::new(StubGenerator::new(false)),
        );

        let report = orchestrator.probe("dQw4w9WgXcQ").await;
        assert!(report.transcript_available);
        assert_eq!(report.transcript_length, Some(43));
        assert_eq!(
            report.preview.as_deref(),
            Some("rust makes systems programming\napproachable")
        );
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_probe_reports_failures() {
        let source = Arc::new(StubSource::failing());
        let generator = Arc::new(StubGenerator::new(false));
        let orchestrator = orchestrator(source, generator.clone());

        let report = orchestrator.probe("dQw4w9WgXcQ").await;
        assert!(!report.transcript_available);
        assert!(report.error.unwrap().contains("disabled"));
        assert_eq!(generator.outline_calls(), 0);

        let report = orchestrator.probe("not-an-id").await;
        assert!(!report.transcript_available);
        let error = report.error.unwrap();
        assert!(error.starts_with("Invalid video ID"));
        assert!(error.contains("not-an-id"));
        assert!(!error.contains("URL"));
    }
}
