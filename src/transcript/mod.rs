//! Transcript extraction.
//!
//! Resolves a video reference to a [`VideoId`], asks a [`CaptionSource`] for captions
//! in the preferred languages and flattens them into a plain-text [`Transcript`].

mod video_id;
mod youtube;

pub use video_id::VideoId;
pub use youtube::YtDlpCaptionSource;

use crate::error::{BlogError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A single timed caption fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFragment {
    pub text: String,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

/// Captions fetched for one video in one language.
#[derive(Debug, Clone)]
pub struct Captions {
    /// Language code of the track that matched.
    pub language: String,
    /// Fragments in playback order.
    pub fragments: Vec<CaptionFragment>,
}

/// Upstream provider of caption data.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch captions for a video.
    ///
    /// `languages` is in order of preference; the first language with captions wins.
    async fn fetch_captions(&self, video_id: &VideoId, languages: &[String]) -> Result<Captions>;
}

/// Plain-text transcript of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub language: String,
    pub text: String,
}

impl Transcript {
    /// Flatten caption fragments into one text block.
    ///
    /// Timing is dropped. Each fragment's internal whitespace is collapsed and
    /// fragments are joined by newlines in their original order.
    pub fn from_captions(video_id: VideoId, captions: Captions) -> Self {
        let text = captions
            .fragments
            .iter()
            .map(|f| f.text.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            video_id,
            language: captions.language,
            text,
        }
    }

    /// Length of the transcript in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The first `max_chars` characters, with an ellipsis when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &self.text[..idx]),
            None => self.text.clone(),
        }
    }
}

/// Stage one of the pipeline: reference in, transcript out.
pub struct TranscriptExtractor {
    source: Arc<dyn CaptionSource>,
    languages: Vec<String>,
}

impl TranscriptExtractor {
    pub fn new(source: Arc<dyn CaptionSource>, languages: Vec<String>) -> Self {
        let languages = if languages.is_empty() {
            vec!["en".to_string()]
        } else {
            languages
        };
        Self { source, languages }
    }

    /// Default preferred languages.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Extract the transcript for a video reference using the default languages.
    pub async fn extract(&self, reference: &str) -> Result<Transcript> {
        self.extract_in(reference, &self.languages).await
    }

    /// Extract the transcript for a video reference with explicit languages.
    pub async fn extract_in(&self, reference: &str, languages: &[String]) -> Result<Transcript> {
        let video_id = VideoId::parse(reference)?;
        self.extract_id(&video_id, languages).await
    }

    /// Extract the transcript for an already validated identifier.
    #[instrument(skip(self), fields(video_id = %video_id))]
    pub async fn extract_id(&self, video_id: &VideoId, languages: &[String]) -> Result<Transcript> {
        info!("Fetching captions");

        let captions = self
            .source
            .fetch_captions(video_id, languages)
            .await
            .map_err(|e| match e {
                BlogError::TranscriptUnavailable(msg) => BlogError::TranscriptUnavailable(msg),
                other => BlogError::TranscriptUnavailable(other.to_string()),
            })?;

        debug!(
            "Received {} fragments in '{}'",
            captions.fragments.len(),
            captions.language
        );

        let transcript = Transcript::from_captions(video_id.clone(), captions);
        if transcript.text.trim().is_empty() {
            return Err(BlogError::TranscriptUnavailable(format!(
                "Transcript for {} is empty",
                video_id
            )));
        }

        info!("Transcript ready ({} chars)", transcript.char_len());
        Ok(transcript)
    }
}
