//! YouTube caption source backed by yt-dlp.
//!
//! yt-dlp resolves the caption track listing for a video; the selected track is then
//! downloaded in YouTube's `json3` timed-text format.

use super::{CaptionFragment, CaptionSource, Captions, VideoId};
use crate::config::TranscriptSettings;
use crate::error::{BlogError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Caption source that asks yt-dlp for the track listing.
pub struct YtDlpCaptionSource {
    yt_dlp_path: String,
    timeout: Duration,
    http: reqwest::Client,
}

/// A caption track chosen from yt-dlp's listing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrackChoice {
    pub language: String,
    pub url: String,
    pub auto_generated: bool,
}

impl YtDlpCaptionSource {
    /// Create a source from transcript settings.
    pub fn with_settings(settings: &TranscriptSettings) -> Result<Self> {
        Self::with_timeout(
            &settings.yt_dlp_path,
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    /// Create a source with a custom binary and timeout.
    pub fn with_timeout(yt_dlp_path: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BlogError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            yt_dlp_path: yt_dlp_path.to_string(),
            timeout,
            http,
        })
    }

    /// Fetch video info using yt-dlp.
    async fn fetch_info(&self, video_id: &VideoId) -> Result<Value> {
        let url = video_id.watch_url();

        let mut command = tokio::process::Command::new(&self.yt_dlp_path);
        command
            .args(["--dump-json", "--skip-download", "--no-warnings", &url])
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                BlogError::TranscriptUnavailable(format!(
                    "yt-dlp did not answer within {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BlogError::ToolNotFound(self.yt_dlp_path.clone())
                } else {
                    BlogError::TranscriptUnavailable(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BlogError::TranscriptUnavailable(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&json_str).map_err(|e| {
            BlogError::TranscriptUnavailable(format!("Failed to parse yt-dlp output: {}", e))
        })
    }

    /// Pick a track for the first requested language that has one.
    ///
    /// For each language, manually created subtitles are preferred over automatic
    /// captions. Languages are tried strictly in order.
    pub(crate) fn select_track(info: &Value, languages: &[String]) -> Option<TrackChoice> {
        for language in languages {
            for (key, auto_generated) in [("subtitles", false), ("automatic_captions", true)] {
                let Some(formats) = info[key][language.as_str()].as_array() else {
                    continue;
                };

                let json3 = formats
                    .iter()
                    .find(|f| f["ext"].as_str() == Some("json3"))
                    .and_then(|f| f["url"].as_str());

                if let Some(url) = json3 {
                    return Some(TrackChoice {
                        language: language.clone(),
                        url: url.to_string(),
                        auto_generated,
                    });
                }
            }
        }
        None
    }

    /// Describe why no track could be selected.
    fn no_track_reason(info: &Value, video_id: &VideoId, languages: &[String]) -> String {
        let available: Vec<&str> = ["subtitles", "automatic_captions"]
            .iter()
            .filter_map(|key| info[*key].as_object())
            .flat_map(|tracks| tracks.keys().map(String::as_str))
            .collect();

        if available.is_empty() {
            format!("Subtitles are disabled for video {}", video_id)
        } else {
            format!(
                "No transcripts were found for video {} in any of the requested languages {:?}",
                video_id, languages
            )
        }
    }

    /// Download a caption track body.
    async fn download_track(&self, url: &str) -> Result<String> {
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    /// Parse a `json3` timed-text document into caption fragments.
    pub(crate) fn parse_json3(body: &str) -> Result<Vec<CaptionFragment>> {
        let doc: Json3Document = serde_json::from_str(body).map_err(|e| {
            BlogError::TranscriptUnavailable(format!("Failed to parse caption track: {}", e))
        })?;

        let fragments = doc
            .events
            .into_iter()
            .filter_map(|event| {
                let text: String = event
                    .segs
                    .unwrap_or_default()
                    .into_iter()
                    .map(|s| s.utf8)
                    .collect();

                if text.trim().is_empty() {
                    return None;
                }

                Some(CaptionFragment {
                    text,
                    start_seconds: event.t_start_ms as f64 / 1000.0,
                    duration_seconds: event.d_duration_ms as f64 / 1000.0,
                })
            })
            .collect();

        Ok(fragments)
    }
}

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

#[async_trait]
impl CaptionSource for YtDlpCaptionSource {
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch_captions(&self, video_id: &VideoId, languages: &[String]) -> Result<Captions> {
        let info = self.fetch_info(video_id).await?;

        let track = Self::select_track(&info, languages).ok_or_else(|| {
            BlogError::TranscriptUnavailable(Self::no_track_reason(&info, video_id, languages))
        })?;

        debug!(
            "Using '{}' track (auto-generated: {})",
            track.language, track.auto_generated
        );

        let body = self.download_track(&track.url).await?;
        let fragments = Self::parse_json3(&body)?;

        Ok(Captions {
            language: track.language,
            fragments,
        })
    }
}
