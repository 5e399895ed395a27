//! Outline generation.

use super::{generation_failure, TextGenerator};
use crate::config::Prompts;
use crate::error::Result;
use crate::transcript::Transcript;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Raw outline text as returned by the backend.
///
/// The title plus ten bullets shape is a prompt convention only; nothing here
/// rejects output that does not follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub text: String,
}

/// Best-effort structured reading of an [`Outline`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOutline {
    pub title: Option<String>,
    pub topics: Vec<String>,
}

impl Outline {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Read a title and bullet topics out of the text.
    ///
    /// Recognizes `Title: ...` lines (any case, optional markdown emphasis) or a
    /// leading markdown heading for the title, and `-`, `*`, `•` or `1.`/`1)`
    /// prefixed lines for topics.
    pub fn parse(&self) -> ParsedOutline {
        let mut parsed = ParsedOutline::default();

        for line in self.text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if parsed.title.is_none() {
                if let Some(title) = title_from_line(line) {
                    parsed.title = Some(title);
                    continue;
                }
            }

            if let Some(topic) = bullet_text(line) {
                if !topic.is_empty() {
                    parsed.topics.push(topic);
                }
            }
        }

        parsed
    }
}

fn strip_emphasis(s: &str) -> String {
    s.trim_matches(|c: char| matches!(c, '*' | '_' | '"' | '\'') || c.is_whitespace())
        .to_string()
}

fn title_from_line(line: &str) -> Option<String> {
    if let Some(heading) = line.strip_prefix('#') {
        let heading = heading.trim_start_matches('#');
        let heading = strip_emphasis(heading);
        return (!heading.is_empty()).then_some(heading);
    }

    let plain = line.trim_start_matches(['*', '_', '-', ' ']);
    let (label, rest) = plain.split_once(':')?;
    let label = strip_emphasis(label).to_lowercase();
    if label.contains("title") {
        let title = strip_emphasis(rest);
        return (!title.is_empty()).then_some(title);
    }
    None
}

fn bullet_text(line: &str) -> Option<String> {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(strip_emphasis(&rest.replace("**", "")));
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(strip_emphasis(&rest.replace("**", "")));
        }
    }
    None
}

/// Stage two of the pipeline: transcript in, outline out.
pub struct OutlineGenerator {
    generator: Arc<dyn TextGenerator>,
    prompts: Prompts,
}

impl OutlineGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, prompts: Prompts) -> Self {
        Self { generator, prompts }
    }

    /// Build the user message for a transcript.
    pub fn user_prompt(&self, transcript: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());
        self.prompts.render_with_custom(&self.prompts.outline.user, &vars)
    }

    /// Generate an outline from a transcript with a single generation call.
    #[instrument(skip(self, transcript), fields(video_id = %transcript.video_id, model = %self.generator.model()))]
    pub async fn generate_outline(&self, transcript: &Transcript) -> Result<Outline> {
        info!("Generating outline");

        let user = self.user_prompt(&transcript.text);
        let text = self
            .generator
            .generate(&self.prompts.outline.system, &user)
            .await
            .map_err(generation_failure)?;

        Ok(Outline { text })
    }
}
