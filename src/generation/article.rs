//! Article composition.

use super::{generation_failure, Outline, TextGenerator};
use crate::config::Prompts;
use crate::error::Result;
use crate::transcript::Transcript;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// The finished blog post text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub text: String,
}

impl Article {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Stage three of the pipeline: outline and transcript in, article out.
pub struct ArticleComposer {
    generator: Arc<dyn TextGenerator>,
    prompts: Prompts,
}

impl ArticleComposer {
    pub fn new(generator: Arc<dyn TextGenerator>, prompts: Prompts) -> Self {
        Self { generator, prompts }
    }

    /// Build the user message. Both substitutions are always made, even when empty.
    pub fn user_prompt(&self, outline: &str, transcript: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("outline".to_string(), outline.to_string());
        vars.insert("transcript".to_string(), transcript.to_string());
        self.prompts.render_with_custom(&self.prompts.article.user, &vars)
    }

    /// Compose the article with a single generation call.
    #[instrument(
        skip(self, outline, transcript),
        fields(video_id = %transcript.video_id, outline_len = outline.text.len())
    )]
    pub async fn compose_article(&self, outline: &Outline, transcript: &Transcript) -> Result<Article> {
        info!("Composing article");

        let user = self.user_prompt(&outline.text, &transcript.text);
        let text = self
            .generator
            .generate(&self.prompts.article.system, &user)
            .await
            .map_err(generation_failure)?;

        Ok(Article { text })
    }
}
