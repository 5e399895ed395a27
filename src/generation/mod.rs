//! Text generation stages.
//!
//! Both stages talk to the backend through a shared [`TextGenerator`] handle so the
//! pipeline can run against stub generators in tests.

mod article;
mod openai;
mod outline;

pub use article::{Article, ArticleComposer};
pub use openai::OpenAIGenerator;
pub use outline::{Outline, OutlineGenerator, ParsedOutline};

use crate::error::Result;
use async_trait::async_trait;

/// An opaque text-to-text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation call with a system and a user message.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Fold any backend error into a generation failure, keeping its message.
pub(crate) fn generation_failure(err: crate::error::BlogError) -> crate::error::BlogError {
    use crate::error::BlogError;
    match err {
        BlogError::Generation(msg) => BlogError::Generation(msg),
        other => BlogError::Generation(other.to_string()),
    }
}
