//! OpenAI-compatible client construction.

use crate::config::GenerationSettings;
use crate::error::{BlogError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a chat client for the configured backend.
///
/// The API key is optional: local backends such as Ollama ignore it.
pub fn create_client(settings: &GenerationSettings) -> Result<Client<OpenAIConfig>> {
    let mut config = OpenAIConfig::new().with_api_base(settings.api_base.trim_end_matches('/'));
    if let Some(key) = settings.api_key() {
        config = config.with_api_key(key);
    }

    create_client_with_timeout(config, Duration::from_secs(settings.timeout_seconds))
}

/// Create a client with a custom timeout.
pub fn create_client_with_timeout(
    config: OpenAIConfig,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BlogError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Client::with_config(config)
        .with_http_client(http_client)
        .with_backoff(no_retry()))
}

/// A backoff policy that gives up after the first failed attempt.
///
/// Rate limits and server errors surface to the caller instead of being retried.
fn no_retry() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}
