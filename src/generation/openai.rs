//! OpenAI-compatible chat completion generator.

use super::TextGenerator;
use crate::config::GenerationSettings;
use crate::error::{BlogError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Generator backed by any OpenAI-compatible chat completions endpoint.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl OpenAIGenerator {
    /// Create a generator from settings.
    pub fn with_settings(settings: &GenerationSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAIGenerator {
    #[instrument(skip(self, system, user), fields(model = %self.model, prompt_len = user.len()))]
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| BlogError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.to_string())
                .build()
                .map_err(|e| BlogError::Generation(e.to_string()))?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages);
        if let Some(temperature) = self.temperature {
            args.temperature(temperature);
        }
        let request = args
            .build()
            .map_err(|e| BlogError::Generation(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            BlogError::Generation(format!("Failed to generate response: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| BlogError::Generation("Empty response from LLM".to_string()))?
            .clone();

        debug!("Generated {} chars", content.len());
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
