//! Configuration module for vidblog.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ArticlePrompts, OutlinePrompts, Prompts};
pub use settings::{
    GeneralSettings, GenerationSettings, PromptSettings, ServerSettings, Settings,
    TranscriptSettings,
};
