//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{BlogError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Generation needs yt-dlp and a usable backend configuration.
    Generate,
    /// Probing only needs yt-dlp.
    Probe,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Generate => {
            check_tool(&settings.transcript.yt_dlp_path)?;
            check_backend(settings)?;
        }
        Operation::Probe => {
            check_tool(&settings.transcript.yt_dlp_path)?;
        }
    }
    Ok(())
}

/// Check the generation backend settings are usable.
///
/// Hosted OpenAI needs a key; local OpenAI-compatible servers do not.
fn check_backend(settings: &Settings) -> Result<()> {
    let generation = &settings.generation;
    if generation.model.trim().is_empty() {
        return Err(BlogError::Config("generation.model is empty".to_string()));
    }
    if !generation.api_base.starts_with("http://") && !generation.api_base.starts_with("https://") {
        return Err(BlogError::Config(format!(
            "generation.api_base must be an http(s) URL, got '{}'",
            generation.api_base
        )));
    }
    if generation.api_base.contains("api.openai.com") && generation.api_key().is_none() {
        return Err(BlogError::Config(format!(
            "{} not set. Set it with: export {}='sk-...'",
            generation.api_key_env, generation.api_key_env
        )));
    }
    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(BlogError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BlogError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(BlogError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
