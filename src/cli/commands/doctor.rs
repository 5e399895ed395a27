//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{GenerationSettings, Settings};
use console::style;
use std::path::Path;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Print a group of checks under a heading and collect them.
fn print_group(title: &str, group: Vec<CheckResult>, all: &mut Vec<CheckResult>) {
    println!("{}", style(title).bold());
    for check in &group {
        check.print();
    }
    println!();
    all.extend(group);
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("vidblog doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    print_group(
        "External Tools",
        vec![check_tool(&settings.transcript.yt_dlp_path, install_hint_ytdlp())],
        &mut checks,
    );

    print_group(
        "Generation Backend",
        vec![
            check_generation_settings(&settings.generation),
            check_api_key(&settings.generation),
        ],
        &mut checks,
    );

    print_group("Configuration", vec![check_config_file(config_path)], &mut checks);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before generating posts.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! vidblog is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            let version_display: String = if version.chars().count() > 50 {
                format!("{}...", version.chars().take(50).collect::<String>())
            } else {
                version
            };

            CheckResult::ok(name, &version_display)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check the model and endpoint look usable.
fn check_generation_settings(generation: &GenerationSettings) -> CheckResult {
    let name = "Model";
    if generation.model.trim().is_empty() {
        return CheckResult::error(name, "not configured", "Set generation.model in the config file");
    }
    if !generation.api_base.starts_with("http://") && !generation.api_base.starts_with("https://") {
        return CheckResult::error(
            name,
            &format!("invalid endpoint '{}'", generation.api_base),
            "generation.api_base must start with http:// or https://",
        );
    }
    CheckResult::ok(
        name,
        &format!("{} at {}", generation.model, generation.api_base),
    )
}

/// Check the API key. Local backends usually run without one, so a missing key only warns.
fn check_api_key(generation: &GenerationSettings) -> CheckResult {
    let name = generation.api_key_env.as_str();
    match generation.api_key() {
        Some(key) if key.chars().count() > 12 => {
            let head: String = key.chars().take(4).collect();
            let tail: String = key.chars().skip(key.chars().count() - 4).collect();
            CheckResult::ok(name, &format!("configured ({}...{})", head, tail))
        }
        Some(_) => CheckResult::ok(name, "configured"),
        None if generation.api_base.contains("api.openai.com") => CheckResult::error(
            name,
            "not set",
            &format!("Set with: export {}='sk-...'", name),
        ),
        None => CheckResult::warning(
            name,
            "not set",
            "Fine for local backends such as Ollama; hosted APIs need a key",
        ),
    }
}

/// Check if the config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: vidblog config edit",
        )
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_missing_tool_is_error() {
        let result = check_tool("/nonexistent/yt-dlp-for-tests", install_hint_ytdlp());
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.message, "not found");
    }

    #[test]
    fn test_generation_settings() {
        let mut generation = GenerationSettings::default();
        assert_eq!(check_generation_settings(&generation).status, CheckStatus::Ok);

        generation.api_base = "localhost:11434".to_string();
        assert_eq!(check_generation_settings(&generation).status, CheckStatus::Error);

        generation.model = " ".to_string();
        assert_eq!(check_generation_settings(&generation).status, CheckStatus::Error);
    }

    #[test]
    fn test_missing_key_only_warns_for_local_backend() {
        let mut generation = GenerationSettings::default();
        generation.api_key_env = "VIDBLOG_DOCTOR_UNSET_KEY".to_string();
        assert_eq!(check_api_key(&generation).status, CheckStatus::Warning);

        generation.api_base = "https://api.openai.com/v1".to_string();
        assert_eq!(check_api_key(&generation).status, CheckStatus::Error);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(check_config_file(&path).status, CheckStatus::Warning);

        std::fs::write(&path, "").unwrap();
        assert_eq!(check_config_file(&path).status, CheckStatus::Ok);
    }
}
