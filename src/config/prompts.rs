//! Prompt templates for vidblog.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub outline: OutlinePrompts,
    pub article: ArticlePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the outline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlinePrompts {
    pub system: String,
    pub user: String,
}

impl Default for OutlinePrompts {
    fn default() -> Self {
        Self {
            system: "You are a blog research assistant.".to_string(),

            user: r#"Analyze the transcript below and create:
- A blog title suggestion
- A structured outline with 10 bullet points (each bullet = a future paragraph).

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

/// Prompts for the article stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticlePrompts {
    pub system: String,
    pub user: String,
}

impl Default for ArticlePrompts {
    fn default() -> Self {
        Self {
            system: "You are a professional blog writer.".to_string(),

            user: r#"Using the outline below and referencing the transcript,
write a well-structured blog post with:
- 1 introduction paragraph
- 8 content paragraphs
- 1 conclusion paragraph
- Add engaging headings for each section.

Outline:
{{outline}}

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let outline_path = custom_path.join("outline.toml");
            if outline_path.exists() {
                let content = std::fs::read_to_string(&outline_path)?;
                prompts.outline = toml::from_str(&content)?;
            }

            let article_path = custom_path.join("article.toml");
            if article_path.exists() {
                let content = std::fs::read_to_string(&article_path)?;
                prompts.article = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass over the template, so `{{...}}` sequences inside
    /// substituted values (transcripts are user content) are never expanded again.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = &after[..end];
                    match vars.get(key) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
