//! CLI module for vidblog.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{content_preview, format_elapsed, Output};

use clap::{Parser, Subcommand};

/// vidblog - YouTube video to blog post
///
/// Fetches a video's transcript, drafts an outline with a language model and
/// expands it into a formatted blog post.
#[derive(Parser, Debug)]
#[command(name = "vidblog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a blog post from a YouTube video and write it to a file
    Generate {
        /// YouTube video URL (prompted for when omitted)
        url: Option<String>,

        /// Output file (defaults to general.output_path, blog_post.txt)
        #[arg(short, long)]
        output: Option<String>,

        /// Also print the transcript and outline
        #[arg(long)]
        show_steps: bool,

        /// Caption languages in order of preference (overrides config)
        #[arg(short, long, value_delimiter = ',')]
        languages: Option<Vec<String>>,
    },

    /// Check whether a transcript is available for a video ID
    Probe {
        /// Bare 11-character video ID
        video_id: String,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "vidblog",
            "-vv",
            "generate",
            "https://youtu.be/dQw4w9WgXcQ",
            "-o",
            "post.md",
            "--languages",
            "de,en",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate {
                url,
                output,
                show_steps,
                languages,
            } => {
                assert_eq!(url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
                assert_eq!(output.as_deref(), Some("post.md"));
                assert!(!show_steps);
                assert_eq!(languages, Some(vec!["de".to_string(), "en".to_string()]));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_generate_without_url() {
        let cli = Cli::parse_from(["vidblog", "generate"]);
        assert!(matches!(cli.command, Commands::Generate { url: None, .. }));
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["vidblog", "serve"]);
        assert!(matches!(
            cli.command,
            Commands::Serve {
                host: None,
                port: None
            }
        ));
    }
}
