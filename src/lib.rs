//! vidblog - YouTube video to blog post
//!
//! Turns a YouTube video into a written blog article: fetch the caption transcript,
//! ask a language model for an outline, then ask it again to expand the outline into
//! a full post.
//!
//! # Architecture
//!
//! - `transcript` - Video reference parsing and caption retrieval
//! - `generation` - Outline and article stages over a shared text generator
//! - `orchestrator` - Runs the stages in sequence
//! - `config` - Settings and prompt templates
//! - `cli` - Command-line and HTTP front ends
//!
//! # Example
//!
//! ```rust,no_run
//! use vidblog::config::Settings;
//! use vidblog::orchestrator::{GenerationRequest, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(Settings::load()?)?;
//!
//!     let request = GenerationRequest::new("https://youtu.be/dQw4w9WgXcQ");
//!     let result = orchestrator.run(&request).await?;
//!     println!("{}", result.article.as_str());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod openai;
pub mod orchestrator;
pub mod transcript;

pub use error::{BlogError, ErrorKind, Result};
