//! CLI command implementations.

mod config;
mod doctor;
mod generate;
mod probe;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use generate::{run_generate, run_with_progress, write_article};
pub use probe::run_probe;
pub use serve::run_serve;
