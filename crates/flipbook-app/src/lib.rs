//! Flipbook Application
//!
//! Headless driver for the Flipbook editor: replays a JSON gesture script,
//! persists the frames and renders a playback sequence to PNG files.

mod cli;
mod runner;
mod script;

pub use cli::Cli;
pub use runner::{RunSummary, Runner};
pub use script::{Script, Step};

use flipbook_core::{ConfigError, EditorError, StorageError};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Script error: {0}")]
    Script(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
