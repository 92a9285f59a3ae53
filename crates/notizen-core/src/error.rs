use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Relocation {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid conversion command: {0}")]
    Command(String),

    #[error("Failed to open output {} for `{invocation}`: {source}", .path.display())]
    Output {
        path: PathBuf,
        invocation: String,
        source: std::io::Error,
    },

    #[error("Failed to launch `{invocation}`: {source}")]
    Spawn {
        invocation: String,
        source: std::io::Error,
    },

    #[error("Failed to poll `{invocation}`: {source}")]
    Poll {
        invocation: String,
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Render error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("Failed to write index {}: {source}", .path.display())]
    IndexWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
