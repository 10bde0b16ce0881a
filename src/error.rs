//! Error types for loading game configuration

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the host. The simulation itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
