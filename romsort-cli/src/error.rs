use std::path::PathBuf;

use thiserror::Error;

use romsort_archive::ArchiveError;
use romsort_chd::ChdError;
use romsort_lib::IdentifyError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Identification could not start
    #[error(transparent)]
    Identify(#[from] IdentifyError),

    /// CHD header could not be read
    #[error("CHD error: {0}")]
    Chd(#[from] ChdError),

    /// Archive operation failed
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// A path argument does not exist
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
