use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a file from being identified at all.
///
/// Format problems inside a file are not errors; they leave the
/// identification with an unknown console instead.
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The path exists but is not a regular file
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),
}
