use thiserror::Error;

/// Errors that can occur while inspecting or unpacking an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The file extension does not name a container we handle
    #[error("Unsupported archive type: {0}")]
    UnsupportedType(String),

    /// The format needs an external tool and none was found
    #[error("No extraction tool available for {0}")]
    ToolUnavailable(String),

    /// The external tool exited unsuccessfully
    #[error("Extraction tool failed (exit code {status}): {stderr}")]
    ToolFailed { status: i32, stderr: String },

    /// The external tool ran past its time limit and was killed
    #[error("Extraction tool timed out after {secs}s")]
    ToolTimeout { secs: u64 },

    /// Error reported by the zip reader or writer
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested entry is not in the archive
    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),
}

impl ArchiveError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedType(msg.into())
    }

    pub fn tool_unavailable(msg: impl Into<String>) -> Self {
        Self::ToolUnavailable(msg.into())
    }

    pub fn tool_failed(status: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ToolFailed {
            status: status.unwrap_or(-1),
            stderr: stderr.into(),
        }
    }

    pub fn entry_not_found(name: impl Into<String>) -> Self {
        Self::EntryNotFound(name.into())
    }
}
