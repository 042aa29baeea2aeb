use thiserror::Error;

/// Errors that can occur while reading a CHD header.
///
/// None of these reach callers of [`crate::parse`]; they exist so the
/// failure path can be logged and tested precisely.
#[derive(Debug, Error)]
pub enum ChdError {
    /// The file does not start with the CHD signature
    #[error("not a CHD image (signature mismatch)")]
    NotThisFormat,

    /// The file ended before a complete header could be read
    #[error("CHD header truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: u64, actual: u64 },

    /// I/O error while reading the image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChdError {
    pub fn truncated(expected: usize, actual: usize) -> Self {
        Self::Truncated {
            expected: expected as u64,
            actual: actual as u64,
        }
    }

    /// Whether this error only means "some other kind of file".
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::NotThisFormat)
    }
}
