//! Archive inspection for ROM collections.
//!
//! Finds out what is inside an archive without unpacking all of it: which
//! entries are ROMs, which are archives of their own, and how well the whole
//! thing compresses. Zip is handled in-process; other formats go through an
//! external [`ExtractionTool`].

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use romsort_core::util::entry_base_name;

pub mod analyzer;
pub mod error;
pub mod tool;
pub mod types;
pub mod zipfile;

pub use analyzer::ArchiveAnalyzer;
pub use error::ArchiveError;
pub use tool::{DEFAULT_TIMEOUT, ExtractionTool, SevenZipTool, locate_seven_zip};
pub use types::{ArchiveEntry, ArchiveInfo, ArchiveType};

/// Where an extracted entry lands: directly under `dest`, by base name.
///
/// Directory components inside the archive are dropped, which also keeps
/// `..` segments from escaping `dest`.
pub(crate) fn flat_destination(dest: &Path, entry: &str) -> Result<PathBuf, ArchiveError> {
    let base = entry_base_name(entry);
    if base.is_empty() || base == "." || base == ".." {
        return Err(ArchiveError::entry_not_found(entry));
    }
    Ok(dest.join(base))
}

/// A hidden scratch directory inside `dest`, removed on drop. Staging
/// there keeps the final `rename` on one filesystem.
pub(crate) fn staging_dir(dest: &Path) -> Result<TempDir, ArchiveError> {
    std::fs::create_dir_all(dest)?;
    Ok(tempfile::Builder::new().prefix(".romsort-").tempdir_in(dest)?)
}

/// `dest/<name of staged>`, or `name (1).ext`, `name (2).ext`, ... when that
/// path is already in `taken`.
pub(crate) fn unique_destination(dest: &Path, staged: &Path, taken: &[PathBuf]) -> PathBuf {
    let name = staged.file_name().unwrap_or(staged.as_os_str());
    let first = dest.join(name);
    if !taken.contains(&first) {
        return first;
    }

    let stem = staged
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = staged
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (1..)
        .map(|n| dest.join(format!("{} ({}){}", stem, n, ext)))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(first)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;
