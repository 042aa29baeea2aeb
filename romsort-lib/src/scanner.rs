//! Directory scanner.
//!
//! Collects the files under a directory that the identification pipeline
//! can say something about: files with a known ROM extension and archives.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use romsort_archive::ArchiveType;
use romsort_core::is_known_extension;

/// Options for [`scan_candidates`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Keep `.bin`/`.img`/`.iso` files that share a stem with a `.cue`.
    pub keep_cue_data: bool,
}

/// Whether the pipeline has anything to say about `path`.
pub fn is_candidate(path: &Path) -> bool {
    if ArchiveType::from_path(path).is_some() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_known_extension)
}

/// Collect candidate files under `root`, sorted by path.
///
/// A file path is returned as-is. Hidden entries (leading `.`) are skipped.
/// Unless `keep_cue_data` is set, raw disc data files covered by a `.cue`
/// sheet in the same directory are dropped so each disc is reported once.
pub fn scan_candidates(root: &Path, options: ScanOptions) -> std::io::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut found = Vec::new();
    scan_dir(root, options, &mut found)?;
    found.sort();
    Ok(found)
}

fn scan_dir(dir: &Path, options: ScanOptions, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| !is_hidden(p))
        .collect();
    entries.sort();

    let mut files = Vec::new();
    for path in entries {
        if path.is_file() {
            if is_candidate(&path) {
                files.push(path);
            }
        } else if path.is_dir() && options.recursive {
            if let Err(e) = scan_dir(&path, options, found) {
                log::warn!("Skipping {}: {}", path.display(), e);
            }
        }
    }

    if !options.keep_cue_data {
        let cue_stems = collect_cue_stems(&files);
        if !cue_stems.is_empty() {
            files.retain(|p| !is_data_file_covered_by_cue(p, &cue_stems));
        }
    }

    found.extend(files);
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn lower_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

fn lower_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// Lower-case stems of every `.cue` file in `files`.
fn collect_cue_stems(files: &[PathBuf]) -> HashSet<String> {
    files
        .iter()
        .filter(|p| lower_extension(p) == "cue")
        .map(|p| lower_stem(p))
        .collect()
}

/// A disc data file whose stem matches a cue sheet.
fn is_data_file_covered_by_cue(path: &Path, cue_stems: &HashSet<String>) -> bool {
    matches!(lower_extension(path).as_str(), "bin" | "img" | "iso")
        && cue_stems.contains(&lower_stem(path))
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
