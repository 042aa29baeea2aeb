//! Archive analysis, extraction and repacking.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use romsort_core::is_known_extension;
use romsort_core::util::entry_extension;

use crate::error::ArchiveError;
use crate::tool::{ExtractionTool, SevenZipTool};
use crate::types::{ArchiveEntry, ArchiveInfo, ArchiveType};
use crate::{staging_dir, unique_destination, zipfile};

/// Inspects archives, delegating non-zip formats to an optional tool.
pub struct ArchiveAnalyzer {
    tool: Option<Box<dyn ExtractionTool>>,
}

impl ArchiveAnalyzer {
    pub fn new(tool: Option<Box<dyn ExtractionTool>>) -> Self {
        Self { tool }
    }

    pub fn with_tool(tool: impl ExtractionTool + 'static) -> Self {
        Self::new(Some(Box::new(tool)))
    }

    /// Zip only.
    pub fn without_tool() -> Self {
        Self::new(None)
    }

    /// Use the system 7-Zip when one is installed.
    pub fn detect(timeout: Duration) -> Self {
        match SevenZipTool::detect(timeout) {
            Some(tool) => Self::with_tool(tool),
            None => Self::without_tool(),
        }
    }

    pub fn tool(&self) -> Option<&dyn ExtractionTool> {
        self.tool.as_deref()
    }

    pub fn has_tool(&self) -> bool {
        self.tool.is_some()
    }

    // -- Analysis --

    /// Analyze an archive. `None` when the path is not a recognized archive
    /// or cannot be read; the reason is logged at debug level.
    ///
    /// With `scan_nested`, archives inside the archive are opened one level
    /// deep and their ROMs reported as `<nested entry>/<inner name>`.
    pub fn analyze(&self, path: &Path, scan_nested: bool) -> Option<ArchiveInfo> {
        match self.try_analyze(path, scan_nested) {
            Ok(info) => Some(info),
            Err(e) => {
                log::debug!("{}: archive analysis failed: {}", path.display(), e);
                None
            }
        }
    }

    /// Like [`Self::analyze`], but reports why analysis could not start.
    ///
    /// Listing failures are not errors: the record comes back with its type
    /// set and no entries, and a warning is logged.
    pub fn try_analyze(&self, path: &Path, scan_nested: bool) -> Result<ArchiveInfo, ArchiveError> {
        let archive_type = ArchiveType::from_path(path)
            .ok_or_else(|| ArchiveError::unsupported(path.display().to_string()))?;
        if !fs::metadata(path)?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )
            .into());
        }

        let mut info = ArchiveInfo::new(path, archive_type);
        match self.list_entries(path, archive_type) {
            Ok(entries) => info.entries = entries,
            Err(e) => {
                log::warn!(
                    "Could not list {} archive {}: {}",
                    archive_type,
                    path.display(),
                    e
                );
                info.update_totals();
                return Ok(info);
            }
        }

        classify_entries(&mut info);
        if scan_nested {
            self.scan_nested(&mut info);
        }
        info.update_totals();

        log::debug!(
            "{}: {} entries, {} ROM(s), {} nested archive(s)",
            path.display(),
            info.entries.len(),
            info.rom_payload_names.len(),
            info.nested_archive_names.len()
        );
        Ok(info)
    }

    fn list_entries(
        &self,
        path: &Path,
        archive_type: ArchiveType,
    ) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        match archive_type {
            ArchiveType::Zip => zipfile::list_entries(path),
            // CHD images hold hunks, not files.
            ArchiveType::Chd => Ok(Vec::new()),
            other => self.require_tool(other)?.list(path),
        }
    }

    fn require_tool(&self, archive_type: ArchiveType) -> Result<&dyn ExtractionTool, ArchiveError> {
        self.tool()
            .ok_or_else(|| ArchiveError::tool_unavailable(archive_type.name()))
    }

    fn scan_nested(&self, info: &mut ArchiveInfo) {
        for nested in info.nested_archive_names.clone() {
            match self.payloads_in_nested(&info.path, info.archive_type, &nested) {
                Ok(inner) => info
                    .rom_payload_names
                    .extend(inner.into_iter().map(|name| format!("{}/{}", nested, name))),
                Err(e) => log::warn!(
                    "Skipping nested archive {} in {}: {}",
                    nested,
                    info.path.display(),
                    e
                ),
            }
        }
    }

    /// Extract a nested archive to a scratch directory and list its ROMs.
    fn payloads_in_nested(
        &self,
        outer: &Path,
        outer_type: ArchiveType,
        nested: &str,
    ) -> Result<Vec<String>, ArchiveError> {
        let scratch = scratch_dir()?;
        let extracted = self.extract_typed(outer, outer_type, nested, scratch.path())?;
        let inner = self.try_analyze(&extracted, false)?;
        Ok(inner.rom_payload_names)
    }

    // -- Extraction --

    /// Extract one entry into `dest` under its base name.
    pub fn extract_file_from_archive(&self, archive: &Path, entry: &str, dest: &Path) -> bool {
        match self.extract_entry(archive, entry, dest) {
            Ok(path) => {
                log::debug!("Extracted {} to {}", entry, path.display());
                true
            }
            Err(e) => {
                log::warn!("Failed to extract {} from {}: {}", entry, archive.display(), e);
                false
            }
        }
    }

    /// Like [`Self::extract_file_from_archive`], returning the written path.
    pub fn extract_entry(&self, archive: &Path, entry: &str, dest: &Path) -> Result<PathBuf, ArchiveError> {
        let archive_type = ArchiveType::from_path(archive)
            .ok_or_else(|| ArchiveError::unsupported(archive.display().to_string()))?;
        self.extract_typed(archive, archive_type, entry, dest)
    }

    fn extract_typed(
        &self,
        archive: &Path,
        archive_type: ArchiveType,
        entry: &str,
        dest: &Path,
    ) -> Result<PathBuf, ArchiveError> {
        match archive_type {
            ArchiveType::Zip => zipfile::extract_entry(archive, entry, dest),
            ArchiveType::Chd => Err(ArchiveError::unsupported("CHD images have no entries")),
            other => self.require_tool(other)?.extract(archive, entry, dest),
        }
    }

    /// Extract every ROM in `archive` (including ROMs inside nested
    /// archives) into `dest`. Returns the paths that exist afterwards.
    ///
    /// Payloads sharing a base name are kept apart as `game.nes`,
    /// `game (1).nes`, `game (2).nes` in payload order.
    pub fn extract_all_roms_from_archive(&self, archive: &Path, dest: &Path) -> Vec<PathBuf> {
        let Some(info) = self.analyze(archive, true) else {
            return Vec::new();
        };

        let mut extracted = Vec::new();
        for payload in &info.rom_payload_names {
            match self.extract_payload(&info, payload, dest, &extracted) {
                Ok(path) => extracted.push(path),
                Err(e) => log::warn!(
                    "Failed to extract {} from {}: {}",
                    payload,
                    archive.display(),
                    e
                ),
            }
        }
        extracted
    }

    /// Stage one payload in a scratch directory under `dest`, then move it
    /// to a name none of `taken` uses.
    fn extract_payload(
        &self,
        info: &ArchiveInfo,
        payload: &str,
        dest: &Path,
        taken: &[PathBuf],
    ) -> Result<PathBuf, ArchiveError> {
        let staging = staging_dir(dest)?;
        let staged = match info.split_nested_payload(payload) {
            Some((nested, inner)) => self.extract_from_nested(info, nested, inner, staging.path())?,
            None => self.extract_typed(&info.path, info.archive_type, payload, staging.path())?,
        };
        if !staged.is_file() {
            return Err(ArchiveError::entry_not_found(payload));
        }

        let target = unique_destination(dest, &staged, taken);
        fs::rename(&staged, &target)?;
        Ok(target)
    }

    fn extract_from_nested(
        &self,
        outer: &ArchiveInfo,
        nested: &str,
        inner: &str,
        dest: &Path,
    ) -> Result<PathBuf, ArchiveError> {
        let scratch = scratch_dir()?;
        let nested_path = self.extract_typed(&outer.path, outer.archive_type, nested, scratch.path())?;
        self.extract_entry(&nested_path, inner, dest)
    }

    // -- Creation --

    /// Pack `files` into a new archive at `dest`.
    ///
    /// Zip is written in-process with maximum deflate; 7z needs the tool.
    pub fn create_optimized_archive(&self, files: &[PathBuf], dest: &Path, format: ArchiveType) -> bool {
        match self.create_archive(files, dest, format) {
            Ok(()) => {
                log::debug!("Created {} archive {}", format, dest.display());
                true
            }
            Err(e) => {
                log::warn!("Failed to create {}: {}", dest.display(), e);
                false
            }
        }
    }

    /// Like [`Self::create_optimized_archive`], reporting the failure.
    pub fn create_archive(&self, files: &[PathBuf], dest: &Path, format: ArchiveType) -> Result<(), ArchiveError> {
        if files.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "no input files").into());
        }
        match format {
            ArchiveType::Zip => zipfile::write_archive(files, dest),
            ArchiveType::SevenZip => self.require_tool(format)?.create(files, dest),
            other => Err(ArchiveError::unsupported(format!(
                "cannot create {} archives",
                other
            ))),
        }
    }

    /// 7z when any file is a ROM and the tool is available, otherwise zip.
    pub fn best_compression_format(&self, files: &[PathBuf]) -> ArchiveType {
        let has_rom = files.iter().any(|f| {
            f.extension()
                .and_then(|e| e.to_str())
                .is_some_and(is_known_extension)
        });
        if has_rom && self.has_tool() {
            ArchiveType::SevenZip
        } else {
            ArchiveType::Zip
        }
    }
}

/// Sort entries into nested archives and ROM payloads. Everything else
/// (readmes, artwork, directories) is ignored.
fn classify_entries(info: &mut ArchiveInfo) {
    for entry in &info.entries {
        match ArchiveType::from_name(&entry.name) {
            Some(ty) if ty.is_nestable() => info.nested_archive_names.push(entry.name.clone()),
            _ => {
                if entry_extension(&entry.name).is_some_and(|ext| is_known_extension(&ext)) {
                    info.rom_payload_names.push(entry.name.clone());
                }
            }
        }
    }
}

fn scratch_dir() -> Result<TempDir, ArchiveError> {
    Ok(tempfile::Builder::new().prefix("romsort-").tempdir()?)
}

#[cfg(test)]
#[path = "tests/analyzer_tests.rs"]
mod tests;
