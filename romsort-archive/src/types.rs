use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use romsort_core::util::file_name_lower;

use crate::error::ArchiveError;

/// Container formats recognized by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum ArchiveType {
    Zip,
    SevenZip,
    Rar,
    Tar,
    TarGz,
    TarBz2,
    TarXz,
    Lzh,
    Arj,
    Cab,
    Iso,
    Chd,
}

/// Suffix table. Compound suffixes come first so `.tar.gz` is not read as
/// a plain `.tar`.
const SUFFIXES: &[(&str, ArchiveType)] = &[
    (".tar.gz", ArchiveType::TarGz),
    (".tar.bz2", ArchiveType::TarBz2),
    (".tar.xz", ArchiveType::TarXz),
    (".tgz", ArchiveType::TarGz),
    (".tbz2", ArchiveType::TarBz2),
    (".txz", ArchiveType::TarXz),
    (".zip", ArchiveType::Zip),
    (".7z", ArchiveType::SevenZip),
    (".rar", ArchiveType::Rar),
    (".tar", ArchiveType::Tar),
    (".lzh", ArchiveType::Lzh),
    (".lha", ArchiveType::Lzh),
    (".arj", ArchiveType::Arj),
    (".cab", ArchiveType::Cab),
    (".iso", ArchiveType::Iso),
    (".chd", ArchiveType::Chd),
];

impl ArchiveType {
    /// Detect the type from a file or entry name. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.len() > suffix.len() && lower.ends_with(suffix))
            .map(|(_, ty)| *ty)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_name(&file_name_lower(path))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::SevenZip => "7z",
            Self::Rar => "rar",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::Lzh => "lzh",
            Self::Arj => "arj",
            Self::Cab => "cab",
            Self::Iso => "iso",
            Self::Chd => "chd",
        }
    }

    /// File extension used when writing an archive of this type.
    pub fn extension(&self) -> String {
        format!(".{}", self.name())
    }

    /// Disc images are ROM payloads in their own right, not containers to
    /// recurse into.
    pub fn is_disc_image(&self) -> bool {
        matches!(self, Self::Iso | Self::Chd)
    }

    pub fn is_nestable(&self) -> bool {
        !self.is_disc_image()
    }

    /// Zip is read in-process; everything else goes through the external tool.
    pub fn needs_tool(&self) -> bool {
        !matches!(self, Self::Zip)
    }

    /// Every suffix that maps to a type.
    pub fn suffixes() -> impl Iterator<Item = &'static str> {
        SUFFIXES.iter().map(|(suffix, _)| *suffix)
    }
}

impl From<ArchiveType> for &'static str {
    fn from(ty: ArchiveType) -> Self {
        ty.name()
    }
}

impl std::fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchiveType {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.').to_lowercase();
        SUFFIXES
            .iter()
            .map(|(_, ty)| *ty)
            .find(|ty| ty.name() == trimmed)
            .or_else(|| Self::from_name(&format!("x.{}", trimmed)))
            .ok_or_else(|| ArchiveError::unsupported(s))
    }
}

/// One file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    /// Path inside the archive, `/`-separated.
    pub name: String,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub modified_time: Option<NaiveDateTime>,
    /// CRC32 as stored by the archive, when it stores one.
    pub crc32: Option<u32>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, uncompressed_size: u64, compressed_size: u64) -> Self {
        Self {
            name: name.into(),
            uncompressed_size,
            compressed_size,
            modified_time: None,
            crc32: None,
        }
    }
}

/// The result of analyzing one archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveInfo {
    pub path: PathBuf,
    pub archive_type: ArchiveType,
    pub entries: Vec<ArchiveEntry>,
    /// Entries that are themselves archives.
    pub nested_archive_names: Vec<String>,
    /// ROM entries. Payloads found inside a nested archive are recorded as
    /// `<nested entry>/<inner name>`.
    pub rom_payload_names: Vec<String>,
    pub total_size: u64,
    pub compressed_size: u64,
    /// `compressed_size / total_size`, 0 for an empty archive.
    pub compression_ratio: f64,
    pub is_multi_rom: bool,
}

impl ArchiveInfo {
    pub fn new(path: impl Into<PathBuf>, archive_type: ArchiveType) -> Self {
        Self {
            path: path.into(),
            archive_type,
            entries: Vec::new(),
            nested_archive_names: Vec::new(),
            rom_payload_names: Vec::new(),
            total_size: 0,
            compressed_size: 0,
            compression_ratio: 0.0,
            is_multi_rom: false,
        }
    }

    /// Recompute the size totals and flags from `entries` and
    /// `rom_payload_names`.
    pub fn update_totals(&mut self) {
        // Sizes come straight from the archive directory; saturate instead
        // of overflowing on crafted values.
        self.total_size = self
            .entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.uncompressed_size));
        self.compressed_size = self
            .entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.compressed_size));
        self.compression_ratio = if self.total_size > 0 {
            self.compressed_size as f64 / self.total_size as f64
        } else {
            0.0
        };
        self.is_multi_rom = self.rom_payload_names.len() > 1;
    }

    pub fn has_roms(&self) -> bool {
        !self.rom_payload_names.is_empty()
    }

    /// Split a payload name into `(nested archive entry, inner name)` when
    /// it refers to a file inside one of this archive's nested archives.
    pub fn split_nested_payload<'a>(&self, payload: &'a str) -> Option<(&'a str, &'a str)> {
        self.nested_archive_names.iter().find_map(|nested| {
            let rest = payload.strip_prefix(nested.as_str())?.strip_prefix('/')?;
            if rest.is_empty() {
                None
            } else {
                Some((&payload[..nested.len()], rest))
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
