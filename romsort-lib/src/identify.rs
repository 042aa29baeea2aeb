//! The identification pipeline.
//!
//! ```text
//! path ─┬─ nestable archive ─► ArchiveAnalyzer ─► resolve each ROM entry
//!       └─ anything else ────► resolve(extension, leading bytes, filename)
//!                                   └─ CHD ─► DiscImageParser ─► platform hint
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use romsort_archive::{ArchiveAnalyzer, ArchiveInfo, ArchiveType};
use romsort_chd::DiscImageMetadata;
use romsort_core::extension::candidates;
use romsort_core::util::{entry_base_name, entry_extension};
use romsort_core::{ConsoleId, Platform, resolve, resolve_path};

use crate::error::IdentifyError;
use crate::settings::{AnalysisSettings, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyOptions {
    /// Open archives inside archives, one level deep.
    pub scan_nested: bool,
    /// Leading bytes read when an extension is shared by several consoles.
    /// Zero disables content hints.
    pub content_sniff_bytes: usize,
}

impl Default for IdentifyOptions {
    fn default() -> Self {
        Self::from(&AnalysisSettings::default())
    }
}

impl From<&AnalysisSettings> for IdentifyOptions {
    fn from(settings: &AnalysisSettings) -> Self {
        Self {
            scan_nested: settings.scan_nested,
            content_sniff_bytes: settings.content_sniff_bytes,
        }
    }
}

/// Everything the pipeline learned about one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identification {
    pub path: PathBuf,
    pub console: ConsoleId,
    /// Set for CHD images that parsed.
    pub disc: Option<DiscImageMetadata>,
    /// Set for archives.
    pub archive: Option<ArchiveInfo>,
    /// ROM entries of an archive and what each one resolves to.
    pub payloads: Vec<(String, ConsoleId)>,
    pub platform_hint: Option<&'static str>,
}

impl Identification {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            console: ConsoleId::Unknown,
            disc: None,
            archive: None,
            payloads: Vec::new(),
            platform_hint: None,
        }
    }

    pub fn is_identified(&self) -> bool {
        self.console.is_known()
    }

    /// Distinct payload consoles, in first-seen order, ignoring `Unknown`.
    pub fn payload_consoles(&self) -> Vec<ConsoleId> {
        let mut consoles = Vec::new();
        for (_, console) in &self.payloads {
            if *console != ConsoleId::Unknown && !consoles.contains(console) {
                consoles.push(*console);
            }
        }
        consoles
    }
}

/// Runs the lookup chain for individual paths.
pub struct Identifier {
    archives: ArchiveAnalyzer,
    options: IdentifyOptions,
}

impl Identifier {
    pub fn new(archives: ArchiveAnalyzer, options: IdentifyOptions) -> Self {
        Self { archives, options }
    }

    /// Build from settings: configured or detected 7-Zip, configured
    /// analysis options.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.archive_analyzer(),
            IdentifyOptions::from(&settings.analysis),
        )
    }

    pub fn archives(&self) -> &ArchiveAnalyzer {
        &self.archives
    }

    pub fn options(&self) -> IdentifyOptions {
        self.options
    }

    /// Identify one file.
    ///
    /// Only failing to read the file is an error. A file nothing can be
    /// learned about comes back with [`ConsoleId::Unknown`].
    pub fn identify(&self, path: &Path) -> Result<Identification, IdentifyError> {
        if !std::fs::metadata(path)?.is_file() {
            return Err(IdentifyError::NotAFile(path.to_path_buf()));
        }

        let id = match ArchiveType::from_path(path) {
            Some(ty) if ty.is_nestable() => self.identify_archive(path),
            _ => self.identify_file(path)?,
        };

        log::debug!(
            "{}: {} ({} payload(s))",
            path.display(),
            id.console.short_name(),
            id.payloads.len()
        );
        Ok(id)
    }

    fn identify_file(&self, path: &Path) -> Result<Identification, IdentifyError> {
        let mut id = Identification::new(path);
        let content = self.sniff(path)?;
        id.console = resolve_path(path, content.as_deref());
        if id.console.is_disc_image() {
            refine_disc(&mut id);
        }
        Ok(id)
    }

    /// Leading bytes of `path`, read only when its extension is ambiguous.
    fn sniff(&self, path: &Path) -> std::io::Result<Option<Vec<u8>>> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if self.options.content_sniff_bytes == 0 || candidates(ext).len() < 2 {
            return Ok(None);
        }
        let mut buf = Vec::new();
        File::open(path)?
            .take(self.options.content_sniff_bytes as u64)
            .read_to_end(&mut buf)?;
        Ok(Some(buf))
    }

    fn identify_archive(&self, path: &Path) -> Identification {
        let mut id = Identification::new(path);
        let Some(info) = self.archives.analyze(path, self.options.scan_nested) else {
            return id;
        };

        id.payloads = info
            .rom_payload_names
            .iter()
            .map(|name| (name.clone(), resolve_entry(name)))
            .collect();
        let consoles = id.payload_consoles();
        if let [single] = consoles.as_slice() {
            id.console = *single;
        }
        id.archive = Some(info);
        id
    }
}

/// Resolve an archive entry from its name alone.
pub fn resolve_entry(entry_name: &str) -> ConsoleId {
    match entry_extension(entry_name) {
        Some(ext) => resolve(&ext, None, Some(entry_base_name(entry_name))),
        None => ConsoleId::Unknown,
    }
}

/// Let the CHD header narrow a disc image down. Media types that pin a
/// platform replace the console; others only attach the metadata.
fn refine_disc(id: &mut Identification) {
    let Some(disc) = romsort_chd::parse(&id.path) else {
        return;
    };
    id.platform_hint = disc.platform_hint();
    if let Some(platform) = id.platform_hint.and_then(|hint| hint.parse::<Platform>().ok()) {
        id.console = ConsoleId::Known(platform);
    }
    id.disc = Some(disc);
}

#[cfg(test)]
#[path = "tests/identify_tests.rs"]
mod tests;
