//! Settings file (`~/.config/romsort/settings.toml`).
//!
//! Every value is optional. A missing file, a file that fails to parse, or
//! an individual value of the wrong type falls back to the default for that
//! value.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use romsort_archive::{ArchiveAnalyzer, SevenZipTool};

/// Default limit on a single external tool run.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of leading bytes read for content hints.
pub const DEFAULT_SNIFF_BYTES: usize = 64 * 1024;

/// Canonical path to the settings file: `~/.config/romsort/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romsort").join("settings.toml")
}

/// `[tools]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSettings {
    /// Explicit 7-Zip executable. Searched for when unset.
    pub seven_zip: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            seven_zip: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[analysis]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSettings {
    /// Open archives found inside archives (one level).
    pub scan_nested: bool,
    /// Leading bytes read from files with an ambiguous extension.
    pub content_sniff_bytes: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            scan_nested: true,
            content_sniff_bytes: DEFAULT_SNIFF_BYTES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub tools: ToolSettings,
    pub analysis: AnalysisSettings,
}

impl Settings {
    /// Load from [`settings_path`].
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read whatever valid values `contents` holds.
    pub fn from_toml(contents: &str) -> Self {
        let mut settings = Self::default();
        let doc: toml::Value = match contents.parse() {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Ignoring unparsable settings file: {}", e);
                return settings;
            }
        };

        if let Some(tools) = doc.get("tools") {
            if let Some(path) = tools
                .get("seven_zip")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
            {
                settings.tools.seven_zip = Some(PathBuf::from(path));
            }
            if let Some(secs) = tools
                .get("timeout_secs")
                .and_then(|v| v.as_integer())
                .filter(|&n| n > 0)
            {
                settings.tools.timeout_secs = secs as u64;
            }
        }

        if let Some(analysis) = doc.get("analysis") {
            if let Some(scan) = analysis.get("scan_nested").and_then(|v| v.as_bool()) {
                settings.analysis.scan_nested = scan;
            }
            if let Some(bytes) = analysis
                .get("content_sniff_bytes")
                .and_then(|v| v.as_integer())
                .filter(|&n| n >= 0)
            {
                settings.analysis.content_sniff_bytes = bytes as usize;
            }
        }

        settings
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.tools.timeout_secs)
    }

    /// Archive analyzer backed by the configured 7-Zip, or a detected one.
    pub fn archive_analyzer(&self) -> ArchiveAnalyzer {
        match SevenZipTool::resolve(self.tools.seven_zip.as_deref(), self.timeout()) {
            Some(tool) => ArchiveAnalyzer::with_tool(tool),
            None => ArchiveAnalyzer::without_tool(),
        }
    }
}

/// Save (or clear) `tools.seven_zip` in the settings file.
pub fn save_seven_zip_path(path: Option<&Path>) -> io::Result<()> {
    let value = path.map(|p| toml::Value::String(p.to_string_lossy().into_owned()));
    save_value(&settings_path(), "tools", "seven_zip", value)
}

/// Set or remove `[table] key` in the settings file at `settings`.
///
/// Uses `toml::Value` for a surgical update so unrelated keys are
/// preserved.
pub fn save_value(
    settings: &Path,
    table: &str,
    key: &str,
    value: Option<toml::Value>,
) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let root = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let section = root
        .entry(table)
        .or_insert_with(|| toml::Value::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| io::Error::other(format!("[{}] is not a table", table)))?;

    match value {
        Some(v) => {
            section.insert(key.to_string(), v);
        }
        None => {
            section.remove(key);
        }
    }

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
