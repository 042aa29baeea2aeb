use std::path::Path;

pub const MIB: u64 = 1024 * 1024;

/// Format a byte count with one decimal of KB/MB/GB (e.g. "1.5 KB", "700.0 MB").
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * MIB {
        format!("{:.1} GB", bytes as f64 / (1024.0 * MIB as f64))
    } else if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Lower-cased final path component, or an empty string.
///
/// Used where compound extensions (`.tar.gz`) matter and
/// [`Path::extension`] only sees the last one.
pub fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_lowercase())
        .unwrap_or_default()
}

/// The extension of the last path component of an archive entry name,
/// lower-cased and with its dot. Entry names use `/` regardless of host.
pub fn entry_extension(entry_name: &str) -> Option<String> {
    let base = entry_base_name(entry_name);
    let dot = base.rfind('.')?;
    if dot == 0 {
        return None;
    }
    Some(base[dot..].to_lowercase())
}

/// Final component of an archive entry name.
pub fn entry_base_name(entry_name: &str) -> &str {
    entry_name
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entry_name)
}
