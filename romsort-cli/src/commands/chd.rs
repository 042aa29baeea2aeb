use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romsort_chd::{DiscImageMetadata, MediaSource};
use romsort_core::util::format_size;

use super::print_json;
use crate::{CliError, Output};

/// Run the chd command.
pub(crate) fn run_chd(out: Output, file: &Path) -> Result<(), CliError> {
    if !file.exists() {
        return Err(CliError::NotFound(file.to_path_buf()));
    }
    let disc = romsort_chd::parse_file(file)?;

    if out.json {
        return print_json(&disc);
    }

    log::info!("{}", file.display().if_supports_color(Stdout, |t| t.bold()));
    for (label, value) in describe(&disc) {
        log::info!("  {:<14} {}", format!("{}:", label), value);
    }
    Ok(())
}

fn source_label(source: MediaSource) -> &'static str {
    match source {
        MediaSource::Metadata => "from metadata",
        MediaSource::SizeHeuristic => "guessed from file size",
        MediaSource::Unavailable => "unsupported header",
    }
}

fn describe(disc: &DiscImageMetadata) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("Version", disc.version.to_string()),
        (
            "Media",
            format!("{} ({})", disc.media_type, source_label(disc.media_source)),
        ),
    ];
    if let Some(hint) = disc.platform_hint() {
        lines.push((
            "Platform",
            hint.if_supports_color(Stdout, |t| t.green()).to_string(),
        ));
    }
    lines.push(("Logical size", format_size(disc.logical_bytes)));
    lines.push(("File size", format_size(disc.file_size)));
    lines.push(("Hunks", format!("{} x {} bytes", disc.total_hunks, disc.hunk_size)));

    let codecs = if disc.compression.is_empty() {
        "none".to_string()
    } else {
        disc.compression.join(", ")
    };
    lines.push(("Compression", codecs));

    if disc.track_count > 0 {
        lines.push(("Tracks", disc.track_count.to_string()));
    }
    if !disc.raw_tags.is_empty() {
        lines.push(("Metadata", disc.raw_tags.join(" ")));
    }
    if let Some(sha1) = &disc.content_hash {
        lines.push(("SHA-1", sha1.clone()));
    }
    if let Some(parent) = &disc.parent_hash {
        lines.push((
            "Parent SHA-1",
            parent.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        ));
    }
    lines
}
