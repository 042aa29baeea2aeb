use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romsort_core::util::format_size;
use romsort_lib::{Identification, Identifier, ScanOptions, Settings, scan_candidates};

use super::{console_label, print_json};
use crate::{CliError, Output};

/// Run the identify command.
pub(crate) fn run_identify(
    out: Output,
    paths: &[PathBuf],
    recursive: bool,
    scan_nested: bool,
    keep_cue_data: bool,
) -> Result<(), CliError> {
    let mut settings = Settings::load();
    // The flag can only turn nested scanning off.
    settings.analysis.scan_nested &= scan_nested;

    let identifier = Identifier::from_settings(&settings);
    if !identifier.archives().has_tool() {
        log::debug!("7-Zip not found; only zip archives can be opened");
    }

    let options = ScanOptions {
        recursive,
        keep_cue_data,
    };

    let mut results = Vec::new();
    let mut failures = 0usize;
    for root in paths {
        if !root.exists() {
            return Err(CliError::NotFound(root.clone()));
        }
        for file in scan_candidates(root, options)? {
            match identifier.identify(&file) {
                Ok(id) => {
                    if !out.json {
                        print_identification(&id, root);
                    }
                    results.push(id);
                }
                Err(e) => {
                    failures += 1;
                    log::warn!(
                        "  {} {}: {}",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        file.display(),
                        e,
                    );
                }
            }
        }
    }

    if out.json {
        return print_json(&results);
    }

    let identified = results.iter().filter(|id| id.is_identified()).count();
    crate::log_blank();
    log::info!(
        "{} file(s): {} identified, {} unresolved{}",
        results.len(),
        identified.if_supports_color(Stdout, |t| t.green()),
        results.len() - identified,
        if failures > 0 {
            format!(", {} unreadable", failures)
        } else {
            String::new()
        },
    );
    Ok(())
}

fn print_identification(id: &Identification, root: &Path) {
    let shown = id.path.strip_prefix(root).unwrap_or(&id.path);
    let shown = if shown.as_os_str().is_empty() {
        id.path.as_path()
    } else {
        shown
    };

    log::info!(
        "  {} {} {}",
        shown.display().if_supports_color(Stdout, |t| t.bold()),
        "\u{2192}".if_supports_color(Stdout, |t| t.dimmed()),
        console_label(id.console),
    );

    if let Some(disc) = &id.disc {
        log::info!(
            "      CHD v{}, {}, {} track(s), {}",
            disc.version,
            disc.media_type,
            disc.track_count,
            format_size(disc.logical_bytes),
        );
    }

    if let Some(archive) = &id.archive {
        log::info!(
            "      {}, {} entries, {} ROM(s)",
            archive.archive_type,
            archive.entries.len(),
            id.payloads.len(),
        );
        if id.payloads.len() > 1 || !id.is_identified() {
            for (name, console) in &id.payloads {
                log::info!("        {} {}", name, console_label(*console));
            }
        }
    }
}
