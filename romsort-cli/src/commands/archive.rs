use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romsort_archive::{ArchiveAnalyzer, ArchiveInfo, ArchiveType};
use romsort_core::util::format_size;
use romsort_lib::{Settings, resolve_entry};

use super::{console_label, print_json};
use crate::spinner::Spinner;
use crate::{CliError, Output};

fn analyzer() -> ArchiveAnalyzer {
    Settings::load().archive_analyzer()
}

fn require_file(path: &Path) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::NotFound(path.to_path_buf()))
    }
}

/// Run the archive command.
pub(crate) fn run_archive(out: Output, file: &Path, scan_nested: bool) -> Result<(), CliError> {
    require_file(file)?;
    let info = analyzer().try_analyze(file, scan_nested)?;

    if out.json {
        return print_json(&info);
    }
    print_archive(&info);
    Ok(())
}

fn print_archive(info: &ArchiveInfo) {
    log::info!(
        "{} [{}]",
        info.path.display().if_supports_color(Stdout, |t| t.bold()),
        info.archive_type.if_supports_color(Stdout, |t| t.cyan()),
    );

    if info.entries.is_empty() {
        log::info!(
            "  {}",
            "No entries".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }

    for entry in &info.entries {
        let crc = entry
            .crc32
            .map(|c| format!("{:08x}", c))
            .unwrap_or_else(|| "--------".to_string());
        let modified = entry
            .modified_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        log::info!(
            "  {:>10}  {:>10}  {}  {:<16}  {}",
            format_size(entry.uncompressed_size),
            format_size(entry.compressed_size),
            crc.if_supports_color(Stdout, |t| t.dimmed()),
            modified,
            entry.name,
        );
    }

    crate::log_blank();
    log::info!(
        "  {} entries, {} unpacked, {} packed ({:.1}%)",
        info.entries.len(),
        format_size(info.total_size),
        format_size(info.compressed_size),
        info.compression_ratio * 100.0,
    );

    if !info.nested_archive_names.is_empty() {
        log::info!("  Nested archives: {}", info.nested_archive_names.join(", "));
    }
    if info.rom_payload_names.is_empty() {
        log::info!(
            "  {}",
            "No ROMs found".if_supports_color(Stdout, |t| t.dimmed()),
        );
    } else {
        log::info!(
            "  ROMs{}:",
            if info.is_multi_rom { " (multi-ROM)" } else { "" }
        );
        for name in &info.rom_payload_names {
            log::info!("    {} {}", name, console_label(resolve_entry(name)));
        }
    }
}

/// Run the extract command.
pub(crate) fn run_extract(
    out: Output,
    archive: &Path,
    entry: Option<&str>,
    output: &Path,
) -> Result<(), CliError> {
    require_file(archive)?;
    std::fs::create_dir_all(output)?;
    let analyzer = analyzer();

    let spinner = Spinner::start(
        format!("Extracting from {}", archive.display()),
        out.quiet || out.json,
    );
    let extracted = match entry {
        Some(name) => {
            spinner.set_message(format!("Extracting {}", name));
            analyzer.extract_entry(archive, name, output).map(|p| vec![p])
        }
        None => Ok(analyzer.extract_all_roms_from_archive(archive, output)),
    };
    spinner.finish();
    let extracted = extracted?;

    if out.json {
        return print_json(&extracted);
    }

    if extracted.is_empty() {
        return Err(CliError::other(format!(
            "no ROMs extracted from {}",
            archive.display()
        )));
    }
    for path in &extracted {
        log::info!(
            "  {} {}",
            "Extracted".if_supports_color(Stdout, |t| t.green()),
            path.display(),
        );
    }
    Ok(())
}

/// Run the pack command.
pub(crate) fn run_pack(
    out: Output,
    files: &[PathBuf],
    output: &Path,
    format: Option<ArchiveType>,
) -> Result<(), CliError> {
    for file in files {
        require_file(file)?;
    }
    let analyzer = analyzer();
    let format = format.unwrap_or_else(|| analyzer.best_compression_format(files));

    let spinner = Spinner::start(
        format!("Packing {} file(s) into {}", files.len(), output.display()),
        out.quiet || out.json,
    );
    let result = analyzer.create_archive(files, output, format);
    spinner.finish();
    result?;

    let size = std::fs::metadata(output)?.len();
    if out.json {
        return print_json(&serde_json::json!({
            "path": output,
            "format": format,
            "files": files.len(),
            "size": size,
        }));
    }

    log::info!(
        "{} {} archive {} ({}, {} file(s))",
        "Created".if_supports_color(Stdout, |t| t.green()),
        format,
        output.display().if_supports_color(Stdout, |t| t.bold()),
        format_size(size),
        files.len(),
    );
    Ok(())
}
