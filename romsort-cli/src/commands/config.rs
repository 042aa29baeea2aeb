use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde_json::json;

use romsort_archive::locate_seven_zip;
use romsort_lib::Settings;
use romsort_lib::settings::{save_seven_zip_path, settings_path};

use super::print_json;
use crate::{CliError, Output};

/// Show effective settings and where each value comes from.
pub(crate) fn run_config_show(out: Output) -> Result<(), CliError> {
    let path = settings_path();
    let settings = Settings::load_from(&path);
    let detected = locate_seven_zip();

    if out.json {
        return print_json(&json!({
            "path": path,
            "exists": path.exists(),
            "settings": settings,
            "detected_seven_zip": detected,
        }));
    }

    log::info!("{}", "romsort settings".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    match (&settings.tools.seven_zip, detected) {
        (Some(configured), _) if configured.is_file() => log::info!(
            "  7-Zip:          {} {}",
            configured.display(),
            "(configured)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        (Some(configured), _) => log::warn!(
            "  7-Zip:          {} {}",
            configured.display(),
            "(configured, missing)".if_supports_color(Stdout, |t| t.red()),
        ),
        (None, Some(found)) => log::info!(
            "  7-Zip:          {} {}",
            found.display(),
            "(detected)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        (None, None) => log::info!(
            "  7-Zip:          {}",
            "not found; only zip archives can be read".if_supports_color(Stdout, |t| t.yellow()),
        ),
    }
    log::info!("  Tool timeout:   {}s", settings.tools.timeout_secs);
    log::info!("  Nested scan:    {}", settings.analysis.scan_nested);
    log::info!("  Sniff bytes:    {}", settings.analysis.content_sniff_bytes);
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}

/// Store or clear the 7-Zip path.
pub(crate) fn run_config_set_tool(path: Option<&Path>, clear: bool) -> Result<(), CliError> {
    if clear {
        save_seven_zip_path(None)
            .map_err(|e| CliError::config(format!("Failed to save settings: {}", e)))?;
        log::info!("Cleared the 7-Zip path; it will be detected automatically.");
        return Ok(());
    }

    let path = path.ok_or_else(|| CliError::config("Give a 7-Zip path or --clear"))?;
    if !path.is_file() {
        return Err(CliError::NotFound(path.to_path_buf()));
    }
    let path = path.canonicalize()?;
    save_seven_zip_path(Some(&path))
        .map_err(|e| CliError::config(format!("Failed to save settings: {}", e)))?;
    log::info!(
        "{} 7-Zip path: {}",
        "Saved".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}
