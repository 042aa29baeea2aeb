//! romsort CLI
//!
//! Command-line interface for identifying ROMs, CHD disc images and
//! archives of either.

mod cli_types;
mod commands;
mod error;
mod spinner;

use std::io::Write;

use clap::Parser;
use log::{Level, LevelFilter};

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

/// Global output flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    pub quiet: bool,
    pub json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose, cli.json);

    let out = Output {
        quiet: cli.quiet,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Identify {
            paths,
            recursive,
            no_nested,
            keep_cue_data,
        } => commands::identify::run_identify(out, &paths, recursive, !no_nested, keep_cue_data),
        Commands::Chd { file } => commands::chd::run_chd(out, &file),
        Commands::Archive { file, no_nested } => {
            commands::archive::run_archive(out, &file, !no_nested)
        }
        Commands::Extract {
            archive,
            entry,
            output,
        } => commands::archive::run_extract(out, &archive, entry.as_deref(), &output),
        Commands::Pack {
            files,
            output,
            format,
        } => commands::archive::run_pack(out, &files, &output, format),
        Commands::Extensions => commands::extensions::run_extensions(out),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(out),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetTool { path, clear } => {
                commands::config::run_config_set_tool(path.as_deref(), clear)
            }
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Install the logger that doubles as the CLI's output channel.
///
/// Info lines are printed bare, other levels carry their level name.
/// `--verbose` switches to the full env_logger format with timestamps.
/// `RUST_LOG` overrides the level chosen by the flags.
fn init_logging(quiet: bool, verbose: bool, json: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.target(if json {
        env_logger::Target::Stderr
    } else {
        env_logger::Target::Stdout
    });

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => {
                let style = buf.default_level_style(level);
                writeln!(
                    buf,
                    "{style}{}{style:#}: {}",
                    level.as_str().to_lowercase(),
                    record.args()
                )
            }
        });
    }

    builder.parse_default_env();
    builder.init();
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
