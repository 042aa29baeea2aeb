//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use romsort_archive::ArchiveType;

#[derive(Parser)]
#[command(name = "romsort")]
#[command(about = "Identify ROMs, CHD disc images and ROM archives", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON on stdout; log messages go to stderr
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Identify the console of ROM files, disc images and archives
    Identify {
        /// Files or directories to identify
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Do not open archives nested inside archives
        #[arg(long)]
        no_nested: bool,

        /// Report .bin/.img/.iso files even when a .cue sheet covers them
        #[arg(long)]
        keep_cue_data: bool,
    },

    /// Show the header of a CHD disc image
    Chd {
        /// CHD file to inspect
        file: PathBuf,
    },

    /// List the contents of an archive
    Archive {
        /// Archive to inspect
        file: PathBuf,

        /// Do not open archives nested inside the archive
        #[arg(long)]
        no_nested: bool,
    },

    /// Extract ROMs from an archive
    Extract {
        /// Archive to extract from
        archive: PathBuf,

        /// Entry to extract (default: every ROM in the archive)
        entry: Option<String>,

        /// Destination directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Pack files into a new archive
    Pack {
        /// Files to add
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Archive to create
        #[arg(short, long)]
        output: PathBuf,

        /// Archive format: zip or 7z (default: best available)
        #[arg(short, long)]
        format: Option<ArchiveType>,
    },

    /// List every known extension and the consoles it maps to
    Extensions,

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings and detected tools
    Show,
    /// Print the settings file path
    Path,
    /// Set the 7-Zip executable used for non-zip archives
    SetTool {
        /// Path to 7z/7za/7zz
        path: Option<PathBuf>,

        /// Remove the configured path and fall back to detection
        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },
}
