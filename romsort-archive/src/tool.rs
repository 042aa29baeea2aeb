//! External extraction tool.
//!
//! Formats other than zip are listed, extracted and created by shelling out
//! to 7-Zip. The analyzer only sees the [`ExtractionTool`] trait, so tests
//! can substitute a fake and hosts without 7-Zip degrade cleanly.

use std::ffi::OsString;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;

use crate::error::ArchiveError;
use crate::{flat_destination, staging_dir};
use crate::types::ArchiveEntry;

/// Default limit on a single tool invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Cap on captured stderr kept in error messages.
const MAX_STDERR_LEN: usize = 4096;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// An external program that can list, extract and create archives.
pub trait ExtractionTool: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &str;

    /// List file entries. Directories are left out.
    fn list(&self, archive: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError>;

    /// Extract `entry` into `dest` under its base name and return the
    /// written path.
    fn extract(&self, archive: &Path, entry: &str, dest: &Path) -> Result<PathBuf, ArchiveError>;

    /// Create a maximally compressed archive at `dest` holding `files`.
    fn create(&self, files: &[PathBuf], dest: &Path) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Executable names 7-Zip ships under, in preference order.
const SEVEN_ZIP_NAMES: &[&str] = &["7z", "7zz", "7za"];

/// Install locations checked before falling back to `PATH`.
const INSTALL_DIRS: &[&str] = &[
    r"C:\Program Files\7-Zip",
    r"C:\Program Files (x86)\7-Zip",
    "/usr/bin",
    "/usr/local/bin",
    "/opt/homebrew/bin",
    "/opt/local/bin",
];

static SEVEN_ZIP: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Location of the system 7-Zip, searched for once per process.
pub fn locate_seven_zip() -> Option<&'static Path> {
    SEVEN_ZIP.get_or_init(probe_seven_zip).as_deref()
}

fn probe_seven_zip() -> Option<PathBuf> {
    let found = INSTALL_DIRS
        .iter()
        .flat_map(|dir| {
            SEVEN_ZIP_NAMES
                .iter()
                .map(move |name| Path::new(dir).join(executable_name(name)))
        })
        .find(|candidate| candidate.is_file())
        .or_else(|| SEVEN_ZIP_NAMES.iter().find_map(|name| which::which(name).ok()));

    match &found {
        Some(path) => log::debug!("Using 7-Zip at {}", path.display()),
        None => log::debug!("7-Zip not found; only zip archives can be read"),
    }
    found
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

// ---------------------------------------------------------------------------
// 7-Zip
// ---------------------------------------------------------------------------

/// [`ExtractionTool`] backed by the 7-Zip command line.
#[derive(Debug, Clone)]
pub struct SevenZipTool {
    program: PathBuf,
    timeout: Duration,
}

impl SevenZipTool {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// The system 7-Zip, if one is installed.
    pub fn detect(timeout: Duration) -> Option<Self> {
        locate_seven_zip().map(|path| Self::new(path, timeout))
    }

    /// A configured path when it exists, otherwise [`Self::detect`].
    pub fn resolve(configured: Option<&Path>, timeout: Duration) -> Option<Self> {
        if let Some(path) = configured {
            if path.is_file() {
                return Some(Self::new(path, timeout));
            }
            log::warn!(
                "Configured 7-Zip path {} does not exist, searching the system instead",
                path.display()
            );
        }
        Self::detect(timeout)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the tool and return its stdout.
    fn run(&self, args: &[OsString]) -> Result<String, ArchiveError> {
        log::debug!("Running {} {:?}", self.program.display(), args);

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ArchiveError::tool_unavailable(self.program.display().to_string())
                } else {
                    e.into()
                }
            })?;

        // Drain both pipes while waiting so a long listing cannot fill the
        // pipe buffer and stall the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ArchiveError::ToolTimeout {
                    secs: self.timeout.as_secs(),
                });
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        };

        let stdout = collect(stdout);
        if !status.success() {
            let mut stderr = collect(stderr);
            if stderr.trim().is_empty() {
                stderr = stdout;
            }
            return Err(ArchiveError::tool_failed(
                status.code(),
                truncate_message(stderr.trim()),
            ));
        }
        Ok(stdout)
    }
}

impl ExtractionTool for SevenZipTool {
    fn name(&self) -> &str {
        "7-Zip"
    }

    fn list(&self, archive: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let output = self.run(&["l".into(), "-slt".into(), archive.into()])?;
        Ok(parse_technical_listing(&output))
    }

    fn extract(&self, archive: &Path, entry: &str, dest: &Path) -> Result<PathBuf, ArchiveError> {
        let out_path = flat_destination(dest, entry)?;
        let staging = staging_dir(dest)?;
        let staged = flat_destination(staging.path(), entry)?;

        self.run(&extract_args(archive, entry, staging.path()))?;

        // 7-Zip exits 0 with "No files to process" for a missing entry.
        if !staged.is_file() {
            return Err(ArchiveError::entry_not_found(entry));
        }
        fs::rename(&staged, &out_path)?;
        Ok(out_path)
    }

    fn create(&self, files: &[PathBuf], dest: &Path) -> Result<(), ArchiveError> {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // `a` appends to an existing archive.
        if dest.exists() {
            fs::remove_file(dest)?;
        }

        let mut args: Vec<OsString> = vec!["a".into(), "-t7z".into(), "-mx=9".into(), dest.into()];
        args.extend(files.iter().map(|f| f.as_os_str().to_os_string()));
        self.run(&args)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Listing parser
// ---------------------------------------------------------------------------

/// Fields gathered for one block of a technical listing.
#[derive(Default)]
struct ListingBlock {
    path: Option<String>,
    size: u64,
    packed_size: u64,
    modified: Option<NaiveDateTime>,
    crc32: Option<u32>,
    is_dir: bool,
}

impl ListingBlock {
    fn into_entry(self) -> Option<ArchiveEntry> {
        if self.is_dir {
            return None;
        }
        Some(ArchiveEntry {
            name: self.path?,
            uncompressed_size: self.size,
            compressed_size: self.packed_size,
            modified_time: self.modified,
            crc32: self.crc32,
        })
    }
}

/// `7z e` arguments for a single entry. `-spd` makes `*` and `?` in the
/// entry name match literally.
fn extract_args(archive: &Path, entry: &str, out_dir: &Path) -> Vec<OsString> {
    let mut out_flag = OsString::from("-o");
    out_flag.push(out_dir);
    vec![
        "e".into(),
        archive.into(),
        out_flag,
        "-spd".into(),
        "-y".into(),
        "--".into(),
        entry.into(),
    ]
}

/// Parse the output of `7z l -slt`.
///
/// Entries are blank-line separated blocks of `Key = Value` lines following
/// a `----------` separator. Anything before the separator describes the
/// archive itself and is skipped. Output without a separator (as produced
/// with `-ba`) is parsed from the top.
pub fn parse_technical_listing(output: &str) -> Vec<ArchiveEntry> {
    let has_separator = output.lines().any(|l| l.trim() == "----------");
    let mut lines = output.lines();
    if has_separator {
        for line in lines.by_ref() {
            if line.trim() == "----------" {
                break;
            }
        }
    }

    let mut entries = Vec::new();
    let mut block = ListingBlock::default();

    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            entries.extend(std::mem::take(&mut block).into_entry());
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.strip_prefix(' ').unwrap_or(value);

        match key {
            "Path" => {
                if block.path.is_some() {
                    entries.extend(std::mem::take(&mut block).into_entry());
                }
                block.path = Some(value.to_string());
            }
            "Size" => block.size = value.trim().parse().unwrap_or(0),
            "Packed Size" => block.packed_size = value.trim().parse().unwrap_or(0),
            "Modified" => block.modified = parse_modified(value),
            "CRC" => block.crc32 = u32::from_str_radix(value.trim(), 16).ok(),
            "Folder" => block.is_dir |= value.trim() == "+",
            "Attributes" => block.is_dir |= value.starts_with('D'),
            _ => {}
        }
    }
    entries.extend(block.into_entry());

    entries
}

/// `2020-01-02 03:04:05`, optionally followed by a fraction of a second.
fn parse_modified(value: &str) -> Option<NaiveDateTime> {
    let whole_seconds = value.trim().split('.').next()?;
    NaiveDateTime::parse_from_str(whole_seconds, "%Y-%m-%d %H:%M:%S").ok()
}

// ---------------------------------------------------------------------------
// Process helpers
// ---------------------------------------------------------------------------

/// Adds a bounded wait to `Child`.
trait ChildExt {
    fn wait_timeout(&mut self, timeout: Duration) -> std::io::Result<Option<ExitStatus>>;
}

impl ChildExt for Child {
    fn wait_timeout(&mut self, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
        let start = Instant::now();
        loop {
            match self.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() >= timeout {
                        return Ok(None);
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn truncate_message(message: &str) -> String {
    if message.len() <= MAX_STDERR_LEN {
        return message.to_string();
    }
    let cut = (0..=MAX_STDERR_LEN)
        .rev()
        .find(|&i| message.is_char_boundary(i))
        .unwrap_or(0);
    message[..cut].to_string()
}

#[cfg(test)]
#[path = "tests/tool_tests.rs"]
mod tests;
