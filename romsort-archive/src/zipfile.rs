//! In-process zip support.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::ArchiveError;
use crate::flat_destination;
use crate::types::ArchiveEntry;

/// Highest deflate level.
const DEFLATE_LEVEL: i64 = 9;

/// List the file entries of a zip archive. Directories are skipped.
pub fn list_entries(path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        // Raw access reads the central directory record without setting up
        // a decompressor, and works for encrypted entries too.
        let file = archive.by_index_raw(i)?;
        if file.is_dir() {
            continue;
        }
        entries.push(ArchiveEntry {
            name: file.name().to_string(),
            uncompressed_size: file.size(),
            compressed_size: file.compressed_size(),
            modified_time: file.last_modified().and_then(to_naive),
            crc32: Some(file.crc32()),
        });
    }

    Ok(entries)
}

/// Extract one entry into `dest` under its base name.
pub fn extract_entry(path: &Path, entry: &str, dest: &Path) -> Result<PathBuf, ArchiveError> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
    let mut file = match archive.by_name(entry) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(ArchiveError::entry_not_found(entry)),
        Err(e) => return Err(e.into()),
    };

    let out_path = flat_destination(dest, entry)?;
    fs::create_dir_all(dest)?;
    let mut writer = BufWriter::new(File::create(&out_path)?);
    io::copy(&mut file, &mut writer)?;
    writer.flush()?;

    Ok(out_path)
}

/// Write `files` into a new deflate-compressed zip at `dest`, each stored
/// under its file name. An existing file at `dest` is replaced.
pub fn write_archive(files: &[PathBuf], dest: &Path) -> Result<(), ArchiveError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = ZipWriter::new(BufWriter::new(File::create(dest)?));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(DEFLATE_LEVEL));

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no usable file name", path.display()),
                )
            })?;
        let size = fs::metadata(path)?.len();
        writer.start_file(name, options.clone().large_file(size >= u32::MAX as u64))?;
        let mut input = BufReader::new(File::open(path)?);
        io::copy(&mut input, &mut writer)?;
    }

    writer.finish()?.flush()?;
    Ok(())
}

fn to_naive(dt: zip::DateTime) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(dt.year() as i32, dt.month() as u32, dt.day() as u32)?.and_hms_opt(
        dt.hour() as u32,
        dt.minute() as u32,
        dt.second() as u32,
    )
}

#[cfg(test)]
#[path = "tests/zipfile_tests.rs"]
mod tests;
