//! CHD (Compressed Hunks of Data) inspection.
//!
//! Reads just enough of a CHD image to say what it holds: header version,
//! compression codecs, sizes, hashes, and the media type recorded in its
//! metadata directory. Nothing is decompressed. When the metadata is
//! missing or says nothing useful, the media type is guessed from the file
//! size.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;

use romsort_core::ReadSeek;

pub mod codec;
pub mod error;
pub mod header;
pub mod media;
pub mod metadata;

pub use error::ChdError;
pub use header::{CHD_MAGIC, ChdHeader, has_chd_magic};
pub use media::{MediaSource, MediaType, media_type_from_size};
pub use metadata::{MetadataScan, WalkEnd, scan_metadata};

/// Everything learned about one CHD image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscImageMetadata {
    /// Header version as stored in the file, even when unsupported.
    pub version: u32,
    pub media_type: MediaType,
    pub media_source: MediaSource,
    pub logical_bytes: u64,
    pub hunk_size: u32,
    pub total_hunks: u64,
    /// Codec names in header order.
    pub compression: Vec<String>,
    pub content_hash: Option<String>,
    pub parent_hash: Option<String>,
    pub track_count: u32,
    /// Metadata tags in chain order.
    pub raw_tags: Vec<String>,
    /// 0 when the header has no metadata directory.
    pub metadata_offset: u64,
    /// Size of the image on disk. Zero for unsupported versions.
    pub file_size: u64,
}

impl DiscImageMetadata {
    fn from_header(header: &ChdHeader, file_size: u64) -> Self {
        Self {
            version: header.version(),
            media_type: MediaType::Unknown,
            media_source: MediaSource::Unavailable,
            logical_bytes: header.logical_bytes(),
            hunk_size: header.hunk_bytes(),
            total_hunks: header.total_hunks(),
            compression: header.compression(),
            content_hash: header.content_hash(),
            parent_hash: header.parent_hash(),
            track_count: 0,
            raw_tags: Vec::new(),
            metadata_offset: header.metadata_offset(),
            file_size,
        }
    }

    /// See [`MediaType::platform_hint`].
    pub fn platform_hint(&self) -> Option<&'static str> {
        self.media_type.platform_hint()
    }

    /// Delta images store only differences against a parent.
    pub fn has_parent(&self) -> bool {
        self.parent_hash.is_some()
    }

    pub fn is_compressed(&self) -> bool {
        self.compression.iter().any(|c| c != "none")
    }
}

/// Inspect a CHD file. Returns `None` for anything that is not a readable
/// CHD image; the reason is logged at debug level.
pub fn parse(path: &Path) -> Option<DiscImageMetadata> {
    match parse_file(path) {
        Ok(metadata) => Some(metadata),
        Err(ChdError::NotThisFormat) => {
            log::debug!("{}: not a CHD image", path.display());
            None
        }
        Err(e) => {
            log::debug!("{}: CHD detection failed: {}", path.display(), e);
            None
        }
    }
}

/// Like [`parse`], but reports why detection failed.
pub fn parse_file(path: &Path) -> Result<DiscImageMetadata, ChdError> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    parse_reader(&mut reader, file_size)
}

/// Inspect a CHD image from any seekable reader.
///
/// `file_size` drives both the metadata offset bounds check and the size
/// heuristic.
pub fn parse_reader(
    reader: &mut dyn ReadSeek,
    file_size: u64,
) -> Result<DiscImageMetadata, ChdError> {
    let preamble = header::read_preamble(reader)?;
    let header = ChdHeader::read(reader, &preamble)?;

    if let ChdHeader::Unsupported(version) = header {
        log::warn!(
            "CHD header version {} is not supported; reporting it as unknown media",
            version
        );
        return Ok(degraded(version));
    }

    let mut metadata = DiscImageMetadata::from_header(&header, file_size);
    classify_media(reader, &mut metadata);

    log::debug!(
        "CHD v{}: {} via {:?}, codecs [{}], {} track(s)",
        metadata.version,
        metadata.media_type,
        metadata.media_source,
        metadata.compression.join(", "),
        metadata.track_count,
    );

    Ok(metadata)
}

/// Record for a version we have no layout for: signature matched, nothing
/// else can be trusted. Every size, `file_size` included, is zero.
fn degraded(version: u32) -> DiscImageMetadata {
    DiscImageMetadata::from_header(&ChdHeader::Unsupported(version), 0)
}

fn classify_media(reader: &mut dyn ReadSeek, metadata: &mut DiscImageMetadata) {
    let offset = metadata.metadata_offset;
    if offset != 0 && offset < metadata.file_size {
        let scan = scan_metadata(reader, offset, metadata.file_size);
        metadata.track_count = scan.track_count;
        metadata.raw_tags = scan.tags.clone();
        if scan.is_conclusive() {
            metadata.media_type = scan.media_type;
            metadata.media_source = MediaSource::Metadata;
            return;
        }
        log::debug!(
            "CHD metadata walk ({:?} after {} entries) named no media type",
            scan.end,
            scan.entries_read
        );
    }

    metadata.media_type = media_type_from_size(metadata.file_size);
    metadata.media_source = MediaSource::SizeHeuristic;
}

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;

#[cfg(test)]
#[path = "tests/parse_tests.rs"]
mod tests;
