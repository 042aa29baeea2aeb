//! CHD header parsing.
//!
//! Every CHD starts with the same 16-byte preamble (signature, header length,
//! version). Everything after that depends on the version, so each supported
//! version gets its own variant with its own byte layout, and versions we do
//! not know land in [`ChdHeader::Unsupported`].

use std::io::SeekFrom;

use romsort_core::ReadSeek;

use crate::codec::{codec_name, legacy_codec_name};
use crate::error::ChdError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// CHD file signature.
pub const CHD_MAGIC: &[u8; 8] = b"MComprHD";

/// Signature + header length + version.
pub const PREAMBLE_LEN: usize = 16;

/// Upper bound on how much header we are willing to read.
pub const MAX_HEADER_LEN: usize = 256;

/// v1 hunk sizes and disk geometry are counted in 512-byte sectors.
const V1_SECTOR_BYTES: u32 = 512;

const V1_HEADER_LEN: usize = 76;
const V2_HEADER_LEN: usize = 80;
const V3_HEADER_LEN: usize = 120;
const V4_HEADER_LEN: usize = 108;
const V5_HEADER_LEN: usize = 124;

const SHA1_LEN: usize = 20;

// ---------------------------------------------------------------------------
// Preamble
// ---------------------------------------------------------------------------

/// The version-independent start of a CHD header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    /// Header length as declared by the file.
    pub header_len: u32,
    pub version: u32,
}

/// Read and validate the signature, header length and version.
pub fn read_preamble(reader: &mut dyn ReadSeek) -> Result<Preamble, ChdError> {
    reader.seek(SeekFrom::Start(0))?;

    let mut buf = [0u8; PREAMBLE_LEN];
    let n = read_up_to(reader, &mut buf)?;

    if n < CHD_MAGIC.len() || buf[..CHD_MAGIC.len()] != *CHD_MAGIC {
        return Err(ChdError::NotThisFormat);
    }
    if n < PREAMBLE_LEN {
        return Err(ChdError::truncated(PREAMBLE_LEN, n));
    }

    Ok(Preamble {
        header_len: be_u32(&buf, 8),
        version: be_u32(&buf, 12),
    })
}

/// Quick signature check that leaves the reader at offset 0.
pub fn has_chd_magic(reader: &mut dyn ReadSeek) -> bool {
    let result = read_preamble(reader).is_ok();
    let _ = reader.seek(SeekFrom::Start(0));
    result
}

/// Minimum header size for a version we know how to parse.
pub fn min_header_len(version: u32) -> Option<usize> {
    match version {
        1 => Some(V1_HEADER_LEN),
        2 => Some(V2_HEADER_LEN),
        3 => Some(V3_HEADER_LEN),
        4 => Some(V4_HEADER_LEN),
        5 => Some(V5_HEADER_LEN),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Version layouts
// ---------------------------------------------------------------------------

/// v1/v2 header: geometry-based, one legacy compression id.
///
/// ```text
/// [16] flags  [20] compression  [24] hunk size (sectors)  [28] total hunks
/// [32] cylinders  [36] heads  [40] sectors  [44] md5  [60] parent md5
/// [76] bytes per sector (v2 only)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryHeader {
    pub flags: u32,
    pub compression: u32,
    pub hunk_sectors: u32,
    pub total_hunks: u32,
    pub cylinders: u32,
    pub heads: u32,
    pub sectors: u32,
    pub sector_bytes: u32,
}

impl GeometryHeader {
    fn parse(buf: &[u8], sector_bytes: u32) -> Self {
        Self {
            flags: be_u32(buf, 16),
            compression: be_u32(buf, 20),
            hunk_sectors: be_u32(buf, 24),
            total_hunks: be_u32(buf, 28),
            cylinders: be_u32(buf, 32),
            heads: be_u32(buf, 36),
            sectors: be_u32(buf, 40),
            sector_bytes,
        }
    }

    pub fn hunk_bytes(&self) -> u32 {
        self.hunk_sectors.saturating_mul(self.sector_bytes)
    }

    pub fn logical_bytes(&self) -> u64 {
        (self.cylinders as u64)
            .saturating_mul(self.heads as u64)
            .saturating_mul(self.sectors as u64)
            .saturating_mul(self.sector_bytes as u64)
    }
}

/// v3 header.
///
/// ```text
/// [16] flags  [20] compression  [24] total hunks  [28] logical bytes (u64)
/// [36] metadata offset  [44] md5  [60] parent md5  [76] hunk bytes
/// [80] sha1  [100] parent sha1
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderV3 {
    pub flags: u32,
    pub compression: u32,
    pub total_hunks: u32,
    pub logical_bytes: u64,
    pub hunk_bytes: u32,
}

impl HeaderV3 {
    fn parse(buf: &[u8]) -> Self {
        Self {
            flags: be_u32(buf, 16),
            compression: be_u32(buf, 20),
            total_hunks: be_u32(buf, 24),
            logical_bytes: be_u64(buf, 28),
            hunk_bytes: be_u32(buf, 76),
        }
    }
}

/// v4 header.
///
/// ```text
/// [16] flags  [20] compression  [24] total hunks  [28] logical bytes (u64)
/// [36] metadata offset (u64)  [44] hunk bytes  [48] sha1  [68] parent sha1
/// [88] raw sha1
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderV4 {
    pub flags: u32,
    pub compression: u32,
    pub total_hunks: u32,
    pub logical_bytes: u64,
    pub metadata_offset: u64,
    pub hunk_bytes: u32,
    pub sha1: [u8; SHA1_LEN],
    pub parent_sha1: [u8; SHA1_LEN],
}

impl HeaderV4 {
    fn parse(buf: &[u8]) -> Self {
        Self {
            flags: be_u32(buf, 16),
            compression: be_u32(buf, 20),
            total_hunks: be_u32(buf, 24),
            logical_bytes: be_u64(buf, 28),
            metadata_offset: be_u64(buf, 36),
            hunk_bytes: be_u32(buf, 44),
            sha1: sha1_at(buf, 48),
            parent_sha1: sha1_at(buf, 68),
        }
    }
}

/// v5 header.
///
/// ```text
/// [16] compressors[4]  [32] logical bytes  [40] map offset
/// [48] metadata offset  [56] hunk bytes  [60] unit bytes
/// [64] raw sha1  [84] sha1  [104] parent sha1
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderV5 {
    pub compressors: [u32; 4],
    pub logical_bytes: u64,
    pub map_offset: u64,
    pub metadata_offset: u64,
    pub hunk_bytes: u32,
    pub unit_bytes: u32,
    pub sha1: [u8; SHA1_LEN],
    pub parent_sha1: [u8; SHA1_LEN],
}

impl HeaderV5 {
    fn parse(buf: &[u8]) -> Self {
        Self {
            compressors: [
                be_u32(buf, 16),
                be_u32(buf, 20),
                be_u32(buf, 24),
                be_u32(buf, 28),
            ],
            logical_bytes: be_u64(buf, 32),
            map_offset: be_u64(buf, 40),
            metadata_offset: be_u64(buf, 48),
            hunk_bytes: be_u32(buf, 56),
            unit_bytes: be_u32(buf, 60),
            sha1: sha1_at(buf, 84),
            parent_sha1: sha1_at(buf, 104),
        }
    }

    /// v5 does not store a hunk count; it follows from the logical size.
    pub fn total_hunks(&self) -> u64 {
        if self.hunk_bytes == 0 {
            0
        } else {
            self.logical_bytes.div_ceil(self.hunk_bytes as u64)
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// A parsed CHD header, one variant per on-disk layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChdHeader {
    V1(GeometryHeader),
    V2(GeometryHeader),
    V3(HeaderV3),
    V4(HeaderV4),
    V5(HeaderV5),
    /// A version this parser has no layout for.
    Unsupported(u32),
}

impl ChdHeader {
    /// Read the full header that `preamble` announced.
    ///
    /// The read length is the larger of the declared length and the
    /// version's minimum, capped at [`MAX_HEADER_LEN`].
    pub fn read(reader: &mut dyn ReadSeek, preamble: &Preamble) -> Result<Self, ChdError> {
        let Some(min_len) = min_header_len(preamble.version) else {
            return Ok(Self::Unsupported(preamble.version));
        };

        let len = (preamble.header_len as usize)
            .max(min_len)
            .min(MAX_HEADER_LEN);

        reader.seek(SeekFrom::Start(0))?;
        let mut buf = vec![0u8; len];
        let n = read_up_to(reader, &mut buf)?;
        if n < min_len {
            return Err(ChdError::truncated(min_len, n));
        }

        Ok(Self::parse(preamble.version, &buf))
    }

    /// Interpret a header buffer. `buf` must hold at least the version's
    /// minimum header length.
    pub(crate) fn parse(version: u32, buf: &[u8]) -> Self {
        match version {
            1 => Self::V1(GeometryHeader::parse(buf, V1_SECTOR_BYTES)),
            2 => Self::V2(GeometryHeader::parse(buf, be_u32(buf, 76))),
            3 => Self::V3(HeaderV3::parse(buf)),
            4 => Self::V4(HeaderV4::parse(buf)),
            5 => Self::V5(HeaderV5::parse(buf)),
            other => Self::Unsupported(other),
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Self::V1(_) => 1,
            Self::V2(_) => 2,
            Self::V3(_) => 3,
            Self::V4(_) => 4,
            Self::V5(_) => 5,
            Self::Unsupported(v) => *v,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    pub fn logical_bytes(&self) -> u64 {
        match self {
            Self::V1(h) | Self::V2(h) => h.logical_bytes(),
            Self::V3(h) => h.logical_bytes,
            Self::V4(h) => h.logical_bytes,
            Self::V5(h) => h.logical_bytes,
            Self::Unsupported(_) => 0,
        }
    }

    pub fn hunk_bytes(&self) -> u32 {
        match self {
            Self::V1(h) | Self::V2(h) => h.hunk_bytes(),
            Self::V3(h) => h.hunk_bytes,
            Self::V4(h) => h.hunk_bytes,
            Self::V5(h) => h.hunk_bytes,
            Self::Unsupported(_) => 0,
        }
    }

    pub fn total_hunks(&self) -> u64 {
        match self {
            Self::V1(h) | Self::V2(h) => h.total_hunks as u64,
            Self::V3(h) => h.total_hunks as u64,
            Self::V4(h) => h.total_hunks as u64,
            Self::V5(h) => h.total_hunks(),
            Self::Unsupported(_) => 0,
        }
    }

    /// Offset of the first metadata entry, 0 when the layout has none.
    ///
    /// Only v4 and v5 are consulted; older images are classified by size.
    pub fn metadata_offset(&self) -> u64 {
        match self {
            Self::V4(h) => h.metadata_offset,
            Self::V5(h) => h.metadata_offset,
            Self::V1(_) | Self::V2(_) | Self::V3(_) | Self::Unsupported(_) => 0,
        }
    }

    /// Codec names in header order.
    pub fn compression(&self) -> Vec<String> {
        match self {
            Self::V1(h) | Self::V2(h) => vec![legacy_codec_name(h.compression)],
            Self::V3(h) => vec![legacy_codec_name(h.compression)],
            Self::V4(h) => vec![codec_name(h.compression)],
            Self::V5(h) => {
                let names: Vec<String> = h
                    .compressors
                    .iter()
                    .filter(|&&code| code != 0)
                    .map(|&code| codec_name(code))
                    .collect();
                if names.is_empty() {
                    vec!["none".to_string()]
                } else {
                    names
                }
            }
            Self::Unsupported(_) => vec!["unknown".to_string()],
        }
    }

    /// SHA-1 of the image content, absent when stored as zeros.
    pub fn content_hash(&self) -> Option<String> {
        match self {
            Self::V4(h) => hash_hex(&h.sha1),
            Self::V5(h) => hash_hex(&h.sha1),
            _ => None,
        }
    }

    /// SHA-1 of the parent image. Zero means the image stands alone.
    pub fn parent_hash(&self) -> Option<String> {
        match self {
            Self::V4(h) => hash_hex(&h.parent_sha1),
            Self::V5(h) => hash_hex(&h.parent_sha1),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Byte helpers
// ---------------------------------------------------------------------------

fn be_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

fn be_u64(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_be_bytes(bytes)
}

fn sha1_at(buf: &[u8], offset: usize) -> [u8; SHA1_LEN] {
    let mut hash = [0u8; SHA1_LEN];
    hash.copy_from_slice(&buf[offset..offset + SHA1_LEN]);
    hash
}

/// Lower-case hex of a hash, or `None` for an all-zero field.
fn hash_hex(hash: &[u8]) -> Option<String> {
    if hash.iter().all(|&b| b == 0) {
        return None;
    }
    Some(hash.iter().map(|b| format!("{:02x}", b)).collect())
}

/// Fill as much of `buf` as the reader can supply. Returns the byte count.
pub(crate) fn read_up_to(reader: &mut dyn ReadSeek, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[path = "tests/header_tests.rs"]
mod tests;
