//! Metadata directory walk.
//!
//! v4/v5 images keep a singly-linked list of tagged metadata entries. The
//! tags say what the image holds (CD tracks, GD-ROM tracks, hard-disk
//! identify data, LaserDisc frames). Every offset in the chain comes from
//! the file, so the walk is bounded by an entry count and a visited set.

use std::collections::HashSet;
use std::io::SeekFrom;

use romsort_core::ReadSeek;

use crate::codec::tag_or_hex;
use crate::header::read_up_to;
use crate::media::MediaType;

/// Size of one directory entry: tag, flags, next offset, payload length.
pub const METADATA_ENTRY_LEN: usize = 24;

/// Hard cap on entries followed in one walk.
pub const MAX_METADATA_ENTRIES: usize = 100;

/// Bit 0 of `flags`: another entry follows.
pub const FLAG_MORE_ENTRIES: u32 = 0x0000_0001;

/// Tags that identify the media, and whether each one describes a track.
const MEDIA_TAGS: &[(&[u8; 4], MediaType, bool)] = &[
    (b"CHCD", MediaType::CdRom, true),
    (b"CHTR", MediaType::CdRom, true),
    (b"CHT2", MediaType::CdRom, true),
    (b"CHGT", MediaType::GdRom, true),
    (b"CHGD", MediaType::GdRom, true),
    (b"GDDD", MediaType::Hdd, false),
    (b"IDNT", MediaType::Hdd, false),
    (b"KEY ", MediaType::Hdd, false),
    (b"CIS ", MediaType::Hdd, false),
    (b"AVLD", MediaType::LaserDisc, false),
    (b"DVD ", MediaType::Dvd, false),
];

/// One raw directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataEntry {
    pub tag: [u8; 4],
    pub flags: u32,
    pub next_offset: u64,
    pub length: u64,
}

impl MetadataEntry {
    pub fn from_bytes(buf: &[u8; METADATA_ENTRY_LEN]) -> Self {
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&buf[0..4]);
        let mut flags = [0u8; 4];
        flags.copy_from_slice(&buf[4..8]);
        let mut next = [0u8; 8];
        next.copy_from_slice(&buf[8..16]);
        let mut length = [0u8; 8];
        length.copy_from_slice(&buf[16..24]);
        Self {
            tag,
            flags: u32::from_be_bytes(flags),
            next_offset: u64::from_be_bytes(next),
            length: u64::from_be_bytes(length),
        }
    }

    pub fn has_more(&self) -> bool {
        self.flags & FLAG_MORE_ENTRIES != 0
    }

    pub fn tag_name(&self) -> String {
        tag_or_hex(u32::from_be_bytes(self.tag))
    }

    fn media(&self) -> Option<(MediaType, bool)> {
        MEDIA_TAGS
            .iter()
            .find(|(tag, _, _)| **tag == self.tag)
            .map(|(_, media, is_track)| (*media, *is_track))
    }
}

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// The last entry cleared its "more entries" flag.
    EndOfList,
    /// An entry pointed to offset zero.
    NullNext,
    /// An offset came round a second time.
    Cycle,
    /// An entry ran past the end of the file or could not be read.
    Truncated,
    /// [`MAX_METADATA_ENTRIES`] entries were read.
    EntryLimit,
}

/// What a metadata walk found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataScan {
    /// First media type named by a tag, `Unknown` if none was.
    pub media_type: MediaType,
    pub track_count: u32,
    /// Every tag seen, in chain order.
    pub tags: Vec<String>,
    pub entries_read: usize,
    pub end: WalkEnd,
}

impl MetadataScan {
    fn new() -> Self {
        Self {
            media_type: MediaType::Unknown,
            track_count: 0,
            tags: Vec::new(),
            entries_read: 0,
            end: WalkEnd::EndOfList,
        }
    }

    fn record(&mut self, entry: &MetadataEntry) {
        self.entries_read += 1;
        self.tags.push(entry.tag_name());
        if let Some((media, is_track)) = entry.media() {
            if self.media_type == MediaType::Unknown {
                self.media_type = media;
            }
            if is_track {
                self.track_count += 1;
            }
        }
    }

    pub fn is_conclusive(&self) -> bool {
        self.media_type != MediaType::Unknown
    }
}

/// Walk the metadata chain starting at `start`.
///
/// Never fails: a bad offset or short read ends the walk and whatever was
/// collected up to that point is returned.
pub fn scan_metadata(reader: &mut dyn ReadSeek, start: u64, file_size: u64) -> MetadataScan {
    let mut scan = MetadataScan::new();
    let mut visited = HashSet::new();
    let mut offset = start;

    loop {
        if scan.entries_read >= MAX_METADATA_ENTRIES {
            log::debug!("CHD metadata walk hit the {} entry cap", MAX_METADATA_ENTRIES);
            scan.end = WalkEnd::EntryLimit;
            break;
        }
        if !visited.insert(offset) {
            log::debug!("CHD metadata chain revisits offset {:#x}", offset);
            scan.end = WalkEnd::Cycle;
            break;
        }
        if offset.saturating_add(METADATA_ENTRY_LEN as u64) > file_size {
            scan.end = WalkEnd::Truncated;
            break;
        }

        let entry = match read_entry(reader, offset) {
            Some(entry) => entry,
            None => {
                scan.end = WalkEnd::Truncated;
                break;
            }
        };
        scan.record(&entry);

        if !entry.has_more() {
            scan.end = WalkEnd::EndOfList;
            break;
        }
        if entry.next_offset == 0 {
            scan.end = WalkEnd::NullNext;
            break;
        }
        offset = entry.next_offset;
    }

    scan
}

fn read_entry(reader: &mut dyn ReadSeek, offset: u64) -> Option<MetadataEntry> {
    reader.seek(SeekFrom::Start(offset)).ok()?;
    let mut buf = [0u8; METADATA_ENTRY_LEN];
    let n = read_up_to(reader, &mut buf).ok()?;
    if n < METADATA_ENTRY_LEN {
        return None;
    }
    Some(MetadataEntry::from_bytes(&buf))
}

#[cfg(test)]
#[path = "tests/metadata_tests.rs"]
mod tests;
