use serde::Serialize;

use romsort_core::util::MIB;

/// Physical media a CHD image was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MediaType {
    Unknown,
    CdRom,
    GdRom,
    Hdd,
    LaserDisc,
    Dvd,
}

impl MediaType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::CdRom => "CD-ROM",
            Self::GdRom => "GD-ROM",
            Self::Hdd => "Hard Disk",
            Self::LaserDisc => "LaserDisc",
            Self::Dvd => "DVD",
        }
    }

    /// Best-guess platform for media types only one platform uses.
    ///
    /// CD-ROM, DVD and hard-disk images are shared by many systems and
    /// return `None`; callers need another signal (a DAT match, a folder
    /// name) to pin those down.
    pub fn platform_hint(&self) -> Option<&'static str> {
        match self {
            Self::GdRom => Some("Dreamcast"),
            Self::LaserDisc => Some("LaserDisc"),
            Self::Unknown | Self::CdRom | Self::Hdd | Self::Dvd => None,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a [`MediaType`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaSource {
    /// A metadata tag in the image named the media.
    Metadata,
    /// Guessed from the file size.
    SizeHeuristic,
    /// The header could not be interpreted at all.
    Unavailable,
}

/// Guess the media type from the image's size on disk.
///
/// Buckets, in MiB: below 100 unknown, below 1000 CD, below 1800 GD,
/// below 5000 DVD, anything larger a hard disk. Compressed images skew
/// small, so this is only a fallback.
pub fn media_type_from_size(bytes: u64) -> MediaType {
    match bytes / MIB {
        0..100 => MediaType::Unknown,
        100..1000 => MediaType::CdRom,
        1000..1800 => MediaType::GdRom,
        1800..5000 => MediaType::Dvd,
        _ => MediaType::Hdd,
    }
}

#[cfg(test)]
#[path = "tests/media_tests.rs"]
mod tests;
