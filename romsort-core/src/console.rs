use serde::{Serialize, Serializer};

use crate::Platform;

/// The answer the extension resolver gives for a file.
///
/// `DiscImage` is not a console: it marks a compressed disc-image container
/// whose media type has to be read from its header before anything more
/// specific can be said.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleId {
    Known(Platform),
    DiscImage,
    Unknown,
}

impl ConsoleId {
    pub fn platform(&self) -> Option<Platform> {
        match self {
            Self::Known(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn is_disc_image(&self) -> bool {
        matches!(self, Self::DiscImage)
    }

    /// Stable identifier for logs, JSON, and folder names.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Known(p) => p.short_name(),
            Self::DiscImage => "chd",
            Self::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Known(p) => p.display_name(),
            Self::DiscImage => "Compressed Disc Image (CHD)",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<Platform> for ConsoleId {
    fn from(platform: Platform) -> Self {
        Self::Known(platform)
    }
}

impl std::fmt::Display for ConsoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for ConsoleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.short_name())
    }
}
