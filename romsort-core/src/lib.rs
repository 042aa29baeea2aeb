//! Shared types for the romsort identification engine.
//!
//! Holds the console vocabulary ([`Platform`], [`ConsoleId`]) and the
//! extension resolver that sits at the front of every lookup.

use std::io::{Read, Seek};

pub mod console;
pub mod extension;
pub mod platform;
pub mod util;

pub use console::ConsoleId;
pub use extension::{is_known_extension, known_extensions, resolve, resolve_path};
pub use platform::{Platform, PlatformParseError};

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}
