//! Identification pipeline for romsort.
//!
//! Ties the extension resolver, the CHD header parser and the archive
//! analyzer together behind [`Identifier`], and adds the pieces a front
//! end needs around it: a directory scanner and persisted settings.

pub mod error;
pub mod identify;
pub mod scanner;
pub mod settings;

pub use error::IdentifyError;
pub use identify::{Identification, Identifier, IdentifyOptions, resolve_entry};
pub use scanner::{ScanOptions, is_candidate, scan_candidates};
pub use settings::{AnalysisSettings, Settings, ToolSettings};

pub use romsort_archive::{ArchiveAnalyzer, ArchiveInfo, ArchiveType};
pub use romsort_chd::DiscImageMetadata;
pub use romsort_core::{ConsoleId, Platform};
