//! Shared types and manifest format for jpkg.

pub mod manifest;
pub mod types;
pub mod version;

// Re-exports
pub use manifest::{ManifestError, Package, PackageKind};
pub use types::*;
pub use version::{SemverOrder, VersionOrder};
