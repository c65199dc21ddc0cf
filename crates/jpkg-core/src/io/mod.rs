//! IO modules - side effects (network, filesystem, processes)

pub mod download;
pub mod extract;
pub mod fetch;
pub mod install;
pub mod store;

pub use download::HttpFetcher;
pub use fetch::{ArtifactRole, DefaultFetcher, Fetcher, LocalFetcher};
pub use install::{Artifacts, Installer, ScriptInstaller};
pub use store::{InstalledStore, ManifestStore};
