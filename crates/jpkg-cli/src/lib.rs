//! jpkg - dependency-aware installs from JSON package manifests
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
//!
//! # Overview
//!
//! Every package is described by one JSON manifest. jpkg resolves the
//! transitive dependencies of the requested packages, plans the installs in
//! dependency order and runs each package's install script against its
//! unpacked source archive.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.jpkg/
//! ├── config.toml         # Optional settings
//! ├── availablePackages/  # Manifests of installable packages
//! ├── installedPackages/  # Manifests of installed packages
//! ├── sources/            # Local source archives
//! ├── installScripts/     # Local install scripts
//! ├── build/              # Per-package unpack directories
//! └── cache/              # Downloaded artifacts
//! ```

pub mod cmd;
pub mod ops;
pub mod ui;

pub use jpkg_core::USER_AGENT;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "jpkg")]
#[command(author, version, about = "jpkg - dependency-aware package installs")]
pub struct Cli {
    /// jpkg home directory (default: ~/.jpkg)
    #[arg(long, global = true, env = "JPKG_HOME")]
    pub home: Option<PathBuf>,

    /// Show what would happen without making changes
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install packages and their dependencies
    Install {
        /// Package name(s)
        #[arg(required = true)]
        packages: Vec<String>,
        /// Reinstall requested packages that are already installed
        #[arg(long)]
        reinstall: bool,
        /// Reinstall every dependency, even if already installed
        #[arg(long = "reinstall-deps")]
        reinstall_dependencies: bool,
    },
    /// Upgrade outdated packages and rebuild everything depending on them
    Upgrade,
    /// List installed packages
    List,
    /// List available packages
    Available,
    /// Search available packages by name
    Search {
        /// Substrings to look for (case-insensitive)
        #[arg(required = true)]
        queries: Vec<String>,
    },
}
