pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod io;
pub mod paths;
pub mod planner;
pub mod resolver;
pub mod upgrade;

pub mod reporter;

pub use catalog::{Catalog, CatalogLoader, CatalogWarning, LoadedCatalog};
pub use config::Config;
pub use executor::Executor;
pub use paths::*;
pub use planner::{Action, ActionKind, Notice, Plan, PlanOptions, Planner};
pub use reporter::{NullReporter, Reporter};
pub use upgrade::UpgradePlan;

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("jpkg-core/", env!("CARGO_PKG_VERSION"));
