//! Command implementations

pub mod available;
pub mod install;
pub mod list;
pub mod search;
pub mod upgrade;
