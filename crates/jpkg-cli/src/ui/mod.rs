//! UI Module - terminal output for jpkg commands
//!
//! - [`theme`] - Colors, icons, and column widths
//! - [`output`] - [`ConsoleReporter`], the terminal implementation of the core `Reporter`
//! - [`list`] - Column-aligned package rows for `list`, `available` and `search`
//! - [`plan`] - Rendering of planned actions and notices
//! - [`prompt`] - Confirmation prompts

pub mod list;
pub mod output;
pub mod plan;
pub mod prompt;
pub mod theme;

pub use output::ConsoleReporter;
pub use theme::Theme;
