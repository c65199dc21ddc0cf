//! Operations shared by several commands.

pub mod apply;
pub mod context;

pub use apply::apply_plan;
pub use context::Context;
