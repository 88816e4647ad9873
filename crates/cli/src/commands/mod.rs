//! CLI command implementations.

pub mod flags;
pub mod quote;
