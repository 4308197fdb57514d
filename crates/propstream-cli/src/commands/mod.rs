//! CLI commands

pub mod fetch;
pub mod replay;
