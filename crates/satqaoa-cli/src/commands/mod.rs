//! CLI command implementations.

pub mod circuit;
pub mod common;
pub mod generate;
pub mod run;
pub mod summarize;
pub mod sweep;
