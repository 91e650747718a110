//! CLI module for argument parsing and output formatting.
//!
//! Arguments are declared with clap derive; reports render as text, JSON or JUnit.

pub mod args;
pub mod output;
