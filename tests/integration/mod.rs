//! Integration tests for refcheck.
//!
//! These tests exercise the validators, orchestrator, CLI and formatters
//! against mock kernels, and the exit codes of the built binary.

pub mod binary_tests;
pub mod cli_tests;
pub mod output_tests;
pub mod probe_tests;
