//! Platform layer.
//!
//! Provides:
//! - Host metadata for reports (hostname, timestamps)
//! - Process execution for external validator probes

pub mod host;
pub mod process;
