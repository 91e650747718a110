//! Host information for report metadata.
//!
//! Missing data never fails a run: callers fall back to "unknown" or 0.

use crate::RefcheckError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;

/// Get the system hostname
pub fn get_hostname() -> Result<String, RefcheckError> {
    for path in ["/etc/hostname", "/proc/sys/kernel/hostname"] {
        if let Ok(hostname) = fs::read_to_string(path) {
            let hostname = hostname.trim();
            if !hostname.is_empty() {
                return Ok(hostname.to_string());
            }
        }
    }

    if let Ok(hostname) = std::env::var("HOSTNAME") {
        if !hostname.is_empty() {
            return Ok(hostname);
        }
    }

    Err(RefcheckError::Io {
        context: "get_hostname".to_string(),
        message: "Could not read hostname from /etc/hostname, /proc or $HOSTNAME".to_string(),
    })
}

/// Get current Unix timestamp
pub fn get_unix_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Format a Unix timestamp as ISO 8601 (e.g. `2024-12-06T14:26:40Z`)
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| format!("@{}", timestamp))
}
