//! Version and build information.
//!
//! Provides version, git commit, build metadata and the kernel backends
//! compiled into this binary.

use crate::kernels::BackendKind;
use std::fmt;

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: &'static str,
    pub rustc_version: Option<&'static str>,
    pub backends: Vec<BackendKind>,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "refcheck {}", self.version)?;

        if let Some(commit) = self.commit {
            writeln!(f, "Commit: {}", commit)?;
        }

        if let Some(date) = self.build_date {
            writeln!(f, "Built: {}", date)?;
        }

        writeln!(f, "Target: {}", self.target)?;

        let backends: Vec<String> = self.backends.iter().map(ToString::to_string).collect();
        write!(f, "Backends: {}", backends.join(", "))?;

        if let Some(rustc) = self.rustc_version {
            write!(f, "\nRustc: {}", rustc)?;
        }

        Ok(())
    }
}

/// Kernel backends usable in this build
pub fn available_backends() -> Vec<BackendKind> {
    let mut backends = vec![BackendKind::Reference];
    if cfg!(feature = "ffi") {
        backends.push(BackendKind::Linked);
    }
    backends
}

/// Get build information
pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("REFCHECK_GIT_HASH"),
        build_date: option_env!("REFCHECK_BUILD_DATE"),
        target: std::env::consts::ARCH,
        rustc_version: option_env!("REFCHECK_RUSTC_VERSION"),
        backends: available_backends(),
    }
}
