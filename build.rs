//! Build script for refcheck.
//!
//! This script:
//! 1. Generates version information from git and environment
//! 2. With the `ffi` feature, tells cargo where to find the C kernel library

use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=REFCHECK_KERNEL_LIB_DIR");
    println!("cargo:rerun-if-env-changed=REFCHECK_KERNEL_LIB");
    println!("cargo:rerun-if-env-changed=REFCHECK_KERNEL_LINK");

    if let Some(hash) = command_output("git", &["rev-parse", "--short", "HEAD"]) {
        println!("cargo:rustc-env=REFCHECK_GIT_HASH={}", hash);
    }

    if let Some(date) = command_output("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]) {
        println!("cargo:rustc-env=REFCHECK_BUILD_DATE={}", date);
    }

    // "rustc 1.75.0 (..." -> "1.75.0"
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    if let Some(version) = command_output(&rustc, &["--version"])
        .and_then(|s| s.split_whitespace().nth(1).map(str::to_string))
    {
        println!("cargo:rustc-env=REFCHECK_RUSTC_VERSION={}", version);
    }

    if env::var_os("CARGO_FEATURE_FFI").is_some() {
        link_kernel_library();
    }
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
}

/// Link the library providing `fib`, `sqr`, `ring` and `quickSort`
fn link_kernel_library() {
    let name = env::var("REFCHECK_KERNEL_LIB").unwrap_or_else(|_| "kernels".to_string());
    let kind = env::var("REFCHECK_KERNEL_LINK").unwrap_or_else(|_| "static".to_string());

    if !matches!(kind.as_str(), "static" | "dylib") {
        println!(
            "cargo:warning=REFCHECK_KERNEL_LINK={} is not static or dylib, using static",
            kind
        );
    }
    let kind = if kind == "dylib" { "dylib" } else { "static" };

    match env::var("REFCHECK_KERNEL_LIB_DIR") {
        Ok(dir) if Path::new(&dir).is_dir() => {
            println!("cargo:rustc-link-search=native={}", dir);
        }
        Ok(dir) => {
            println!(
                "cargo:warning=REFCHECK_KERNEL_LIB_DIR {} does not exist, relying on default search paths",
                dir
            );
        }
        Err(_) => {
            println!("cargo:warning=REFCHECK_KERNEL_LIB_DIR not set, relying on default search paths");
        }
    }

    println!("cargo:rustc-link-lib={}={}", kind, name);
}
