//! Build script for reframe-api
//!
//! Exposes build identification to the startup banner as compile-time env
//! vars: `GIT_HASH`, `BUILD_TIMESTAMP`, `BUILD_PROFILE`.
//!
//! No `rerun-if-changed` directives, so the script reruns on every build and
//! the values stay current.

use chrono::{SecondsFormat, Utc};
use std::process::Command;

const UNKNOWN: &str = "unknown";

/// Short commit hash of `HEAD`, if built from a git checkout
fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}

fn main() {
    emit("GIT_HASH", git_short_hash().as_deref().unwrap_or(UNKNOWN));
    emit(
        "BUILD_TIMESTAMP",
        &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    emit(
        "BUILD_PROFILE",
        &std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()),
    );
}
