//! Build script for netrc-keeper
//!
//! Embeds version and build metadata for runtime access

use std::env;
use std::process::Command;

/// Entry point for the build script.
fn main() {
  embed_build_info();
  set_rerun_conditions();
}

/// Embeds the short Git commit hash and the target triple as compile-time
/// environment variables. `GIT_HASH` is always set so `env!` can rely on it.
fn embed_build_info() {
  let git_hash = Command::new("git")
    .args(["rev-parse", "--short", "HEAD"])
    .output()
    .ok()
    .filter(|output| output.status.success())
    .and_then(|output| String::from_utf8(output.stdout).ok())
    .map(|hash| hash.trim().to_string())
    .filter(|hash| !hash.is_empty())
    .unwrap_or_else(|| "unknown".to_string());
  println!("cargo:rustc-env=GIT_HASH={git_hash}");

  println!("cargo:rustc-env=TARGET={}", env::var("TARGET").unwrap_or_default());
}

/// Configures conditions that trigger build script re-execution.
fn set_rerun_conditions() {
  println!("cargo:rerun-if-changed=build.rs");

  // Git HEAD changes update the commit hash
  println!("cargo:rerun-if-changed=../.git/HEAD");

  println!("cargo:rerun-if-env-changed=TARGET");
}
