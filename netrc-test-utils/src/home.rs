//! HOME directory management for testing
//!
//! This module provides utilities for isolating HOME directory during testing
//! to prevent tests from reading or rewriting the user's real login file.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Overrides HOME (and USERPROFILE on Windows) with a temporary directory
/// and restores the previous values on drop
pub struct HomeEnvTestGuard {
  /// The temporary directory that will be used as HOME
  pub temp_dir: TempDir,
  original_home: Option<OsString>,
  original_profile: Option<OsString>,
}

impl Default for HomeEnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl HomeEnvTestGuard {
  /// Create a new test environment with a temporary HOME directory
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let original_home = env::var_os("HOME");
    let original_profile = env::var_os("USERPROFILE");

    unsafe {
      env::set_var("HOME", temp_dir.path());
      env::set_var("USERPROFILE", temp_dir.path());
    }

    Self {
      temp_dir,
      original_home,
      original_profile,
    }
  }

  /// Get the path to the temporary HOME directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Get the path to a file in the temporary HOME directory
  pub fn home_path(&self, relative_path: &str) -> PathBuf {
    self.temp_dir.path().join(relative_path)
  }
}

fn restore(key: &str, value: Option<&OsString>) {
  match value {
    Some(val) => unsafe {
      env::set_var(key, val);
    },
    None => unsafe {
      env::remove_var(key);
    },
  }
}

impl Drop for HomeEnvTestGuard {
  fn drop(&mut self) {
    restore("HOME", self.original_home.as_ref());
    restore("USERPROFILE", self.original_profile.as_ref());
  }
}
