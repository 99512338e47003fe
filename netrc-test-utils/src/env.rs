//! Environment variable management for testing
//!
//! Points the XDG config directory at a per-test temporary directory and
//! clears `NETRC`, so neither the user's configuration nor their login file
//! leak into a test.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use tempfile::TempDir;

/// A test environment with its own XDG config directory and no `NETRC`
pub struct EnvTestGuard {
  /// The temporary directory that holds the config directory
  pub temp_dir: TempDir,
  original_config_home: Option<OsString>,
  original_netrc: Option<OsString>,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";
  pub const NETRC: &'static str = "NETRC";

  /// Create a new test environment with an overridden config directory
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let original_config_home = env::var_os(Self::XDG_CONFIG_HOME);
    let original_netrc = env::var_os(Self::NETRC);

    let config_dir = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_dir).expect("Failed to create config directory");
    unsafe {
      env::set_var(Self::XDG_CONFIG_HOME, &config_dir);
      env::remove_var(Self::NETRC);
    }

    Self {
      temp_dir,
      original_config_home,
      original_netrc,
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }
}

impl Drop for EnvTestGuard {
  fn drop(&mut self) {
    match &self.original_config_home {
      Some(val) => unsafe {
        env::set_var(EnvTestGuard::XDG_CONFIG_HOME, val);
      },
      None => unsafe {
        env::remove_var(EnvTestGuard::XDG_CONFIG_HOME);
      },
    }

    match &self.original_netrc {
      Some(val) => unsafe {
        env::set_var(EnvTestGuard::NETRC, val);
      },
      None => unsafe {
        env::remove_var(EnvTestGuard::NETRC);
      },
    }
  }
}
