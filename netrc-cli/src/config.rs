//! # Configuration Management
//!
//! Loads `config.toml` from the platform config directory. Every field is
//! optional in the file; command-line flags override what it says.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use netrc_core::{CommandFilter, SECURE_MODE, WriteOptions};
use serde::Deserialize;
use tracing::debug;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// External commands used to decrypt and encrypt the login file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterConfig {
  /// Command that turns the stored file into plain text, program first
  pub decrypt: Vec<String>,
  /// Command that turns plain text into the stored form, program first
  pub encrypt: Vec<String>,
}

impl FilterConfig {
  pub fn to_filter(&self) -> CommandFilter {
    CommandFilter::new(self.decrypt.clone(), self.encrypt.clone())
  }
}

/// User configuration for netrc-keeper
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Login file to use instead of `$NETRC` or the home directory default
  pub path: Option<PathBuf>,
  /// Back up the existing file before replacing it
  pub backup: bool,
  /// Read written files back and compare them before committing
  pub verify: bool,
  /// Text inserted before every new entry
  pub new_item_prefix: String,
  /// Mode for newly created login files
  pub mode: u32,
  pub filter: Option<FilterConfig>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      path: None,
      backup: true,
      verify: true,
      new_item_prefix: String::new(),
      mode: SECURE_MODE,
      filter: None,
    }
  }
}

impl Config {
  /// Path of the user's configuration file
  pub fn default_path() -> Result<PathBuf> {
    let proj_dirs =
      ProjectDirs::from("eddieland", "", "netrc-keeper").context("Failed to determine project directories")?;
    Ok(proj_dirs.config_dir().join(CONFIG_FILE))
  }

  /// Load the user's configuration, or defaults when there is none
  pub fn load() -> Result<Self> {
    Self::load_from(&Self::default_path()?)
  }

  /// Load configuration from `path`, or defaults if it does not exist
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!("No config at {}, using defaults", path.display());
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: Self =
      toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
  }

  /// Write options with the command-line overrides applied
  pub const fn write_options(&self, no_backup: bool, no_verify: bool) -> WriteOptions {
    WriteOptions {
      backup: self.backup && !no_backup,
      verify: self.verify && !no_verify,
      mode: self.mode,
    }
  }
}
