//! # Login File Source
//!
//! Combines the global flags and the configuration into the file the
//! commands operate on, and loads it with the read permission check applied.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use netrc_core::fs::FileOps;
use netrc_core::{ByteFilter, Netrc, Platform, WriteOptions, default_path};
use tracing::debug;

use crate::config::Config;

/// Where the login file lives and how it is read and written
#[derive(Debug, Clone)]
pub struct Source {
  pub path: PathBuf,
  pub platform: Platform,
  pub write_options: WriteOptions,
  pub new_item_prefix: String,
  config: Config,
}

impl Source {
  /// Resolves the login file: `explicit` wins over the configured path,
  /// which wins over `$NETRC` and the home directory.
  pub fn resolve(explicit: Option<&Path>, config: Config, no_backup: bool, no_verify: bool) -> Result<Self> {
    let platform = Platform::detect();
    let path = default_path(explicit.or(config.path.as_deref()), &platform)
      .context("Failed to determine the login file location")?;
    debug!("Using login file {}", path.display());

    Ok(Self {
      path,
      platform,
      write_options: config.write_options(no_backup, no_verify),
      new_item_prefix: config.new_item_prefix.clone(),
      config,
    })
  }

  pub fn file_ops(&self) -> FileOps {
    FileOps::new(self.platform)
  }

  fn filter(&self) -> Option<Box<dyn ByteFilter>> {
    self
      .config
      .filter
      .as_ref()
      .map(|filter| Box::new(filter.to_filter()) as Box<dyn ByteFilter>)
  }

  /// Rejects a login file that group or others can access. A missing file
  /// passes.
  pub fn check_permissions(&self) -> Result<()> {
    if !self.path.exists() {
      return Ok(());
    }
    self
      .platform
      .ensure_secure(&self.path)
      .with_context(|| format!("Refusing to use {}", self.path.display()))
  }

  /// Checks permissions, then reads the login file.
  pub fn load(&self) -> Result<Netrc> {
    self.check_permissions()?;
    self.read()
  }

  /// Reads the login file, or an empty document if it does not exist yet.
  /// Permissions are not checked.
  pub fn read(&self) -> Result<Netrc> {
    let mut netrc = Netrc::read_with_filter(&self.path, self.filter())
      .with_context(|| format!("Failed to read {}", self.path.display()))?
      .with_file_ops(self.file_ops())
      .with_write_options(self.write_options);
    netrc.set_new_item_prefix(self.new_item_prefix.as_str());
    Ok(netrc)
  }
}

#[cfg(test)]
mod tests {
  use netrc_test_utils::NetrcGuard;

  use super::*;

  fn source_for(path: &Path) -> Source {
    Source::resolve(Some(path), Config::default(), false, false).unwrap()
  }

  #[test]
  fn test_explicit_path_beats_config() {
    let config = Config {
      path: Some(PathBuf::from("/from/config")),
      ..Config::default()
    };
    let source = Source::resolve(Some(Path::new("/from/flag")), config.clone(), false, false).unwrap();
    assert_eq!(source.path, Path::new("/from/flag"));

    let source = Source::resolve(None, config, true, false).unwrap();
    assert_eq!(source.path, Path::new("/from/config"));
    assert!(!source.write_options.backup);
    assert!(source.write_options.verify);
  }

  #[test]
  fn test_load_missing_file_is_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let netrc = source_for(&dir.path().join(".netrc")).load().unwrap();
    assert!(netrc.is_empty());
  }

  #[test]
  fn test_load_applies_prefix() {
    let guard = NetrcGuard::new("machine m login l password p\n");
    let mut source = source_for(guard.netrc_path());
    source.new_item_prefix = "\n".to_string();

    let netrc = source.load().unwrap();
    assert_eq!(netrc.new_item_prefix(), "\n");
    assert_eq!(netrc.get("m").login.as_deref(), Some("l"));
  }

  #[test]
  #[cfg(unix)]
  fn test_load_rejects_insecure_file() {
    let guard = NetrcGuard::new("machine m login l password p\n");
    guard.set_mode(0o644);

    let err = source_for(guard.netrc_path()).load().unwrap_err();
    assert!(format!("{err:#}").contains("0644"));
  }
}
