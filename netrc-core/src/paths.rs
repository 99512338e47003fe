//! # Login File Location
//!
//! Resolves which file to operate on: an explicit path wins, then the `NETRC`
//! environment variable, then the platform's file name in the home directory.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{Error, Result};
use crate::platform::Platform;

/// Environment variable naming an alternative login file
pub const NETRC_ENV: &str = "NETRC";

/// Returns the login file path inside `home`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use netrc_core::paths::netrc_path_in;
/// use netrc_core::platform::Platform;
///
/// let path = netrc_path_in(Path::new("/home/user"), &Platform::portable());
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn netrc_path_in(home: &Path, platform: &Platform) -> PathBuf {
  home.join(platform.netrc_file_name())
}

/// Picks the login file from the given sources, in priority order.
pub fn resolve_path(
  explicit: Option<&Path>,
  env_value: Option<OsString>,
  home: Option<&Path>,
  platform: &Platform,
) -> Result<PathBuf> {
  if let Some(path) = explicit {
    return Ok(path.to_path_buf());
  }
  if let Some(value) = env_value.filter(|v| !v.is_empty()) {
    return Ok(PathBuf::from(value));
  }
  home
    .map(|h| netrc_path_in(h, platform))
    .ok_or(Error::NoHomeDirectory)
}

/// Resolves the login file for the current user.
///
/// # Errors
///
/// [`Error::NoHomeDirectory`] when there is no explicit path, `NETRC` is
/// unset and the home directory cannot be determined.
pub fn default_path(explicit: Option<&Path>, platform: &Platform) -> Result<PathBuf> {
  let base_dirs = BaseDirs::new();
  resolve_path(
    explicit,
    env::var_os(NETRC_ENV),
    base_dirs.as_ref().map(BaseDirs::home_dir),
    platform,
  )
}
