//! # Platform Capabilities
//!
//! Platform-dependent behaviour is described by a [`Platform`] value that is
//! handed to [`FileOps`](crate::fs::FileOps) and the path helpers, instead of
//! being looked up from process-wide state. Tests construct the value they
//! need directly.

use std::fs::{self, File, OpenOptions, Permissions};
use std::path::Path;

use crate::error::{Error, Result};

/// Owner read/write only.
pub const SECURE_MODE: u32 = 0o600;

/// What the current platform can do with credential files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
  /// Windows naming (`_netrc`) and no Unix permission bits
  pub windows: bool,
  /// Kernel-assisted file copies are available
  pub fast_copy: bool,
}

impl Default for Platform {
  fn default() -> Self {
    Self::detect()
  }
}

impl Platform {
  /// Detects the platform the binary was built for.
  pub const fn detect() -> Self {
    Self {
      windows: cfg!(windows),
      fast_copy: cfg!(any(target_os = "linux", target_os = "android")),
    }
  }

  /// A platform with Unix permissions and only the portable copy loop.
  pub const fn portable() -> Self {
    Self {
      windows: false,
      fast_copy: false,
    }
  }

  /// File name of the login file in the home directory.
  pub const fn netrc_file_name(&self) -> &'static str {
    if self.windows { "_netrc" } else { ".netrc" }
  }

  /// Returns true if permission bits are meaningful on this platform.
  pub const fn supports_modes(&self) -> bool {
    !self.windows && cfg!(unix)
  }

  /// Returns the permission bits of `path`, if the platform has any.
  pub fn mode_of(&self, path: &Path) -> Result<Option<u32>> {
    if !self.supports_modes() {
      return Ok(None);
    }
    let metadata = fs::metadata(path).map_err(|e| Error::from_access(path, e))?;
    Ok(Some(permission_bits(&metadata.permissions())))
  }

  /// Sets the permission bits of an open file.
  pub fn apply_mode(&self, file: &File, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
      if self.supports_modes() {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(Permissions::from_mode(mode))?;
      }
    }
    #[cfg(not(unix))]
    let _ = (file, mode);
    Ok(())
  }

  /// Sets the permission bits of `path`.
  pub fn apply_mode_to_path(&self, path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
      if self.supports_modes() {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(mode)).map_err(|e| Error::from_access(path, e))?;
      }
    }
    #[cfg(not(unix))]
    let _ = (path, mode);
    Ok(())
  }

  /// Fails with [`Error::InsecurePermissions`] if `path` is readable or
  /// writable by anyone but its owner.
  pub fn ensure_secure(&self, path: &Path) -> Result<()> {
    match self.mode_of(path)? {
      Some(mode) if mode & 0o077 != 0 => Err(Error::InsecurePermissions {
        path: path.to_path_buf(),
        mode,
      }),
      _ => Ok(()),
    }
  }

  /// Open options for creating a new file with `mode`.
  pub fn create_options(&self, mode: u32) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
      if self.supports_modes() {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
      }
    }
    #[cfg(not(unix))]
    let _ = mode;
    options
  }
}

#[cfg(unix)]
fn permission_bits(permissions: &Permissions) -> u32 {
  use std::os::unix::fs::PermissionsExt;
  permissions.mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(_permissions: &Permissions) -> u32 {
  SECURE_MODE
}
