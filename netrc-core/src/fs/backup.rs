//! Numbered backups (`<file>.000`, `<file>.001`, ...).

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::FileOps;
use crate::error::{Error, Result};
use crate::platform::SECURE_MODE;

/// Default backup naming: `<path>.<NNN>`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use netrc_core::fs::numbered_backup_name;
///
/// assert_eq!(numbered_backup_name(Path::new("/home/u/.netrc"), 7), Path::new("/home/u/.netrc.007"));
/// ```
pub fn numbered_backup_name(path: &Path, n: u32) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(format!(".{n:03}"));
  PathBuf::from(name)
}

impl FileOps {
  /// Backs up `path` to the first free `<path>.<NNN>` name.
  ///
  /// See [`FileOps::backup_with`].
  pub fn backup(&self, path: &Path) -> Result<Option<PathBuf>> {
    self.backup_with(path, numbered_backup_name)
  }

  /// Copies `path` to the first name produced by `pattern(path, n)`, for
  /// `n = 0, 1, ...`, that does not exist yet. Existing backups are never
  /// overwritten. The backup always gets mode 0600, whatever the mode of the
  /// original.
  ///
  /// Returns `Ok(None)` without creating anything when `path` does not
  /// exist.
  ///
  /// # Errors
  ///
  /// [`Error::PermissionDenied`] if `path` cannot be read, and any error from
  /// the verified copy.
  #[instrument(skip(self, pattern), level = "debug")]
  pub fn backup_with<F>(&self, path: &Path, pattern: F) -> Result<Option<PathBuf>>
  where
    F: Fn(&Path, u32) -> PathBuf,
  {
    if !path.try_exists()? {
      debug!("Nothing to back up at {}", path.display());
      return Ok(None);
    }

    File::open(path).map_err(|e| Error::from_access(path, e))?;

    let mut target = None;
    for n in 0..=u32::MAX {
      let candidate = pattern(path, n);
      if !candidate.try_exists()? {
        target = Some(candidate);
        break;
      }
    }
    let target = target.ok_or_else(|| io::Error::other(format!("No free backup name for {}", path.display())))?;

    self.copy_file(path, &target, SECURE_MODE, true)?;

    info!("Backed up {} to {}", path.display(), target.display());
    Ok(Some(target))
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use netrc_test_utils::permissions_enforced;
  use tempfile::TempDir;

  use super::*;
  use crate::platform::Platform;

  #[test]
  fn test_backup_does_not_create_empty_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does_not_exist");
    let alternate = dir.path().join("a");

    let ops = FileOps::new(Platform::portable());
    let result = ops.backup_with(&missing, |_, _| alternate.clone()).unwrap();
    assert_eq!(result, None);
    assert!(!alternate.exists());
    assert!(!missing.exists());
  }

  #[test]
  fn test_backup_copies_to_first_slot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("b");
    fs::write(&path, "1234").unwrap();

    let ops = FileOps::new(Platform::portable());
    let backup = ops.backup(&path).unwrap().unwrap();
    assert_eq!(backup, dir.path().join("b.000"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "1234");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "1234");
  }

  #[test]
  fn test_backup_picks_next_available_filename() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("c");
    fs::write(&path, "12345").unwrap();
    fs::write(dir.path().join("c.000"), "").unwrap();

    let ops = FileOps::new(Platform::portable());
    let backup = ops.backup(&path).unwrap().unwrap();
    assert_eq!(backup, dir.path().join("c.001"));
    assert_eq!(fs::read_to_string(dir.path().join("c.000")).unwrap(), "");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "12345");
  }

  #[test]
  #[cfg(unix)]
  fn test_backup_is_always_owner_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("d");
    fs::write(&path, "abc").unwrap();

    let ops = FileOps::new(Platform::portable());
    ops.platform().apply_mode_to_path(&path, 0o644).unwrap();
    let backup = ops.backup(&path).unwrap().unwrap();
    assert_eq!(ops.platform().mode_of(&backup).unwrap(), Some(0o600));
    assert_eq!(ops.platform().mode_of(&path).unwrap(), Some(0o644));
  }

  #[test]
  #[cfg(unix)]
  fn test_backup_unreadable_file() {
    let dir = TempDir::new().unwrap();
    if !permissions_enforced(dir.path()) {
      return;
    }
    let path = dir.path().join("e");
    fs::write(&path, "72345").unwrap();

    let ops = FileOps::new(Platform::portable());
    for mode in [0o200, 0o000] {
      ops.platform().apply_mode_to_path(&path, mode).unwrap();
      let err = ops.backup(&path).unwrap_err();
      assert!(matches!(err, Error::PermissionDenied { .. }), "mode {mode:o}");
      assert!(!dir.path().join("e.000").exists());
    }
  }

  #[test]
  fn test_numbered_backup_name_widens_past_999() {
    assert_eq!(numbered_backup_name(Path::new("f"), 1234), Path::new("f.1234"));
  }
}
