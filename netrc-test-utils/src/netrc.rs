//! Temporary login files for tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for a test `.netrc` file
///
/// Creates a temporary directory holding a `.netrc` with the given content
/// and mode 0600 on Unix. The directory and everything written next to the
/// file (backups included) is removed when the guard is dropped.
pub struct NetrcGuard {
  temp_dir: TempDir,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    Self::with_name(".netrc", content)
  }

  /// Create a guard whose file has a custom name, such as `_netrc`
  pub fn with_name(name: &str, content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(name);

    fs::write(&netrc_path, content).expect("Failed to write test .netrc");
    set_mode(&netrc_path, 0o600);

    Self { temp_dir, netrc_path }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Read the current file content
  pub fn content(&self) -> String {
    fs::read_to_string(&self.netrc_path).expect("Failed to read test .netrc")
  }

  /// Change the file mode (no-op outside Unix)
  pub fn set_mode(&self, mode: u32) {
    set_mode(&self.netrc_path, mode);
  }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
  use std::os::unix::fs::PermissionsExt;

  fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("Failed to set test .netrc mode");
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}
