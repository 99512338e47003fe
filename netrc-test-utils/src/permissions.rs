//! Permission enforcement detection
//!
//! Tests that expect "permission denied" are meaningless when running as
//! root, where mode bits do not restrict access.

use std::path::Path;

/// Returns `true` if a mode-000 file inside `dir` really cannot be opened.
#[cfg(unix)]
pub fn permissions_enforced(dir: &Path) -> bool {
  use std::fs;
  use std::os::unix::fs::PermissionsExt;

  let marker = dir.join(".permission-check");
  fs::write(&marker, "check").expect("Failed to create permission marker");
  fs::set_permissions(&marker, fs::Permissions::from_mode(0o000)).expect("Failed to chmod permission marker");

  let enforced = fs::File::open(&marker).is_err();
  let _ = fs::remove_file(&marker);
  enforced
}

/// Mode bits are not modelled outside Unix.
#[cfg(not(unix))]
pub fn permissions_enforced(_dir: &Path) -> bool {
  false
}
