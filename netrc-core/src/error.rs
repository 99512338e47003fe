//! # Errors
//!
//! A single error type shared by the parser, the document and the persistence
//! helpers. Write-path variants are only ever returned after the destination
//! file has been left in its pre-operation state.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading, editing or persisting a `.netrc` file
#[derive(Debug, Error)]
pub enum Error {
  /// The token stream ended before a mandatory token was read
  #[error("Unexpected end of input: expected {expected}")]
  TruncatedInput { expected: &'static str },

  /// Read/write access to an existing file was refused
  #[error("Permission denied: {}", path.display())]
  PermissionDenied {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A file has group or other permission bits set
  #[error("Permission bits for {} should be 0600, but are {mode:04o}", path.display())]
  InsecurePermissions { path: PathBuf, mode: u32 },

  /// Written content does not match the content it was copied or rendered from
  #[error("Verification failed: {} differs from {}", written.display(), expected.display())]
  VerificationFailed { expected: PathBuf, written: PathBuf },

  /// The final rename onto the destination failed; the destination is untouched
  #[error("Failed to rename {} to {}", from.display(), to.display())]
  RenameFailed {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A value passed to `set` would not read back as a single token. The
  /// value itself is left out of the message since it may be a password.
  #[error("Invalid {field}: the value {reason}")]
  InvalidValue {
    field: &'static str,
    reason: &'static str,
  },

  /// Source and destination of a copy are the same file
  #[error("Cannot copy {} onto itself", path.display())]
  SameFile { path: PathBuf },

  /// Two files of equal size produced reads of different length
  #[error("Read {actual} bytes from {} where {expected} were expected", path.display())]
  ReadSizeMismatch {
    path: PathBuf,
    expected: usize,
    actual: usize,
  },

  /// Comparison needs at least two files
  #[error("Comparing files requires at least 2 paths, got {count}")]
  NotEnoughFiles { count: usize },

  /// An external encrypt/decrypt command failed
  #[error("Filter command `{command}` failed: {message}")]
  Filter { command: String, message: String },

  /// The home directory could not be determined
  #[error("Could not determine the home directory")]
  NoHomeDirectory,

  #[error(transparent)]
  Io(#[from] io::Error),
}

impl Error {
  /// Maps an I/O error on `path` to [`Error::PermissionDenied`] when the
  /// operating system refused access, and to [`Error::Io`] otherwise.
  pub(crate) fn from_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
    if source.kind() == io::ErrorKind::PermissionDenied {
      Self::PermissionDenied {
        path: path.into(),
        source,
      }
    } else {
      Self::Io(source)
    }
  }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_access_maps_permission_denied() {
    let err = Error::from_access("/tmp/x", io::Error::from(io::ErrorKind::PermissionDenied));
    assert!(matches!(err, Error::PermissionDenied { .. }));

    let err = Error::from_access("/tmp/x", io::Error::from(io::ErrorKind::NotFound));
    assert!(matches!(err, Error::Io(_)));
  }

  #[test]
  fn test_insecure_permissions_message_is_octal() {
    let err = Error::InsecurePermissions {
      path: PathBuf::from("/home/user/.netrc"),
      mode: 0o644,
    };
    assert_eq!(
      err.to_string(),
      "Permission bits for /home/user/.netrc should be 0600, but are 0644"
    );
  }
}
