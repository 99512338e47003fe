//! File copying with interchangeable copy strategies.

use std::fmt::Debug;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, instrument, warn};

use super::FileOps;
use crate::error::{Error, Result};
use crate::platform::Platform;

/// Moves the bytes of one open file into another.
pub trait CopyStrategy: Debug + Send + Sync {
  /// Short name used in log output.
  fn name(&self) -> &'static str;

  /// Copies everything left in `source` into `dest`, returning the number of
  /// bytes written.
  fn copy(&self, source: &mut File, dest: &mut File, buffer_size: usize) -> io::Result<u64>;
}

/// Portable chunk loop. Reads into a fixed buffer and writes each chunk
/// straight to the destination file without an intermediate `BufWriter`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferedCopy;

impl CopyStrategy for BufferedCopy {
  fn name(&self) -> &'static str {
    "buffered"
  }

  fn copy(&self, source: &mut File, dest: &mut File, buffer_size: usize) -> io::Result<u64> {
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;
    loop {
      let n = match source.read(&mut buffer) {
        Ok(0) => break,
        Ok(n) => n,
        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
        Err(e) => return Err(e),
      };
      dest.write_all(&buffer[..n])?;
      total += n as u64;
    }
    Ok(total)
  }
}

/// Lets the standard library pick the kernel copy path (`copy_file_range` or
/// `sendfile` on Linux), which itself falls back to a userspace loop when the
/// filesystem refuses.
#[derive(Debug, Default, Clone, Copy)]
pub struct KernelCopy;

impl CopyStrategy for KernelCopy {
  fn name(&self) -> &'static str {
    "kernel"
  }

  fn copy(&self, source: &mut File, dest: &mut File, _buffer_size: usize) -> io::Result<u64> {
    io::copy(source, dest)
  }
}

/// Picks the copy strategy for a platform.
pub fn select_strategy(platform: &Platform) -> Box<dyn CopyStrategy> {
  if platform.fast_copy {
    Box::new(KernelCopy)
  } else {
    Box::new(BufferedCopy)
  }
}

impl FileOps {
  /// Copies `source` to `dest` and gives `dest` the permission bits `mode`.
  ///
  /// Fails with [`Error::SameFile`] before touching anything when `source`
  /// and `dest` name the same file.
  ///
  /// A copy that fails part way removes the partial destination before the
  /// error is returned. With `verify` the two files are compared afterwards
  /// and a mismatch removes `dest` and fails with
  /// [`Error::VerificationFailed`].
  #[instrument(skip(self), level = "debug")]
  pub fn copy_file(&self, source: &Path, dest: &Path, mode: u32, verify: bool) -> Result<()> {
    let mut input = File::open(source).map_err(|e| Error::from_access(source, e))?;
    // Opening `dest` truncates it, which would also empty `source`.
    if same_file(source, dest)? {
      return Err(Error::SameFile {
        path: dest.to_path_buf(),
      });
    }
    let mut output = self
      .platform()
      .create_options(mode)
      .open(dest)
      .map_err(|e| Error::from_access(dest, e))?;
    // An existing destination keeps its old mode unless it is set explicitly.
    self.platform().apply_mode(&output, mode)?;

    let copied = self
      .strategy()
      .copy(&mut input, &mut output, self.buffer_size())
      .and_then(|bytes| output.sync_all().map(|()| bytes));

    match copied {
      Ok(bytes) => debug!("Copied {bytes} bytes with the {} strategy", self.strategy().name()),
      Err(e) => {
        drop(output);
        remove_quietly(dest);
        return Err(e.into());
      }
    }
    drop(output);

    if verify && !self.compare_files(&[source, dest])? {
      remove_quietly(dest);
      return Err(Error::VerificationFailed {
        expected: source.to_path_buf(),
        written: dest.to_path_buf(),
      });
    }

    Ok(())
  }
}

/// Whether `a` and `b` name the same existing file. A missing `b` never
/// matches.
fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
  let b_meta = match fs::metadata(b) {
    Ok(meta) => meta,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
    Err(e) => return Err(e),
  };

  #[cfg(unix)]
  {
    use std::os::unix::fs::MetadataExt;
    let a_meta = fs::metadata(a)?;
    Ok(a_meta.dev() == b_meta.dev() && a_meta.ino() == b_meta.ino())
  }
  #[cfg(not(unix))]
  {
    let _ = b_meta;
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
  }
}

fn remove_quietly(path: &Path) {
  if let Err(e) = fs::remove_file(path) {
    warn!("Failed to remove partial file {}: {e}", path.display());
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;
  use crate::platform::SECURE_MODE;

  /// Writes half the data and then fails.
  #[derive(Debug)]
  struct FailingCopy;

  impl CopyStrategy for FailingCopy {
    fn name(&self) -> &'static str {
      "failing"
    }

    fn copy(&self, source: &mut File, dest: &mut File, _buffer_size: usize) -> io::Result<u64> {
      let mut buffer = [0u8; 4];
      let n = source.read(&mut buffer)?;
      dest.write_all(&buffer[..n])?;
      Err(io::Error::other("disk on fire"))
    }
  }

  /// Writes different bytes than it reads.
  #[derive(Debug)]
  struct CorruptingCopy;

  impl CopyStrategy for CorruptingCopy {
    fn name(&self) -> &'static str {
      "corrupting"
    }

    fn copy(&self, source: &mut File, dest: &mut File, _buffer_size: usize) -> io::Result<u64> {
      let mut data = Vec::new();
      source.read_to_end(&mut data)?;
      data.iter_mut().for_each(|b| *b = b.wrapping_add(1));
      dest.write_all(&data)?;
      Ok(data.len() as u64)
    }
  }

  #[test]
  fn test_copy_file_both_strategies() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    let content: Vec<u8> = (0..300_000u32).map(|i| (i % 13) as u8).collect();
    fs::write(&source, &content).unwrap();

    for strategy in [
      Box::new(BufferedCopy) as Box<dyn CopyStrategy>,
      Box::new(KernelCopy) as Box<dyn CopyStrategy>,
    ] {
      let name = strategy.name();
      let ops = FileOps::new(Platform::portable())
        .with_strategy(strategy)
        .with_buffer_size(1000);
      let dest = dir.path().join(format!("dest-{name}"));
      ops.copy_file(&source, &dest, SECURE_MODE, true).unwrap();
      assert_eq!(fs::read(&dest).unwrap(), content, "strategy {name}");
    }
  }

  #[test]
  fn test_copy_file_removes_partial_destination() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    let dest = dir.path().join("dest");
    fs::write(&source, "0123456789").unwrap();

    let ops = FileOps::new(Platform::portable()).with_strategy(Box::new(FailingCopy));
    let err = ops.copy_file(&source, &dest, SECURE_MODE, true).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!dest.exists());
  }

  #[test]
  fn test_copy_file_verification_failure() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    let dest = dir.path().join("dest");
    fs::write(&source, "abc").unwrap();

    let ops = FileOps::new(Platform::portable()).with_strategy(Box::new(CorruptingCopy));
    let err = ops.copy_file(&source, &dest, SECURE_MODE, true).unwrap_err();
    assert!(matches!(err, Error::VerificationFailed { .. }));
    assert!(!dest.exists());

    // Without verification the corrupt copy is kept.
    ops.copy_file(&source, &dest, SECURE_MODE, false).unwrap();
    assert_eq!(fs::read(&dest).unwrap(), b"bcd");
  }

  #[test]
  fn test_copy_file_onto_itself_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".netrc");
    fs::write(&path, "machine a login x password y\n").unwrap();
    let dotted = dir.path().join(".").join(".netrc");

    let ops = FileOps::new(Platform::portable());
    for dest in [&path, &dotted] {
      let err = ops.copy_file(&path, dest, SECURE_MODE, true).unwrap_err();
      assert!(matches!(err, Error::SameFile { .. }), "{}", dest.display());
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "machine a login x password y\n");
  }

  #[test]
  #[cfg(unix)]
  fn test_copy_file_onto_hard_link_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("original");
    let link = dir.path().join("link");
    fs::write(&path, "content").unwrap();
    fs::hard_link(&path, &link).unwrap();

    let ops = FileOps::new(Platform::portable());
    let err = ops.copy_file(&path, &link, SECURE_MODE, true).unwrap_err();
    assert!(matches!(err, Error::SameFile { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "content");
  }

  #[test]
  #[cfg(unix)]
  fn test_copy_file_applies_mode() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    let dest = dir.path().join("dest");
    fs::write(&source, "abc").unwrap();

    let ops = FileOps::new(Platform::portable());
    ops.copy_file(&source, &dest, SECURE_MODE, true).unwrap();
    assert_eq!(ops.platform().mode_of(&dest).unwrap(), Some(0o600));
  }

  #[test]
  fn test_select_strategy() {
    assert_eq!(select_strategy(&Platform::portable()).name(), "buffered");
    let fast = Platform {
      windows: false,
      fast_copy: true,
    };
    assert_eq!(select_strategy(&fast).name(), "kernel");
  }
}
