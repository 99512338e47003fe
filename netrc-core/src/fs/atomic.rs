//! Write-to-temp-then-rename replacement of files.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, instrument, warn};

use super::{FileOps, WriteOptions};
use crate::error::{Error, Result};

impl FileOps {
  /// Safely writes a file that may already exist.
  ///
  /// When `path` does not exist it is created with `options.mode` and handed
  /// to `writer` directly; if `writer` fails the half-written file is removed
  /// again. When `path` exists, read/write access is checked first, `writer`
  /// fills a temporary file in the same directory, the current file is backed
  /// up if `options.backup` is set, and the temporary file is renamed over
  /// `path`. Readers see either the old or the new content, never a mix. The
  /// replaced file keeps the permission bits it had before.
  ///
  /// # Errors
  ///
  /// [`Error::PermissionDenied`] from the access check, [`Error::RenameFailed`]
  /// from the final rename, and anything `writer` returns. In every error case
  /// `path` is left exactly as it was and no temporary file remains.
  ///
  /// `options.verify` is ignored here since there are no expected bytes to
  /// compare against. Use [`FileOps::write_bytes_atomic`] for verified writes.
  pub fn atomic_write<F>(&self, path: &Path, options: &WriteOptions, writer: F) -> Result<()>
  where
    F: FnOnce(&mut File) -> Result<()>,
  {
    self.write_inner(path, options, writer, None)
  }

  /// Atomically replaces `path` with `bytes`.
  ///
  /// With `options.verify` the written file is read back and compared with
  /// `bytes` before it replaces `path`, failing with
  /// [`Error::VerificationFailed`] on a mismatch.
  pub fn write_bytes_atomic(&self, path: &Path, bytes: &[u8], options: &WriteOptions) -> Result<()> {
    let expected = options.verify.then_some(bytes);
    self.write_inner(path, options, |file| Ok(file.write_all(bytes)?), expected)
  }

  #[instrument(skip(self, writer, expected), level = "debug")]
  fn write_inner<F>(&self, path: &Path, options: &WriteOptions, writer: F, expected: Option<&[u8]>) -> Result<()>
  where
    F: FnOnce(&mut File) -> Result<()>,
  {
    if !path.try_exists()? {
      return self.write_new(path, options, writer, expected);
    }

    // Fail on permissions before any temporary file exists.
    File::options()
      .read(true)
      .append(true)
      .open(path)
      .map_err(|e| Error::from_access(path, e))?;
    let existing_mode = self.platform().mode_of(path)?;

    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    // The temporary file is deleted when `temp` or `temp_path` is dropped, so
    // every early return below cleans up after itself.
    let mut temp = tempfile::Builder::new()
      .prefix(&format!(".{file_name}."))
      .suffix(".tmp")
      .tempfile_in(dir)?;
    debug!("Writing {} via {}", path.display(), temp.path().display());

    writer(temp.as_file_mut())?;
    temp.as_file_mut().flush()?;
    temp.as_file().sync_all()?;
    if let Some(bytes) = expected {
      let written = temp.path().to_path_buf();
      verify_contents(temp.as_file_mut(), bytes, path, &written)?;
    }
    if let Some(mode) = existing_mode {
      self.platform().apply_mode(temp.as_file(), mode)?;
    }

    let temp_path = temp.into_temp_path();
    self.safe_rename(&temp_path, path, options.backup)?;
    if let Err(e) = temp_path.keep() {
      warn!("Renamed temporary file could not be released: {}", e.error);
    }

    Ok(())
  }

  fn write_new<F>(&self, path: &Path, options: &WriteOptions, writer: F, expected: Option<&[u8]>) -> Result<()>
  where
    F: FnOnce(&mut File) -> Result<()>,
  {
    debug!("Creating {} with mode {:o}", path.display(), options.mode);
    let mut file = self
      .platform()
      .create_options(options.mode)
      .create_new(true)
      .open(path)
      .map_err(|e| Error::from_access(path, e))?;

    let written = self
      .platform()
      .apply_mode(&file, options.mode)
      .and_then(|()| writer(&mut file))
      .and_then(|()| Ok(file.sync_all()?))
      .and_then(|()| match expected {
        Some(bytes) => verify_contents(&mut file, bytes, path, path),
        None => Ok(()),
      });

    if let Err(e) = written {
      drop(file);
      if let Err(remove_err) = fs::remove_file(path) {
        warn!("Failed to remove partially written {}: {remove_err}", path.display());
      }
      return Err(e);
    }

    Ok(())
  }

  /// Renames `source` onto `dest` with a single rename call, backing up
  /// `dest` first when `make_backup` is set. `dest` is never removed ahead of
  /// the rename, so a crash cannot leave it missing.
  ///
  /// # Errors
  ///
  /// [`Error::RenameFailed`] if the rename itself fails, plus any backup
  /// error.
  #[instrument(skip(self), level = "debug")]
  pub fn safe_rename(&self, source: &Path, dest: &Path, make_backup: bool) -> Result<()> {
    if make_backup {
      self.backup(dest)?;
    }

    fs::rename(source, dest).map_err(|e| Error::RenameFailed {
      from: source.to_path_buf(),
      to: dest.to_path_buf(),
      source: e,
    })?;

    debug!("Renamed {} to {}", source.display(), dest.display());
    Ok(())
  }
}

/// Reads `file` back from the start and checks it holds exactly `expected`.
fn verify_contents(file: &mut File, expected: &[u8], target: &Path, written: &Path) -> Result<()> {
  file.seek(SeekFrom::Start(0))?;
  let mut actual = Vec::with_capacity(expected.len());
  file.read_to_end(&mut actual)?;
  if actual != expected {
    return Err(Error::VerificationFailed {
      expected: target.to_path_buf(),
      written: written.to_path_buf(),
    });
  }
  Ok(())
}
