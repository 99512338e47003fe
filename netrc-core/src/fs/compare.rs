//! Byte-exact comparison of two or more files.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, instrument};

use super::BUFFER_SIZE;
use crate::error::{Error, Result};

/// Compares files byte-for-byte using the default chunk size.
///
/// See [`compare_files_with`].
pub fn compare_files<P: AsRef<Path>>(paths: &[P]) -> Result<bool> {
  compare_files_with(paths, BUFFER_SIZE, |a, b| a == b)
}

/// Compares two or more files chunk by chunk.
///
/// Files of different sizes are reported unequal without being opened, and
/// zero-length files are equal without being opened. Otherwise every file is
/// read in lockstep, `buffer_size` bytes at a time, and each chunk is checked
/// against the first file's chunk with `eq`.
///
/// # Errors
///
/// * [`Error::NotEnoughFiles`] when fewer than two paths are given.
/// * [`Error::ReadSizeMismatch`] when two same-size files return chunks of
///   different lengths (the file changed underneath us); this is not the same
///   as the files differing.
/// * [`Error::Io`] for any other I/O failure.
#[instrument(skip(paths, eq), level = "debug")]
pub fn compare_files_with<P, F>(paths: &[P], buffer_size: usize, eq: F) -> Result<bool>
where
  P: AsRef<Path>,
  F: Fn(&[u8], &[u8]) -> bool,
{
  if paths.len() < 2 {
    return Err(Error::NotEnoughFiles { count: paths.len() });
  }

  let mut size = None;
  for path in paths {
    let current = fs::metadata(path.as_ref())?.len();
    if *size.get_or_insert(current) != current {
      debug!("Size mismatch on {}", path.as_ref().display());
      return Ok(false);
    }
  }
  let size = size.unwrap_or_default();
  if size == 0 {
    return Ok(true);
  }

  // Handles are closed when `files` goes out of scope, on every return path.
  let mut files = paths
    .iter()
    .map(|p| File::open(p.as_ref()))
    .collect::<io::Result<Vec<_>>>()?;
  let (reference, others) = files.split_at_mut(1);
  let reference = &mut reference[0];

  let buffer_size = buffer_size.max(1);
  let mut reference_buffer = vec![0u8; buffer_size];
  let mut other_buffer = vec![0u8; buffer_size];
  let mut remaining = size;

  while remaining > 0 {
    let bytes_read = read_chunk(reference, &mut reference_buffer)?;
    if bytes_read == 0 {
      return Err(Error::ReadSizeMismatch {
        path: paths[0].as_ref().to_path_buf(),
        expected: usize::try_from(remaining.min(buffer_size as u64)).unwrap_or(buffer_size),
        actual: 0,
      });
    }

    for (index, other) in others.iter_mut().enumerate() {
      let other_read = read_chunk(other, &mut other_buffer)?;
      if other_read != bytes_read {
        return Err(Error::ReadSizeMismatch {
          path: paths[index + 1].as_ref().to_path_buf(),
          expected: bytes_read,
          actual: other_read,
        });
      }
      if !eq(&reference_buffer[..bytes_read], &other_buffer[..other_read]) {
        debug!("Content mismatch in {}", paths[index + 1].as_ref().display());
        return Ok(false);
      }
    }

    remaining = remaining.saturating_sub(bytes_read as u64);
  }

  Ok(true)
}

/// Fills `buf` as far as the file allows, so equal files yield equal chunks
/// even when the OS returns short reads.
fn read_chunk(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
  let mut filled = 0;
  while filled < buf.len() {
    match file.read(&mut buf[filled..]) {
      Ok(0) => break,
      Ok(n) => filled += n,
      Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
      Err(e) => return Err(e),
    }
  }
  Ok(filled)
}
