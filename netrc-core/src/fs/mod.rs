//! # File Utilities
//!
//! Atomic replacement, numbered backups, verified copies and byte-exact
//! comparison for credential files. Every operation either completes or leaves
//! the destination as it found it.

mod atomic;
mod backup;
mod compare;
mod copy;

use std::fmt;
use std::path::Path;

pub use backup::numbered_backup_name;
pub use compare::{compare_files, compare_files_with};
pub use copy::{BufferedCopy, CopyStrategy, KernelCopy, select_strategy};

use crate::error::Result;
use crate::platform::{Platform, SECURE_MODE};

/// Default chunk size for copies and comparisons (256 KiB)
pub const BUFFER_SIZE: usize = 256 * 1024;

/// How [`FileOps::atomic_write`] treats the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
  /// Keep a numbered copy of the file being replaced
  pub backup: bool,
  /// Read written bytes back and compare before replacing the destination.
  /// Only [`FileOps::write_bytes_atomic`] has bytes to compare, so
  /// [`FileOps::atomic_write`] ignores this.
  pub verify: bool,
  /// Permission bits for newly created files
  pub mode: u32,
}

impl Default for WriteOptions {
  fn default() -> Self {
    Self {
      backup: true,
      verify: true,
      mode: SECURE_MODE,
    }
  }
}

/// File operations bound to a platform and copy strategy.
pub struct FileOps {
  platform: Platform,
  buffer_size: usize,
  strategy: Box<dyn CopyStrategy>,
}

impl FileOps {
  /// Creates file operations for `platform` with the strategy it supports.
  pub fn new(platform: Platform) -> Self {
    Self {
      platform,
      buffer_size: BUFFER_SIZE,
      strategy: select_strategy(&platform),
    }
  }

  /// Overrides the chunk size used for copies and comparisons.
  pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
    self.buffer_size = buffer_size.max(1);
    self
  }

  /// Overrides the copy strategy.
  pub fn with_strategy(mut self, strategy: Box<dyn CopyStrategy>) -> Self {
    self.strategy = strategy;
    self
  }

  pub const fn platform(&self) -> &Platform {
    &self.platform
  }

  pub const fn buffer_size(&self) -> usize {
    self.buffer_size
  }

  pub fn strategy(&self) -> &dyn CopyStrategy {
    self.strategy.as_ref()
  }

  /// Compares files using this instance's chunk size.
  pub fn compare_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<bool> {
    compare_files_with(paths, self.buffer_size, |a, b| a == b)
  }
}

impl Default for FileOps {
  fn default() -> Self {
    Self::new(Platform::detect())
  }
}

impl fmt::Debug for FileOps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FileOps")
      .field("platform", &self.platform)
      .field("buffer_size", &self.buffer_size)
      .field("strategy", &self.strategy.name())
      .finish()
  }
}
