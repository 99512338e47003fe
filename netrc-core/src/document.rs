//! # Netrc Document
//!
//! An in-memory `.netrc` file that keeps every byte of its original
//! formatting. Lookups and edits work on machine names; saving goes through
//! [`FileOps::write_bytes_atomic`] so the file on disk is replaced atomically.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::entry::{DEFAULT_MACHINE, Entry, EntryMut};
use crate::error::{Error, Result};
use crate::filter::ByteFilter;
use crate::fs::{FileOps, WriteOptions};
use crate::lexer::lex_str;
use crate::parser::{EntryRecord, LOGIN, MACHINE, PASSWORD, check_value, parse, unparse};

/// A parsed login file bound to the path it was read from.
pub struct Netrc {
  path: PathBuf,
  preamble: String,
  records: Vec<EntryRecord>,
  new_item_prefix: String,
  file_ops: FileOps,
  write_options: WriteOptions,
  filter: Option<Box<dyn ByteFilter>>,
}

impl Netrc {
  /// An empty document that will be written to `path`.
  pub fn empty(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      preamble: String::new(),
      records: Vec::new(),
      new_item_prefix: String::new(),
      file_ops: FileOps::default(),
      write_options: WriteOptions::default(),
      filter: None,
    }
  }

  /// Parses `text` as the content of `path` without touching the disk.
  pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
    let (preamble, records) = parse(&lex_str(text))?;
    Ok(Self {
      preamble,
      records,
      ..Self::empty(path)
    })
  }

  /// Reads and parses `path`. A missing file yields an empty document.
  ///
  /// Permission bits are not checked here; callers that need the 0600
  /// guarantee check with [`Platform::ensure_secure`](crate::platform::Platform::ensure_secure)
  /// first.
  ///
  /// # Errors
  ///
  /// I/O errors other than "not found", [`Error::TruncatedInput`] for a file
  /// that ends in the middle of an entry, and invalid UTF-8 as
  /// [`Error::Io`]. No partial document is returned.
  pub fn read(path: impl Into<PathBuf>) -> Result<Self> {
    Self::read_with_filter(path, None)
  }

  /// Like [`Netrc::read`], decoding the stored bytes with `filter` first.
  /// The same filter encodes the content again on [`Netrc::save`].
  #[instrument(skip_all, level = "debug")]
  pub fn read_with_filter(path: impl Into<PathBuf>, filter: Option<Box<dyn ByteFilter>>) -> Result<Self> {
    let path = path.into();
    let raw = match fs::read(&path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!("{} does not exist, starting empty", path.display());
        return Ok(Self {
          filter,
          ..Self::empty(path)
        });
      }
      Err(e) => return Err(Error::from_access(&path, e)),
    };

    let decoded = match &filter {
      Some(filter) => filter.decode(&raw)?,
      None => raw,
    };
    let text = String::from_utf8(decoded).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let document = Self {
      filter,
      ..Self::parse(path, &text)?
    };
    debug!("Read {} entries from {}", document.count(), document.path.display());
    Ok(document)
  }

  /// Replaces the file operations used by [`Netrc::save`].
  pub fn with_file_ops(mut self, file_ops: FileOps) -> Self {
    self.file_ops = file_ops;
    self
  }

  /// Replaces the backup/verify/mode settings used by [`Netrc::save`].
  pub fn with_write_options(mut self, write_options: WriteOptions) -> Self {
    self.write_options = write_options;
    self
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn preamble(&self) -> &str {
    &self.preamble
  }

  pub fn records(&self) -> &[EntryRecord] {
    &self.records
  }

  /// Text inserted before every entry appended by [`Netrc::set`].
  pub fn new_item_prefix(&self) -> &str {
    &self.new_item_prefix
  }

  pub fn set_new_item_prefix(&mut self, prefix: impl Into<String>) {
    self.new_item_prefix = prefix.into();
  }

  /// Number of entries, including any `default` entry.
  pub fn count(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Machine names in file order.
  pub fn machines(&self) -> impl Iterator<Item = &str> {
    self.records.iter().map(|r| r.machine.as_str())
  }

  /// Whether an entry is named exactly `machine`.
  pub fn contains(&self, machine: &str) -> bool {
    self.find(machine).is_some()
  }

  fn find(&self, machine: &str) -> Option<&EntryRecord> {
    self.records.iter().find(|r| r.machine == machine)
  }

  /// Returns the first entry named `machine`, falling back to the `default`
  /// entry. `None` if neither exists.
  pub fn lookup(&self, machine: &str) -> Option<Entry> {
    self
      .find(machine)
      .or_else(|| self.find(DEFAULT_MACHINE))
      .map(Entry::from)
  }

  /// Like [`Netrc::lookup`], but a miss yields an entry with no login and no
  /// password.
  pub fn get(&self, machine: &str) -> Entry {
    self.lookup(machine).unwrap_or_default()
  }

  /// The `default` entry, if the file has one.
  pub fn default_entry(&self) -> Option<Entry> {
    self.find(DEFAULT_MACHINE).map(Entry::from)
  }

  /// Mutable view of the first entry named exactly `machine`. The `default`
  /// fallback does not apply.
  pub fn get_mut(&mut self, machine: &str) -> Option<EntryMut<'_>> {
    self.records.iter_mut().find(|r| r.machine == machine).map(EntryMut::new)
  }

  /// Sets the login and password for `machine`.
  ///
  /// An existing entry has only its two values replaced. Otherwise a new
  /// entry is appended, preceded by the new item prefix:
  ///
  /// ```text
  /// {prefix}machine {machine}
  ///   login {login}
  ///   password {password}
  /// ```
  ///
  /// # Errors
  ///
  /// [`Error::InvalidValue`] if the machine name, login or password would not
  /// read back as a single token. Nothing is changed in that case.
  pub fn set(&mut self, machine: &str, login: impl Into<String>, password: impl Into<String>) -> Result<()> {
    let (login, password) = (login.into(), password.into());
    check_value(MACHINE, machine)?;
    check_value(LOGIN, &login)?;
    check_value(PASSWORD, &password)?;

    if let Some(mut entry) = self.get_mut(machine) {
      entry.set_login(login)?;
      entry.set_password(password)?;
      debug!("Updated entry for {machine}");
      return Ok(());
    }

    let record = EntryRecord::new_item(&self.new_item_prefix, machine, &login, &password);
    self.records.push(record);
    debug!("Appended entry for {machine}");
    Ok(())
  }

  /// Renders the document back to text.
  pub fn serialize(&self) -> String {
    unparse(&self.preamble, &self.records)
  }

  /// Atomically writes the document to its path.
  ///
  /// # Errors
  ///
  /// Any error from the filter or from [`FileOps::write_bytes_atomic`]; the
  /// file on disk is unchanged when an error is returned.
  pub fn save(&self) -> Result<()> {
    let text = self.serialize();
    let bytes = match &self.filter {
      Some(filter) => filter.encode(text.as_bytes())?,
      None => text.into_bytes(),
    };

    self
      .file_ops
      .write_bytes_atomic(&self.path, &bytes, &self.write_options)?;
    info!("Saved {} entries to {}", self.count(), self.path.display());
    Ok(())
  }
}

// Records hold passwords, so Debug output only summarises the document.
impl fmt::Debug for Netrc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Netrc")
      .field("path", &self.path)
      .field("entries", &self.records.len())
      .field("file_ops", &self.file_ops)
      .field("write_options", &self.write_options)
      .field("filtered", &self.filter.is_some())
      .finish_non_exhaustive()
  }
}
