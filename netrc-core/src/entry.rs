//! # Entries
//!
//! Named views over [`EntryRecord`] values.

use crate::error::Result;
use crate::parser::{EntryRecord, LOGIN, PASSWORD, check_value};

/// Machine name of the fallback entry.
pub const DEFAULT_MACHINE: &str = "default";

/// Login and password for a machine; either may be missing from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
  pub login: Option<String>,
  pub password: Option<String>,
}

impl Entry {
  /// Returns true if neither a login nor a password is present.
  pub const fn is_empty(&self) -> bool {
    self.login.is_none() && self.password.is_none()
  }

  /// Splits the entry into `(login, password)`, substituting empty strings.
  pub fn into_pair(self) -> (String, String) {
    (self.login.unwrap_or_default(), self.password.unwrap_or_default())
  }
}

impl From<&EntryRecord> for Entry {
  fn from(record: &EntryRecord) -> Self {
    Self {
      login: record.login.clone(),
      password: record.password.clone(),
    }
  }
}

/// Mutable view over a record. Writes only touch the value fragments; the
/// keyword, whitespace and comment fragments stay as they were.
#[derive(Debug)]
pub struct EntryMut<'a> {
  record: &'a mut EntryRecord,
}

impl<'a> EntryMut<'a> {
  pub(crate) const fn new(record: &'a mut EntryRecord) -> Self {
    Self { record }
  }

  pub fn machine(&self) -> &str {
    &self.record.machine
  }

  pub fn login(&self) -> Option<&str> {
    self.record.login.as_deref()
  }

  pub fn password(&self) -> Option<&str> {
    self.record.password.as_deref()
  }

  /// Replaces the login value, adding a ` login ` keyword if the record had
  /// none. The record is unchanged when the value is rejected by
  /// [`check_value`].
  pub fn set_login(&mut self, login: impl Into<String>) -> Result<()> {
    let login = login.into();
    check_value(LOGIN, &login)?;
    if self.record.login.is_none() {
      self.record.login_keyword = format!(" {LOGIN} ");
    }
    self.record.login = Some(login);
    Ok(())
  }

  /// Replaces the password value, adding a ` password ` keyword if the record
  /// had none. The record is unchanged when the value is rejected by
  /// [`check_value`].
  pub fn set_password(&mut self, password: impl Into<String>) -> Result<()> {
    let password = password.into();
    check_value(PASSWORD, &password)?;
    if self.record.password.is_none() {
      self.record.password_keyword = format!(" {PASSWORD} ");
    }
    self.record.password = Some(password);
    Ok(())
  }

  pub fn to_entry(&self) -> Entry {
    Entry::from(&*self.record)
  }
}
