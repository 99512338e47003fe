//! # Parser
//!
//! Turns the lexer's token stream into a preamble plus a list of
//! [`EntryRecord`]s. Records keep every literal fragment they were built from,
//! so unparsing an untouched document reproduces the input byte-for-byte.

use crate::error::{Error, Result};
use crate::lexer::is_trivia;

pub const MACHINE: &str = "machine";
pub const LOGIN: &str = "login";
pub const PASSWORD: &str = "password";

/// Checks that `value` reads back as exactly one value token for `field`.
///
/// # Errors
///
/// [`Error::InvalidValue`] for an empty value, one containing whitespace, one
/// starting with `#`, or one equal to a keyword.
pub fn check_value(field: &'static str, value: &str) -> Result<()> {
  let reason = if value.is_empty() {
    "is empty"
  } else if value.contains(char::is_whitespace) {
    "contains whitespace"
  } else if value.starts_with('#') {
    "starts with '#'"
  } else if [MACHINE, LOGIN, PASSWORD].contains(&value) {
    "is a reserved keyword"
  } else {
    return Ok(());
  };
  Err(Error::InvalidValue { field, reason })
}

/// One `machine` block, split into the seven fragments it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
  /// `machine` keyword and the whitespace/comments after it
  pub machine_keyword: String,
  pub machine: String,
  /// Everything between the machine name and the login value, keyword
  /// included. Empty when the block has no login.
  pub login_keyword: String,
  pub login: Option<String>,
  /// Everything between the previous value and the password value, keyword
  /// included. Empty when the block has no password.
  pub password_keyword: String,
  pub password: Option<String>,
  /// Trailing text up to the next `machine` keyword or end of input
  pub trailing: String,
}

impl EntryRecord {
  /// Builds a record for a freshly appended entry.
  pub fn new_item(prefix: &str, machine: &str, login: &str, password: &str) -> Self {
    Self {
      machine_keyword: format!("{prefix}{MACHINE} "),
      machine: machine.to_string(),
      login_keyword: format!("\n  {LOGIN} "),
      login: Some(login.to_string()),
      password_keyword: format!("\n  {PASSWORD} "),
      password: Some(password.to_string()),
      trailing: "\n".to_string(),
    }
  }

  /// Returns the seven fragments in file order; absent values are empty.
  pub fn fragments(&self) -> [&str; 7] {
    [
      self.machine_keyword.as_str(),
      self.machine.as_str(),
      self.login_keyword.as_str(),
      self.login.as_deref().unwrap_or_default(),
      self.password_keyword.as_str(),
      self.password.as_deref().unwrap_or_default(),
      self.trailing.as_str(),
    ]
  }

  /// Appends the record's text to `out`.
  pub fn write_to(&self, out: &mut String) {
    for fragment in self.fragments() {
      out.push_str(fragment);
    }
  }
}

/// Cursor over a token sequence with explicit position state.
#[derive(Debug)]
pub struct TokenCursor<'a> {
  tokens: &'a [String],
  pos: usize,
}

impl<'a> TokenCursor<'a> {
  pub const fn new(tokens: &'a [String]) -> Self {
    Self { tokens, pos: 0 }
  }

  /// Number of tokens not yet consumed.
  pub const fn remaining(&self) -> usize {
    self.tokens.len() - self.pos
  }

  pub const fn is_empty(&self) -> bool {
    self.remaining() == 0
  }

  /// Consumes and returns the next token.
  pub fn take(&mut self, expected: &'static str) -> Result<&'a str> {
    let token = self.tokens.get(self.pos).ok_or(Error::TruncatedInput { expected })?;
    self.pos += 1;
    Ok(token.as_str())
  }

  /// Concatenates tokens until `stop` holds for the next one, leaving that
  /// token unconsumed. Running out of tokens is not an error.
  pub fn read_until(&mut self, stop: impl Fn(&str) -> bool) -> String {
    let mut out = String::new();
    while let Some(token) = self.tokens.get(self.pos) {
      if stop(token.as_str()) {
        break;
      }
      out.push_str(token);
      self.pos += 1;
    }
    out
  }

  /// Returns true if `keyword` occurs before any of `bounds` (or the end).
  fn keyword_ahead(&self, keyword: &str, bounds: &[&str]) -> bool {
    self.tokens[self.pos..]
      .iter()
      .find(|t| *t == keyword || bounds.contains(&t.as_str()))
      .is_some_and(|t| t == keyword)
  }

  /// Reads `<gap><keyword><trivia>` followed by a single value token.
  fn keyword_value(&mut self, keyword: &'static str) -> Result<(String, String)> {
    let mut fragment = self.read_until(|t| t == keyword);
    fragment.push_str(self.take(keyword)?);
    fragment.push_str(&self.read_until(|t| !is_trivia(t)));
    let value = self.take(keyword)?.to_string();
    Ok((fragment, value))
  }
}

/// Parses a token stream into a preamble and a list of entry records.
///
/// # Errors
///
/// Returns [`Error::TruncatedInput`] if the stream ends after a `machine`,
/// `login` or `password` keyword without the value that must follow it.
pub fn parse(tokens: &[String]) -> Result<(String, Vec<EntryRecord>)> {
  let mut cursor = TokenCursor::new(tokens);
  let mut records = Vec::new();

  let preamble = cursor.read_until(|t| t == MACHINE);

  while !cursor.is_empty() {
    let mut machine_keyword = cursor.take(MACHINE)?.to_string();
    machine_keyword.push_str(&cursor.read_until(|t| !is_trivia(t)));
    let machine = cursor.take("machine name")?.to_string();

    let (login_keyword, login) = if cursor.keyword_ahead(LOGIN, &[PASSWORD, MACHINE]) {
      let (fragment, value) = cursor.keyword_value(LOGIN)?;
      (fragment, Some(value))
    } else {
      (String::new(), None)
    };

    let (password_keyword, password) = if cursor.keyword_ahead(PASSWORD, &[MACHINE]) {
      let (fragment, value) = cursor.keyword_value(PASSWORD)?;
      (fragment, Some(value))
    } else {
      (String::new(), None)
    };

    let trailing = cursor.read_until(|t| t == MACHINE);

    records.push(EntryRecord {
      machine_keyword,
      machine,
      login_keyword,
      login,
      password_keyword,
      password,
      trailing,
    });
  }

  Ok((preamble, records))
}

/// Concatenates a preamble and records back into file text.
pub fn unparse(preamble: &str, records: &[EntryRecord]) -> String {
  let mut out = preamble.to_string();
  for record in records {
    record.write_to(&mut out);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lexer::{lex, lex_str};

  fn record(fragments: [&str; 7]) -> EntryRecord {
    EntryRecord {
      machine_keyword: fragments[0].to_string(),
      machine: fragments[1].to_string(),
      login_keyword: fragments[2].to_string(),
      login: (!fragments[3].is_empty()).then(|| fragments[3].to_string()),
      password_keyword: fragments[4].to_string(),
      password: (!fragments[5].is_empty()).then(|| fragments[5].to_string()),
      trailing: fragments[6].to_string(),
    }
  }

  #[test]
  fn test_parse_empty() {
    let (pre, items) = parse(&lex(Vec::<String>::new())).unwrap();
    assert_eq!(pre, "");
    assert!(items.is_empty());
  }

  #[test]
  fn test_parse_simple_entry() {
    let (pre, items) = parse(&lex_str("machine m\n  login l\n  password p\n")).unwrap();
    assert_eq!(pre, "");
    assert_eq!(
      items,
      vec![record(["machine ", "m", "\n  login ", "l", "\n  password ", "p", "\n"])]
    );
  }

  #[test]
  fn test_parse_keeps_comments_in_fragments() {
    let text = "# this is my netrc\nmachine m\n  login l # this is my username\n  password p\n";
    let (pre, items) = parse(&lex_str(text)).unwrap();
    assert_eq!(pre, "# this is my netrc\n");
    assert_eq!(
      items,
      vec![record([
        "machine ",
        "m",
        "\n  login ",
        "l",
        " # this is my username\n  password ",
        "p",
        "\n",
      ])]
    );
  }

  #[test]
  fn test_parse_single_line_entries() {
    let text = "machine a login x password y\nmachine b login z password w\n";
    let (_, items) = parse(&lex_str(text)).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].machine, "a");
    assert_eq!(items[0].trailing, "\n");
    assert_eq!(items[1].machine_keyword, "machine ");
    assert_eq!(items[1].login.as_deref(), Some("z"));
    assert_eq!(items[1].password.as_deref(), Some("w"));
  }

  #[test]
  fn test_parse_missing_login() {
    let (_, items) = parse(&lex_str("machine m\n  password p\n")).unwrap();
    assert_eq!(items, vec![record(["machine ", "m", "", "", "\n  password ", "p", "\n"])]);
  }

  #[test]
  fn test_parse_missing_password_does_not_steal_next_machine() {
    let (_, items) = parse(&lex_str("machine a login x\nmachine b password y\n")).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].password, None);
    assert_eq!(items[0].password_keyword, "");
    assert_eq!(items[0].trailing, "\n");
    assert_eq!(items[1].login, None);
    assert_eq!(items[1].password.as_deref(), Some("y"));
  }

  #[test]
  fn test_parse_machine_only() {
    let (_, items) = parse(&lex_str("machine bare\n")).unwrap();
    assert_eq!(items, vec![record(["machine ", "bare", "", "", "", "", "\n"])]);
  }

  #[test]
  fn test_parse_truncated_machine() {
    let err = parse(&lex_str("# header\nmachine")).unwrap_err();
    assert!(matches!(err, Error::TruncatedInput { expected: "machine name" }));

    let err = parse(&lex_str("machine   # only a comment\n")).unwrap_err();
    assert!(matches!(err, Error::TruncatedInput { .. }));
  }

  #[test]
  fn test_parse_truncated_login_value() {
    let err = parse(&lex_str("machine m login")).unwrap_err();
    assert!(matches!(err, Error::TruncatedInput { expected: LOGIN }));
  }

  #[test]
  fn test_parse_round_trips() {
    let inputs = [
      "",
      "\n\n",
      "# only a comment\n",
      "machine m\n  login l\n  password p\n",
      "  # lead\nmachine a login b password c # tail\n\n\nmachine d\n\tpassword e\n  login f\n",
      "default stuff\nmachine m login l",
      "machine default\n  login anonymous\n  password guest@\n",
    ];
    for input in inputs {
      let (pre, items) = parse(&lex_str(input)).unwrap();
      assert_eq!(unparse(&pre, &items), input, "round trip failed for {input:?}");
    }
  }

  #[test]
  fn test_cursor_read_until_at_end_is_empty() {
    let tokens = lex_str("a b");
    let mut cursor = TokenCursor::new(&tokens);
    assert_eq!(cursor.read_until(|_| false), "a b");
    assert_eq!(cursor.read_until(|_| false), "");
    assert!(cursor.is_empty());
    assert!(cursor.take("anything").is_err());
  }

  #[test]
  fn test_new_item_uses_prefix() {
    let mut out = String::new();
    EntryRecord::new_item("# added\n", "h", "u", "p").write_to(&mut out);
    assert_eq!(out, "# added\nmachine h\n  login u\n  password p\n");
  }

  #[test]
  fn test_check_value_accepts_single_tokens() {
    for value in ["alice", "s3cret", "pass#word", "p@ss:w0rd!", "machines"] {
      assert!(check_value(PASSWORD, value).is_ok(), "{value}");
    }
  }

  #[test]
  fn test_check_value_rejects_unreadable_values() {
    let cases = [
      ("", "is empty"),
      ("two words", "contains whitespace"),
      ("tab\there", "contains whitespace"),
      ("line\nbreak", "contains whitespace"),
      ("#hash", "starts with '#'"),
      ("machine", "is a reserved keyword"),
      ("login", "is a reserved keyword"),
      ("password", "is a reserved keyword"),
    ];
    for (value, expected) in cases {
      match check_value(LOGIN, value) {
        Err(Error::InvalidValue { field, reason }) => {
          assert_eq!(field, LOGIN);
          assert_eq!(reason, expected, "{value:?}");
        }
        other => panic!("{value:?} was accepted: {other:?}"),
      }
    }
  }
}
