//! # Lexer
//!
//! Splits `.netrc` text into a flat, lossless token stream. Every byte of the
//! input ends up in exactly one token, so concatenating the tokens gives back
//! the original text.

use std::sync::LazyLock;

use regex::Regex;

// A `#` starts a comment only at the beginning of a line or after whitespace.
// The comment swallows the whitespace run in front of it and the line ending.
static COMMENT_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)^(.*?)((?:^|\s+)#.*)$").expect("Failed to compile comment regex"));

static RUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+|\S+").expect("Failed to compile run regex"));

/// Returns true if the token is whitespace or a comment.
pub fn is_trivia(token: &str) -> bool {
  token.starts_with(|c: char| c.is_whitespace() || c == '#')
}

/// Tokenizes a single line, newline included.
fn lex_line(line: &str, tokens: &mut Vec<String>) {
  let (content, comment) = match COMMENT_PATTERN.captures(line) {
    Some(caps) => (
      caps.get(1).map_or("", |m| m.as_str()),
      caps.get(2).map(|m| m.as_str()),
    ),
    None => (line, None),
  };

  tokens.extend(RUN_PATTERN.find_iter(content).map(|m| m.as_str().to_string()));

  if let Some(comment) = comment {
    tokens.push(comment.to_string());
  }
}

/// Tokenizes a sequence of lines into whitespace runs, word runs and comments.
///
/// Lines are expected to keep their line terminators (as produced by
/// [`str::split_inclusive`]); newlines then live inside whitespace or comment
/// tokens and no line boundary marker is emitted.
///
/// # Examples
///
/// ```
/// use netrc_core::lexer::lex;
///
/// let tokens = lex(["machine m # home\n", "  login l\n"]);
/// assert_eq!(tokens, ["machine", " ", "m", " # home\n", "  ", "login", " ", "l", "\n"]);
/// ```
pub fn lex<I, S>(lines: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut tokens = Vec::new();
  for line in lines {
    lex_line(line.as_ref(), &mut tokens);
  }
  tokens
}

/// Tokenizes a whole document.
pub fn lex_str(text: &str) -> Vec<String> {
  lex(text.split_inclusive('\n'))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lex_empty() {
    assert!(lex(Vec::<String>::new()).is_empty());
    assert!(lex_str("").is_empty());
  }

  #[test]
  fn test_lex_splits_runs() {
    let tokens = lex(["  login l\n"]);
    assert_eq!(tokens, ["  ", "login", " ", "l", "\n"]);
  }

  #[test]
  fn test_lex_full_line_comment() {
    let tokens = lex(["# this is my netrc\n"]);
    assert_eq!(tokens, ["# this is my netrc\n"]);
  }

  #[test]
  fn test_lex_trailing_comment_takes_leading_whitespace() {
    let tokens = lex(["  login l   # my name\n"]);
    assert_eq!(tokens, ["  ", "login", " ", "l", "   # my name\n"]);
  }

  #[test]
  fn test_lex_hash_inside_word_is_not_a_comment() {
    let tokens = lex(["password pa#ss\n"]);
    assert_eq!(tokens, ["password", " ", "pa#ss", "\n"]);
  }

  #[test]
  fn test_lex_indented_comment_is_one_token() {
    let tokens = lex(["   # indented\n"]);
    assert_eq!(tokens, ["   # indented\n"]);
  }

  #[test]
  fn test_lex_whitespace_only_lines() {
    assert_eq!(lex(["\n", "   \n", "\t"]), ["\n", "   \n", "\t"]);
  }

  #[test]
  fn test_lex_is_lossless() {
    let text = "# head\nmachine a login b password c\n\n  machine d # x\n\tlogin e#f\n  password g";
    assert_eq!(lex_str(text).concat(), text);
  }

  #[test]
  fn test_is_trivia() {
    assert!(is_trivia(" "));
    assert!(is_trivia("\n  "));
    assert!(is_trivia(" # comment\n"));
    assert!(is_trivia("# comment\n"));
    assert!(!is_trivia("machine"));
    assert!(!is_trivia(""));
  }
}
