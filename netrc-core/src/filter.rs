//! # Content Filters
//!
//! Optional byte transforms applied around reading and writing the login
//! file, typically decryption and encryption by an external tool such as
//! `gpg`. The document never sees the encoded form.

use std::fmt::Debug;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Transforms file bytes on the way in and out.
pub trait ByteFilter: Debug + Send + Sync {
  /// Turns stored bytes into plain text bytes.
  fn decode(&self, input: &[u8]) -> Result<Vec<u8>>;

  /// Turns plain text bytes into stored bytes.
  fn encode(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Pipes bytes through external commands, one for each direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFilter {
  decode_argv: Vec<String>,
  encode_argv: Vec<String>,
}

impl CommandFilter {
  /// Creates a filter from two argument vectors (program first).
  pub const fn new(decode_argv: Vec<String>, encode_argv: Vec<String>) -> Self {
    Self {
      decode_argv,
      encode_argv,
    }
  }

  /// A filter that decrypts with `gpg` and encrypts to `recipient`.
  pub fn gpg(recipient: &str) -> Self {
    let argv = |args: &[&str]| -> Vec<String> { args.iter().map(|a| (*a).to_string()).collect() };
    Self::new(
      argv(&["gpg", "--batch", "--quiet", "--decrypt"]),
      argv(&["gpg", "--batch", "--quiet", "--encrypt", "--recipient", recipient]),
    )
  }

  #[instrument(skip(input), level = "debug")]
  fn run(argv: &[String], input: &[u8]) -> Result<Vec<u8>> {
    let (program, args) = argv.split_first().ok_or_else(|| Error::Filter {
      command: String::new(),
      message: "empty command".to_string(),
    })?;
    let command = argv.join(" ");
    let filter_err = |message: String| Error::Filter {
      command: command.clone(),
      message,
    };

    let mut child = Command::new(program)
      .args(args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|e| filter_err(format!("failed to start: {e}")))?;

    // Feed stdin from a separate thread so a child that writes before it has
    // read everything cannot deadlock on a full pipe. Dropping the handle at
    // the end of the thread closes the pipe.
    let mut stdin = child
      .stdin
      .take()
      .ok_or_else(|| filter_err("stdin was not captured".to_string()))?;
    let payload = input.to_vec();
    let feeder = thread::spawn(move || stdin.write_all(&payload));

    let output = child
      .wait_with_output()
      .map_err(|e| filter_err(format!("failed to wait: {e}")))?;
    let fed = feeder
      .join()
      .map_err(|_panic| filter_err("stdin writer panicked".to_string()))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(filter_err(format!("{} {}", output.status, stderr.trim())));
    }
    fed.map_err(|e| filter_err(format!("failed to write input: {e}")))?;

    debug!("Filter produced {} bytes", output.stdout.len());
    Ok(output.stdout)
  }
}

impl ByteFilter for CommandFilter {
  fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
    Self::run(&self.decode_argv, input)
  }

  fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
    Self::run(&self.encode_argv, input)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| (*a).to_string()).collect()
  }

  #[test]
  #[cfg(unix)]
  fn test_command_filter_round_trip() {
    let filter = CommandFilter::new(argv(&["tr", "a-z", "A-Z"]), argv(&["cat"]));
    assert_eq!(filter.decode(b"machine m\n").unwrap(), b"MACHINE M\n");
    assert_eq!(filter.encode(b"machine m\n").unwrap(), b"machine m\n");
  }

  #[test]
  #[cfg(unix)]
  fn test_command_filter_failure_status() {
    let filter = CommandFilter::new(argv(&["false"]), argv(&["false"]));
    let err = filter.decode(b"").unwrap_err();
    assert!(matches!(err, Error::Filter { .. }));
  }

  #[test]
  fn test_command_filter_missing_program() {
    let filter = CommandFilter::new(argv(&["definitely-not-a-real-program-xyz"]), Vec::new());
    assert!(matches!(filter.decode(b"x"), Err(Error::Filter { .. })));
    assert!(matches!(filter.encode(b"x"), Err(Error::Filter { .. })));
  }

  #[test]
  fn test_gpg_argv() {
    let filter = CommandFilter::gpg("me@example.com");
    assert_eq!(filter.encode_argv.last().map(String::as_str), Some("me@example.com"));
    assert_eq!(filter.decode_argv[0], "gpg");
  }
}
