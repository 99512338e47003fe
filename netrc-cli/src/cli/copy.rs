//! # Copy Command
//!
//! Verified file copy with an explicit destination mode.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use netrc_core::{FileOps, Platform};

use super::GlobalArgs;
use crate::output::{format_mode, format_path, print_success};

/// Command for copying a file
#[derive(Args)]
pub struct CopyArgs {
  /// File to copy
  pub source: PathBuf,

  /// Destination; replaced if it exists
  pub dest: PathBuf,

  /// Octal permission bits for the copy
  #[arg(long, value_parser = parse_mode, default_value = "600")]
  pub mode: u32,
}

/// Parses `600`, `0600` or `0o600` as an octal mode.
fn parse_mode(value: &str) -> Result<u32, String> {
  let digits = value.strip_prefix("0o").unwrap_or(value);
  let mode = u32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode '{value}': {e}"))?;
  if mode > 0o7777 {
    return Err(format!("mode '{value}' is out of range"));
  }
  Ok(mode)
}

pub(crate) fn handle_copy_command(args: CopyArgs, global: &GlobalArgs) -> Result<ExitCode> {
  let verify = global.write_options()?.verify;
  let ops = FileOps::new(Platform::detect());

  ops
    .copy_file(&args.source, &args.dest, args.mode, verify)
    .with_context(|| format!("Failed to copy {} to {}", args.source.display(), args.dest.display()))?;

  print_success(&format!(
    "Copied {} to {} (mode {})",
    format_path(&args.source),
    format_path(&args.dest),
    format_mode(args.mode)
  ));
  Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_mode() {
    assert_eq!(parse_mode("600"), Ok(0o600));
    assert_eq!(parse_mode("0640"), Ok(0o640));
    assert_eq!(parse_mode("0o755"), Ok(0o755));
    assert!(parse_mode("999").is_err());
    assert!(parse_mode("17777").is_err());
    assert!(parse_mode("").is_err());
  }
}
