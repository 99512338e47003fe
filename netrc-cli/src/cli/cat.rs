//! # Cat Command

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};

use super::GlobalArgs;

/// Writes the rendered document to stdout exactly, without a trailing
/// newline of its own.
pub(crate) fn handle_cat_command(global: &GlobalArgs) -> Result<ExitCode> {
  let netrc = global.source()?.load()?;

  let mut stdout = io::stdout().lock();
  stdout
    .write_all(netrc.serialize().as_bytes())
    .and_then(|()| stdout.flush())
    .context("Failed to write to stdout")?;
  Ok(ExitCode::SUCCESS)
}
