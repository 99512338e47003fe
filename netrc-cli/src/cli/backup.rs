//! # Backup Command

use std::process::ExitCode;

use anyhow::{Context, Result};

use super::GlobalArgs;
use crate::output::{format_path, print_success, print_warning};

/// Creates a numbered backup of the login file. A missing file is reported,
/// not treated as an error.
pub(crate) fn handle_backup_command(global: &GlobalArgs) -> Result<ExitCode> {
  let source = global.source()?;

  let backup = source
    .file_ops()
    .backup(&source.path)
    .with_context(|| format!("Failed to back up {}", source.path.display()))?;

  match backup {
    Some(backup) => print_success(&format!(
      "Backed up {} to {}",
      format_path(&source.path),
      format_path(&backup)
    )),
    None => print_warning(&format!("Nothing to back up: {} does not exist", format_path(&source.path))),
  }
  Ok(ExitCode::SUCCESS)
}
