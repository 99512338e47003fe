//! # Compare Command

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use netrc_core::{FileOps, Platform};

use crate::output::{print_success, print_warning};

/// Command for comparing files
#[derive(Args)]
pub struct CompareArgs {
  /// Files to compare (at least two)
  #[arg(required = true, num_args = 2..)]
  pub paths: Vec<PathBuf>,
}

pub(crate) fn handle_compare_command(args: CompareArgs) -> Result<ExitCode> {
  let ops = FileOps::new(Platform::detect());
  let identical = ops.compare_files(&args.paths).context("Failed to compare files")?;

  if identical {
    print_success(&format!("All {} files are identical", args.paths.len()));
    Ok(ExitCode::SUCCESS)
  } else {
    print_warning("Files differ");
    Ok(ExitCode::FAILURE)
  }
}
