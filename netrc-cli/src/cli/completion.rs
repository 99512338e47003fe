//! # Completion Command
//!
//! Generates shell completion scripts for netrc-keeper.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{Shell, generate};

use super::Cli;

/// Command for generating shell completions
#[derive(Args)]
pub struct CompletionArgs {
  /// Shell to generate completions for
  #[arg(value_enum)]
  pub shell: Shell,
}

pub(crate) fn handle_completion_command(completion: CompletionArgs) -> Result<ExitCode> {
  let mut cmd = Cli::command();
  let app_name = cmd.get_name().to_string();

  generate(completion.shell, &mut cmd, app_name, &mut io::stdout());

  Ok(ExitCode::SUCCESS)
}
