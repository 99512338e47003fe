//! # Set Command
//!
//! Adds or updates the credentials for a machine and saves the login file.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::GlobalArgs;
use crate::output::{format_machine, format_path, print_success};
use crate::prompts::prompt_password;

/// Command for setting credentials
#[derive(Args)]
pub struct SetArgs {
  /// Machine name to set credentials for
  pub machine: String,

  /// Login name
  #[arg(short, long)]
  pub login: String,

  /// Password or token; prompted for when omitted
  #[arg(short, long)]
  pub password: Option<String>,

  /// Text to insert before the entry if it is new
  #[arg(long, value_name = "TEXT")]
  pub prefix: Option<String>,
}

pub(crate) fn handle_set_command(args: SetArgs, global: &GlobalArgs) -> Result<ExitCode> {
  let source = global.source()?;
  let mut netrc = source.load()?;

  if let Some(prefix) = args.prefix {
    netrc.set_new_item_prefix(prefix);
  }

  let password = match args.password {
    Some(password) => password,
    None => prompt_password(&args.machine)?,
  };

  let existed = netrc.contains(&args.machine);
  netrc.set(&args.machine, args.login, password)?;
  netrc
    .save()
    .with_context(|| format!("Failed to save {}", source.path.display()))?;

  let verb = if existed { "Updated" } else { "Added" };
  info!("{verb} entry for {}", args.machine);
  print_success(&format!(
    "{verb} credentials for {} in {}",
    format_machine(&args.machine),
    format_path(&source.path)
  ));
  Ok(ExitCode::SUCCESS)
}
