//! # Get Command
//!
//! Shows the credentials for a machine, with the `default` entry as fallback.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use super::GlobalArgs;
use crate::output::{format_machine, print_error};

/// Command for looking up a machine
#[derive(Args)]
pub struct GetArgs {
  /// Machine name to look up
  pub machine: String,

  /// Also print the password
  #[arg(long)]
  pub show_password: bool,

  /// Print the entry as JSON
  #[arg(long)]
  pub json: bool,
}

#[derive(Debug, Serialize)]
struct EntryView<'a> {
  machine: &'a str,
  login: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  password: Option<&'a str>,
}

pub(crate) fn handle_get_command(args: GetArgs, global: &GlobalArgs) -> Result<ExitCode> {
  let netrc = global.source()?.load()?;

  let Some(entry) = netrc.lookup(&args.machine) else {
    print_error(&format!("No entry for {} and no default entry", format_machine(&args.machine)));
    return Ok(ExitCode::FAILURE);
  };
  if netrc.contains(&args.machine) {
    debug!("Found entry for {}", args.machine);
  } else {
    debug!("Using default entry for {}", args.machine);
  }

  let view = EntryView {
    machine: &args.machine,
    login: entry.login.as_deref(),
    password: entry.password.as_deref().filter(|_| args.show_password),
  };

  if args.json {
    let json = serde_json::to_string_pretty(&view).context("Failed to serialize entry")?;
    println!("{json}");
    return Ok(ExitCode::SUCCESS);
  }

  if let Some(login) = view.login {
    println!("login: {login}");
  }
  if let Some(password) = view.password {
    println!("password: {password}");
  }
  Ok(ExitCode::SUCCESS)
}
