//! # List Command
//!
//! Prints machine names in file order.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use super::GlobalArgs;
use crate::output::{format_path, print_info};

/// Command for listing machines
#[derive(Args)]
pub struct ListArgs {
  /// Print the names as a JSON array
  #[arg(long)]
  pub json: bool,
}

pub(crate) fn handle_list_command(args: ListArgs, global: &GlobalArgs) -> Result<ExitCode> {
  let source = global.source()?;
  let netrc = source.load()?;
  let machines: Vec<&str> = netrc.machines().collect();

  if args.json {
    let json = serde_json::to_string_pretty(&machines).context("Failed to serialize machine list")?;
    println!("{json}");
    return Ok(ExitCode::SUCCESS);
  }

  if machines.is_empty() {
    print_info(&format!("No entries in {}", format_path(&source.path)));
  }
  for machine in machines {
    println!("{machine}");
  }
  Ok(ExitCode::SUCCESS)
}
