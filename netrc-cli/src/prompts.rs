//! # Interactive Prompts
//!
//! Shared dialoguer theme and the hidden password prompt used by `set`.

use anyhow::{Context, Result};
use console::Style;
use dialoguer::Password;
use dialoguer::theme::ColorfulTheme;

/// Prompt theme matching the CLI colours
pub fn keeper_theme() -> ColorfulTheme {
  ColorfulTheme {
    prompt_style: Style::new().cyan().bold(),
    success_prefix: Style::new().green().apply_to("✔".to_string()),
    error_prefix: Style::new().red().apply_to("✘".to_string()),
    ..ColorfulTheme::default()
  }
}

/// Reads a password for `machine` without echoing it. Empty input is
/// rejected.
pub fn prompt_password(machine: &str) -> Result<String> {
  Password::with_theme(&keeper_theme())
    .with_prompt(format!("Password for {machine}"))
    .interact()
    .context("Failed to read password")
}
