//! # Check Command
//!
//! Reports on the login file: existence, owner-only permissions, and whether
//! it parses. Permission problems do not stop the parse check.

use std::process::ExitCode;

use anyhow::Result;
use netrc_core::Error;

use super::GlobalArgs;
use crate::output::{format_command, format_mode, format_path, print_error, print_info, print_success, print_warning};

pub(crate) fn handle_check_command(global: &GlobalArgs) -> Result<ExitCode> {
  let source = global.source()?;
  let path = &source.path;

  if !path.exists() {
    print_error(&format!("No login file at {}", format_path(path)));
    println!(
      "Create one with {}",
      format_command("netrc-keeper set <machine> --login <login>")
    );
    return Ok(ExitCode::FAILURE);
  }
  print_info(&format!("Checking {}", format_path(path)));

  let mut healthy = true;

  if source.platform.supports_modes() {
    match source.platform.ensure_secure(path) {
      Ok(()) => print_success("Permissions restrict access to the owner"),
      Err(Error::InsecurePermissions { mode, .. }) => {
        healthy = false;
        print_warning(&format!("Permissions are {}, expected 0600", format_mode(mode)));
        println!(
          "For security, change permissions to 600: {}",
          format_command(&format!("chmod 600 {}", path.display()))
        );
      }
      Err(e) => {
        healthy = false;
        print_error(&format!("Cannot read permissions: {e}"));
      }
    }
  } else {
    print_info("Permission bits are not checked on this platform");
  }

  match source.read() {
    Ok(netrc) => {
      print_success(&format!("Parsed {} entries", netrc.count()));
      if netrc.default_entry().is_some() {
        print_info("A default entry is present");
      }
    }
    Err(e) => {
      healthy = false;
      print_error(&format!("{e:#}"));
    }
  }

  Ok(if healthy { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
