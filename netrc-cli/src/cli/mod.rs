//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for netrc-keeper.

mod backup;
mod cat;
mod check;
mod compare;
mod completion;
mod copy;
mod get;
mod list;
mod set;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Args, Parser, Subcommand};
use netrc_core::WriteOptions;

use crate::config::Config;
use crate::output::ColorMode;
use crate::source::Source;

/// Top-level CLI command for netrc-keeper
#[derive(Parser)]
#[command(name = "netrc-keeper")]
#[command(display_name = "🔑 netrc-keeper")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Read and edit .netrc files without losing their formatting")]
#[command(
  long_about = "netrc-keeper reads, edits and writes .netrc login files.\n\n\
        Comments, blank lines and whitespace survive every edit. Writes are atomic,\n\
        the previous file is kept as a numbered backup, and the written content is\n\
        verified before it replaces the original."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  #[command(flatten)]
  pub global: GlobalArgs,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Options shared by every subcommand that touches files
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
  /// Login file to operate on
  #[arg(
    short = 'f',
    long = "file",
    value_name = "PATH",
    global = true,
    long_help = "Login file to operate on.\n\n\
             Defaults to the path in the config file, then $NETRC, then ~/.netrc\n\
             (~/_netrc on Windows)."
  )]
  pub file: Option<PathBuf>,

  /// Do not keep a numbered backup of the file being replaced
  #[arg(long, global = true)]
  pub no_backup: bool,

  /// Skip reading written files back for verification
  #[arg(long, global = true)]
  pub no_verify: bool,
}

impl GlobalArgs {
  /// Loads the user configuration
  pub fn config(&self) -> Result<Config> {
    Config::load()
  }

  /// Resolves the login file with the configuration applied
  pub fn source(&self) -> Result<Source> {
    Source::resolve(self.file.as_deref(), self.config()?, self.no_backup, self.no_verify)
  }

  /// Write options from the configuration with the flags applied
  pub fn write_options(&self) -> Result<WriteOptions> {
    Ok(self.config()?.write_options(self.no_backup, self.no_verify))
  }
}

/// Subcommands for netrc-keeper
#[derive(Subcommand)]
pub enum Commands {
  /// Create a numbered backup of the login file
  #[command(long_about = "Copies the login file to the first free <file>.NNN name.\n\n\
            Existing backups are never overwritten and the backup is always\n\
            readable by its owner only.")]
  Backup,

  /// Print the login file
  #[command(long_about = "Prints the login file as netrc-keeper sees it.\n\n\
            For a file that has not been edited the output is identical to the\n\
            file on disk, which makes this a quick round-trip check.")]
  Cat,

  /// Check that the login file exists, is private and parses
  #[command(long_about = "Reports whether the login file exists, whether its permissions\n\
            restrict access to its owner, and whether it parses.\n\n\
            Exits with status 1 if any check fails.")]
  Check,

  /// Compare files byte by byte
  #[command(long_about = "Compares two or more files byte by byte.\n\n\
            Exits with status 0 when all files are identical and 1 when any differ.")]
  #[command(alias = "cmp")]
  Compare(compare::CompareArgs),

  /// Generate shell completions
  #[command(long_about = "Generates shell completion scripts for netrc-keeper commands.\n\n\
            This command generates completion scripts that provide tab completion for\n\
            netrc-keeper commands and options in your shell.")]
  Completion(completion::CompletionArgs),

  /// Copy a file and verify the copy
  #[command(long_about = "Copies a file, sets the mode of the copy and reads it back to\n\
            confirm it matches the source. A failed copy leaves no destination file.")]
  #[command(alias = "cp")]
  Copy(copy::CopyArgs),

  /// Show the credentials for a machine
  #[command(long_about = "Shows the login (and optionally the password) for a machine.\n\n\
            Falls back to the 'default' entry when the machine has none of its own.\n\
            Exits with status 1 when neither exists.")]
  Get(get::GetArgs),

  /// List machine names
  #[command(alias = "ls")]
  List(list::ListArgs),

  /// Add or update the credentials for a machine
  #[command(long_about = "Sets the login and password for a machine and saves the file.\n\n\
            An existing entry keeps its layout and comments; only the two values\n\
            change. A new entry is appended at the end of the file. The password is\n\
            prompted for when --password is not given.")]
  Set(set::SetArgs),
}

pub fn handle_cli(cli: Cli) -> Result<ExitCode> {
  cli.colors.apply();

  let global = &cli.global;
  match cli.command {
    Commands::Backup => backup::handle_backup_command(global),
    Commands::Cat => cat::handle_cat_command(global),
    Commands::Check => check::handle_check_command(global),
    Commands::Compare(compare) => compare::handle_compare_command(compare),
    Commands::Completion(completion) => completion::handle_completion_command(completion),
    Commands::Copy(copy) => copy::handle_copy_command(copy, global),
    Commands::Get(get) => get::handle_get_command(get, global),
    Commands::List(list) => list::handle_list_command(list, global),
    Commands::Set(set) => set::handle_set_command(set, global),
  }
}
