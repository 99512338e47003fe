//! # netrc-keeper CLI Library
//!
//! Command definitions, configuration and terminal output for the
//! `netrc-keeper` binary.

pub mod cli;
pub mod config;
pub mod output;
pub mod prompts;
pub mod source;
