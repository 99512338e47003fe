//! # netrc-keeper
//!
//! Format-preserving `.netrc` handling. This crate re-exports the public API
//! of `netrc-core`; the `netrc-keeper` command-line tool lives in
//! `netrc-cli`.
//!
//! ```
//! use netrc_keeper::Netrc;
//!
//! let mut netrc = Netrc::parse(".netrc", "machine m\n  login l\n  password p\n").unwrap();
//! netrc.set("m", "a", "b").unwrap();
//! assert_eq!(netrc.serialize(), "machine m\n  login a\n  password b\n");
//! ```

pub use netrc_core::*;
