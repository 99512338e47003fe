//! # Netrc Core Library
//!
//! Reads, edits and writes `.netrc` login files without disturbing their
//! formatting. Comments, blank lines, unusual whitespace and unknown tokens
//! survive a read/write cycle byte for byte; only the values that were
//! actually changed differ on disk.
//!
//! Persistence is built on [`fs::FileOps`], which provides verified copies,
//! numbered backups and atomic replacement of files.

pub mod document;
pub mod entry;
pub mod error;
pub mod filter;
pub mod fs;
pub mod lexer;
pub mod parser;
pub mod paths;
pub mod platform;

// Re-export main types
pub use document::Netrc;
pub use entry::{DEFAULT_MACHINE, Entry, EntryMut};
pub use error::{Error, Result};
pub use filter::{ByteFilter, CommandFilter};
pub use fs::{FileOps, WriteOptions};
pub use paths::default_path;
pub use platform::{Platform, SECURE_MODE};
