//! Test utilities shared across the netrc-keeper workspace
//!
//! This crate provides common testing infrastructure including:
//! - Temporary login files with owner-only permissions ([`NetrcGuard`])
//! - HOME directory isolation ([`HomeEnvTestGuard`])
//! - XDG config directory and `NETRC` isolation ([`EnvTestGuard`])
//! - Detection of environments that ignore file permissions
//!   ([`permissions_enforced`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod home;
pub mod netrc;
pub mod permissions;

// Re-export commonly used items
pub use env::EnvTestGuard;
pub use home::HomeEnvTestGuard;
pub use netrc::NetrcGuard;
pub use permissions::permissions_enforced;
