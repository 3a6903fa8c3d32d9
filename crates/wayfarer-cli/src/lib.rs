//! Wayfarer terminal runner.
//!
//! Environment configuration, a console presentation gateway and the stdin
//! input pump used by the `wayfarer` binary.

pub mod config;
pub mod console;
pub mod error;
