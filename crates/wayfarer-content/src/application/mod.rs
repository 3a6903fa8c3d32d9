//! Application layer for tour content.

pub mod loader;
pub mod resolver;
pub mod source;
