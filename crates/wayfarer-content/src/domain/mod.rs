//! Domain layer for tour content.

pub mod description;
pub mod model;
