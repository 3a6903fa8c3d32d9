//! Domain layer for tour orchestration.

pub mod config;
pub mod position;
pub mod state;
pub mod transition;
