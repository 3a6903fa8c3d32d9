//! Wayfarer — tour orchestration.
//!
//! Owns the run position and the answering lock, validates answers and
//! sequences every transition between challenges, locations and the menu.

pub mod application;
pub mod domain;
