//! Wayfarer Core — shared abstractions for the guided-tour engine.
//!
//! This crate defines the collaborator traits and value types that the
//! content loader and the tour orchestrator depend on. It contains no
//! rendering, audio or filesystem code.

pub mod asset;
pub mod clock;
pub mod effects;
pub mod error;
pub mod gateway;
pub mod input;
pub mod start;
