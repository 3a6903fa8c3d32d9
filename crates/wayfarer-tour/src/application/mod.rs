//! Application layer for tour orchestration.

pub mod orchestrator;
