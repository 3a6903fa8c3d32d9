//! Wayfarer CLI — error types.

use thiserror::Error;
use wayfarer_core::error::TourError;

/// Startup and runtime errors for the terminal runner.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The tour content could not be loaded.
    #[error("tour error: {0}")]
    Tour(#[from] TourError),

    /// Terminal or file I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
