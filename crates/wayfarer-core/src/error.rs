//! Tour error types.

use thiserror::Error;

/// Top-level error type for loading and starting a tour.
#[derive(Debug, Error)]
pub enum TourError {
    /// The tour description could not be parsed.
    #[error("malformed content: {0}")]
    MalformedContent(String),

    /// The description parsed, but violates an invariant the tour relies on.
    #[error("content integrity violation: {0}")]
    ContentIntegrity(String),

    /// The description could not be read at all.
    #[error("content source unavailable: {0}")]
    SourceUnavailable(String),
}
