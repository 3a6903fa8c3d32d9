//! Sources a tour description can be read from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use wayfarer_core::error::TourError;

use crate::domain::description::{DescriptionFormat, RawDescription};

/// Supplies the raw text of a tour description.
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    /// Reads the description.
    ///
    /// # Errors
    ///
    /// Returns `TourError::SourceUnavailable` if the description cannot be
    /// read, and `TourError::MalformedContent` if it is not text.
    async fn load_description(&self) -> Result<RawDescription, TourError>;
}

/// Reads a description from a file. The format follows the file extension.
#[derive(Debug, Clone)]
pub struct FileDescriptionSource {
    path: PathBuf,
}

impl FileDescriptionSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DescriptionSource for FileDescriptionSource {
    async fn load_description(&self) -> Result<RawDescription, TourError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            TourError::SourceUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        let text = String::from_utf8(bytes).map_err(|e| {
            TourError::MalformedContent(format!("{}: not UTF-8: {e}", self.path.display()))
        })?;
        Ok(RawDescription::new(
            text,
            DescriptionFormat::from_path(&self.path),
        ))
    }
}

/// Serves a description held in memory.
#[derive(Debug, Clone)]
pub struct StaticDescriptionSource {
    raw: RawDescription,
}

impl StaticDescriptionSource {
    /// Creates a source serving `text` in the given format.
    #[must_use]
    pub fn new(text: impl Into<String>, format: DescriptionFormat) -> Self {
        Self {
            raw: RawDescription::new(text, format),
        }
    }

    /// Creates a source serving YAML text.
    #[must_use]
    pub fn yaml(text: impl Into<String>) -> Self {
        Self::new(text, DescriptionFormat::Yaml)
    }

    /// Creates a source serving JSON text.
    #[must_use]
    pub fn json(text: impl Into<String>) -> Self {
        Self::new(text, DescriptionFormat::Json)
    }
}

#[async_trait]
impl DescriptionSource for StaticDescriptionSource {
    async fn load_description(&self) -> Result<RawDescription, TourError> {
        Ok(self.raw.clone())
    }
}
