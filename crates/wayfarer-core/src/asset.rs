//! Asset handles and the resolver abstraction.

use std::fmt;

use async_trait::async_trait;

/// The kinds of asset a tour description can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Background audio played while a location is shown.
    Audio,
    /// Panoramic image a challenge is shown over.
    Panorama,
}

impl AssetKind {
    /// Returns a short lowercase name for logging.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Panorama => "panorama",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, loadable asset.
///
/// The handle is opaque to the tour: only the presentation layer interprets
/// `uri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHandle {
    /// What kind of asset this is.
    pub kind: AssetKind,
    /// The reference as written in the tour description.
    pub reference: String,
    /// Where the presentation layer can load the asset from.
    pub uri: String,
}

impl AssetHandle {
    /// Creates a new asset handle.
    #[must_use]
    pub fn new(kind: AssetKind, reference: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            kind,
            reference: reference.into(),
            uri: uri.into(),
        }
    }
}

/// Resolves named asset references into handles.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// Resolves `reference` of the given kind. Returns `None` when the asset
    /// does not exist; resolution failures are never fatal to a load.
    async fn resolve(&self, kind: AssetKind, reference: &str) -> Option<AssetHandle>;
}

/// Warning produced when an asset reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedAsset {
    /// The kind of asset that was requested.
    pub kind: AssetKind,
    /// The reference as written in the description.
    pub reference: String,
    /// Ordinal of the location that referenced the asset.
    pub location_index: usize,
    /// Ordinal of the challenge, when the reference belongs to one.
    pub challenge_index: Option<usize>,
}

impl fmt::Display for UnresolvedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.challenge_index {
            Some(challenge) => write!(
                f,
                "unresolved {} asset '{}' at location {}, challenge {}",
                self.kind, self.reference, self.location_index, challenge
            ),
            None => write!(
                f,
                "unresolved {} asset '{}' at location {}",
                self.kind, self.reference, self.location_index
            ),
        }
    }
}
