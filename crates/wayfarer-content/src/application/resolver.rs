//! Filesystem-backed asset resolution.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use wayfarer_core::asset::{AssetHandle, AssetKind, AssetResolver};

const AUDIO_EXTENSIONS: &[&str] = &["ogg", "mp3", "wav"];
const PANORAMA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Resolves references to files under an asset root.
///
/// A reference without extension is looked up as `audio/<ref>.{ogg,mp3,wav}`
/// or `panoramas/<ref>.{jpg,jpeg,png}`. A reference that already carries an
/// extension is looked up in the kind directory and then under the root.
/// Absolute references and references containing `..` never resolve.
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    root: PathBuf,
}

impl FsAssetResolver {
    /// Creates a resolver rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The asset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, kind: AssetKind, reference: &str) -> Vec<PathBuf> {
        let (directory, extensions) = match kind {
            AssetKind::Audio => ("audio", AUDIO_EXTENSIONS),
            AssetKind::Panorama => ("panoramas", PANORAMA_EXTENSIONS),
        };
        let kind_dir = self.root.join(directory);

        if Path::new(reference).extension().is_some() {
            return vec![kind_dir.join(reference), self.root.join(reference)];
        }
        extensions
            .iter()
            .map(|ext| kind_dir.join(format!("{reference}.{ext}")))
            .collect()
    }
}

fn stays_under_root(reference: &str) -> bool {
    Path::new(reference)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

#[async_trait]
impl AssetResolver for FsAssetResolver {
    async fn resolve(&self, kind: AssetKind, reference: &str) -> Option<AssetHandle> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if !stays_under_root(reference) {
            tracing::warn!(%kind, reference, "asset reference escapes the asset root");
            return None;
        }
        for candidate in self.candidates(kind, reference) {
            let is_file = tokio::fs::metadata(&candidate)
                .await
                .is_ok_and(|meta| meta.is_file());
            if is_file {
                tracing::trace!(%kind, reference, path = %candidate.display(), "asset resolved");
                return Some(AssetHandle::new(
                    kind,
                    reference,
                    candidate.display().to_string(),
                ));
            }
        }
        None
    }
}
