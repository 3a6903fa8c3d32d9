//! Test resolvers — in-memory `AssetResolver` implementations for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use wayfarer_core::asset::{AssetHandle, AssetKind, AssetResolver};

/// Resolves every reference to a `mem://` handle, except the ones marked
/// missing. Records every request in order.
#[derive(Debug, Default)]
pub struct StaticAssetResolver {
    missing: HashSet<String>,
    requests: Mutex<Vec<(AssetKind, String)>>,
}

impl StaticAssetResolver {
    /// Creates a resolver that resolves everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `reference` as unresolvable.
    #[must_use]
    pub fn with_missing(mut self, reference: &str) -> Self {
        self.missing.insert(reference.to_owned());
        self
    }

    /// Every resolution request seen so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<(AssetKind, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetResolver for StaticAssetResolver {
    async fn resolve(&self, kind: AssetKind, reference: &str) -> Option<AssetHandle> {
        self.requests
            .lock()
            .unwrap()
            .push((kind, reference.to_owned()));
        if self.missing.contains(reference) {
            return None;
        }
        Some(AssetHandle::new(
            kind,
            reference,
            format!("mem://{kind}/{reference}"),
        ))
    }
}

/// A resolver that never resolves anything. Useful for testing degraded
/// loads.
#[derive(Debug)]
pub struct MissingAssetResolver;

#[async_trait]
impl AssetResolver for MissingAssetResolver {
    async fn resolve(&self, _kind: AssetKind, _reference: &str) -> Option<AssetHandle> {
        None
    }
}
