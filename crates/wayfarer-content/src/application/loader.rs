//! Content loader: description in, tour model out.
//!
//! Asset references are resolved one at a time, locations in order and
//! challenges in order within each location, so resolution order matches
//! description order exactly. A reference that does not resolve is reported
//! as a warning and leaves the field absent; only parse and integrity
//! failures abort a load.

use sha2::{Digest, Sha256};
use wayfarer_core::asset::{AssetHandle, AssetKind, AssetResolver, UnresolvedAsset};
use wayfarer_core::error::TourError;

use crate::application::source::DescriptionSource;
use crate::domain::description::{RawDescription, correct_index};
use crate::domain::model::{Challenge, Location, TourModel};

/// Result of a successful load.
#[derive(Debug)]
pub struct LoadReport {
    /// The loaded tour.
    pub model: TourModel,
    /// Asset references that did not resolve, in description order.
    pub warnings: Vec<UnresolvedAsset>,
}

/// Reads a description from `source` and loads it.
///
/// # Errors
///
/// Returns `TourError::SourceUnavailable` if the source cannot be read, and
/// otherwise the errors of [`load_tour`].
pub async fn load_from_source(
    source: &dyn DescriptionSource,
    resolver: &dyn AssetResolver,
) -> Result<LoadReport, TourError> {
    let raw = source.load_description().await?;
    load_tour(&raw, resolver).await
}

/// Parses `raw`, checks its integrity and resolves every asset reference.
///
/// # Errors
///
/// Returns `TourError::MalformedContent` if the description cannot be parsed
/// and `TourError::ContentIntegrity` if it violates a structural invariant.
pub async fn load_tour(
    raw: &RawDescription,
    resolver: &dyn AssetResolver,
) -> Result<LoadReport, TourError> {
    let description = raw.parse()?;
    description.check_integrity()?;

    let version_hash = format!("{:x}", Sha256::digest(raw.text.as_bytes()));
    let mut warnings = Vec::new();
    let mut locations = Vec::with_capacity(description.locations.len());

    for (location_index, location) in description.locations.into_iter().enumerate() {
        let audio = match location.audio.as_deref() {
            Some(reference) => {
                resolve_or_warn(
                    resolver,
                    AssetKind::Audio,
                    reference,
                    location_index,
                    None,
                    &mut warnings,
                )
                .await
            }
            None => None,
        };

        let mut challenges = Vec::with_capacity(location.challenges.len());
        for (challenge_index, challenge) in location.challenges.into_iter().enumerate() {
            let correct_answer = correct_index(&challenge, location_index, challenge_index)?;
            let panorama = resolve_or_warn(
                resolver,
                AssetKind::Panorama,
                &challenge.panorama,
                location_index,
                Some(challenge_index),
                &mut warnings,
            )
            .await;
            challenges.push(Challenge::new(
                panorama,
                challenge.orientation,
                challenge.question,
                challenge.answers,
                correct_answer,
            )?);
        }

        locations.push(Location::new(location.name, audio, challenges)?);
    }

    let model = TourModel::new(locations, version_hash)?;
    tracing::info!(
        locations = model.len(),
        warnings = warnings.len(),
        version_hash = model.version_hash(),
        "tour content loaded"
    );

    Ok(LoadReport { model, warnings })
}

async fn resolve_or_warn(
    resolver: &dyn AssetResolver,
    kind: AssetKind,
    reference: &str,
    location_index: usize,
    challenge_index: Option<usize>,
    warnings: &mut Vec<UnresolvedAsset>,
) -> Option<AssetHandle> {
    let handle = resolver.resolve(kind, reference).await;
    if handle.is_none() {
        let warning = UnresolvedAsset {
            kind,
            reference: reference.to_owned(),
            location_index,
            challenge_index,
        };
        tracing::warn!(%warning, "asset reference did not resolve");
        warnings.push(warning);
    }
    handle
}
