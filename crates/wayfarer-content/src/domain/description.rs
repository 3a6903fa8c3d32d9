//! Serialized tour description.
//!
//! This is the on-disk shape of a tour before any asset is resolved. It is
//! accepted as YAML or JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wayfarer_core::error::TourError;

/// Serialization format of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl DescriptionFormat {
    /// Picks the format from a file extension. Anything that is not `.json`
    /// is read as YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Unparsed description text together with its format.
#[derive(Debug, Clone)]
pub struct RawDescription {
    /// The description text.
    pub text: String,
    /// How `text` is encoded.
    pub format: DescriptionFormat,
}

impl RawDescription {
    /// Creates a raw description.
    #[must_use]
    pub fn new(text: impl Into<String>, format: DescriptionFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Parses the text into a [`TourDescription`].
    ///
    /// # Errors
    ///
    /// Returns `TourError::MalformedContent` if the text is not a valid
    /// description in its declared format.
    pub fn parse(&self) -> Result<TourDescription, TourError> {
        match self.format {
            DescriptionFormat::Yaml => serde_yaml::from_str(&self.text)
                .map_err(|e| TourError::MalformedContent(format!("invalid YAML description: {e}"))),
            DescriptionFormat::Json => serde_json::from_str(&self.text)
                .map_err(|e| TourError::MalformedContent(format!("invalid JSON description: {e}"))),
        }
    }
}

/// A whole tour, in game order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TourDescription {
    /// Locations in the order they are visited.
    pub locations: Vec<LocationDescription>,
}

/// One location as written in the description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationDescription {
    /// Display name, also shown on the transition interstitial.
    pub name: String,
    /// Background audio reference.
    #[serde(default)]
    pub audio: Option<String>,
    /// Challenges in the order they are asked.
    pub challenges: Vec<ChallengeDescription>,
}

/// One challenge as written in the description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChallengeDescription {
    /// Panorama reference.
    pub panorama: String,
    /// Initial view orientation in degrees.
    #[serde(default)]
    pub orientation: f32,
    /// The question text.
    pub question: String,
    /// Answer texts in display order.
    pub answers: Vec<String>,
    /// Index into `answers` of the correct answer. Any integer is accepted,
    /// negative or huge, so range problems surface as integrity violations
    /// rather than parse errors.
    #[serde(deserialize_with = "any_integer::deserialize")]
    pub correct_answer: i128,
}

impl TourDescription {
    /// Checks the structural invariants the tour state machine relies on.
    ///
    /// # Errors
    ///
    /// Returns `TourError::ContentIntegrity` if there are no locations, a
    /// location has no challenges, a challenge has no answers, or a correct
    /// answer index is out of range.
    pub fn check_integrity(&self) -> Result<(), TourError> {
        if self.locations.is_empty() {
            return Err(TourError::ContentIntegrity(
                "tour has no locations".to_owned(),
            ));
        }
        for (location_index, location) in self.locations.iter().enumerate() {
            if location.challenges.is_empty() {
                return Err(TourError::ContentIntegrity(format!(
                    "location {location_index} ('{}') has no challenges",
                    location.name
                )));
            }
            for (challenge_index, challenge) in location.challenges.iter().enumerate() {
                if challenge.answers.is_empty() {
                    return Err(TourError::ContentIntegrity(format!(
                        "location {location_index}, challenge {challenge_index} has no answers"
                    )));
                }
                correct_index(challenge, location_index, challenge_index)?;
            }
        }
        Ok(())
    }
}

/// Returns the correct answer as an index into the challenge's answers.
///
/// # Errors
///
/// Returns `TourError::ContentIntegrity` if the index is out of range.
pub(crate) fn correct_index(
    challenge: &ChallengeDescription,
    location_index: usize,
    challenge_index: usize,
) -> Result<usize, TourError> {
    usize::try_from(challenge.correct_answer)
        .ok()
        .filter(|index| *index < challenge.answers.len())
        .ok_or_else(|| {
            TourError::ContentIntegrity(format!(
                "location {location_index}, challenge {challenge_index}: correct answer {} is outside 0..{}",
                challenge.correct_answer,
                challenge.answers.len()
            ))
        })
}

mod any_integer {
    use std::fmt;

    use serde::Deserializer;
    use serde::de::{self, Visitor};

    struct AnyInteger;

    impl Visitor<'_> for AnyInteger {
        type Value = i128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i128, E> {
            Ok(i128::from(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i128, E> {
            Ok(i128::from(value))
        }

        fn visit_i128<E: de::Error>(self, value: i128) -> Result<i128, E> {
            Ok(value)
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<i128, E> {
            Ok(i128::try_from(value).unwrap_or(i128::MAX))
        }

        // Integers beyond 64 bits reach JSON and some YAML inputs as floats.
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i128, E> {
            if value.is_finite() && value.fract() == 0.0 {
                Ok(value as i128)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        deserializer.deserialize_any(AnyInteger)
    }
}
