//! The loaded, immutable tour model.
//!
//! Constructors validate their invariants, so a `TourModel` that exists is
//! always safe to walk: at least one location, every location has at least
//! one challenge, and every correct-answer index is in range.

use wayfarer_core::asset::AssetHandle;
use wayfarer_core::error::TourError;

/// One quiz question shown over a panorama.
#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    panorama: Option<AssetHandle>,
    orientation_degrees: f32,
    question: String,
    answers: Vec<String>,
    correct_answer: usize,
}

impl Challenge {
    /// Creates a challenge.
    ///
    /// # Errors
    ///
    /// Returns `TourError::ContentIntegrity` if `answers` is empty or
    /// `correct_answer` is not a valid index into it.
    pub fn new(
        panorama: Option<AssetHandle>,
        orientation_degrees: f32,
        question: impl Into<String>,
        answers: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, TourError> {
        if answers.is_empty() {
            return Err(TourError::ContentIntegrity(
                "challenge has no answers".to_owned(),
            ));
        }
        if correct_answer >= answers.len() {
            return Err(TourError::ContentIntegrity(format!(
                "correct answer {correct_answer} is outside 0..{}",
                answers.len()
            )));
        }
        Ok(Self {
            panorama,
            orientation_degrees,
            question: question.into(),
            answers,
            correct_answer,
        })
    }

    /// Panorama shown behind the question, if it resolved.
    #[must_use]
    pub fn panorama(&self) -> Option<&AssetHandle> {
        self.panorama.as_ref()
    }

    /// Initial view orientation in degrees.
    #[must_use]
    pub fn orientation_degrees(&self) -> f32 {
        self.orientation_degrees
    }

    /// The question text.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Answer texts in display order.
    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Index of the correct answer.
    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Returns whether `selected` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }
}

/// A themed stage of the tour.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    name: String,
    audio: Option<AssetHandle>,
    challenges: Vec<Challenge>,
}

impl Location {
    /// Creates a location.
    ///
    /// # Errors
    ///
    /// Returns `TourError::ContentIntegrity` if `challenges` is empty.
    pub fn new(
        name: impl Into<String>,
        audio: Option<AssetHandle>,
        challenges: Vec<Challenge>,
    ) -> Result<Self, TourError> {
        let name = name.into();
        if challenges.is_empty() {
            return Err(TourError::ContentIntegrity(format!(
                "location '{name}' has no challenges"
            )));
        }
        Ok(Self {
            name,
            audio,
            challenges,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Background audio, if it resolved.
    #[must_use]
    pub fn audio(&self) -> Option<&AssetHandle> {
        self.audio.as_ref()
    }

    /// Challenges in the order they are asked. Never empty.
    #[must_use]
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    /// Returns the challenge at `index`.
    #[must_use]
    pub fn challenge(&self, index: usize) -> Option<&Challenge> {
        self.challenges.get(index)
    }
}

/// All locations of a tour, in game order.
#[derive(Debug, Clone, PartialEq)]
pub struct TourModel {
    locations: Vec<Location>,
    version_hash: String,
}

impl TourModel {
    /// Creates a tour model.
    ///
    /// # Errors
    ///
    /// Returns `TourError::ContentIntegrity` if `locations` is empty.
    pub fn new(
        locations: Vec<Location>,
        version_hash: impl Into<String>,
    ) -> Result<Self, TourError> {
        if locations.is_empty() {
            return Err(TourError::ContentIntegrity(
                "tour has no locations".to_owned(),
            ));
        }
        Ok(Self {
            locations,
            version_hash: version_hash.into(),
        })
    }

    /// Locations in game order. Never empty.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Returns the location at `index`.
    #[must_use]
    pub fn location(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    /// Number of locations. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// SHA-256 of the description this model was loaded from.
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }
}
