//! Run position within a tour.

use std::fmt;

use wayfarer_content::domain::model::TourModel;

/// The (location, challenge) coordinate the user is at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunPosition {
    /// Index of the current location.
    pub location_index: usize,
    /// Index of the current challenge within the location.
    pub challenge_index: usize,
}

impl RunPosition {
    /// Creates a position.
    #[must_use]
    pub fn new(location_index: usize, challenge_index: usize) -> Self {
        Self {
            location_index,
            challenge_index,
        }
    }

    /// First challenge of the given location.
    #[must_use]
    pub fn start_of(location_index: usize) -> Self {
        Self::new(location_index, 0)
    }

    /// Returns whether this position addresses an existing challenge.
    #[must_use]
    pub fn is_valid_in(self, model: &TourModel) -> bool {
        model
            .location(self.location_index)
            .is_some_and(|location| self.challenge_index < location.challenges().len())
    }
}

impl fmt::Display for RunPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.location_index, self.challenge_index)
    }
}
