//! Transition decision after a correct answer.

use wayfarer_content::domain::model::TourModel;

use super::config::CompletionPolicy;
use super::position::RunPosition;

/// What a correct answer leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Next challenge of the same location.
    NextChallenge(RunPosition),
    /// First challenge of another location.
    NextLocation(RunPosition),
    /// The tour is over.
    Finish,
}

/// Decides where a correct answer at `position` leads.
///
/// `position` must be valid in `model`.
#[must_use]
pub fn next_step(model: &TourModel, position: RunPosition, completion: CompletionPolicy) -> Step {
    debug_assert!(
        position.is_valid_in(model),
        "position {position} is outside the tour"
    );

    let challenge_count = model
        .location(position.location_index)
        .map_or(0, |location| location.challenges().len());

    if position.challenge_index + 1 < challenge_count {
        return Step::NextChallenge(RunPosition::new(
            position.location_index,
            position.challenge_index + 1,
        ));
    }

    let next_location = position.location_index + 1;
    if next_location < model.len() {
        return Step::NextLocation(RunPosition::start_of(next_location));
    }

    match completion {
        CompletionPolicy::ExitToMenu => Step::Finish,
        CompletionPolicy::LoopToStart => Step::NextLocation(RunPosition::start_of(0)),
    }
}
