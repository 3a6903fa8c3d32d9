//! Tour state machine states.

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourState {
    /// Content is being loaded. Initial state.
    Loading,
    /// A challenge is on screen, or being swapped for the next one within
    /// the same location.
    PresentingChallenge,
    /// A location change or an exit sequence is playing.
    AwaitingTransition,
    /// The run handed control back to the menu. Terminal.
    Exiting,
}

impl TourState {
    /// Returns whether the state is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exiting)
    }
}
