//! Hand-off values passed from the menu screen into a tour run.

/// Parameters the menu screen hands to a new tour run.
///
/// Consumed exactly once by the orchestrator when it is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartParameters {
    /// Index of the location the run starts at.
    pub selected_start_index: usize,
}

impl StartParameters {
    /// Creates start parameters for the given location index.
    #[must_use]
    pub fn new(selected_start_index: usize) -> Self {
        Self {
            selected_start_index,
        }
    }
}
