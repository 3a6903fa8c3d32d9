//! Presentation gateway abstraction.
//!
//! The gateway is the boundary between the tour orchestrator and whatever
//! draws panoramas, answer buttons and overlays. The orchestrator drives it
//! strictly sequentially: at most one call (or one awaited effect) is in
//! flight at any time.

use std::time::Duration;

use async_trait::async_trait;

use crate::asset::AssetHandle;

/// Visual state of a single answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// The option was the correct answer.
    Correct,
    /// The option was chosen but is wrong.
    Incorrect,
    /// Default, unmarked state.
    Normal,
}

/// Everything needed to show one challenge.
///
/// Handed over in a single call so the display never shows a question next
/// to the answers of another.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeView<'a> {
    /// The question text.
    pub question: &'a str,
    /// Answer texts, in display order. Never empty.
    pub answers: &'a [String],
    /// Panorama to show, if it resolved.
    pub panorama: Option<&'a AssetHandle>,
    /// Initial view orientation in degrees.
    pub orientation_degrees: f32,
}

/// Display and UI surface driven by the orchestrator.
#[async_trait]
pub trait PresentationGateway: Send {
    /// Shows a challenge, replacing all previous challenge content and
    /// resetting every answer slot to [`FeedbackKind::Normal`]. The gateway
    /// shows exactly `view.answers.len()` answer slots.
    fn present_challenge(&mut self, view: ChallengeView<'_>);

    /// Marks the answer slot at `index`.
    fn set_answer_feedback(&mut self, index: usize, feedback: FeedbackKind);

    /// Enables or disables the first `active_answer_count` answer inputs.
    fn set_input_enabled(&mut self, enabled: bool, active_answer_count: usize);

    /// Fades the screen out. Returns once the fade finished, or immediately
    /// when no fade surface is configured.
    async fn play_fade_out(&mut self, duration: Duration);

    /// Fades the screen in. Returns once the fade finished, or immediately
    /// when no fade surface is configured.
    async fn play_fade_in(&mut self, duration: Duration);

    /// Returns whether a fade surface is configured.
    fn has_fade_surface(&self) -> bool;

    /// Shows the "next destination" interstitial.
    fn show_transition_text(&mut self, next_location_name: &str);

    /// Hides the "next destination" interstitial.
    fn hide_transition_text(&mut self);

    /// Swaps the background audio. `None` silences the channel.
    fn play_background_audio(&mut self, audio: Option<&AssetHandle>);

    /// Hands control back to the menu screen. Terminal for a run.
    fn exit_to_menu(&mut self);
}

/// Capability to lock the viewer's free movement while a tour runs.
pub trait MovementControl: Send {
    /// Enables or disables movement.
    fn set_movement_enabled(&mut self, enabled: bool);
}
