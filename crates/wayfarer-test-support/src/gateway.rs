//! Test gateway — a `PresentationGateway` that records every call and can
//! play the user's part through a scripted input sequence.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use wayfarer_core::asset::AssetHandle;
use wayfarer_core::effects::{FadeDirection, FadeSurface, run_fade};
use wayfarer_core::gateway::{ChallengeView, FeedbackKind, MovementControl, PresentationGateway};
use wayfarer_core::input::{Delivery, InputHandle, TourInput};

use crate::timer::SteppedFrameTimer;

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    /// `present_challenge`.
    PresentChallenge {
        /// Question text.
        question: String,
        /// Answer texts.
        answers: Vec<String>,
        /// Panorama reference, if one was handed over.
        panorama: Option<String>,
        /// Orientation in degrees.
        orientation_degrees: f32,
    },
    /// `set_answer_feedback`.
    AnswerFeedback {
        /// Answer slot.
        index: usize,
        /// Feedback applied.
        feedback: FeedbackKind,
    },
    /// `set_input_enabled`.
    InputEnabled {
        /// Whether inputs were enabled.
        enabled: bool,
        /// Number of active answer slots.
        active_answer_count: usize,
    },
    /// `play_fade_out`.
    FadeOut(Duration),
    /// `play_fade_in`.
    FadeIn(Duration),
    /// `show_transition_text`.
    ShowTransitionText(String),
    /// `hide_transition_text`.
    HideTransitionText,
    /// `play_background_audio`, with the audio reference.
    BackgroundAudio(Option<String>),
    /// `exit_to_menu`.
    ExitToMenu,
}

#[derive(Debug)]
struct Overlay {
    opacity: f32,
}

impl FadeSurface for Overlay {
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// A presentation gateway that records calls instead of drawing.
///
/// With [`with_input`](Self::with_input) it also answers: every time answer
/// inputs are enabled it sends the next scripted input. Once the script is
/// exhausted the input handle is dropped, which closes the channel, unless
/// fade or feedback injections are configured, in which case the handle is
/// kept until `exit_to_menu`.
#[derive(Debug)]
pub struct RecordingGateway {
    calls: Vec<GatewayCall>,
    overlay: Option<Overlay>,
    timer: SteppedFrameTimer,
    fade_frames: Vec<u32>,
    opacity_at_present: Vec<f32>,
    input: Option<InputHandle>,
    script: VecDeque<TourInput>,
    scripted_deliveries: Vec<Delivery>,
    fade_injections: Vec<TourInput>,
    feedback_injections: Vec<TourInput>,
    injected_deliveries: Vec<Delivery>,
}

impl RecordingGateway {
    /// Creates a gateway with a fade surface that starts fully opaque.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            overlay: Some(Overlay { opacity: 1.0 }),
            timer: SteppedFrameTimer::sixty_fps(),
            fade_frames: Vec::new(),
            opacity_at_present: Vec::new(),
            input: None,
            script: VecDeque::new(),
            scripted_deliveries: Vec::new(),
            fade_injections: Vec::new(),
            feedback_injections: Vec::new(),
            injected_deliveries: Vec::new(),
        }
    }

    /// Creates a gateway with no fade surface.
    #[must_use]
    pub fn without_fade_surface() -> Self {
        Self {
            overlay: None,
            ..Self::new()
        }
    }

    /// Plays `script` through `input`, one input each time answers are
    /// enabled.
    #[must_use]
    pub fn with_input(mut self, input: InputHandle, script: Vec<TourInput>) -> Self {
        self.input = Some(input);
        self.script = script.into();
        self
    }

    /// Sends `input` at the start of every fade.
    #[must_use]
    pub fn with_fade_injection(mut self, input: TourInput) -> Self {
        self.fade_injections.push(input);
        self
    }

    /// Sends `input` every time answer feedback is set.
    #[must_use]
    pub fn with_feedback_injection(mut self, input: TourInput) -> Self {
        self.feedback_injections.push(input);
        self
    }

    /// Every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[GatewayCall] {
        &self.calls
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Question texts of every presented challenge, in order.
    #[must_use]
    pub fn presented_questions(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GatewayCall::PresentChallenge { question, .. } => Some(question.clone()),
                _ => None,
            })
            .collect()
    }

    /// Frames rendered by each fade, in order.
    #[must_use]
    pub fn fade_frames(&self) -> &[u32] {
        &self.fade_frames
    }

    /// Overlay opacity at the moment of each `present_challenge` call. Empty
    /// when there is no fade surface.
    #[must_use]
    pub fn opacity_at_present(&self) -> &[f32] {
        &self.opacity_at_present
    }

    /// Current overlay opacity, if there is a fade surface.
    #[must_use]
    pub fn overlay_opacity(&self) -> Option<f32> {
        self.overlay.as_ref().map(|overlay| overlay.opacity)
    }

    /// Outcome of every scripted input sent.
    #[must_use]
    pub fn scripted_deliveries(&self) -> &[Delivery] {
        &self.scripted_deliveries
    }

    /// Outcome of every injected input, in the order sent.
    #[must_use]
    pub fn injected_deliveries(&self) -> &[Delivery] {
        &self.injected_deliveries
    }

    fn send_next_scripted(&mut self) {
        let Some(handle) = self.input.as_ref() else {
            return;
        };
        if let Some(input) = self.script.pop_front() {
            self.scripted_deliveries.push(handle.send(input));
        }
        if self.script.is_empty()
            && self.fade_injections.is_empty()
            && self.feedback_injections.is_empty()
        {
            self.input = None;
        }
    }

    async fn fade(&mut self, direction: FadeDirection, duration: Duration) {
        inject(
            self.input.as_ref(),
            &self.fade_injections,
            &mut self.injected_deliveries,
        );
        let surface = self
            .overlay
            .as_mut()
            .map(|overlay| overlay as &mut dyn FadeSurface);
        let frames = run_fade(surface, &self.timer, direction, duration).await;
        self.fade_frames.push(frames);
    }
}

fn inject(handle: Option<&InputHandle>, inputs: &[TourInput], deliveries: &mut Vec<Delivery>) {
    let Some(handle) = handle else {
        return;
    };
    for input in inputs {
        deliveries.push(handle.send(*input));
    }
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresentationGateway for RecordingGateway {
    fn present_challenge(&mut self, view: ChallengeView<'_>) {
        if let Some(overlay) = &self.overlay {
            self.opacity_at_present.push(overlay.opacity);
        }
        self.calls.push(GatewayCall::PresentChallenge {
            question: view.question.to_owned(),
            answers: view.answers.to_vec(),
            panorama: view.panorama.map(|handle| handle.reference.clone()),
            orientation_degrees: view.orientation_degrees,
        });
    }

    fn set_answer_feedback(&mut self, index: usize, feedback: FeedbackKind) {
        self.calls
            .push(GatewayCall::AnswerFeedback { index, feedback });
        inject(
            self.input.as_ref(),
            &self.feedback_injections,
            &mut self.injected_deliveries,
        );
    }

    fn set_input_enabled(&mut self, enabled: bool, active_answer_count: usize) {
        self.calls.push(GatewayCall::InputEnabled {
            enabled,
            active_answer_count,
        });
        if enabled {
            self.send_next_scripted();
        }
    }

    async fn play_fade_out(&mut self, duration: Duration) {
        self.calls.push(GatewayCall::FadeOut(duration));
        self.fade(FadeDirection::Out, duration).await;
    }

    async fn play_fade_in(&mut self, duration: Duration) {
        self.calls.push(GatewayCall::FadeIn(duration));
        self.fade(FadeDirection::In, duration).await;
    }

    fn has_fade_surface(&self) -> bool {
        self.overlay.is_some()
    }

    fn show_transition_text(&mut self, next_location_name: &str) {
        self.calls
            .push(GatewayCall::ShowTransitionText(next_location_name.to_owned()));
    }

    fn hide_transition_text(&mut self) {
        self.calls.push(GatewayCall::HideTransitionText);
    }

    fn play_background_audio(&mut self, audio: Option<&AssetHandle>) {
        self.calls.push(GatewayCall::BackgroundAudio(
            audio.map(|handle| handle.reference.clone()),
        ));
    }

    fn exit_to_menu(&mut self) {
        self.calls.push(GatewayCall::ExitToMenu);
        self.input = None;
    }
}

/// A movement control that records every toggle.
#[derive(Debug, Default)]
pub struct RecordingMovementControl {
    history: Vec<bool>,
}

impl RecordingMovementControl {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value passed to `set_movement_enabled`, in order.
    #[must_use]
    pub fn history(&self) -> &[bool] {
        &self.history
    }
}

impl MovementControl for RecordingMovementControl {
    fn set_movement_enabled(&mut self, enabled: bool) {
        self.history.push(enabled);
    }
}
