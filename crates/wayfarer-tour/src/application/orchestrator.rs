//! The tour orchestrator.
//!
//! Drives one run from loading to the return to the menu. Everything runs on
//! a single task: every fade, dwell and load is awaited in sequence, so at
//! most one transition is ever in flight. The answering lock lives in the
//! [`InputQueue`]; it is held from loading until the first challenge is
//! revealed and from every accepted input until the resulting transition has
//! fully played out.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use wayfarer_content::application::loader::load_from_source;
use wayfarer_content::application::source::DescriptionSource;
use wayfarer_content::domain::model::{Challenge, TourModel};
use wayfarer_core::asset::AssetResolver;
use wayfarer_core::clock::{Clock, FrameTimer};
use wayfarer_core::error::TourError;
use wayfarer_core::gateway::{ChallengeView, FeedbackKind, MovementControl, PresentationGateway};
use wayfarer_core::input::{InputQueue, TourInput};
use wayfarer_core::start::StartParameters;

use crate::domain::config::TourConfig;
use crate::domain::position::RunPosition;
use crate::domain::state::TourState;
use crate::domain::transition::{Step, next_step};

/// External collaborators an orchestrator drives.
pub struct Collaborators<'a> {
    /// Display and UI surface.
    pub gateway: &'a mut dyn PresentationGateway,
    /// Frame ticks and timed waits.
    pub timer: &'a dyn FrameTimer,
    /// Wall clock for run timestamps.
    pub clock: &'a dyn Clock,
    /// Free-movement lock, when the host has one.
    pub movement: Option<&'a mut dyn MovementControl>,
}

/// Result of a call to [`Orchestrator::check_answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Ignored: the answering lock was held or no challenge was on screen.
    Rejected,
    /// Wrong answer; the same challenge is open again.
    Incorrect,
    /// Right answer; the next challenge of the location is on screen.
    NextChallenge,
    /// Right answer; the first challenge of another location is on screen.
    NextLocation,
    /// Right answer on the final challenge; the run returned to the menu.
    Completed,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The final challenge was answered.
    Completed,
    /// The user chose to leave.
    MenuRequested,
    /// Every input handle was dropped.
    InputClosed,
    /// The content could not be loaded.
    LoadFailed,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Identifier of the run, also attached to its tracing span.
    pub run_id: Uuid,
    /// Why the run ended.
    pub reason: ExitReason,
    /// Position at exit; `None` if content never loaded.
    pub final_position: Option<RunPosition>,
    /// Number of asset references that did not resolve.
    pub unresolved_assets: usize,
    /// When the run was created.
    pub started_at: DateTime<Utc>,
    /// When the run ended.
    pub finished_at: DateTime<Utc>,
}

/// The tour state machine.
pub struct Orchestrator<'a> {
    run_id: Uuid,
    gateway: &'a mut dyn PresentationGateway,
    timer: &'a dyn FrameTimer,
    clock: &'a dyn Clock,
    movement: Option<&'a mut dyn MovementControl>,
    config: TourConfig,
    inputs: InputQueue,
    start: StartParameters,
    model: Option<TourModel>,
    position: RunPosition,
    state: TourState,
    exit_reason: Option<ExitReason>,
    unresolved_assets: usize,
    started_at: DateTime<Utc>,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator in the `Loading` state.
    ///
    /// `start` is the hand-off from the menu screen and is read once, when
    /// the content has loaded.
    #[must_use]
    pub fn new(
        collaborators: Collaborators<'a>,
        start: StartParameters,
        config: TourConfig,
        inputs: InputQueue,
    ) -> Self {
        let Collaborators {
            gateway,
            timer,
            clock,
            movement,
        } = collaborators;
        Self {
            run_id: Uuid::new_v4(),
            gateway,
            timer,
            clock,
            movement,
            config,
            inputs,
            start,
            model: None,
            position: RunPosition::start_of(0),
            state: TourState::Loading,
            exit_reason: None,
            unresolved_assets: 0,
            started_at: clock.now(),
        }
    }

    /// Identifier of this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TourState {
        self.state
    }

    /// Current position, once content has loaded.
    #[must_use]
    pub fn position(&self) -> Option<RunPosition> {
        self.model.as_ref().map(|_| self.position)
    }

    /// The loaded tour, once content has loaded.
    #[must_use]
    pub fn model(&self) -> Option<&TourModel> {
        self.model.as_ref()
    }

    /// Returns whether the answering lock is held.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.inputs.is_locked()
    }

    /// Why the run ended, once it has.
    #[must_use]
    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason
    }

    /// Loads the content and reveals the first challenge.
    ///
    /// On failure the error is logged, control goes straight back to the
    /// menu and the run ends in `Exiting`.
    ///
    /// # Errors
    ///
    /// Returns the loader's `TourError` if the content cannot be read,
    /// parsed, or fails its integrity checks.
    pub async fn start(
        &mut self,
        source: &dyn DescriptionSource,
        resolver: &dyn AssetResolver,
    ) -> Result<(), TourError> {
        if self.state != TourState::Loading {
            tracing::warn!(state = ?self.state, "start called twice; ignoring");
            return Ok(());
        }

        let report = match load_from_source(source, resolver).await {
            Ok(report) => report,
            Err(error) => {
                tracing::error!(%error, "tour content failed to load; returning to menu");
                self.state = TourState::Exiting;
                self.exit_reason = Some(ExitReason::LoadFailed);
                self.gateway.exit_to_menu();
                return Err(error);
            }
        };

        let location_count = report.model.len();
        self.unresolved_assets = report.warnings.len();
        self.model = Some(report.model);

        let requested = self.start.selected_start_index;
        let start_index = if requested < location_count {
            requested
        } else {
            tracing::warn!(
                requested,
                location_count,
                "start index outside the tour; starting at the first location"
            );
            0
        };
        self.position = RunPosition::start_of(start_index);

        if let Some(movement) = self.movement.as_deref_mut() {
            movement.set_movement_enabled(false);
        }

        tracing::info!(
            location = start_index,
            locations = location_count,
            "tour starting"
        );
        self.swap_background_audio();
        self.present_current();
        self.gateway
            .play_fade_in(self.config.timing.entrance_fade)
            .await;
        self.open_for_input();
        Ok(())
    }

    /// Evaluates the answer at `selected` for the challenge on screen and
    /// plays the resulting transition to completion.
    ///
    /// A no-op returning [`AnswerOutcome::Rejected`] while the answering lock
    /// is held or no challenge is on screen.
    pub async fn check_answer(&mut self, selected: usize) -> AnswerOutcome {
        if self.state != TourState::PresentingChallenge || !self.inputs.try_lock() {
            tracing::debug!(selected, state = ?self.state, "answer rejected");
            return AnswerOutcome::Rejected;
        }

        let Some((answer_count, correct)) = self
            .current_challenge()
            .map(|challenge| (challenge.answers().len(), challenge.is_correct(selected)))
        else {
            self.inputs.release();
            debug_assert!(false, "no challenge at position {}", self.position);
            return AnswerOutcome::Rejected;
        };
        debug_assert!(
            selected < answer_count,
            "answer {selected} outside 0..{answer_count}"
        );

        self.gateway.set_input_enabled(false, answer_count);

        if !correct {
            tracing::debug!(position = %self.position, selected, "incorrect answer");
            self.set_feedback(selected, answer_count, FeedbackKind::Incorrect);
            self.timer.sleep(self.config.timing.feedback_delay).await;
            self.set_feedback(selected, answer_count, FeedbackKind::Normal);
            self.open_for_input();
            return AnswerOutcome::Incorrect;
        }

        tracing::debug!(position = %self.position, selected, "correct answer");
        self.set_feedback(selected, answer_count, FeedbackKind::Correct);
        self.timer.sleep(self.config.timing.feedback_delay).await;
        self.advance_after_correct().await
    }

    async fn advance_after_correct(&mut self) -> AnswerOutcome {
        let Some(model) = self.model.as_ref() else {
            self.inputs.release();
            debug_assert!(false, "no tour loaded at position {}", self.position);
            return AnswerOutcome::Rejected;
        };
        match next_step(model, self.position, self.config.completion) {
            Step::NextChallenge(next) => {
                self.advance_challenge(next).await;
                AnswerOutcome::NextChallenge
            }
            Step::NextLocation(next) => {
                self.advance_location(next).await;
                AnswerOutcome::NextLocation
            }
            Step::Finish => {
                self.exit(ExitReason::Completed).await;
                AnswerOutcome::Completed
            }
        }
    }

    /// Leaves the tour for the menu.
    ///
    /// Returns `false` without effect while the answering lock is held or no
    /// challenge is on screen.
    pub async fn request_menu_exit(&mut self) -> bool {
        if self.state != TourState::PresentingChallenge || !self.inputs.try_lock() {
            tracing::debug!(state = ?self.state, "menu exit rejected");
            return false;
        }
        let answer_count = self
            .current_challenge()
            .map_or(0, |challenge| challenge.answers().len());
        self.gateway.set_input_enabled(false, answer_count);
        self.exit(ExitReason::MenuRequested).await;
        true
    }

    /// Runs a whole tour: loads, then handles inputs until the run exits or
    /// the input channel closes.
    #[tracing::instrument(name = "tour_run", skip_all, fields(run_id = %self.run_id))]
    pub async fn run(
        mut self,
        source: &dyn DescriptionSource,
        resolver: &dyn AssetResolver,
    ) -> RunOutcome {
        if self.start(source, resolver).await.is_ok() {
            self.process_inputs().await;
        }
        self.finish()
    }

    async fn process_inputs(&mut self) {
        while !self.state.is_terminal() {
            match self.inputs.next().await {
                Some(TourInput::AnswerSelected(selected)) => {
                    self.check_answer(selected).await;
                }
                Some(TourInput::MenuExitRequested) => {
                    self.request_menu_exit().await;
                }
                None => {
                    tracing::info!("input channel closed; leaving tour");
                    self.inputs.try_lock();
                    self.exit(ExitReason::InputClosed).await;
                }
            }
        }
    }

    fn finish(self) -> RunOutcome {
        let outcome = RunOutcome {
            run_id: self.run_id,
            reason: self.exit_reason.unwrap_or(ExitReason::InputClosed),
            final_position: self.model.as_ref().map(|_| self.position),
            unresolved_assets: self.unresolved_assets,
            started_at: self.started_at,
            finished_at: self.clock.now(),
        };
        tracing::info!(reason = ?outcome.reason, "tour run finished");
        outcome
    }

    async fn advance_challenge(&mut self, next: RunPosition) {
        let timing = self.config.timing;
        self.gateway.play_fade_out(timing.fast_fade).await;
        self.move_to(next);
        self.present_current();
        self.gateway.play_fade_in(timing.fast_fade).await;
        self.open_for_input();
    }

    async fn advance_location(&mut self, next: RunPosition) {
        let timing = self.config.timing;
        self.state = TourState::AwaitingTransition;
        self.gateway.play_fade_out(timing.slow_fade).await;

        let name = self
            .model
            .as_ref()
            .and_then(|model| model.location(next.location_index))
            .map(|location| location.name().to_owned())
            .unwrap_or_default();
        tracing::info!(location = next.location_index, name = %name, "entering location");
        self.gateway.show_transition_text(&name);
        self.timer.sleep(timing.transition_text_dwell).await;
        self.gateway.hide_transition_text();

        self.move_to(next);
        self.swap_background_audio();
        self.present_current();
        self.gateway.play_fade_in(timing.slow_fade).await;
        self.open_for_input();
    }

    async fn exit(&mut self, reason: ExitReason) {
        debug_assert!(self.inputs.is_locked(), "exit without the answering lock");
        let timing = self.config.timing;
        self.state = TourState::AwaitingTransition;
        self.gateway.play_fade_out(timing.slow_fade).await;
        if self.gateway.has_fade_surface() {
            self.timer.sleep(timing.exit_dwell).await;
        }
        if let Some(movement) = self.movement.as_deref_mut() {
            movement.set_movement_enabled(true);
        }
        self.state = TourState::Exiting;
        self.exit_reason = Some(reason);
        tracing::info!(?reason, position = %self.position, "returning to menu");
        self.gateway.exit_to_menu();
    }

    fn move_to(&mut self, next: RunPosition) {
        debug_assert!(self.inputs.is_locked(), "position changed without the answering lock");
        debug_assert!(
            self.model.as_ref().is_some_and(|model| next.is_valid_in(model)),
            "position {next} is outside the tour"
        );
        self.position = next;
    }

    fn current_challenge(&self) -> Option<&Challenge> {
        self.model
            .as_ref()?
            .location(self.position.location_index)?
            .challenge(self.position.challenge_index)
    }

    fn present_current(&mut self) {
        let challenge = self
            .model
            .as_ref()
            .and_then(|model| model.location(self.position.location_index))
            .and_then(|location| location.challenge(self.position.challenge_index));
        let Some(challenge) = challenge else {
            debug_assert!(false, "no challenge at position {}", self.position);
            tracing::error!(position = %self.position, "no challenge to present");
            return;
        };
        self.gateway.present_challenge(ChallengeView {
            question: challenge.question(),
            answers: challenge.answers(),
            panorama: challenge.panorama(),
            orientation_degrees: challenge.orientation_degrees(),
        });
    }

    fn swap_background_audio(&mut self) {
        let audio = self
            .model
            .as_ref()
            .and_then(|model| model.location(self.position.location_index))
            .and_then(|location| location.audio());
        self.gateway.play_background_audio(audio);
    }

    fn set_feedback(&mut self, selected: usize, answer_count: usize, feedback: FeedbackKind) {
        if selected < answer_count {
            self.gateway.set_answer_feedback(selected, feedback);
        }
    }

    fn open_for_input(&mut self) {
        let answer_count = self
            .current_challenge()
            .map_or(0, |challenge| challenge.answers().len());
        self.state = TourState::PresentingChallenge;
        self.inputs.release();
        self.gateway.set_input_enabled(true, answer_count);
    }
}
