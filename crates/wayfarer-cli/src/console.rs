//! Console presentation: a gateway that draws the tour as text and the
//! stdin pump that turns typed lines into tour inputs.

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use wayfarer_content::application::loader::LoadReport;
use wayfarer_core::asset::AssetHandle;
use wayfarer_core::clock::FrameTimer;
use wayfarer_core::effects::{FadeDirection, FadeSurface, run_fade};
use wayfarer_core::gateway::{ChallengeView, FeedbackKind, PresentationGateway};
use wayfarer_core::input::{Delivery, InputHandle, TourInput};
use wayfarer_tour::application::orchestrator::{ExitReason, RunOutcome};

/// Number of answer slots currently accepting input, shared between the
/// gateway and the stdin pump.
#[derive(Debug, Clone, Default)]
pub struct AnswerSlots(Arc<AtomicUsize>);

impl AnswerSlots {
    /// Number of active slots; zero while input is disabled.
    #[must_use]
    pub fn active(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, active: usize) {
        self.0.store(active, Ordering::SeqCst);
    }
}

/// A typed line that is not a tour input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Nothing was typed.
    #[error("type an answer number or 'q'")]
    Empty,
    /// Neither a number nor a known command.
    #[error("unknown command '{0}'")]
    Unknown(String),
    /// A number with no answer slot behind it.
    #[error("no answer {choice}; {active} answers are open")]
    NoSuchAnswer {
        /// The number typed, one-based.
        choice: usize,
        /// Answer slots open at the time.
        active: usize,
    },
}

/// Maps a typed line to a tour input. Answers are numbered from one; `q`
/// leaves the tour.
///
/// # Errors
///
/// Returns a `CommandError` describing why the line is not an input.
pub fn parse_command(line: &str, active: usize) -> Result<TourInput, CommandError> {
    let command = line.trim();
    if command.is_empty() {
        return Err(CommandError::Empty);
    }
    if command.eq_ignore_ascii_case("q") || command.eq_ignore_ascii_case("quit") {
        return Ok(TourInput::MenuExitRequested);
    }
    let choice: usize = command
        .parse()
        .map_err(|_| CommandError::Unknown(command.to_owned()))?;
    if choice == 0 || choice > active {
        return Err(CommandError::NoSuchAnswer { choice, active });
    }
    Ok(TourInput::AnswerSelected(choice - 1))
}

/// Forwards every line of `reader` to `handle` until the reader ends or the
/// tour stops listening.
pub async fn forward_lines<R>(reader: R, handle: InputHandle, slots: AnswerSlots)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(%error, "failed to read input");
                break;
            }
        };
        match parse_command(&line, slots.active()) {
            Ok(input) => match handle.send(input) {
                Delivery::Closed => break,
                delivery => tracing::debug!(?input, ?delivery, "input forwarded"),
            },
            Err(error) => tracing::debug!(%error, "line ignored"),
        }
    }
    tracing::debug!("input pump stopped");
}

/// Spawns the task that reads answers from standard input.
#[must_use]
pub fn spawn_stdin_reader(handle: InputHandle, slots: AnswerSlots) -> JoinHandle<()> {
    tokio::spawn(forward_lines(
        BufReader::new(tokio::io::stdin()),
        handle,
        slots,
    ))
}

#[derive(Debug)]
struct ConsoleOverlay {
    opacity: f32,
}

impl FadeSurface for ConsoleOverlay {
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// Draws a tour as plain text on `out`.
pub struct ConsoleGateway<W, T> {
    out: W,
    timer: T,
    overlay: Option<ConsoleOverlay>,
    slots: AnswerSlots,
    answers: Vec<String>,
}

impl<W, T> ConsoleGateway<W, T>
where
    W: Write + Send,
    T: FrameTimer,
{
    /// Creates a gateway. With `fade` set, fades are stepped on `timer`
    /// over an overlay that starts opaque.
    #[must_use]
    pub fn new(out: W, timer: T, slots: AnswerSlots, fade: bool) -> Self {
        Self {
            out,
            timer,
            overlay: fade.then_some(ConsoleOverlay { opacity: 1.0 }),
            slots,
            answers: Vec::new(),
        }
    }

    /// Gives back the output sink.
    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(error) = writeln!(self.out, "{args}").and_then(|()| self.out.flush()) {
            tracing::warn!(%error, "console write failed");
        }
    }

    async fn fade(&mut self, direction: FadeDirection, duration: Duration) {
        let surface = self
            .overlay
            .as_mut()
            .map(|overlay| overlay as &mut dyn FadeSurface);
        let frames = run_fade(surface, &self.timer, direction, duration).await;
        tracing::debug!(?direction, frames, "console fade");
    }
}

#[async_trait]
impl<W, T> PresentationGateway for ConsoleGateway<W, T>
where
    W: Write + Send,
    T: FrameTimer,
{
    fn present_challenge(&mut self, view: ChallengeView<'_>) {
        self.answers = view.answers.to_vec();
        self.line(format_args!(""));
        match view.panorama {
            Some(panorama) => self.line(format_args!(
                "[{} facing {:.0} degrees]",
                panorama.uri, view.orientation_degrees
            )),
            None => self.line(format_args!("[no panorama]")),
        }
        self.line(format_args!("{}", view.question));
        for (number, answer) in view.answers.iter().enumerate() {
            self.line(format_args!("  {}) {answer}", number + 1));
        }
    }

    fn set_answer_feedback(&mut self, index: usize, feedback: FeedbackKind) {
        let answer = self.answers.get(index).cloned().unwrap_or_default();
        match feedback {
            FeedbackKind::Correct => self.line(format_args!("  + {answer}: correct!")),
            FeedbackKind::Incorrect => self.line(format_args!("  - {answer}: not quite.")),
            FeedbackKind::Normal => {}
        }
    }

    fn set_input_enabled(&mut self, enabled: bool, active_answer_count: usize) {
        if enabled {
            self.slots.set(active_answer_count);
            self.line(format_args!(
                "Choose 1-{active_answer_count}, or q to leave:"
            ));
        } else {
            self.slots.set(0);
        }
    }

    async fn play_fade_out(&mut self, duration: Duration) {
        self.fade(FadeDirection::Out, duration).await;
        if self.overlay.is_some() {
            self.line(format_args!("  . . ."));
        }
    }

    async fn play_fade_in(&mut self, duration: Duration) {
        self.fade(FadeDirection::In, duration).await;
    }

    fn has_fade_surface(&self) -> bool {
        self.overlay.is_some()
    }

    fn show_transition_text(&mut self, next_location_name: &str) {
        self.line(format_args!(""));
        self.line(format_args!("Next destination: {next_location_name}"));
    }

    fn hide_transition_text(&mut self) {}

    fn play_background_audio(&mut self, audio: Option<&AssetHandle>) {
        match audio {
            Some(audio) => self.line(format_args!("(now playing {})", audio.uri)),
            None => tracing::debug!("background audio silenced"),
        }
    }

    fn exit_to_menu(&mut self) {
        self.slots.set(0);
        self.line(format_args!("Returning to the menu."));
    }
}

/// Summarizes a finished run for the terminal.
#[must_use]
pub fn render_outcome(outcome: &RunOutcome) -> String {
    let ending = match outcome.reason {
        ExitReason::Completed => "Tour complete.",
        ExitReason::MenuRequested => "Tour left early.",
        ExitReason::InputClosed => "Input closed; tour ended.",
        ExitReason::LoadFailed => "The tour could not be loaded.",
    };
    let mut text = ending.to_owned();
    if let Some(position) = outcome.final_position {
        text.push_str(&format!(" Last position: {position}."));
    }
    if outcome.unresolved_assets > 0 {
        text.push_str(&format!(
            " {} asset(s) were missing.",
            outcome.unresolved_assets
        ));
    }
    text
}

/// Describes a loaded tour and every asset that did not resolve.
#[must_use]
pub fn render_report(report: &LoadReport) -> String {
    let model = &report.model;
    let challenges: usize = model
        .locations()
        .iter()
        .map(|location| location.challenges().len())
        .sum();
    let mut lines = vec![format!(
        "{} location(s), {challenges} challenge(s), version {}",
        model.len(),
        model.version_hash()
    )];
    for location in model.locations() {
        lines.push(format!(
            "  {} ({} challenge(s))",
            location.name(),
            location.challenges().len()
        ));
    }
    if report.warnings.is_empty() {
        lines.push("all assets resolved".to_owned());
    } else {
        lines.extend(report.warnings.iter().map(|warning| format!("warning: {warning}")));
    }
    lines.join("\n")
}
