//! Shared helpers for tour flow integration tests.
#![allow(dead_code)]

use wayfarer_content::application::source::{DescriptionSource, StaticDescriptionSource};
use wayfarer_core::input::{InputHandle, TourInput, input_channel};
use wayfarer_core::start::StartParameters;
use wayfarer_test_support::{
    FixedClock, RecordingGateway, RecordingMovementControl, StaticAssetResolver,
    SteppedFrameTimer,
};
use wayfarer_tour::application::orchestrator::{Collaborators, Orchestrator, RunOutcome};
use wayfarer_tour::domain::config::TourConfig;

/// Two locations: "Old Harbour" with two challenges, "Cathedral" with one.
pub const HARBOUR_TOUR: &str = r#"
locations:
  - name: "Old Harbour"
    audio: "gulls"
    challenges:
      - panorama: "harbour_01"
        question: "Which year was the lighthouse built?"
        answers: ["1820", "1874"]
        correct_answer: 1
      - panorama: "harbour_02"
        orientation: 90.0
        question: "What colour are the boats?"
        answers: ["Red", "Blue", "Green"]
        correct_answer: 2
  - name: "Cathedral"
    audio: "bells"
    challenges:
      - panorama: "nave"
        question: "How many bells?"
        answers: ["Three"]
        correct_answer: 0
"#;

/// One location with one two-answer challenge; answer 1 is correct.
pub const SINGLE_CHALLENGE: &str = r#"
locations:
  - name: "Square"
    challenges:
      - panorama: "square"
        question: "Q"
        answers: ["A", "B"]
        correct_answer: 1
"#;

/// Every collaborator of a finished run, for inspection.
pub struct Finished {
    pub outcome: RunOutcome,
    pub gateway: RecordingGateway,
    pub movement: RecordingMovementControl,
    pub timer: SteppedFrameTimer,
}

/// Knobs for [`run_tour`].
pub struct TourRun {
    pub source: Box<dyn DescriptionSource>,
    pub resolver: StaticAssetResolver,
    pub start: StartParameters,
    pub config: TourConfig,
}

impl TourRun {
    /// A run of `yaml` with default timing, start index and resolver.
    pub fn yaml(yaml: &str) -> Self {
        Self {
            source: Box::new(StaticDescriptionSource::yaml(yaml)),
            resolver: StaticAssetResolver::new(),
            start: StartParameters::default(),
            config: TourConfig::default(),
        }
    }
}

/// Runs a tour to completion. `gateway` receives the input handle and builds
/// the gateway that will play the user's part.
pub async fn run_tour(
    run: TourRun,
    gateway: impl FnOnce(InputHandle) -> RecordingGateway,
) -> Finished {
    let (handle, queue) = input_channel(16);
    let mut gateway = gateway(handle);
    let mut movement = RecordingMovementControl::new();
    let timer = SteppedFrameTimer::sixty_fps();
    let clock = FixedClock::standard();

    let orchestrator = Orchestrator::new(
        Collaborators {
            gateway: &mut gateway,
            timer: &timer,
            clock: &clock,
            movement: Some(&mut movement),
        },
        run.start,
        run.config,
        queue,
    );
    let outcome = orchestrator
        .run(run.source.as_ref(), &run.resolver)
        .await;

    Finished {
        outcome,
        gateway,
        movement,
        timer,
    }
}

/// Runs `yaml` with default settings, answering with `script`.
pub async fn run_script(yaml: &str, script: Vec<TourInput>) -> Finished {
    run_tour(TourRun::yaml(yaml), |handle| {
        RecordingGateway::new().with_input(handle, script)
    })
    .await
}
