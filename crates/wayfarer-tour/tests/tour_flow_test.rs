//! Integration tests for whole tour runs driven through the input channel.

mod common;

use common::{HARBOUR_TOUR, SINGLE_CHALLENGE, TourRun, run_script, run_tour};
use wayfarer_content::application::source::{FileDescriptionSource, StaticDescriptionSource};
use wayfarer_core::gateway::FeedbackKind;
use wayfarer_core::input::{Delivery, TourInput};
use wayfarer_core::start::StartParameters;
use wayfarer_test_support::{FixedClock, GatewayCall, RecordingGateway, StaticAssetResolver};
use wayfarer_tour::application::orchestrator::ExitReason;
use wayfarer_tour::domain::config::{CompletionPolicy, TimingConfig, TourConfig};
use wayfarer_tour::domain::position::RunPosition;

fn answer(index: usize) -> TourInput {
    TourInput::AnswerSelected(index)
}

fn present(question: &str, answers: &[&str], panorama: &str, orientation: f32) -> GatewayCall {
    GatewayCall::PresentChallenge {
        question: question.to_owned(),
        answers: answers.iter().map(|answer| (*answer).to_owned()).collect(),
        panorama: Some(panorama.to_owned()),
        orientation_degrees: orientation,
    }
}

fn input_enabled(enabled: bool, active_answer_count: usize) -> GatewayCall {
    GatewayCall::InputEnabled {
        enabled,
        active_answer_count,
    }
}

fn feedback(index: usize, feedback: FeedbackKind) -> GatewayCall {
    GatewayCall::AnswerFeedback { index, feedback }
}

#[tokio::test]
async fn test_single_challenge_tour_wrong_then_right_completes() {
    // Act
    let finished = run_script(SINGLE_CHALLENGE, vec![answer(0), answer(1)]).await;

    // Assert
    let outcome = &finished.outcome;
    assert_eq!(outcome.reason, ExitReason::Completed);
    assert_eq!(outcome.final_position, Some(RunPosition::new(0, 0)));
    assert_eq!(outcome.unresolved_assets, 0);

    let gateway = &finished.gateway;
    assert_eq!(
        gateway.count(|call| *call == feedback(0, FeedbackKind::Incorrect)),
        1
    );
    assert_eq!(
        gateway.count(|call| *call == feedback(1, FeedbackKind::Correct)),
        1
    );
    assert_eq!(gateway.count(|call| *call == GatewayCall::ExitToMenu), 1);
    assert_eq!(gateway.calls().last(), Some(&GatewayCall::ExitToMenu));
    assert_eq!(gateway.presented_questions(), vec!["Q"]);
    assert_eq!(gateway.scripted_deliveries(), &[Delivery::Queued; 2]);
}

#[tokio::test]
async fn test_full_walk_sequences_every_transition() {
    // Arrange
    let timing = TimingConfig::default();

    // Act
    let finished = run_script(HARBOUR_TOUR, vec![answer(1), answer(2), answer(0)]).await;

    // Assert
    assert_eq!(finished.outcome.reason, ExitReason::Completed);
    assert_eq!(finished.outcome.final_position, Some(RunPosition::new(1, 0)));

    let q1 = present(
        "Which year was the lighthouse built?",
        &["1820", "1874"],
        "harbour_01",
        0.0,
    );
    let q2 = present(
        "What colour are the boats?",
        &["Red", "Blue", "Green"],
        "harbour_02",
        90.0,
    );
    let q3 = present("How many bells?", &["Three"], "nave", 0.0);
    assert_eq!(
        finished.gateway.calls(),
        &[
            GatewayCall::BackgroundAudio(Some("gulls".to_owned())),
            q1,
            GatewayCall::FadeIn(timing.entrance_fade),
            input_enabled(true, 2),
            // Next challenge in the same location.
            input_enabled(false, 2),
            feedback(1, FeedbackKind::Correct),
            GatewayCall::FadeOut(timing.fast_fade),
            q2,
            GatewayCall::FadeIn(timing.fast_fade),
            input_enabled(true, 3),
            // Location change.
            input_enabled(false, 3),
            feedback(2, FeedbackKind::Correct),
            GatewayCall::FadeOut(timing.slow_fade),
            GatewayCall::ShowTransitionText("Cathedral".to_owned()),
            GatewayCall::HideTransitionText,
            GatewayCall::BackgroundAudio(Some("bells".to_owned())),
            q3,
            GatewayCall::FadeIn(timing.slow_fade),
            input_enabled(true, 1),
            // Completion.
            input_enabled(false, 1),
            feedback(0, FeedbackKind::Correct),
            GatewayCall::FadeOut(timing.slow_fade),
            GatewayCall::ExitToMenu,
        ]
    );
    assert_eq!(
        finished.timer.sleeps(),
        vec![
            timing.feedback_delay,
            timing.feedback_delay,
            timing.transition_text_dwell,
            timing.feedback_delay,
            timing.exit_dwell,
        ]
    );
}

#[tokio::test]
async fn test_incorrect_answers_never_move_the_run() {
    // Act
    let finished = run_script(
        HARBOUR_TOUR,
        vec![answer(0), answer(0), answer(1), answer(0), answer(1)],
    )
    .await;

    // Assert
    let outcome = &finished.outcome;
    assert_eq!(outcome.reason, ExitReason::InputClosed);
    assert_eq!(outcome.final_position, Some(RunPosition::new(0, 1)));
    assert_eq!(
        finished.gateway.presented_questions(),
        vec![
            "Which year was the lighthouse built?",
            "What colour are the boats?"
        ]
    );
    let incorrect = finished.gateway.count(|call| {
        matches!(
            call,
            GatewayCall::AnswerFeedback {
                feedback: FeedbackKind::Incorrect,
                ..
            }
        )
    });
    assert_eq!(incorrect, 4);
    assert_eq!(
        finished
            .gateway
            .count(|call| matches!(call, GatewayCall::ShowTransitionText(_))),
        0
    );
}

#[tokio::test]
async fn test_inputs_during_fades_are_dropped() {
    // Act
    let finished = run_tour(TourRun::yaml(HARBOUR_TOUR), |handle| {
        RecordingGateway::new()
            .with_input(handle, vec![answer(1), answer(2), answer(0)])
            .with_fade_injection(answer(1))
            .with_fade_injection(TourInput::MenuExitRequested)
    })
    .await;

    // Assert
    let gateway = &finished.gateway;
    assert_eq!(finished.outcome.reason, ExitReason::Completed);
    assert!(!gateway.injected_deliveries().is_empty());
    assert!(
        gateway
            .injected_deliveries()
            .iter()
            .all(|delivery| *delivery == Delivery::Locked)
    );
    assert_eq!(gateway.scripted_deliveries(), &[Delivery::Queued; 3]);
    assert_eq!(gateway.presented_questions().len(), 3);
    assert_eq!(gateway.count(|call| *call == GatewayCall::ExitToMenu), 1);
}

#[tokio::test]
async fn test_inputs_during_answer_feedback_are_dropped() {
    // Arrange
    let timing = TimingConfig::default();

    // Act
    let finished = run_tour(TourRun::yaml(HARBOUR_TOUR), |handle| {
        RecordingGateway::new()
            .with_input(handle, vec![answer(0), TourInput::MenuExitRequested])
            .with_feedback_injection(answer(1))
            .with_feedback_injection(TourInput::MenuExitRequested)
    })
    .await;

    // Assert
    let gateway = &finished.gateway;
    assert_eq!(finished.outcome.reason, ExitReason::MenuRequested);
    assert_eq!(finished.outcome.final_position, Some(RunPosition::new(0, 0)));
    // Two inputs for each of the incorrect and reset feedback calls.
    assert_eq!(gateway.injected_deliveries(), &[Delivery::Locked; 4]);
    assert_eq!(gateway.scripted_deliveries(), &[Delivery::Queued; 2]);
    assert_eq!(gateway.presented_questions().len(), 1);
    assert_eq!(
        gateway.count(|call| *call == feedback(0, FeedbackKind::Incorrect)),
        1
    );
    assert_eq!(
        gateway.count(|call| *call == feedback(1, FeedbackKind::Correct)),
        0
    );
    assert_eq!(gateway.count(|call| *call == GatewayCall::ExitToMenu), 1);
    assert_eq!(
        finished.timer.sleeps(),
        vec![timing.feedback_delay, timing.exit_dwell]
    );
}

#[tokio::test]
async fn test_unresolved_panorama_still_presents_challenge() {
    // Arrange
    let run = TourRun {
        resolver: StaticAssetResolver::new().with_missing("harbour_01"),
        ..TourRun::yaml(HARBOUR_TOUR)
    };

    // Act
    let finished = run_tour(run, |handle| {
        RecordingGateway::new().with_input(handle, vec![TourInput::MenuExitRequested])
    })
    .await;

    // Assert
    assert_eq!(finished.outcome.unresolved_assets, 1);
    assert_eq!(finished.outcome.reason, ExitReason::MenuRequested);
    let first = finished
        .gateway
        .calls()
        .iter()
        .find(|call| matches!(call, GatewayCall::PresentChallenge { .. }))
        .cloned();
    assert!(matches!(
        first,
        Some(GatewayCall::PresentChallenge { panorama: None, .. })
    ));
}

#[tokio::test]
async fn test_content_changes_only_behind_opaque_overlay() {
    let finished = run_script(HARBOUR_TOUR, vec![answer(1), answer(2), answer(0)]).await;

    let gateway = &finished.gateway;
    assert_eq!(gateway.opacity_at_present().len(), 3);
    assert!(
        gateway
            .opacity_at_present()
            .iter()
            .all(|opacity| (*opacity - 1.0).abs() < f32::EPSILON)
    );
    assert_eq!(gateway.overlay_opacity(), Some(1.0));
    assert!(gateway.fade_frames().iter().all(|frames| *frames > 0));
}

#[tokio::test]
async fn test_missing_fade_surface_skips_exit_dwell() {
    // Arrange
    let timing = TimingConfig::default();

    // Act
    let finished = run_tour(TourRun::yaml(SINGLE_CHALLENGE), |handle| {
        RecordingGateway::without_fade_surface().with_input(handle, vec![answer(1)])
    })
    .await;

    // Assert
    assert_eq!(finished.outcome.reason, ExitReason::Completed);
    assert_eq!(finished.timer.sleeps(), vec![timing.feedback_delay]);
    assert!(finished.gateway.opacity_at_present().is_empty());
    assert!(finished.gateway.fade_frames().iter().all(|frames| *frames == 0));
    assert_eq!(finished.gateway.overlay_opacity(), None);
}

#[tokio::test]
async fn test_movement_is_locked_for_the_whole_run() {
    let finished = run_script(SINGLE_CHALLENGE, vec![answer(1)]).await;

    assert_eq!(finished.movement.history(), &[false, true]);
}

#[tokio::test]
async fn test_menu_exit_leaves_without_feedback() {
    // Act
    let finished = run_script(HARBOUR_TOUR, vec![TourInput::MenuExitRequested]).await;

    // Assert
    assert_eq!(finished.outcome.reason, ExitReason::MenuRequested);
    assert_eq!(finished.outcome.final_position, Some(RunPosition::new(0, 0)));
    assert_eq!(
        finished
            .gateway
            .count(|call| matches!(call, GatewayCall::AnswerFeedback { .. })),
        0
    );
    assert_eq!(finished.gateway.calls().last(), Some(&GatewayCall::ExitToMenu));
    assert_eq!(finished.movement.history(), &[false, true]);
}

#[tokio::test]
async fn test_start_parameters_select_the_first_location() {
    // Arrange
    let run = TourRun {
        start: StartParameters::new(1),
        ..TourRun::yaml(HARBOUR_TOUR)
    };

    // Act
    let finished = run_tour(run, |handle| {
        RecordingGateway::new().with_input(handle, vec![TourInput::MenuExitRequested])
    })
    .await;

    // Assert
    assert_eq!(finished.outcome.final_position, Some(RunPosition::new(1, 0)));
    assert_eq!(
        finished.gateway.calls()[0],
        GatewayCall::BackgroundAudio(Some("bells".to_owned()))
    );
    assert_eq!(
        finished.gateway.presented_questions(),
        vec!["How many bells?"]
    );
}

#[tokio::test]
async fn test_out_of_range_start_parameters_fall_back_to_first_location() {
    let run = TourRun {
        start: StartParameters::new(42),
        ..TourRun::yaml(HARBOUR_TOUR)
    };

    let finished = run_tour(run, |handle| {
        RecordingGateway::new().with_input(handle, vec![TourInput::MenuExitRequested])
    })
    .await;

    assert_eq!(finished.outcome.final_position, Some(RunPosition::new(0, 0)));
}

#[tokio::test]
async fn test_malformed_content_returns_to_menu_immediately() {
    // Arrange
    let run = TourRun {
        source: Box::new(StaticDescriptionSource::yaml("locations: [")),
        ..TourRun::yaml(HARBOUR_TOUR)
    };

    // Act
    let finished = run_tour(run, |handle| {
        RecordingGateway::new().with_input(handle, vec![answer(0)])
    })
    .await;

    // Assert
    assert_eq!(finished.outcome.reason, ExitReason::LoadFailed);
    assert_eq!(finished.outcome.final_position, None);
    assert_eq!(finished.gateway.calls(), &[GatewayCall::ExitToMenu]);
    assert!(finished.gateway.scripted_deliveries().is_empty());
    assert!(finished.movement.history().is_empty());
}

#[tokio::test]
async fn test_missing_description_file_returns_to_menu() {
    let run = TourRun {
        source: Box::new(FileDescriptionSource::new(
            "/nonexistent/wayfarer/tour.yaml",
        )),
        ..TourRun::yaml(HARBOUR_TOUR)
    };

    let finished = run_tour(run, |_handle| RecordingGateway::new()).await;

    assert_eq!(finished.outcome.reason, ExitReason::LoadFailed);
    assert_eq!(finished.gateway.calls(), &[GatewayCall::ExitToMenu]);
}

#[tokio::test]
async fn test_closing_the_input_channel_exits_the_run() {
    let finished = run_tour(TourRun::yaml(HARBOUR_TOUR), |_handle| {
        RecordingGateway::new()
    })
    .await;

    assert_eq!(finished.outcome.reason, ExitReason::InputClosed);
    assert_eq!(finished.gateway.count(|call| *call == GatewayCall::ExitToMenu), 1);
    assert_eq!(finished.movement.history(), &[false, true]);
}

#[tokio::test]
async fn test_loop_policy_wraps_back_to_the_first_location() {
    // Arrange
    let run = TourRun {
        config: TourConfig {
            completion: CompletionPolicy::LoopToStart,
            ..TourConfig::default()
        },
        ..TourRun::yaml(SINGLE_CHALLENGE)
    };

    // Act
    let finished = run_tour(run, |handle| {
        RecordingGateway::new().with_input(handle, vec![answer(1), answer(1)])
    })
    .await;

    // Assert
    assert_eq!(finished.outcome.reason, ExitReason::InputClosed);
    assert_eq!(finished.gateway.presented_questions(), vec!["Q", "Q", "Q"]);
    assert_eq!(
        finished
            .gateway
            .count(|call| *call == GatewayCall::ShowTransitionText("Square".to_owned())),
        2
    );
}

#[tokio::test]
async fn test_run_outcome_carries_identity_and_timestamps() {
    let finished = run_script(SINGLE_CHALLENGE, vec![answer(1)]).await;

    let outcome = &finished.outcome;
    assert!(!outcome.run_id.is_nil());
    assert_eq!(outcome.started_at, FixedClock::standard().0);
    assert_eq!(outcome.finished_at, FixedClock::standard().0);
}
