//! Wayfarer terminal runner entry point.
//!
//! `wayfarer` plays the configured tour in the terminal; `wayfarer check`
//! loads it and reports every asset that does not resolve.

use std::error::Error;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use wayfarer_cli::config::{CliConfig, LogFormat, load_tour_config};
use wayfarer_cli::console::{
    AnswerSlots, ConsoleGateway, render_outcome, render_report, spawn_stdin_reader,
};
use wayfarer_cli::error::AppError;
use wayfarer_content::application::loader::load_from_source;
use wayfarer_content::application::resolver::FsAssetResolver;
use wayfarer_content::application::source::FileDescriptionSource;
use wayfarer_core::clock::{SystemClock, TokioFrameTimer};
use wayfarer_core::input::input_channel;
use wayfarer_core::start::StartParameters;
use wayfarer_tour::application::orchestrator::{Collaborators, ExitReason, Orchestrator};

const INPUT_CAPACITY: usize = 16;

fn main() -> Result<ExitCode, Box<dyn Error>> {
    init_tracing(LogFormat::from_env());

    let config = CliConfig::from_env()?;
    let check_only = std::env::args().nth(1).as_deref() == Some("check");

    // Single-threaded: the tour runs on one cooperative task.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::from)?;

    let result = if check_only {
        runtime.block_on(check(&config))
    } else {
        runtime.block_on(play(&config))
    };

    // The stdin reader blocks on a read that cannot be cancelled.
    runtime.shutdown_background();
    Ok(result?)
}

fn init_tracing(format: LogFormat) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}

async fn check(config: &CliConfig) -> Result<ExitCode, AppError> {
    let source = FileDescriptionSource::new(&config.description);
    let resolver = FsAssetResolver::new(&config.asset_root);
    let report = load_from_source(&source, &resolver).await?;

    println!("{}", render_report(&report));
    Ok(if report.warnings.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

async fn play(config: &CliConfig) -> Result<ExitCode, AppError> {
    let tour_config = load_tour_config(config.tour_config.as_deref()).await?;

    let (handle, queue) = input_channel(INPUT_CAPACITY);
    let slots = AnswerSlots::default();
    let reader = spawn_stdin_reader(handle, slots.clone());

    let timer = TokioFrameTimer::new(config.frame_rate);
    let clock = SystemClock;
    let mut gateway = ConsoleGateway::new(
        std::io::stdout(),
        TokioFrameTimer::new(config.frame_rate),
        slots,
        config.fade,
    );

    tracing::info!(
        description = %config.description.display(),
        asset_root = %config.asset_root.display(),
        start_index = config.start_index,
        "starting tour"
    );

    let orchestrator = Orchestrator::new(
        Collaborators {
            gateway: &mut gateway,
            timer: &timer,
            clock: &clock,
            movement: None,
        },
        StartParameters::new(config.start_index),
        tour_config,
        queue,
    );
    let source = FileDescriptionSource::new(&config.description);
    let resolver = FsAssetResolver::new(&config.asset_root);
    let outcome = orchestrator.run(&source, &resolver).await;
    reader.abort();

    println!("{}", render_outcome(&outcome));
    Ok(if outcome.reason == ExitReason::LoadFailed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
