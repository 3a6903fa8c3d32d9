//! Shared test doubles and utilities for the Wayfarer guided-tour engine.

mod clock;
mod gateway;
mod resolver;
mod timer;

pub use clock::FixedClock;
pub use gateway::{GatewayCall, RecordingGateway, RecordingMovementControl};
pub use resolver::{MissingAssetResolver, StaticAssetResolver};
pub use timer::SteppedFrameTimer;
