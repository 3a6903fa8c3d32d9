//! Clock and frame timer abstractions for determinism.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of frame ticks and timed waits.
///
/// Every timed effect in a tour suspends through this trait, so tests can
/// substitute a timer that advances simulated time without sleeping.
#[async_trait]
pub trait FrameTimer: Send + Sync {
    /// Suspends until the next frame and returns the time elapsed since the
    /// previous one.
    async fn next_frame(&self) -> Duration;

    /// Suspends for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Frame timer backed by `tokio::time`.
#[derive(Debug, Clone, Copy)]
pub struct TokioFrameTimer {
    frame: Duration,
}

impl TokioFrameTimer {
    /// Creates a timer ticking at `frames_per_second`. A rate of zero is
    /// treated as one frame per second.
    #[must_use]
    pub fn new(frames_per_second: u32) -> Self {
        Self {
            frame: Duration::from_secs(1) / frames_per_second.max(1),
        }
    }

    /// Returns the nominal frame length.
    #[must_use]
    pub fn frame_length(&self) -> Duration {
        self.frame
    }
}

#[async_trait]
impl FrameTimer for TokioFrameTimer {
    async fn next_frame(&self) -> Duration {
        let started = tokio::time::Instant::now();
        tokio::time::sleep(self.frame).await;
        started.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
