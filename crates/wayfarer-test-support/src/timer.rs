//! Test timer — a `FrameTimer` that advances simulated time without sleeping.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use wayfarer_core::clock::FrameTimer;

/// A frame timer whose frames last exactly `step` and whose sleeps return
/// at once. Every wait is recorded so tests can check the timing sequence.
#[derive(Debug)]
pub struct SteppedFrameTimer {
    step: Duration,
    frames: Mutex<u32>,
    sleeps: Mutex<Vec<Duration>>,
    elapsed: Mutex<Duration>,
}

impl SteppedFrameTimer {
    /// Creates a timer with the given frame length. A zero step is bumped to
    /// one millisecond so fades always terminate.
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_millis(1)),
            frames: Mutex::new(0),
            sleeps: Mutex::new(Vec::new()),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// A timer stepping at 60 frames per second.
    #[must_use]
    pub fn sixty_fps() -> Self {
        Self::new(Duration::from_secs(1) / 60)
    }

    /// Number of frames waited so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn frames(&self) -> u32 {
        *self.frames.lock().unwrap()
    }

    /// Every `sleep` duration requested, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Total simulated time spent in frames and sleeps.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }
}

impl Default for SteppedFrameTimer {
    fn default() -> Self {
        Self::sixty_fps()
    }
}

#[async_trait]
impl FrameTimer for SteppedFrameTimer {
    async fn next_frame(&self) -> Duration {
        *self.frames.lock().unwrap() += 1;
        *self.elapsed.lock().unwrap() += self.step;
        tokio::task::yield_now().await;
        self.step
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.elapsed.lock().unwrap() += duration;
        tokio::task::yield_now().await;
    }
}
