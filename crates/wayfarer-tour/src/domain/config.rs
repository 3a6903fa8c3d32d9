//! Tour configuration: effect timings and completion policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Durations of every timed effect in a run.
///
/// Serialized as fractional seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Fade-in before the very first challenge.
    #[serde(with = "seconds")]
    pub entrance_fade: Duration,
    /// Fades around a location change and the exit fade.
    #[serde(with = "seconds")]
    pub slow_fade: Duration,
    /// Fades around a challenge change within a location.
    #[serde(with = "seconds")]
    pub fast_fade: Duration,
    /// How long the "next destination" text stays up.
    #[serde(with = "seconds")]
    pub transition_text_dwell: Duration,
    /// How long answer feedback stays visible.
    #[serde(with = "seconds")]
    pub feedback_delay: Duration,
    /// Pause on the faded-out screen before returning to the menu.
    #[serde(with = "seconds")]
    pub exit_dwell: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            entrance_fade: Duration::from_secs(3),
            slow_fade: Duration::from_millis(1500),
            fast_fade: Duration::from_millis(500),
            transition_text_dwell: Duration::from_secs(3),
            feedback_delay: Duration::from_secs(1),
            exit_dwell: Duration::from_millis(500),
        }
    }
}

impl TimingConfig {
    /// Every duration set to zero. Handy for headless runs.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            entrance_fade: Duration::ZERO,
            slow_fade: Duration::ZERO,
            fast_fade: Duration::ZERO,
            transition_text_dwell: Duration::ZERO,
            feedback_delay: Duration::ZERO,
            exit_dwell: Duration::ZERO,
        }
    }
}

/// What happens after the last challenge of the last location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Return to the menu.
    #[default]
    ExitToMenu,
    /// Wrap around to the first location.
    LoopToStart,
}

/// Complete orchestrator configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TourConfig {
    /// Effect timings.
    pub timing: TimingConfig,
    /// Behavior after the final challenge.
    pub completion: CompletionPolicy,
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
