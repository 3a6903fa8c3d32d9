//! Frame-stepped visual effects.
//!
//! A fade drives the opacity of an overlay surface once per frame until the
//! configured duration has elapsed. The overlay is opaque (`1.0`) when the
//! screen is faded out and transparent (`0.0`) when content is visible.

use std::time::Duration;

use crate::clock::FrameTimer;

/// An overlay whose opacity can be driven by a fade.
pub trait FadeSurface: Send {
    /// Sets the overlay opacity in `[0.0, 1.0]`.
    fn set_opacity(&mut self, opacity: f32);

    /// Returns the current overlay opacity.
    fn opacity(&self) -> f32;
}

/// Direction of a fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Covers the content: overlay goes to fully opaque.
    Out,
    /// Reveals the content: overlay goes to fully transparent.
    In,
}

impl FadeDirection {
    /// Returns the overlay opacity this fade ends at.
    #[must_use]
    pub fn target_opacity(self) -> f32 {
        match self {
            Self::Out => 1.0,
            Self::In => 0.0,
        }
    }
}

/// Runs a fade on `surface`, suspending once per frame.
///
/// Returns the number of frames rendered. Without a surface the fade is a
/// no-op and returns immediately. The surface always finishes exactly at the
/// target opacity, so a fade never leaves the overlay half-applied.
pub async fn run_fade(
    surface: Option<&mut dyn FadeSurface>,
    timer: &dyn FrameTimer,
    direction: FadeDirection,
    duration: Duration,
) -> u32 {
    let Some(surface) = surface else {
        return 0;
    };

    let target = direction.target_opacity();
    let start = surface.opacity();
    let total = duration.as_secs_f32();
    let mut elapsed = Duration::ZERO;
    let mut frames: u32 = 0;

    while elapsed < duration {
        elapsed += timer.next_frame().await;
        frames = frames.saturating_add(1);
        let progress = (elapsed.as_secs_f32() / total).min(1.0);
        surface.set_opacity(start + (target - start) * progress);
    }

    surface.set_opacity(target);
    tracing::trace!(?direction, frames, "fade finished");
    frames
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct Overlay {
        opacity: f32,
        history: Vec<f32>,
    }

    impl FadeSurface for Overlay {
        fn set_opacity(&mut self, opacity: f32) {
            self.opacity = opacity;
            self.history.push(opacity);
        }

        fn opacity(&self) -> f32 {
            self.opacity
        }
    }

    struct StepTimer {
        step: Duration,
        frames: Mutex<u32>,
    }

    #[async_trait]
    impl FrameTimer for StepTimer {
        async fn next_frame(&self) -> Duration {
            *self.frames.lock().unwrap() += 1;
            self.step
        }

        async fn sleep(&self, _duration: Duration) {}
    }

    fn timer(step_ms: u64) -> StepTimer {
        StepTimer {
            step: Duration::from_millis(step_ms),
            frames: Mutex::new(0),
        }
    }

    #[tokio::test]
    async fn test_run_fade_out_steps_once_per_frame_and_lands_on_opaque() {
        // Arrange
        let mut overlay = Overlay {
            opacity: 0.0,
            history: Vec::new(),
        };
        let timer = timer(250);

        // Act
        let frames = run_fade(
            Some(&mut overlay),
            &timer,
            FadeDirection::Out,
            Duration::from_secs(1),
        )
        .await;

        // Assert
        assert_eq!(frames, 4);
        assert_eq!(*timer.frames.lock().unwrap(), 4);
        assert!((overlay.opacity - 1.0).abs() < f32::EPSILON);
        assert!(overlay.history.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_run_fade_in_lands_on_transparent_even_when_frames_overshoot() {
        // Arrange
        let mut overlay = Overlay {
            opacity: 1.0,
            history: Vec::new(),
        };
        let timer = timer(300);

        // Act
        let frames = run_fade(
            Some(&mut overlay),
            &timer,
            FadeDirection::In,
            Duration::from_secs(1),
        )
        .await;

        // Assert
        assert_eq!(frames, 4);
        assert!(overlay.opacity.abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_run_fade_without_surface_returns_immediately() {
        let timer = timer(16);

        let frames = run_fade(None, &timer, FadeDirection::Out, Duration::from_secs(5)).await;

        assert_eq!(frames, 0);
        assert_eq!(*timer.frames.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_fade_with_zero_duration_snaps_to_target() {
        let mut overlay = Overlay {
            opacity: 0.0,
            history: Vec::new(),
        };
        let timer = timer(16);

        let frames = run_fade(Some(&mut overlay), &timer, FadeDirection::Out, Duration::ZERO).await;

        assert_eq!(frames, 0);
        assert_eq!(overlay.history, vec![1.0]);
    }
}
