//! Playback pacing.
//!
//! There is no audio clock to follow, so frames are shown at a fixed
//! interval derived from the stream's average frame rate. [`FramePacer`]
//! keeps the deadline of the next frame and tells the display loop whether
//! a frame is due and how long to sleep otherwise.

use std::time::{Duration, Instant};

/// Frame rate assumed when the stream does not declare one.
pub const FALLBACK_FRAMES_PER_SECOND: f64 = 25.0;

/// Delay between two frames at `frames_per_second`.
///
/// Non-finite or non-positive rates use [`FALLBACK_FRAMES_PER_SECOND`].
pub fn frame_delay(frames_per_second: f64) -> Duration {
    let rate = if frames_per_second.is_finite() && frames_per_second > 0.0 {
        frames_per_second
    } else {
        FALLBACK_FRAMES_PER_SECOND
    };
    Duration::from_secs_f64(1.0 / rate)
}

/// Schedules frames at a fixed interval.
#[derive(Debug, Clone)]
pub struct FramePacer {
    delay: Duration,
    next_deadline: Option<Instant>,
}

impl FramePacer {
    /// Pace frames at `frames_per_second` (see [`frame_delay`] for fallbacks).
    pub fn new(frames_per_second: f64) -> Self {
        Self {
            delay: frame_delay(frames_per_second),
            next_deadline: None,
        }
    }

    /// Interval between frames.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the next frame should be shown at `now`. The first frame is
    /// always due.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_deadline.is_none_or(|deadline| now >= deadline)
    }

    /// Time left until the next frame is due, zero if it already is.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Record that a frame was shown at `now` and schedule the next one.
    ///
    /// The next deadline counts from the previous one so slow repaints do
    /// not accumulate drift, but it never falls behind `now` by more than one
    /// interval, so a stall does not trigger a burst of catch-up frames.
    pub fn frame_shown(&mut self, now: Instant) {
        let base = match self.next_deadline {
            Some(deadline) if now.saturating_duration_since(deadline) < self.delay => deadline,
            _ => now,
        };
        self.next_deadline = Some(base + self.delay);
    }
}
