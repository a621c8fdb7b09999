//! Animation timing.
//!
//! The clock accumulates speed-scaled time instead of keeping a fixed
//! start timestamp, which gives three properties the render loop relies
//! on: `speed = 0` freezes the phase, resuming after a visibility pause
//! does not jump forward by the hidden wall-clock time, and mid-run
//! speed changes stay continuous.

use std::time::{Duration, Instant};

use crate::config::RenderPolicy;

/// Speed-scaled elapsed-time source for the animation.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    origin: Instant,
    elapsed: f32,
    speed: f32,
}

impl AnimationClock {
    pub fn new(speed: f32, now: Instant) -> Self {
        Self {
            origin: now,
            elapsed: 0.0,
            speed,
        }
    }

    /// Folds the wall-clock time since the last sample into the phase and
    /// returns the accumulated animation time in seconds.
    pub fn sample(&mut self, now: Instant) -> f32 {
        let delta = now.saturating_duration_since(self.origin).as_secs_f32();
        self.elapsed += delta * self.speed;
        self.origin = now;
        self.elapsed
    }

    /// Changes the speed without disturbing the accumulated phase.
    pub fn set_speed(&mut self, speed: f32, now: Instant) {
        if (speed - self.speed).abs() > f32::EPSILON {
            self.sample(now);
            self.speed = speed;
        }
    }

    /// Drops any wall-clock time that passed while the surface was hidden,
    /// so the phase continues where it paused.
    pub fn rebase(&mut self, now: Instant) {
        self.origin = now;
    }

    /// Pins the phase to an explicit timestamp (still/export rendering).
    pub fn set_elapsed(&mut self, seconds: f32, now: Instant) {
        self.elapsed = seconds;
        self.origin = now;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// True when no further frames need scheduling to keep the phase correct.
    pub fn is_frozen(&self) -> bool {
        self.speed == 0.0
    }
}

/// Decides when the next frame should be drawn for a given policy.
#[derive(Debug)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    next_frame: Option<Instant>,
    single_shot: bool,
    fired: bool,
}

impl FrameScheduler {
    pub fn new(policy: &RenderPolicy) -> Self {
        let (interval, single_shot) = match policy {
            RenderPolicy::Animate { target_fps } => {
                // f64 keeps the interval exact at common rates (f32 1/10
                // rounds up a nanosecond past the 100ms deadline).
                let interval = target_fps
                    .filter(|fps| *fps > 0.0)
                    .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
                (interval, false)
            }
            RenderPolicy::Still { .. } | RenderPolicy::Export { .. } => (None, true),
        };
        Self {
            interval,
            next_frame: None,
            single_shot,
            fired: false,
        }
    }

    /// Whether a frame should be drawn at `now`.
    pub fn ready_for_frame(&self, now: Instant) -> bool {
        if self.single_shot && self.fired {
            return false;
        }
        match self.next_frame {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    /// Records that a frame was just presented.
    pub fn mark_rendered(&mut self, now: Instant) {
        self.fired = true;
        self.next_frame = self.interval.map(|interval| now + interval);
    }

    /// Deadline to wait for before the next frame, if throttled.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.single_shot && self.fired {
            return None;
        }
        self.next_frame
    }

    pub fn reset(&mut self) {
        self.next_frame = None;
        self.fired = false;
    }
}
