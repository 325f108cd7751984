/// Fixed-duration tweens for panel slides, the cancel button and the delete target
///
/// Animations are sampled on each tick of the app's frame subscription. A new
/// `animate_to` on the same value replaces the running tween, starting from
/// wherever the old one currently is.

use std::time::{Duration, Instant};

/// Duration of most transitions
pub const STANDARD: Duration = Duration::from_millis(250);

/// Duration of the panel slide-in
pub const PANEL_OPEN: Duration = Duration::from_millis(550);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
}

impl Tween {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn value(&self, now: Instant) -> f32 {
        let t = ease_in_out(self.progress(now));
        self.from + (self.to - self.from) * t
    }
}

/// Cubic ease-in-out
fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A scalar that is either at rest or tweening toward a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animated {
    value: f32,
    tween: Option<Tween>,
}

impl Animated {
    pub fn new(value: f32) -> Self {
        Self { value, tween: None }
    }

    /// Jump to `value`, cancelling any running tween
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.tween = None;
    }

    pub fn animate_to(&mut self, target: f32, now: Instant, duration: Duration) {
        let from = self.value_at(now);
        self.value = from;
        self.tween = Some(Tween {
            from,
            to: target,
            start: now,
            duration,
        });
    }

    /// Value as of the last tick
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Where the value is headed (its current value when at rest)
    pub fn target(&self) -> f32 {
        self.tween.map_or(self.value, |tween| tween.to)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Advance to `now`; returns `true` on the tick the tween completes
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(tween) = self.tween else {
            return false;
        };

        if tween.progress(now) >= 1.0 {
            self.value = tween.to;
            self.tween = None;
            true
        } else {
            self.value = tween.value(now);
            false
        }
    }

    fn value_at(&self, now: Instant) -> f32 {
        self.tween.map_or(self.value, |tween| tween.value(now))
    }
}
