use std::time::Duration;

/// Step delay before any speed level is applied.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);
/// Delay at level 0.
pub const BASE_DELAY_MS: f64 = 500.0;
/// Per-level decay of the delay.
pub const SPEED_DECAY: f64 = 0.95;
/// Hard floor on the step delay.
pub const MIN_DELAY_MS: f64 = 5.0;
/// Re-arm interval while paused.
pub const PAUSE_POLL: Duration = Duration::from_millis(16);

/// Step delay in milliseconds for a speed `level`: `max(5, 500 · 0.95^level)`.
///
/// Negative levels are treated as level 0.
pub fn speed_ms(level: i32) -> f64 {
    (BASE_DELAY_MS * SPEED_DECAY.powi(level.max(0))).max(MIN_DELAY_MS)
}

/// Playback speed: an optional level and the step delay it maps to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speed {
    level: Option<i32>,
    delay: Duration,
}

impl Default for Speed {
    fn default() -> Self {
        Self {
            level: None,
            delay: DEFAULT_DELAY,
        }
    }
}

impl Speed {
    /// Speed for a slider `level`.
    pub fn from_level(level: i32) -> Self {
        Self {
            level: Some(level),
            delay: Duration::from_secs_f64(speed_ms(level) / 1000.0),
        }
    }

    /// Level this speed was created from; `None` for the default delay.
    pub fn level(self) -> Option<i32> {
        self.level
    }

    /// Delay between steps.
    pub fn delay(self) -> Duration {
        self.delay
    }
}
