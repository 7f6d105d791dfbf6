use std::time::Duration;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming frames at a fixed rate.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TourscopeResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TourscopeResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TourscopeResult<()>;
}

/// Sink contract for frames presented at arbitrary playback times.
pub trait TimedFrameSink {
    /// Called once before the first present.
    fn begin(&mut self, canvas: Canvas) -> TourscopeResult<()>;
    /// Show `frame` from playback time `at` onward. Times never decrease.
    fn present(&mut self, at: Duration, frame: &FrameRGBA) -> TourscopeResult<()>;
    /// Called once when playback ends at time `at`.
    fn end(&mut self, at: Duration) -> TourscopeResult<()>;
    /// Whether frames may change size between presents.
    fn supports_resize(&self) -> bool {
        false
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TourscopeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TourscopeResult<()> {
        if self.cfg.is_none() {
            return Err(TourscopeError::encode("in-memory sink not started"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(TourscopeError::encode(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TourscopeResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Timed sink that records every present, for tests and debugging.
#[derive(Debug, Default)]
pub struct PresentLog {
    canvas: Option<Canvas>,
    presents: Vec<(Duration, FrameRGBA)>,
    ended_at: Option<Duration>,
}

impl PresentLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas given to `begin`.
    pub fn canvas(&self) -> Option<Canvas> {
        self.canvas
    }

    /// Every presented frame with its playback time.
    pub fn presents(&self) -> &[(Duration, FrameRGBA)] {
        &self.presents
    }

    /// Playback times of all presents.
    pub fn times(&self) -> Vec<Duration> {
        self.presents.iter().map(|(t, _)| *t).collect()
    }

    /// Time passed to `end`, once called.
    pub fn ended_at(&self) -> Option<Duration> {
        self.ended_at
    }
}

impl TimedFrameSink for PresentLog {
    fn begin(&mut self, canvas: Canvas) -> TourscopeResult<()> {
        self.canvas = Some(canvas);
        self.presents.clear();
        self.ended_at = None;
        Ok(())
    }

    fn present(&mut self, at: Duration, frame: &FrameRGBA) -> TourscopeResult<()> {
        self.presents.push((at, frame.clone()));
        Ok(())
    }

    fn end(&mut self, at: Duration) -> TourscopeResult<()> {
        self.ended_at = Some(at);
        Ok(())
    }

    fn supports_resize(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
