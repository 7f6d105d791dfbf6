use std::time::Duration;

use crate::encode::sink::{FrameSink, SinkConfig, TimedFrameSink};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::render::backend::FrameRGBA;

/// Resamples timestamped presents onto a fixed frame rate.
///
/// Output frame `k` (timestamp `k / fps`) shows the latest frame presented at or before that
/// time. The final frame is held until `end`, and always fills at least one slot.
#[derive(Debug)]
pub struct Timeline<S> {
    sink: S,
    fps: Fps,
    held: Option<(Duration, FrameRGBA)>,
    next_index: u64,
}

impl<S: FrameSink> Timeline<S> {
    /// Wrap `sink`, emitting frames at `fps`.
    pub fn new(sink: S, fps: Fps) -> Self {
        Self {
            sink,
            fps,
            held: None,
            next_index: 0,
        }
    }

    /// Frames emitted so far.
    pub fn frames_written(&self) -> u64 {
        self.next_index
    }

    /// Borrow the wrapped sink.
    pub fn inner(&self) -> &S {
        &self.sink
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    fn emit_held_until(&mut self, end_index: u64) -> TourscopeResult<()> {
        let Some((_, frame)) = self.held.as_ref() else {
            return Ok(());
        };
        while self.next_index < end_index {
            self.sink.push_frame(FrameIndex(self.next_index), frame)?;
            self.next_index += 1;
        }
        Ok(())
    }
}

/// Number of frame slots whose timestamp is strictly before `at`: `ceil(at · fps)`.
pub fn slots_before(at: Duration, fps: Fps) -> u64 {
    let num = at.as_nanos() * u128::from(fps.num);
    let den = 1_000_000_000u128 * u128::from(fps.den);
    u64::try_from(num.div_ceil(den)).unwrap_or(u64::MAX)
}

impl<S: FrameSink> TimedFrameSink for Timeline<S> {
    fn begin(&mut self, canvas: Canvas) -> TourscopeResult<()> {
        self.held = None;
        self.next_index = 0;
        self.sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.fps,
        })
    }

    fn present(&mut self, at: Duration, frame: &FrameRGBA) -> TourscopeResult<()> {
        if let Some((last, _)) = self.held.as_ref()
            && at < *last
        {
            return Err(TourscopeError::encode(format!(
                "present at {at:?} is earlier than the previous present at {last:?}"
            )));
        }
        self.emit_held_until(slots_before(at, self.fps))?;
        self.held = Some((at, frame.clone()));
        Ok(())
    }

    fn end(&mut self, at: Duration) -> TourscopeResult<()> {
        let end_index = slots_before(at, self.fps).max(self.next_index + 1);
        self.emit_held_until(end_index)?;
        self.held = None;
        tracing::debug!(frames = self.next_index, "timeline closed");
        self.sink.end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/timeline.rs"]
mod tests;
