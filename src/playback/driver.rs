use std::time::Duration;

use crate::encode::sink::TimedFrameSink;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::playback::animator::{
    Animator, PlaybackState, PlaybackView, StepView, TickOutcome, TickReason,
};
use crate::playback::clock::{Clock, Control};
use crate::render::backend::FrameRGBA;
use crate::render::visualizer::Visualizer;
use crate::trace::store::TraceStore;

/// What happened during one [`PlaybackDriver::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSummary {
    /// Members shown.
    pub steps_shown: u64,
    /// Generations fully played through.
    pub generations_completed: usize,
    /// Best solution value at the end of the run.
    pub best_value: Option<f64>,
    /// Engine state when the run returned.
    pub final_state: PlaybackState,
    /// Clock time from the idle frame to the end of the run.
    pub elapsed: Duration,
    /// `true` when the trace was played to its end.
    pub completed: bool,
    /// Frames handed to the sink, including the idle frame and control redraws.
    pub frames_presented: u64,
}

/// Hosts an [`Animator`]: waits out each schedule on a [`Clock`], applies controls and presents
/// frames to a [`TimedFrameSink`].
#[derive(Debug)]
pub struct PlaybackDriver<C> {
    animator: Animator,
    clock: C,
}

impl<C: Clock> PlaybackDriver<C> {
    /// Driver at the default delay.
    pub fn new(clock: C) -> Self {
        Self {
            animator: Animator::new(),
            clock,
        }
    }

    /// Apply `level` before playback starts; `None` keeps the default delay.
    pub fn with_speed(mut self, level: Option<i32>) -> Self {
        if let Some(level) = level {
            self.animator.set_speed(level);
        }
        self
    }

    /// The hosted engine.
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Play the loaded trace from `from_generation` until it ends or a `Stop` arrives.
    ///
    /// The sink sees the idle frame first, then one frame per shown member plus a redraw for
    /// every applied theme or resize control.
    #[tracing::instrument(skip_all, fields(from = from_generation))]
    pub fn run(
        &mut self,
        store: &mut TraceStore,
        visualizer: &mut Visualizer,
        sink: &mut impl TimedFrameSink,
        from_generation: usize,
    ) -> TourscopeResult<PlaybackSummary> {
        if store.trace().is_none() {
            return Err(TourscopeError::playback("no trace loaded"));
        }

        let origin = self.clock.now();
        let mut presented = 0u64;
        sink.begin(visualizer.canvas())?;
        visualizer.render_idle()?;
        present(sink, self.clock.now().saturating_sub(origin), visualizer)?;
        presented += 1;

        let mut schedule = self.animator.start(from_generation)?;
        let mut deadline = self.clock.now() + schedule.delay;
        'run: loop {
            while let Some(control) = self.clock.wait_until(deadline) {
                let at = self.clock.now().saturating_sub(origin);
                match control {
                    Control::TogglePause => {
                        self.animator.toggle_pause();
                        if let Some(resumed) = self.animator.resume() {
                            schedule = resumed;
                            deadline = self.clock.now() + resumed.delay;
                        }
                    }
                    Control::SetSpeed(level) => self.animator.set_speed(level),
                    Control::SetTheme(name) => match visualizer.set_theme(&name) {
                        Ok(()) => {
                            present(sink, at, visualizer)?;
                            presented += 1;
                        }
                        Err(err) => tracing::warn!(%err, "theme change ignored"),
                    },
                    Control::Resize { width, height } => {
                        if !sink.supports_resize() {
                            tracing::warn!(width, height, "resize ignored: output has a fixed size");
                            continue;
                        }
                        match Canvas::new(width, height).and_then(|c| visualizer.resize(c)) {
                            Ok(()) => {
                                present(sink, at, visualizer)?;
                                presented += 1;
                            }
                            Err(err) => tracing::warn!(%err, "resize ignored"),
                        }
                    }
                    Control::Stop => {
                        self.animator.stop();
                        break 'run;
                    }
                }
            }

            match self.animator.tick(schedule.token, store, visualizer)? {
                TickOutcome::Scheduled(next) => {
                    if next.reason == TickReason::Step {
                        present(sink, self.clock.now().saturating_sub(origin), visualizer)?;
                        presented += 1;
                    }
                    if next.reason == TickReason::PausePoll && self.clock.controls_exhausted() {
                        tracing::warn!("paused with no further controls; stopping playback");
                        self.animator.stop();
                        break;
                    }
                    schedule = next;
                    deadline = self.clock.now() + next.delay;
                }
                TickOutcome::Finished => break,
                TickOutcome::Stale => {
                    return Err(TourscopeError::playback(
                        "driver tick token was superseded",
                    ));
                }
            }
        }

        let elapsed = self.clock.now().saturating_sub(origin);
        sink.end(elapsed)?;

        let summary = PlaybackSummary {
            steps_shown: self.animator.steps_shown(),
            generations_completed: self
                .animator
                .generation_index()
                .saturating_sub(self.animator.start_generation()),
            best_value: store.best().value(),
            final_state: self.animator.state(),
            elapsed,
            completed: self.animator.state() == PlaybackState::Finished,
            frames_presented: presented,
        };
        tracing::info!(
            steps = summary.steps_shown,
            generations = summary.generations_completed,
            best = ?summary.best_value,
            completed = summary.completed,
            "playback ended"
        );
        Ok(summary)
    }
}

fn present(
    sink: &mut impl TimedFrameSink,
    at: Duration,
    visualizer: &Visualizer,
) -> TourscopeResult<()> {
    let frame = visualizer
        .frame()
        .ok_or_else(|| TourscopeError::playback("nothing rendered to present"))?;
    sink.present(at, frame)
}

/// Render member `step` of generation `generation` as a single frame.
///
/// Best-known state is rebuilt from the start of the trace up to and including that member, so
/// the frame matches what playback from generation 0 would show. `store` is not modified.
pub fn render_snapshot(
    store: &TraceStore,
    visualizer: &mut Visualizer,
    generation: usize,
    step: usize,
) -> TourscopeResult<FrameRGBA> {
    let trace = store
        .trace()
        .ok_or_else(|| TourscopeError::playback("no trace loaded"))?;
    let record = trace.generation(generation).ok_or_else(|| {
        TourscopeError::validation(format!(
            "generation {generation} is past the end of the trace ({} generations)",
            trace.len()
        ))
    })?;
    if step >= record.population.len() {
        return Err(TourscopeError::validation(format!(
            "step {step} is past the end of generation {generation} ({} members)",
            record.population.len()
        )));
    }

    let mut replay = TraceStore::with_trace(trace.clone());
    for (gi, g) in trace.generations()[..=generation].iter().enumerate() {
        let upto = if gi == generation {
            step + 1
        } else {
            g.population.len()
        };
        for member in &g.population[..upto] {
            replay.update_best(member.solution_value, &member.tour);
        }
    }

    let view = StepView::from_store(&replay, generation, step)
        .ok_or_else(|| TourscopeError::playback("snapshot step vanished from the trace"))?;
    visualizer.show_step(&view)?;
    visualizer
        .take_frame()
        .ok_or_else(|| TourscopeError::playback("snapshot produced no frame"))
}

#[cfg(test)]
#[path = "../../tests/unit/playback/driver.rs"]
mod tests;
