use std::time::Duration;

use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::playback::speed::{PAUSE_POLL, Speed};
use crate::trace::model::{GenerationRecord, PopulationMember};
use crate::trace::store::{BestKnown, Trace, TraceStore};

/// Identifies the single tick a session may run next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickToken {
    session: u64,
    seq: u64,
}

impl TickToken {
    /// Session the token belongs to.
    pub fn session(self) -> u64 {
        self.session
    }
}

/// Why a tick was scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickReason {
    /// First tick of a session.
    Start,
    /// A member was just shown.
    Step,
    /// A generation just ended; the next tick moves into the following one.
    GenerationGap,
    /// The engine is paused and re-armed without advancing.
    PausePoll,
    /// Explicit re-entry after unpausing.
    Resume,
}

/// A request to run [`Animator::tick`] with `token` after `delay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    /// Token to pass back to [`Animator::tick`].
    pub token: TickToken,
    /// Wait before the tick.
    pub delay: Duration,
    /// Why the tick was scheduled.
    pub reason: TickReason,
}

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Run the next tick as scheduled.
    Scheduled(Schedule),
    /// End of trace reached; nothing further is scheduled.
    Finished,
    /// The token was not the outstanding one; nothing changed.
    Stale,
}

/// Lifecycle of the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No session started yet.
    #[default]
    Idle,
    /// A session is advancing.
    Running,
    /// A session is active but paused.
    Paused,
    /// The last session ran to the end of the trace.
    Finished,
    /// The last session was cancelled.
    Stopped,
}

impl PlaybackState {
    /// `true` while a session holds a scheduled tick.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// Redraw command issued for every shown member.
#[derive(Clone, Debug)]
pub struct StepView<'a> {
    /// Full generation record.
    pub generation: &'a GenerationRecord,
    /// 0-based generation index.
    pub generation_index: usize,
    /// 0-based member index.
    pub step_index: usize,
    /// The member being shown.
    pub member: &'a PopulationMember,
    /// The member's tour, 0-based.
    pub current_tour: Vec<usize>,
    /// Best-known state after this member was offered.
    pub best: &'a BestKnown,
    /// Number of generations in the trace.
    pub total_generations: usize,
    /// Whole trace, for history displays.
    pub trace: &'a Trace,
}

impl<'a> StepView<'a> {
    /// View of member `step_index` of generation `generation_index`, if it exists.
    pub fn from_store(
        store: &'a TraceStore,
        generation_index: usize,
        step_index: usize,
    ) -> Option<Self> {
        let trace = store.trace()?;
        let generation = trace.generation(generation_index)?;
        let member = generation.population.get(step_index)?;
        Some(Self {
            generation,
            generation_index,
            step_index,
            member,
            current_tour: member.zero_based_tour(),
            best: store.best(),
            total_generations: trace.len(),
            trace,
        })
    }
}

/// Host-side receiver of redraw commands.
pub trait PlaybackView {
    /// Draw the given step.
    fn show_step(&mut self, step: &StepView<'_>) -> TourscopeResult<()>;
}

/// Timed playback state machine.
///
/// Each [`Animator::tick`] performs one transition and hands back the next [`Schedule`]. Exactly
/// one token is outstanding per session; every other token is answered with
/// [`TickOutcome::Stale`].
#[derive(Debug, Default)]
pub struct Animator {
    state: PlaybackState,
    paused: bool,
    step_index: usize,
    generation_index: usize,
    start_generation: usize,
    speed: Speed,
    session: u64,
    next_seq: u64,
    pending: Option<(TickToken, TickReason)>,
    steps_shown: u64,
}

impl Animator {
    /// Idle engine at the default delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session at `from_generation`.
    ///
    /// Fails while another session is active.
    pub fn start(&mut self, from_generation: usize) -> TourscopeResult<Schedule> {
        if self.state.is_active() {
            tracing::warn!(session = self.session, "start ignored: playback already active");
            return Err(TourscopeError::playback(
                "playback is already active; stop it before starting again",
            ));
        }
        self.session += 1;
        self.paused = false;
        self.step_index = 0;
        self.generation_index = from_generation;
        self.start_generation = from_generation;
        self.steps_shown = 0;
        self.state = PlaybackState::Running;
        tracing::debug!(session = self.session, from_generation, "playback started");
        Ok(self.schedule(Duration::ZERO, TickReason::Start))
    }

    /// Run one transition for `token`.
    ///
    /// Errors from `view` end the session and are returned as-is.
    pub fn tick(
        &mut self,
        token: TickToken,
        store: &mut TraceStore,
        view: &mut impl PlaybackView,
    ) -> TourscopeResult<TickOutcome> {
        match self.pending {
            Some((pending, _)) if pending == token => self.pending = None,
            _ => return Ok(TickOutcome::Stale),
        }

        if self.paused {
            return Ok(TickOutcome::Scheduled(
                self.schedule(PAUSE_POLL, TickReason::PausePoll),
            ));
        }

        let (value, tour) = {
            let Some(generation) = store.generation(self.generation_index) else {
                self.state = PlaybackState::Finished;
                tracing::debug!(
                    session = self.session,
                    generation = self.generation_index,
                    steps = self.steps_shown,
                    "end of trace"
                );
                return Ok(TickOutcome::Finished);
            };
            let Some(member) = generation.population.get(self.step_index) else {
                self.step_index = 0;
                self.generation_index += 1;
                tracing::debug!(generation = self.generation_index, "generation advanced");
                return Ok(TickOutcome::Scheduled(
                    self.schedule(self.speed.delay(), TickReason::GenerationGap),
                ));
            };
            (member.solution_value, member.tour.clone())
        };

        if store.update_best(value, &tour) {
            tracing::trace!(best = value, "best solution improved");
        }
        let shown = StepView::from_store(store, self.generation_index, self.step_index)
            .ok_or_else(|| TourscopeError::playback("step vanished from the trace store"))
            .and_then(|step| view.show_step(&step));
        if let Err(err) = shown {
            self.state = PlaybackState::Stopped;
            return Err(err);
        }

        self.step_index += 1;
        self.steps_shown += 1;
        Ok(TickOutcome::Scheduled(
            self.schedule(self.speed.delay(), TickReason::Step),
        ))
    }

    /// Flip the pause flag and return whether playback is now paused.
    ///
    /// Unpausing does not by itself resume progress; call [`Animator::resume`].
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if self.state.is_active() {
            self.state = if self.paused {
                PlaybackState::Paused
            } else {
                PlaybackState::Running
            };
        }
        tracing::debug!(paused = self.paused, "pause toggled");
        self.paused
    }

    /// Re-enter the tick loop after unpausing.
    ///
    /// Supersedes an outstanding pause poll with an immediate tick. Returns `None` when still
    /// paused, when no session is active, or when the outstanding tick is not a pause poll (the
    /// existing schedule then stays valid).
    pub fn resume(&mut self) -> Option<Schedule> {
        if self.paused || !self.state.is_active() {
            return None;
        }
        match self.pending {
            Some((_, TickReason::PausePoll)) => {
                tracing::debug!(
                    generation = self.generation_index,
                    step = self.step_index,
                    "resumed"
                );
                Some(self.schedule(Duration::ZERO, TickReason::Resume))
            }
            _ => None,
        }
    }

    /// Apply a speed level; takes effect from the next scheduled tick.
    pub fn set_speed(&mut self, level: i32) {
        self.speed = Speed::from_level(level);
    }

    /// Cancel the outstanding tick. Returns `true` if a session was active.
    pub fn stop(&mut self) -> bool {
        self.pending = None;
        if self.state.is_active() {
            self.state = PlaybackState::Stopped;
            tracing::debug!(session = self.session, "playback stopped");
            true
        } else {
            false
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Pause flag.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Index of the next member to show.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Index of the current generation.
    pub fn generation_index(&self) -> usize {
        self.generation_index
    }

    /// Generation the current session started from.
    pub fn start_generation(&self) -> usize {
        self.start_generation
    }

    /// Current speed.
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Members shown in the current session.
    pub fn steps_shown(&self) -> u64 {
        self.steps_shown
    }

    /// The outstanding tick, if any.
    pub fn pending(&self) -> Option<TickToken> {
        self.pending.map(|(token, _)| token)
    }

    fn schedule(&mut self, delay: Duration, reason: TickReason) -> Schedule {
        self.next_seq += 1;
        let token = TickToken {
            session: self.session,
            seq: self.next_seq,
        };
        self.pending = Some((token, reason));
        Schedule {
            token,
            delay,
            reason,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/animator.rs"]
mod tests;
