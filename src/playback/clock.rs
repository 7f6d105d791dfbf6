use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::time::{Duration, Instant};

/// Host commands delivered to a running playback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    /// Flip pause; unpausing also resumes.
    TogglePause,
    /// Apply a speed level.
    SetSpeed(i32),
    /// Switch the theme by name.
    SetTheme(String),
    /// Resize the drawing surface.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// End playback.
    Stop,
}

/// Time source and control inbox for the playback driver.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    /// Wait until `deadline`, returning early with the first control that arrives.
    ///
    /// On `None` the clock has reached `deadline`.
    fn wait_until(&mut self, deadline: Duration) -> Option<Control>;

    /// `true` once no further controls can ever arrive.
    fn controls_exhausted(&self) -> bool {
        false
    }
}

/// Wall-clock time with controls fed through an `mpsc` channel.
#[derive(Debug)]
pub struct RealtimeClock {
    origin: Instant,
    controls: Receiver<Control>,
    disconnected: bool,
}

impl RealtimeClock {
    /// A clock plus the sender used to deliver controls to it.
    pub fn new() -> (Self, Sender<Control>) {
        let (tx, rx) = channel();
        (
            Self {
                origin: Instant::now(),
                controls: rx,
                disconnected: false,
            },
            tx,
        )
    }
}

impl Clock for RealtimeClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wait_until(&mut self, deadline: Duration) -> Option<Control> {
        loop {
            let now = self.now();
            if self.disconnected {
                if let Some(rest) = deadline.checked_sub(now) {
                    std::thread::sleep(rest);
                }
                return None;
            }
            let Some(rest) = deadline.checked_sub(now).filter(|d| !d.is_zero()) else {
                return match self.controls.try_recv() {
                    Ok(control) => Some(control),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => {
                        self.disconnected = true;
                        None
                    }
                };
            };
            match self.controls.recv_timeout(rest) {
                Ok(control) => return Some(control),
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => self.disconnected = true,
            }
        }
    }

    fn controls_exhausted(&self) -> bool {
        self.disconnected
    }
}

/// Simulated time that advances instantly, replaying scripted controls.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    now: Duration,
    script: VecDeque<(Duration, Control)>,
}

impl VirtualClock {
    /// Clock at time zero with no scripted controls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock replaying `script`; entries are delivered in time order.
    pub fn with_script(script: impl IntoIterator<Item = (Duration, Control)>) -> Self {
        let mut entries: Vec<_> = script.into_iter().collect();
        entries.sort_by_key(|(at, _)| *at);
        Self {
            now: Duration::ZERO,
            script: entries.into(),
        }
    }

    /// Schedule `control` at simulated time `at`.
    pub fn push(&mut self, at: Duration, control: Control) {
        let idx = self.script.partition_point(|(t, _)| *t <= at);
        self.script.insert(idx, (at, control));
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn wait_until(&mut self, deadline: Duration) -> Option<Control> {
        if self.script.front().is_some_and(|(at, _)| *at <= deadline) {
            let (at, control) = self.script.pop_front()?;
            self.now = self.now.max(at);
            return Some(control);
        }
        self.now = self.now.max(deadline);
        None
    }

    fn controls_exhausted(&self) -> bool {
        self.script.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
