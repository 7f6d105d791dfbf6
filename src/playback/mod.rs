//! Playback engine, clocks and the driver loop that hosts them.

pub(crate) mod animator;
pub(crate) mod clock;
pub(crate) mod driver;
pub(crate) mod speed;
