//! Tourscope replays recorded optimization traces (simulated annealing or genetic runs on a
//! traveling-salesman instance) as a frame-by-frame animation.
//!
//! - Load a [`Trace`] into a [`TraceStore`]
//! - Drive an [`Animator`] with a [`PlaybackDriver`] on a [`Clock`]
//! - Present the [`Visualizer`]'s frames to a [`TimedFrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;

pub(crate) mod layout;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod theme;
pub(crate) mod trace;

/// Frame output sinks.
pub mod encode;

pub use crate::config::{FONT_ENV, ViewerConfig};
pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, BezPath, Canvas, Fps, FrameIndex, Point, Rect};
pub use crate::foundation::error::{TourscopeError, TourscopeResult};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, PreviewFile, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, PresentLog, SinkConfig, TimedFrameSink};
pub use crate::encode::timeline::Timeline;
pub use crate::layout::ring::{NodePosition, NodeRing};
pub use crate::playback::animator::{
    Animator, PlaybackState, PlaybackView, Schedule, StepView, TickOutcome, TickReason, TickToken,
};
pub use crate::playback::clock::{Clock, Control, RealtimeClock, VirtualClock};
pub use crate::playback::driver::{PlaybackDriver, PlaybackSummary, render_snapshot};
pub use crate::playback::speed::{DEFAULT_DELAY, Speed, speed_ms};
pub use crate::render::backend::{FrameRGBA, LineStyle, Painter, TextAlign, TextBaseline};
pub use crate::render::graph::{DrawReport, GraphSurface, TourKind};
pub use crate::render::panel::{
    PanelFrame, StatsPanel, sparkline_points, temperature_color, temperature_fraction,
    variance_history,
};
pub use crate::render::visualizer::Visualizer;
pub use crate::theme::registry::{DEFAULT_THEME, Palette, ThemeRegistry, ThemeState};
pub use crate::trace::model::{
    GenerationRecord, GenerationStatus, PopulationMember, to_one_based, to_zero_based,
};
pub use crate::trace::store::{
    BestKnown, DEFAULT_TRACE_NAME, Trace, TraceStore, TraceValidation, resolve_trace_path,
};
