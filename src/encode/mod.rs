//! Frame output.
//!
//! Playback presents frames at arbitrary times through [`sink::TimedFrameSink`]; fixed-rate
//! outputs sit behind a [`timeline::Timeline`].

/// `ffmpeg`-based MP4 output via the system `ffmpeg`.
pub mod ffmpeg;
/// PNG outputs: single files, numbered sequences and a live preview.
pub mod png;
/// Frame sink traits and in-memory sinks.
pub mod sink;
/// Fixed-rate resampling of timed presents.
pub mod timeline;
