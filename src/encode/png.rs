use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig, TimedFrameSink};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::render::backend::FrameRGBA;

/// Write `frame` to `path` as a straight-alpha RGBA PNG, creating parent directories.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> TourscopeResult<()> {
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TourscopeResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Writes each frame to `<dir>/<prefix><index>.png`.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing `frame_000000.png`, `frame_000001.png`, ... into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame_".to_string(),
            cfg: None,
            last_idx: None,
            written: 0,
        }
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{}{:06}.png", self.prefix, idx.0))
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> TourscopeResult<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TourscopeResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TourscopeError::encode("png sequence sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(TourscopeError::encode(
                "png sequence sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(TourscopeError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);
        write_png(&self.frame_path(idx), frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> TourscopeResult<()> {
        tracing::info!(frames = self.written, dir = %self.dir.display(), "png sequence written");
        self.cfg = None;
        Ok(())
    }
}

/// Live preview: every present overwrites a single PNG file.
///
/// The file is written to a sibling temporary path first and then renamed, so readers never
/// see a partial image.
#[derive(Debug)]
pub struct PreviewFile {
    path: PathBuf,
    presents: u64,
}

impl PreviewFile {
    /// Preview written to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            presents: 0,
        }
    }

    /// Preview path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of frames presented.
    pub fn presents(&self) -> u64 {
        self.presents
    }
}

impl TimedFrameSink for PreviewFile {
    fn begin(&mut self, _canvas: Canvas) -> TourscopeResult<()> {
        ensure_parent_dir(&self.path)?;
        self.presents = 0;
        Ok(())
    }

    fn present(&mut self, _at: Duration, frame: &FrameRGBA) -> TourscopeResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        write_png(&tmp, frame)?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace preview '{}'", self.path.display()))?;
        self.presents += 1;
        Ok(())
    }

    fn end(&mut self, at: Duration) -> TourscopeResult<()> {
        tracing::info!(presents = self.presents, elapsed = ?at, "preview closed");
        Ok(())
    }

    fn supports_resize(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
