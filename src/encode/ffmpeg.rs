use std::ffi::OsString;
use std::io::{BufRead as _, BufReader, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use crate::encode::png::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Color translucent pixels are composited over.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    /// Options for writing an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::WHITE,
        }
    }
}

/// Fixed-rate sink that pipes opaque RGB frames into the system `ffmpeg` (libx264, yuv420p).
///
/// Dropping a sink that was begun but never ended closes the pipe and reaps the encoder.
#[derive(Debug)]
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    canvas: Option<Canvas>,
    rgb: Vec<u8>,
    next: FrameIndex,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`; nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            canvas: None,
            rgb: Vec::new(),
            next: FrameIndex(0),
        }
    }

    /// Frames written since `begin`.
    pub fn frames_written(&self) -> u64 {
        self.next.0
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> TourscopeResult<()> {
        if self.encoder.is_some() {
            return Err(TourscopeError::encode("ffmpeg sink already started"));
        }
        let canvas = encodable_canvas(cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(TourscopeError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let encoder = Encoder::spawn(encoder_args(&self.opts, canvas, cfg.fps))?;
        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = canvas.width,
            height = canvas.height,
            fps = %format_args!("{}/{}", cfg.fps.num, cfg.fps.den),
            "ffmpeg started"
        );
        self.rgb = vec![0; canvas.width as usize * canvas.height as usize * 3];
        self.encoder = Some(encoder);
        self.canvas = Some(canvas);
        self.next = FrameIndex(0);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TourscopeResult<()> {
        let (Some(canvas), Some(encoder)) = (self.canvas, self.encoder.as_mut()) else {
            return Err(TourscopeError::encode("ffmpeg sink not started"));
        };
        if idx < self.next {
            return Err(TourscopeError::encode(format!(
                "ffmpeg sink got frame {} after frame {}",
                idx.0,
                self.next.0.saturating_sub(1)
            )));
        }
        if (frame.width, frame.height) != (canvas.width, canvas.height) {
            return Err(TourscopeError::encode(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width, frame.height, canvas.width, canvas.height
            )));
        }

        flatten_to_rgb(&mut self.rgb, frame, self.opts.background)?;
        encoder.write(&self.rgb)?;
        self.next = FrameIndex(idx.0 + 1);
        Ok(())
    }

    fn end(&mut self) -> TourscopeResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| TourscopeError::encode("ffmpeg sink not started"))?;
        self.canvas = None;
        let (status, tail) = encoder.finish()?;
        if !status.success() {
            return Err(TourscopeError::encode(format!(
                "ffmpeg exited with {status}: {tail}"
            )));
        }
        tracing::info!(
            out = %self.opts.out_path.display(),
            frames = self.frames_written(),
            "mp4 written"
        );
        Ok(())
    }
}

/// A running `ffmpeg` child with its stdin pipe and a thread draining stderr.
#[derive(Debug)]
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_tail: Option<JoinHandle<String>>,
}

impl Encoder {
    fn spawn(args: Vec<OsString>) -> TourscopeResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TourscopeError::encode(
                    "ffmpeg is required for MP4 output, but was not found on PATH",
                ),
                _ => TourscopeError::encode(format!("failed to spawn ffmpeg: {e}")),
            })?;

        let stdin = child.stdin.take();
        let stderr_tail = child.stderr.take().map(|stderr| {
            std::thread::spawn(move || {
                let mut last = String::new();
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    tracing::debug!(target: "tourscope::ffmpeg", "{line}");
                    if !line.trim().is_empty() {
                        last = line;
                    }
                }
                last
            })
        });
        if stdin.is_none() {
            let mut encoder = Self {
                child,
                stdin,
                stderr_tail,
            };
            encoder.shutdown();
            return Err(TourscopeError::encode("ffmpeg stdin was not piped"));
        }

        Ok(Self {
            child,
            stdin,
            stderr_tail,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> TourscopeResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| TourscopeError::encode("ffmpeg input already closed"))?;
        stdin
            .write_all(bytes)
            .map_err(|e| TourscopeError::encode(format!("writing frame to ffmpeg: {e}")))
    }

    /// Close the pipe, wait for the encoder and return its status with the last stderr line.
    fn finish(mut self) -> TourscopeResult<(ExitStatus, String)> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| TourscopeError::encode(format!("waiting for ffmpeg: {e}")))?;
        let tail = match self.stderr_tail.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TourscopeError::encode("ffmpeg stderr reader panicked"))?,
            None => String::new(),
        };
        Ok((status, tail))
    }

    fn shutdown(&mut self) {
        drop(self.stdin.take());
        if let Err(err) = self.child.wait() {
            tracing::warn!(%err, "failed to reap ffmpeg");
        }
        if let Some(handle) = self.stderr_tail.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        // `finish` leaves no stderr handle behind.
        if self.stderr_tail.is_some() || self.stdin.is_some() {
            tracing::warn!("ffmpeg sink dropped before end; closing encoder");
            self.shutdown();
        }
    }
}

fn encodable_canvas(cfg: SinkConfig) -> TourscopeResult<Canvas> {
    Fps::new(cfg.fps.num, cfg.fps.den)?;
    let canvas = Canvas::new(cfg.width, cfg.height)?;
    if !canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2) {
        return Err(TourscopeError::validation(format!(
            "mp4 output needs even dimensions (yuv420p), got {}x{}",
            canvas.width, canvas.height
        )));
    }
    Ok(canvas)
}

fn encoder_args(opts: &FfmpegSinkOpts, canvas: Canvas, fps: Fps) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |s: &str| args.push(s.into());
    push(if opts.overwrite { "-y" } else { "-n" });
    for s in ["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"] {
        push(s);
    }
    push("-s");
    push(&format!("{}x{}", canvas.width, canvas.height));
    // Input rate must precede `-i` for rawvideo.
    push("-r");
    push(&format!("{}/{}", fps.num, fps.den));
    for s in [
        "-i",
        "pipe:0",
        "-an",
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ] {
        push(s);
    }
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Composite `frame` over `background` into packed opaque RGB.
fn flatten_to_rgb(dst: &mut [u8], frame: &FrameRGBA, background: Rgba8) -> TourscopeResult<()> {
    if !frame.data.len().is_multiple_of(4) || dst.len() / 3 != frame.data.len() / 4 {
        return Err(TourscopeError::encode(format!(
            "frame buffer holds {} bytes, expected {}",
            frame.data.len(),
            dst.len() / 3 * 4
        )));
    }
    let bg = [background.r, background.g, background.b].map(u16::from);
    for (out, px) in dst.chunks_exact_mut(3).zip(frame.data.chunks_exact(4)) {
        let a = u16::from(px[3]);
        for ((o, &c), &b) in out.iter_mut().zip(&px[..3]).zip(&bg) {
            let c = if frame.premultiplied {
                u16::from(c)
            } else {
                mul_div255_u16(u16::from(c), a)
            };
            *o = (c + mul_div255_u16(b, 255 - a)).min(255) as u8;
        }
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
