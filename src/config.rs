use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::color::Rgba8;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::theme::registry::{DEFAULT_THEME, ThemeState};
use crate::trace::store::{DEFAULT_TRACE_NAME, TraceValidation, resolve_trace_path};

/// Environment variable consulted for the label font when the config names none.
pub const FONT_ENV: &str = "TOURSCOPE_FONT";

/// Viewer settings, loadable from JSON.
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Directory trace base names resolve against.
    pub data_dir: PathBuf,
    /// Trace base name used when none is given.
    pub default_trace: String,
    /// Drawing surface size.
    pub canvas: Canvas,
    /// Initial theme name.
    pub theme: String,
    /// Clear color.
    pub background: Rgba8,
    /// Speed level applied before playback; `None` keeps the 200 ms default delay.
    pub speed_level: Option<i32>,
    /// Generation playback starts from.
    pub start_generation: usize,
    /// Frame rate of recorded output.
    pub fps: Fps,
    /// Label font file.
    pub font: Option<PathBuf>,
    /// Trace validation mode.
    pub validation: TraceValidation,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("parsed-data"),
            default_trace: DEFAULT_TRACE_NAME.to_string(),
            canvas: Canvas::default(),
            theme: DEFAULT_THEME.to_string(),
            background: Rgba8::WHITE,
            speed_level: None,
            start_generation: 0,
            fps: Fps::default(),
            font: None,
            validation: TraceValidation::default(),
        }
    }
}

impl ViewerConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> TourscopeResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&json)
            .map_err(|e| TourscopeError::validation(format!("{}: {e}", path.display())))
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> TourscopeResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| TourscopeError::validation(format!("invalid config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field.
    pub fn validate(&self) -> TourscopeResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        ThemeState::named(&self.theme)?;
        if self.default_trace.trim().is_empty() {
            return Err(TourscopeError::validation("default_trace must not be empty"));
        }
        Ok(())
    }

    /// Initial theme selection.
    pub fn theme_state(&self) -> TourscopeResult<ThemeState> {
        ThemeState::named(&self.theme)
    }

    /// Font path from the config, falling back to [`FONT_ENV`].
    pub fn font_path(&self) -> Option<PathBuf> {
        self.font.clone().or_else(|| {
            std::env::var_os(FONT_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }

    /// Read the label font, if one is configured.
    pub fn load_font(&self) -> TourscopeResult<Option<Vec<u8>>> {
        let Some(path) = self.font_path() else {
            return Ok(None);
        };
        let bytes =
            std::fs::read(&path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(Some(bytes))
    }

    /// Path of the trace called `name`, or of [`ViewerConfig::default_trace`] when `name` is
    /// `None` or blank.
    pub fn trace_path(&self, name: Option<&str>) -> PathBuf {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.default_trace);
        resolve_trace_path(&self.data_dir, Some(name))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
