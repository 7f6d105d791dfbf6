use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::playback::animator::{PlaybackView, StepView};
use crate::render::backend::{FrameRGBA, Painter};
use crate::render::graph::{DrawReport, GraphSurface};
use crate::render::panel::{PanelFrame, StatsPanel, VARIANCE_WINDOW, variance_history};
use crate::theme::registry::ThemeState;

/// Render Surface plus Stats Panel over one [`Painter`].
///
/// Keeps the last shown step so resizes and theme switches can redraw it.
#[derive(Debug)]
pub struct Visualizer {
    painter: Painter,
    graph: GraphSurface,
    panel: StatsPanel,
    theme: ThemeState,
    background: Rgba8,
    last_panel: Option<PanelFrame>,
    last_report: DrawReport,
    frame: Option<FrameRGBA>,
}

impl Visualizer {
    /// Visualizer for a ring of `num_nodes` on `canvas`.
    pub fn new(
        num_nodes: usize,
        canvas: Canvas,
        theme: ThemeState,
        background: Rgba8,
    ) -> TourscopeResult<Self> {
        Ok(Self {
            painter: Painter::new(canvas)?,
            graph: GraphSurface::new(num_nodes, canvas),
            panel: StatsPanel,
            theme,
            background,
            last_panel: None,
            last_report: DrawReport::default(),
            frame: None,
        })
    }

    /// Load the label font.
    pub fn set_font(&mut self, font_bytes: Vec<u8>) -> TourscopeResult<()> {
        self.painter.set_font(font_bytes)
    }

    /// Current canvas size.
    pub fn canvas(&self) -> Canvas {
        self.painter.canvas()
    }

    /// Current theme selection.
    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    /// The graph surface (node ring and stored tours).
    pub fn graph(&self) -> &GraphSurface {
        &self.graph
    }

    /// Resize the surface, refit the ring and redraw the last frame.
    pub fn resize(&mut self, canvas: Canvas) -> TourscopeResult<()> {
        self.painter.resize(canvas)?;
        self.graph.resize(canvas);
        tracing::debug!(width = canvas.width, height = canvas.height, "surface resized");
        self.redraw()
    }

    /// Switch theme and redraw the last frame. Unknown names leave everything unchanged.
    pub fn set_theme(&mut self, name: &str) -> TourscopeResult<()> {
        self.theme.set_theme(name)?;
        self.redraw()
    }

    /// Draw the ring with no tours and no panel.
    pub fn render_idle(&mut self) -> TourscopeResult<&FrameRGBA> {
        self.graph.update_paths(Vec::new(), Vec::new());
        self.last_panel = None;
        self.redraw()?;
        self.frame
            .as_ref()
            .ok_or_else(|| TourscopeError::playback("redraw produced no frame"))
    }

    /// Redraw from the stored tours and panel state.
    pub fn redraw(&mut self) -> TourscopeResult<()> {
        self.painter.begin_frame(self.background);
        self.last_report = self.graph.draw(&mut self.painter, &self.theme)?;
        if let Some(panel) = self.last_panel.as_ref() {
            self.panel.draw(&mut self.painter, &self.theme, panel)?;
        }
        self.frame = Some(self.painter.finish());
        Ok(())
    }

    /// Most recent frame.
    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    /// Take the most recent frame out of the visualizer.
    pub fn take_frame(&mut self) -> Option<FrameRGBA> {
        self.frame.take()
    }

    /// Report of the most recent draw.
    pub fn last_report(&self) -> &DrawReport {
        &self.last_report
    }

    /// Panel contents of the most recent step, if any.
    pub fn last_panel(&self) -> Option<&PanelFrame> {
        self.last_panel.as_ref()
    }
}

impl PlaybackView for Visualizer {
    fn show_step(&mut self, step: &StepView<'_>) -> TourscopeResult<()> {
        self.graph
            .update_paths(step.current_tour.clone(), step.best.tour().to_vec());
        self.last_panel = Some(PanelFrame {
            generation_index: step.generation_index,
            total_generations: step.total_generations,
            step_index: step.step_index,
            population_size: step.generation.status.population_size,
            current_solution: step.member.solution_value,
            best_solution: step.best.value(),
            temperature: step.generation.status.temperature,
            variance: step.generation.status.variance,
            variance_history: variance_history(
                step.trace,
                step.generation_index,
                VARIANCE_WINDOW,
            ),
        });
        self.redraw()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/visualizer.rs"]
mod tests;
