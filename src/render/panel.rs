use crate::foundation::color::Rgba8;
use crate::foundation::core::{BezPath, Point, Rect};
use crate::foundation::error::TourscopeResult;
use crate::render::backend::{LineStyle, Painter, TextAlign, TextBaseline};
use crate::theme::registry::ThemeState;
use crate::trace::store::Trace;

/// Temperature mapped to an empty gauge.
pub const TEMPERATURE_COLD: f64 = 1.0;
/// Temperature mapped to a full gauge.
pub const TEMPERATURE_HOT: f64 = 1.5;
/// Variance values are clamped to this ceiling in the sparkline.
pub const VARIANCE_CEILING: f64 = 1500.0;
/// Number of prior generations shown next to the current one in the sparkline.
pub const VARIANCE_WINDOW: usize = 10;

const PANEL: Rect = Rect::new(20.0, 20.0, 300.0, 300.0);
const BACKING: Rect = Rect::new(15.0, 15.0, 305.0, 305.0);
const BACKING_COLOR: Rgba8 = Rgba8::rgba(0, 0, 0, 179);
const PANEL_COLOR: Rgba8 = Rgba8::rgba(255, 255, 255, 242);
const TRACK_COLOR: Rgba8 = Rgba8::rgb(0xf0, 0xf0, 0xf0);
const SCALE_COLOR: Rgba8 = Rgba8::rgb(0xdd, 0xdd, 0xdd);
const SCALE_LABEL_COLOR: Rgba8 = Rgba8::rgb(0x66, 0x66, 0x66);
const SCALE_VALUES: [f64; 4] = [0.0, 500.0, 1000.0, 1500.0];

const TEXT_X: f64 = 35.0;
const FIRST_LINE_Y: f64 = 45.0;
const LINE_HEIGHT: f64 = 22.0;
const TEXT_SIZE_PX: f32 = 14.0;
const SCALE_TEXT_SIZE_PX: f32 = 10.0;

const GAUGE: Rect = Rect::new(35.0, 155.0, 285.0, 175.0);
const GAUGE_LABEL_Y: f64 = 142.0;
const GRAPH: Rect = Rect::new(35.0, 210.0, 285.0, 250.0);
const GRAPH_LABEL_Y: f64 = 197.0;
const POINT_RADIUS: f64 = 3.0;

/// Everything the stats panel shows for one step.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelFrame {
    /// 0-based generation index.
    pub generation_index: usize,
    /// Number of generations in the trace.
    pub total_generations: usize,
    /// 0-based member index within the generation.
    pub step_index: usize,
    /// `status.population_size` of the generation.
    pub population_size: usize,
    /// Cost of the member being shown.
    pub current_solution: f64,
    /// Best cost seen so far.
    pub best_solution: Option<f64>,
    /// Generation temperature.
    pub temperature: f64,
    /// Generation variance.
    pub variance: f64,
    /// Variances of up to [`VARIANCE_WINDOW`] prior generations followed by the current one.
    pub variance_history: Vec<f64>,
}

impl PanelFrame {
    /// The four counter lines, top to bottom.
    pub fn stat_lines(&self) -> [String; 4] {
        let best = self
            .best_solution
            .map_or_else(|| "n/a".to_string(), |b| b.to_string());
        [
            format!(
                "Generation: {} / {}",
                self.generation_index + 1,
                self.total_generations
            ),
            format!(
                "Population Member: {} / {}",
                self.step_index + 1,
                self.population_size
            ),
            format!("Current Solution: {}", self.current_solution),
            format!("Best Solution Ever: {best}"),
        ]
    }
}

/// Gauge fill for `temperature`, clamped to `0..=1` (NaN reads as cold).
pub fn temperature_fraction(temperature: f64) -> f64 {
    let f = (temperature - TEMPERATURE_COLD) / (TEMPERATURE_HOT - TEMPERATURE_COLD);
    if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) }
}

/// Gauge color: green when cold, red when hot.
pub fn temperature_color(fraction: f64) -> Rgba8 {
    let hue = ((1.0 - fraction) * 120.0).max(0.0);
    Rgba8::from_hsl(hue, 1.0, 0.5)
}

/// Variances of generations `max(0, g - window)..=g` that exist in `trace`.
pub fn variance_history(trace: &Trace, generation_index: usize, window: usize) -> Vec<f64> {
    let start = generation_index.saturating_sub(window);
    (start..=generation_index)
        .filter_map(|i| trace.generation(i))
        .map(|g| g.status.variance)
        .collect()
}

/// Plot positions of `history` inside `area`, left to right.
pub fn sparkline_points(history: &[f64], area: Rect) -> Vec<Point> {
    let step = area.width() / history.len().saturating_sub(1).max(1) as f64;
    history
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, VARIANCE_CEILING) };
            Point::new(
                area.x0 + i as f64 * step,
                area.y1 - v / VARIANCE_CEILING * area.height(),
            )
        })
        .collect()
}

/// Fixed-position overlay with counters, temperature gauge and variance sparkline.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatsPanel;

impl StatsPanel {
    /// Draw the panel for `frame`.
    pub fn draw(
        &self,
        painter: &mut Painter,
        theme: &ThemeState,
        frame: &PanelFrame,
    ) -> TourscopeResult<()> {
        let accent = theme.current_theme().panel;

        painter.fill_rect(BACKING, BACKING_COLOR);
        painter.fill_rect(PANEL, PANEL_COLOR);
        painter.stroke_rect(PANEL, accent, &LineStyle::solid(2.0));

        let mut y = FIRST_LINE_Y;
        for line in frame.stat_lines() {
            label(painter, &line, y, TEXT_SIZE_PX, Rgba8::BLACK)?;
            y += LINE_HEIGHT;
        }

        self.draw_temperature(painter, frame.temperature)?;
        self.draw_variance(painter, accent, frame)
    }

    fn draw_temperature(&self, painter: &mut Painter, temperature: f64) -> TourscopeResult<()> {
        label(
            painter,
            &format!("Temperature: {temperature}"),
            GAUGE_LABEL_Y,
            TEXT_SIZE_PX,
            Rgba8::BLACK,
        )?;
        painter.fill_rect(GAUGE, TRACK_COLOR);
        let fraction = temperature_fraction(temperature);
        if fraction > 0.0 {
            let fill = Rect::new(
                GAUGE.x0,
                GAUGE.y0,
                GAUGE.x0 + GAUGE.width() * fraction,
                GAUGE.y1,
            );
            painter.fill_rect(fill, temperature_color(fraction));
        }
        Ok(())
    }

    fn draw_variance(
        &self,
        painter: &mut Painter,
        accent: Rgba8,
        frame: &PanelFrame,
    ) -> TourscopeResult<()> {
        label(
            painter,
            &format!("Population Variance: {:.2}", frame.variance),
            GRAPH_LABEL_Y,
            TEXT_SIZE_PX,
            Rgba8::BLACK,
        )?;
        painter.fill_rect(GRAPH, TRACK_COLOR);

        let scale_style = LineStyle::dashed(1.0, [2.0, 2.0]);
        for value in SCALE_VALUES {
            let y = GRAPH.y1 - value / VARIANCE_CEILING * GRAPH.height();
            let mut line = BezPath::new();
            line.move_to((GRAPH.x0, y));
            line.line_to((GRAPH.x1, y));
            painter.stroke_path(&line, SCALE_COLOR, &scale_style);
            painter.text(
                &value.to_string(),
                Point::new(GRAPH.x0 + 5.0, y + 3.0),
                SCALE_TEXT_SIZE_PX,
                SCALE_LABEL_COLOR,
                TextAlign::Left,
                TextBaseline::Alphabetic,
            )?;
        }

        let points = sparkline_points(&frame.variance_history, GRAPH);
        if points.len() > 1 {
            let mut line = BezPath::new();
            line.move_to(points[0]);
            for p in &points[1..] {
                line.line_to(*p);
            }
            painter.stroke_path(&line, accent, &LineStyle::solid(2.0));
        }
        for p in points {
            painter.fill_circle(p, POINT_RADIUS, accent);
        }
        Ok(())
    }
}

fn label(painter: &mut Painter, text: &str, y: f64, size: f32, color: Rgba8) -> TourscopeResult<()> {
    painter.text(
        text,
        Point::new(TEXT_X, y),
        size,
        color,
        TextAlign::Left,
        TextBaseline::Alphabetic,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/panel.rs"]
mod tests;
