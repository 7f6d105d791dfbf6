use crate::foundation::color::Rgba8;
use crate::foundation::core::{BezPath, Canvas, Point};
use crate::foundation::error::{TourscopeError, TourscopeResult};
use crate::layout::ring::NodeRing;
use crate::render::backend::{LineStyle, Painter, TextAlign, TextBaseline};
use crate::theme::registry::ThemeState;

/// Spacing of the reference grid.
pub const GRID_SPACING_PX: f64 = 50.0;
/// Node disc radius.
pub const NODE_RADIUS_PX: f64 = 15.0;

const GRID_COLOR: Rgba8 = Rgba8::rgba(200, 200, 200, 153);
const GRID_WIDTH: f64 = 0.5;
const GLOW_INNER: u32 = 5;
const GLOW_FADE: u32 = 10;
const GLOW_EXTENT: u32 = 25;
const NODE_BORDER: Rgba8 = Rgba8::rgb(0x28, 0x28, 0x28);
const NODE_BORDER_WIDTH: f64 = 2.0;
const LABEL_SIZE_PX: f32 = 12.0;
const CURRENT_TOUR_WIDTH: f64 = 2.0;
const BEST_TOUR_WIDTH: f64 = 1.0;
const BEST_TOUR_DASH: [f64; 2] = [5.0, 5.0];

/// Which of the two overlaid tours a report entry refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourKind {
    /// Tour of the member being shown.
    Current,
    /// Best-known tour.
    Best,
}

/// Tours that could not be drawn in one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawReport {
    /// Skipped tours and the error that caused each skip.
    pub skipped: Vec<(TourKind, String)>,
}

impl DrawReport {
    /// `true` when both tours (if any) were drawn.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Whether the given tour was skipped.
    pub fn skipped(&self, kind: TourKind) -> bool {
        self.skipped.iter().any(|(k, _)| *k == kind)
    }
}

/// The node ring plus the current and best-known tours.
#[derive(Clone, Debug)]
pub struct GraphSurface {
    num_nodes: usize,
    canvas: Canvas,
    ring: NodeRing,
    current: Vec<usize>,
    best: Vec<usize>,
}

impl GraphSurface {
    /// Surface for `num_nodes` nodes laid out on `canvas`.
    pub fn new(num_nodes: usize, canvas: Canvas) -> Self {
        Self {
            num_nodes,
            canvas,
            ring: NodeRing::fit(num_nodes, canvas),
            current: Vec::new(),
            best: Vec::new(),
        }
    }

    /// Recompute the node ring for a new canvas size.
    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        self.ring = NodeRing::fit(self.num_nodes, canvas);
    }

    /// Store the tours shown by the next [`GraphSurface::draw`]. Contents are not validated here.
    pub fn update_paths(&mut self, current: Vec<usize>, best: Vec<usize>) {
        self.current = current;
        self.best = best;
    }

    /// Current node ring.
    pub fn ring(&self) -> &NodeRing {
        &self.ring
    }

    /// Canvas the ring was fitted to.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Draw grid, best tour, current tour and nodes, in that order.
    ///
    /// A tour referencing a node outside the ring is skipped for this frame and reported; the
    /// rest of the frame still renders.
    pub fn draw(&self, painter: &mut Painter, theme: &ThemeState) -> TourscopeResult<DrawReport> {
        let palette = theme.current_theme();
        let mut report = DrawReport::default();

        self.draw_grid(painter);

        if !self.best.is_empty()
            && let Err(err) = self.draw_tour(
                painter,
                &self.best,
                palette.best_path,
                &LineStyle::dashed(BEST_TOUR_WIDTH, BEST_TOUR_DASH),
            )
        {
            report.skip(TourKind::Best, err)?;
        }
        if let Some(&first) = self.current.first() {
            let color = theme.path_color(first);
            if let Err(err) = self.draw_tour(
                painter,
                &self.current,
                color,
                &LineStyle::solid(CURRENT_TOUR_WIDTH),
            ) {
                report.skip(TourKind::Current, err)?;
            }
        }

        for node in self.ring.nodes() {
            painter.radial_glow(node.center, palette.node, GLOW_INNER, GLOW_FADE, GLOW_EXTENT)?;
            painter.fill_circle(node.center, NODE_RADIUS_PX, palette.node);
            painter.stroke_circle(node.center, NODE_RADIUS_PX, NODE_BORDER, NODE_BORDER_WIDTH);
            painter.text(
                &node.id.to_string(),
                node.center,
                LABEL_SIZE_PX,
                Rgba8::WHITE,
                TextAlign::Center,
                TextBaseline::Middle,
            )?;
        }
        Ok(report)
    }

    fn draw_grid(&self, painter: &mut Painter) {
        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);
        let style = LineStyle::solid(GRID_WIDTH);

        let mut x = GRID_SPACING_PX;
        while x < w {
            let mut line = BezPath::new();
            line.move_to((x, 0.0));
            line.line_to((x, h));
            painter.stroke_path(&line, GRID_COLOR, &style);
            x += GRID_SPACING_PX;
        }
        let mut y = GRID_SPACING_PX;
        while y < h {
            let mut line = BezPath::new();
            line.move_to((0.0, y));
            line.line_to((w, y));
            painter.stroke_path(&line, GRID_COLOR, &style);
            y += GRID_SPACING_PX;
        }
    }

    fn draw_tour(
        &self,
        painter: &mut Painter,
        tour: &[usize],
        color: Rgba8,
        style: &LineStyle,
    ) -> TourscopeResult<()> {
        if tour.len() < 2 {
            return Ok(());
        }
        let points = self.ring.tour_points(tour)?;
        painter.stroke_path(&closed_polyline(&points), color, style);
        Ok(())
    }
}

impl DrawReport {
    fn skip(&mut self, kind: TourKind, err: TourscopeError) -> TourscopeResult<()> {
        if !err.is_per_frame() {
            return Err(err);
        }
        tracing::warn!(tour = ?kind, error = %err, "tour skipped for this frame");
        self.skipped.push((kind, err.to_string()));
        Ok(())
    }
}

fn closed_polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/render/graph.rs"]
mod tests;
