use std::f64::consts::TAU;

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{TourscopeError, TourscopeResult};

/// Horizontal band reserved for the stats panel overlay on the left edge.
pub const PANEL_RESERVE_PX: f64 = 310.0;
/// Gap kept between the ring and the edge of its area.
pub const RING_MARGIN_PX: f64 = 40.0;

/// One node of the ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePosition {
    /// 1-based node id, as shown in labels.
    pub id: u32,
    /// Center in canvas pixels.
    pub center: Point,
}

/// Evenly spaced node positions on a circle.
///
/// Node `i` (0-based) sits at angle `i·2π/n − π/2`: node 0 at the top, proceeding clockwise in
/// screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRing {
    center: Point,
    radius: f64,
    nodes: Vec<NodePosition>,
}

impl NodeRing {
    /// Place `num_nodes` nodes on the circle (`center`, `radius`).
    pub fn new(num_nodes: usize, center: Point, radius: f64) -> Self {
        let radius = radius.max(0.0);
        let nodes = (0..num_nodes)
            .map(|i| {
                let angle = i as f64 * TAU / num_nodes as f64 - TAU / 4.0;
                NodePosition {
                    id: u32::try_from(i + 1).unwrap_or(u32::MAX),
                    center: Point::new(
                        center.x + radius * angle.cos(),
                        center.y + radius * angle.sin(),
                    ),
                }
            })
            .collect();
        Self {
            center,
            radius,
            nodes,
        }
    }

    /// Fit the ring into `canvas`, leaving room for the stats panel on the left.
    ///
    /// When the canvas is too narrow to spare the panel band, the full width is used and the
    /// panel overlaps the ring.
    pub fn fit(num_nodes: usize, canvas: Canvas) -> Self {
        let width = f64::from(canvas.width);
        let height = f64::from(canvas.height);
        let (left, area_w) = if width - PANEL_RESERVE_PX >= height.min(width) * 0.5 {
            (PANEL_RESERVE_PX, width - PANEL_RESERVE_PX)
        } else {
            (0.0, width)
        };
        let center = Point::new(left + area_w / 2.0, height / 2.0);
        let radius = area_w.min(height) / 2.0 - RING_MARGIN_PX;
        Self::new(num_nodes, center, radius)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the ring has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at 0-based `index`.
    pub fn get(&self, index: usize) -> Option<&NodePosition> {
        self.nodes.get(index)
    }

    /// All nodes in index order.
    pub fn nodes(&self) -> &[NodePosition] {
        &self.nodes
    }

    /// Ring center.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Ring radius (never negative).
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Resolve a 0-based tour to node centers.
    ///
    /// The first index outside the ring yields [`TourscopeError::InvalidTourIndex`].
    pub fn tour_points(&self, tour: &[usize]) -> TourscopeResult<Vec<Point>> {
        tour.iter()
            .map(|&index| {
                self.get(index)
                    .map(|n| n.center)
                    .ok_or(TourscopeError::InvalidTourIndex {
                        index,
                        num_nodes: self.len(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/ring.rs"]
mod tests;
