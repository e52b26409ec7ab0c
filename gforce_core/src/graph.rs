//! Canvas geometry for the G-force graph.
//!
//! Canvas axes point right and down. A positive lateral reading draws to the
//! left of center and a positive longitudinal reading draws above it, so both
//! coordinates are mirrored when mapped onto the canvas.

use crate::telemetry::TelemetrySnapshot;
use crate::types::Point2D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphGeometry {
    /// G value at the outer edge of the graph.
    pub outer_edge_g: f64,
    /// Graph bounds divided by the dot diameter.
    pub dot_ratio: f64,
}

impl Default for GraphGeometry {
    fn default() -> Self {
        Self {
            outer_edge_g: 3.0,
            dot_ratio: 20.0,
        }
    }
}

impl GraphGeometry {
    /// Lay the graph out on a `width` x `height` canvas.
    pub fn layout(&self, width: f64, height: f64) -> GraphLayout {
        let bounds = width.min(height).max(0.0);
        let outer = if self.outer_edge_g > 0.0 {
            self.outer_edge_g
        } else {
            1.0
        };
        GraphLayout {
            bounds,
            scale: bounds / outer,
            dot_diameter: bounds / self.dot_ratio.max(1.0),
            center: Point2D::new(width / 2.0, height / 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphLayout {
    /// Side of the square the graph occupies.
    pub bounds: f64,
    /// Canvas units per G.
    pub scale: f64,
    pub dot_diameter: f64,
    pub center: Point2D,
}

impl GraphLayout {
    /// Canvas position of the dot for a point in G.
    pub fn dot_position(&self, point: Point2D) -> Point2D {
        point.scaled(-self.scale).offset(self.center)
    }

    /// Trailing trace of `snapshot` in canvas coordinates.
    pub fn trace(&self, snapshot: &TelemetrySnapshot) -> Vec<Point2D> {
        snapshot
            .trace_path(-self.scale)
            .into_iter()
            .map(|p| p.offset(self.center))
            .collect()
    }
}
