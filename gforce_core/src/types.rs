//! Value types flowing through the pipeline.

pub use gforce_traits::AccelerationSample;

/// A sample projected onto the graph plane: `x` is lateral, `y` is longitudinal.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    #[inline]
    pub fn offset(self, by: Point2D) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

/// The four directions whose peak load is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Acceleration,
    Braking,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Acceleration,
        Direction::Braking,
        Direction::Left,
        Direction::Right,
    ];

    /// Display label used next to the graph.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Acceleration => "Max Accel",
            Direction::Braking => "Max Braking",
            Direction::Left => "Max Left",
            Direction::Right => "Max Right",
        }
    }
}
