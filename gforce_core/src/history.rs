//! Bounded FIFO of throttled points backing the trailing trace.

use std::collections::VecDeque;

use crate::types::Point2D;

/// Fixed-capacity window of recent points, oldest first.
///
/// Capacity is fixed at construction; build a new buffer to change it.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    points: VecDeque<Point2D>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Capacity is clamped to at least one point.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Buffer sized for `ceil(render_rate_hz * retention_secs)` ticks.
    pub fn for_window(render_rate_hz: u32, retention_secs: f64) -> Self {
        Self::new(crate::util::history_capacity(render_rate_hz, retention_secs))
    }

    /// Append, evicting the oldest point first when full.
    pub fn push(&mut self, point: Point2D) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Copy of the contents, oldest first.
    pub fn snapshot(&self) -> Vec<Point2D> {
        self.points.iter().copied().collect()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Point2D> + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<Point2D> {
        self.points.back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.points.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
