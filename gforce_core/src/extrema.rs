//! Running peak loads in four directions.

use crate::axes::AxisMap;
use crate::types::{AccelerationSample, Direction};

/// Peak signed readings since the last reset.
///
/// With the configured sign convention, `max_acceleration >= 0 >= max_braking`
/// and `max_left >= 0 >= max_right` always hold, since every field starts at
/// zero and only ever moves away from it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ExtremaState {
    pub max_acceleration: f64,
    pub max_braking: f64,
    pub max_left: f64,
    pub max_right: f64,
}

impl ExtremaState {
    pub const ZERO: Self = Self {
        max_acceleration: 0.0,
        max_braking: 0.0,
        max_left: 0.0,
        max_right: 0.0,
    };

    /// Signed peak for one direction.
    pub fn value(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Acceleration => self.max_acceleration,
            Direction::Braking => self.max_braking,
            Direction::Left => self.max_left,
            Direction::Right => self.max_right,
        }
    }

    /// Unsigned peak, as shown on the labels.
    pub fn magnitude(&self, direction: Direction) -> f64 {
        self.value(direction).abs()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Folds raw samples into `ExtremaState`. O(1) per sample, no allocation.
#[derive(Debug, Clone, Default)]
pub struct ExtremaTracker {
    axes: AxisMap,
    state: ExtremaState,
}

impl ExtremaTracker {
    pub fn new(axes: AxisMap) -> Self {
        Self {
            axes,
            state: ExtremaState::ZERO,
        }
    }

    pub fn observe(&mut self, sample: &AccelerationSample) -> ExtremaState {
        let long = self.axes.longitudinal(sample);
        let lat = self.axes.lateral(sample);
        let s = &mut self.state;

        // A single value can extend at most one side of its axis.
        if long > s.max_acceleration {
            s.max_acceleration = long;
        } else if long < s.max_braking {
            s.max_braking = long;
        }

        if lat > s.max_left {
            s.max_left = lat;
        } else if lat < s.max_right {
            s.max_right = lat;
        }

        *s
    }

    pub fn state(&self) -> ExtremaState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ExtremaState::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::Axis;

    fn s(x: f64, z: f64) -> AccelerationSample {
        AccelerationSample::new(x, 0.0, z)
    }

    #[test]
    fn tracks_each_side_independently() {
        let mut t = ExtremaTracker::default();
        t.observe(&s(0.4, 0.9));
        t.observe(&s(-0.6, -1.1));
        t.observe(&s(0.1, 0.2));
        let e = t.state();
        assert_eq!(e.max_acceleration, 0.9);
        assert_eq!(e.max_braking, -1.1);
        assert_eq!(e.max_left, 0.4);
        assert_eq!(e.max_right, -0.6);
    }

    #[test]
    fn nan_never_becomes_a_peak() {
        let mut t = ExtremaTracker::default();
        t.observe(&s(f64::NAN, f64::NAN));
        assert!(t.state().is_zero());
    }

    #[test]
    fn reset_zeroes_and_is_idempotent() {
        let mut t = ExtremaTracker::default();
        t.observe(&s(1.0, -2.0));
        t.reset();
        let once = t.state();
        t.reset();
        assert_eq!(once, ExtremaState::ZERO);
        assert_eq!(t.state(), once);
    }

    #[test]
    fn inverted_convention_swaps_acceleration_and_braking() {
        let axes = AxisMap {
            invert_longitudinal: true,
            ..AxisMap::default()
        };
        let mut t = ExtremaTracker::new(axes);
        t.observe(&s(0.0, 1.0));
        let e = t.state();
        assert_eq!(e.max_acceleration, 0.0);
        assert_eq!(e.max_braking, -1.0);
    }

    #[test]
    fn remapped_lateral_axis_reads_y() {
        let axes = AxisMap {
            lateral: Axis::Y,
            ..AxisMap::default()
        };
        let mut t = ExtremaTracker::new(axes);
        t.observe(&AccelerationSample::new(5.0, -0.3, 0.0));
        assert_eq!(t.state().max_right, -0.3);
        assert_eq!(t.state().max_left, 0.0);
    }

    #[test]
    fn magnitudes_are_unsigned() {
        let e = ExtremaState {
            max_braking: -0.75,
            ..ExtremaState::ZERO
        };
        assert_eq!(e.magnitude(Direction::Braking), 0.75);
        assert_eq!(e.value(Direction::Braking), -0.75);
    }
}
