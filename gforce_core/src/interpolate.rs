//! Dense trace reconstruction from the sparse throttled history.
//!
//! History points arrive at the render rate, but the rendered dot moves at
//! sensor rate. Plotting the history directly leaves the trailing line visibly
//! behind the dot, so the trace is resampled to sensor-rate density:
//!
//! 1. `count = round(sensor_rate / render_rate * n)` output positions are laid
//!    out evenly over index space `[0, n - 1]`.
//! 2. Each position keeps its integer part and eases its fractional part
//!    through smoothstep, so the path slows into and out of every knot.
//! 3. Each coordinate channel is evaluated at the eased positions with a
//!    quadratic through three neighbouring knots (linear when only two exist).
//! 4. Everything is multiplied by the caller's display scale.

use crate::types::Point2D;

/// Stateless resampler; holds only the two rates that set the density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceInterpolator {
    sensor_rate_hz: u32,
    render_rate_hz: u32,
}

impl TraceInterpolator {
    pub fn new(sensor_rate_hz: u32, render_rate_hz: u32) -> Self {
        Self {
            sensor_rate_hz,
            render_rate_hz,
        }
    }

    /// Output points per history point.
    pub fn density_ratio(&self) -> f64 {
        f64::from(self.sensor_rate_hz) / f64::from(self.render_rate_hz.max(1))
    }

    /// Output length for a history of `n` points.
    pub fn target_len(&self, n: usize) -> usize {
        match n {
            0 => 0,
            1 => 1,
            _ => {
                let count = (self.density_ratio() * n as f64).round();
                if count.is_finite() && count > 0.0 {
                    count as usize
                } else {
                    0
                }
            }
        }
    }

    /// Resample `history` (oldest first) into a dense, smooth polyline scaled by `scale`.
    ///
    /// Deterministic and side-effect free.
    pub fn interpolate(&self, history: &[Point2D], scale: f64) -> Vec<Point2D> {
        let n = history.len();
        match n {
            0 => return Vec::new(),
            1 => return vec![history[0].scaled(scale)],
            _ => {}
        }

        let positions = eased_positions(n, self.target_len(n));
        let xs: Vec<f64> = history.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = history.iter().map(|p| p.y).collect();
        let out_x = quadratic_channel(&xs, &positions);
        let out_y = quadratic_channel(&ys, &positions);

        if out_x.len() != out_y.len() {
            tracing::warn!(
                x_len = out_x.len(),
                y_len = out_y.len(),
                "trace channels disagree in length; dropping path"
            );
            return Vec::new();
        }

        out_x
            .into_iter()
            .zip(out_y)
            .map(|(x, y)| Point2D::new(x * scale, y * scale))
            .collect()
    }
}

/// Hermite smoothstep of `x` between two edges, clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// `count` non-decreasing positions spanning `[0, n - 1]`, fractional parts eased.
fn eased_positions(n: usize, count: usize) -> Vec<f64> {
    let last = (n - 1) as f64;
    let step = if count > 1 {
        last / (count - 1) as f64
    } else {
        0.0
    };
    (0..count)
        .map(|i| {
            // Pin the final position so rounding cannot leave the last knot short.
            let p = if i + 1 == count && count > 1 {
                last
            } else {
                i as f64 * step
            };
            let base = p.floor();
            base + smoothstep(0.0, 1.0, p - base)
        })
        .collect()
}

/// Evaluate one coordinate channel at fractional index positions.
///
/// With three or more knots, each position uses the quadratic through knots
/// `c - 1, c, c + 1`, where `c = floor(p)` clamped to `[1, n - 2]`. The curve
/// passes through every knot, so neighbouring segments meet without jumps.
fn quadratic_channel(values: &[f64], positions: &[f64]) -> Vec<f64> {
    let n = values.len();
    positions
        .iter()
        .map(|&p| {
            if n == 2 {
                let t = p.clamp(0.0, 1.0);
                return values[0] + t * (values[1] - values[0]);
            }
            let c = (p.floor() as usize).clamp(1, n - 2);
            let t = p - c as f64;
            let (a, b, d) = (values[c - 1], values[c], values[c + 1]);
            a * t * (t - 1.0) * 0.5 + b * (1.0 - t * t) + d * t * (t + 1.0) * 0.5
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point2D, b: Point2D) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < EPS);
        assert_eq!(smoothstep(0.0, 1.0, -2.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 7.0), 1.0);
    }

    #[test]
    fn empty_history_gives_empty_path() {
        let ti = TraceInterpolator::new(100, 15);
        assert!(ti.interpolate(&[], 1.0).is_empty());
        assert!(ti.interpolate(&[], 250.0).is_empty());
    }

    #[test]
    fn single_point_is_scaled_through() {
        let ti = TraceInterpolator::new(100, 15);
        let out = ti.interpolate(&[Point2D::new(0.5, -1.0)], 2.0);
        assert_eq!(out, vec![Point2D::new(1.0, -2.0)]);
    }

    #[test]
    fn two_points_bridge_monotonically() {
        let ti = TraceInterpolator::new(100, 10);
        let out = ti.interpolate(&[Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)], 1.0);
        assert_eq!(out.len(), 20);
        assert!(close(out[0], Point2D::new(0.0, 0.0)));
        assert!(close(out[19], Point2D::new(1.0, 1.0)));
        for w in out.windows(2) {
            assert!(w[1].x >= w[0].x);
            assert!(w[1].y >= w[0].y);
        }
    }

    #[test]
    fn quadratic_passes_through_knots() {
        // density 1 with count == n puts positions exactly on the knots.
        let ti = TraceInterpolator::new(10, 10);
        let hist = [
            Point2D::new(0.0, 1.0),
            Point2D::new(2.0, -1.0),
            Point2D::new(1.0, 4.0),
            Point2D::new(-3.0, 0.5),
        ];
        let out = ti.interpolate(&hist, 1.0);
        assert_eq!(out.len(), 4);
        for (o, h) in out.iter().zip(hist.iter()) {
            assert!(close(*o, *h), "{o:?} vs {h:?}");
        }
    }

    #[test]
    fn quadratic_reproduces_a_parabola() {
        // y = x^2 sampled at integer knots is reproduced exactly in between.
        let hist: Vec<Point2D> = (0..5)
            .map(|i| Point2D::new(i as f64, (i * i) as f64))
            .collect();
        let positions = [0.25, 1.5, 2.75, 3.9];
        let xs: Vec<f64> = hist.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = hist.iter().map(|p| p.y).collect();
        let qx = quadratic_channel(&xs, &positions);
        let qy = quadratic_channel(&ys, &positions);
        for ((x, y), p) in qx.iter().zip(qy.iter()).zip(positions.iter()) {
            assert!((x - p).abs() < EPS);
            assert!((y - p * p).abs() < EPS);
        }
    }

    #[test]
    fn positions_are_non_decreasing_and_span_the_history() {
        let pos = eased_positions(6, 40);
        assert_eq!(pos.len(), 40);
        assert_eq!(pos[0], 0.0);
        assert_eq!(pos[39], 5.0);
        for w in pos.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn target_len_follows_density() {
        let ti = TraceInterpolator::new(100, 15);
        assert_eq!(ti.target_len(0), 0);
        assert_eq!(ti.target_len(1), 1);
        assert_eq!(ti.target_len(2), 13);
        assert_eq!(ti.target_len(30), 200);
    }

    #[test]
    fn output_is_deterministic() {
        let ti = TraceInterpolator::new(100, 15);
        let hist: Vec<Point2D> = (0..12)
            .map(|i| Point2D::new((i as f64).sin(), (i as f64 * 0.7).cos()))
            .collect();
        assert_eq!(ti.interpolate(&hist, 3.0), ti.interpolate(&hist, 3.0));
    }
}
