//! Monotone cubic Hermite (PCHIP) interpolation.

use crate::error::{MathError, MathResult};

/// Piecewise Cubic Hermite Interpolating Polynomial.
///
/// Shape-preserving cubic interpolation using Fritsch-Carlson derivative
/// estimates: where the data is monotone the interpolant is monotone, which
/// is exactly the property a log-discount-factor curve needs (no spurious
/// oscillation between nodes, no negative implied forwards from overshoot).
///
/// Extrapolation, when enabled, evaluates the boundary cubic beyond the
/// data range.
///
/// # Example
///
/// ```rust
/// use strata_math::interpolation::Pchip;
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, -0.01, -0.022, -0.035];
///
/// let interp = Pchip::new(xs, ys).unwrap();
/// let y = interp.value(1.5).unwrap();
/// assert!(y < -0.01 && y > -0.022);
/// ```
#[derive(Debug, Clone)]
pub struct Pchip {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// First derivatives at each knot.
    ds: Vec<f64>,
    allow_extrapolation: bool,
}

impl Pchip {
    /// Creates a PCHIP interpolant through the given points.
    ///
    /// # Arguments
    ///
    /// * `xs` - Abscissas, strictly increasing
    /// * `ys` - Ordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, the lengths
    /// differ, or the abscissas are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < 2 {
            return Err(MathError::insufficient_data(2, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        for i in 1..xs.len() {
            if xs[i] <= xs[i - 1] {
                return Err(MathError::invalid_input(
                    "x values must be strictly increasing",
                ));
            }
        }

        let ds = fritsch_carlson_derivatives(&xs, &ys);

        Ok(Self {
            xs,
            ys,
            ds,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Returns the smallest abscissa.
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.xs[0]
    }

    /// Returns the largest abscissa.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Evaluates the interpolant at `x`.
    ///
    /// # Errors
    ///
    /// Returns `MathError::ExtrapolationNotAllowed` when `x` is outside the
    /// data range and extrapolation is disabled.
    pub fn value(&self, x: f64) -> MathResult<f64> {
        if !self.allow_extrapolation && (x < self.min_x() || x > self.max_x()) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            });
        }

        let i = self.find_segment(x);

        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;

        // Cubic Hermite basis.
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        Ok(h00 * self.ys[i]
            + h10 * h * self.ds[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.ds[i + 1])
    }

    /// Finds the index `i` such that `xs[i] <= x < xs[i+1]`, clamping to
    /// the boundary segments for extrapolation.
    fn find_segment(&self, x: f64) -> usize {
        match self
            .xs
            .binary_search_by(|knot| knot.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i.min(self.xs.len() - 2),
            Err(i) => i.saturating_sub(1).min(self.xs.len() - 2),
        }
    }
}

/// Fritsch-Carlson shape-preserving derivative estimates.
fn fritsch_carlson_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let hs: Vec<f64> = (0..n - 1).map(|i| xs[i + 1] - xs[i]).collect();
    let deltas: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / hs[i]).collect();

    if n == 2 {
        return vec![deltas[0], deltas[0]];
    }

    let mut ds = vec![0.0; n];

    for k in 1..n - 1 {
        let (d_prev, d_next) = (deltas[k - 1], deltas[k]);
        if d_prev == 0.0 || d_next == 0.0 || (d_prev > 0.0) != (d_next > 0.0) {
            ds[k] = 0.0;
        } else {
            // Weighted harmonic mean of the neighboring secant slopes.
            let w1 = 2.0 * hs[k] + hs[k - 1];
            let w2 = hs[k] + 2.0 * hs[k - 1];
            ds[k] = (w1 + w2) / (w1 / d_prev + w2 / d_next);
        }
    }

    ds[0] = edge_derivative(hs[0], hs[1], deltas[0], deltas[1]);
    ds[n - 1] = edge_derivative(hs[n - 2], hs[n - 3], deltas[n - 2], deltas[n - 3]);

    ds
}

/// One-sided three-point derivative estimate at a boundary, clipped so the
/// interpolant stays monotone near the end segment.
fn edge_derivative(h0: f64, h1: f64, delta0: f64, delta1: f64) -> f64 {
    let mut d = ((2.0 * h0 + h1) * delta0 - h0 * delta1) / (h0 + h1);

    if d.signum() != delta0.signum() {
        d = 0.0;
    } else if delta0.signum() != delta1.signum() && d.abs() > 3.0 * delta0.abs() {
        d = 3.0 * delta0;
    }

    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_passes_through_knots() {
        let xs = vec![0.0, 1.0, 2.5, 4.0, 7.0];
        let ys = vec![0.0, -0.004, -0.011, -0.019, -0.036];
        let interp = Pchip::new(xs.clone(), ys.clone()).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(interp.value(*x).unwrap(), *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_monotone_data_stays_monotone() {
        let xs = vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0];
        let ys = vec![0.0, -0.01, -0.021, -0.034, -0.06, -0.13];
        let interp = Pchip::new(xs, ys).unwrap();

        let mut prev = interp.value(0.0).unwrap();
        let mut x = 0.05;
        while x < 10.0 {
            let y = interp.value(x).unwrap();
            assert!(y <= prev + 1e-12, "not monotone at x = {x}");
            prev = y;
            x += 0.05;
        }
    }

    #[test]
    fn test_two_points_is_linear() {
        let interp = Pchip::new(vec![0.0, 2.0], vec![1.0, 3.0]).unwrap();
        assert_relative_eq!(interp.value(1.0).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_gated() {
        let interp = Pchip::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();
        assert!(matches!(
            interp.value(3.0),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
        let extrap = interp.with_extrapolation();
        assert_relative_eq!(extrap.value(3.0).unwrap(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_unsorted() {
        assert!(Pchip::new(vec![0.0, 0.0, 1.0], vec![1.0, 2.0, 3.0]).is_err());
    }
}
