//! 2D gradient noise over a coarse grid of random unit vectors.
//!
//! Interpolation between the four surrounding grid nodes is plain bilinear
//! (no smoothstep fade), so the field is continuous but its derivative jumps at
//! cell boundaries. Generated terrain depends on that exact shape.

use glam::DVec2;
use rand::Rng;

use crate::error::TerrainError;
use crate::random;

/// A continuous scalar field built from a `rows × cols` grid of random unit gradients.
pub struct NoiseField {
    cols: usize,
    rows: usize,
    /// Row-major gradient grid, `rows * cols` entries.
    gradients: Vec<DVec2>,
}

impl NoiseField {
    /// Allocate a gradient grid of `grad_rows × grad_cols` independent unit
    /// vectors, each at an angle drawn uniformly from `[0, 2π)`.
    ///
    /// Sampling needs at least two nodes per axis; see [`NoiseField::sample`].
    pub fn new<R: Rng + ?Sized>(grad_cols: usize, grad_rows: usize, rng: &mut R) -> Self {
        let gradients = (0..grad_cols * grad_rows)
            .map(|_| {
                let theta = random::angle(rng);
                DVec2::new(libm::cos(theta), libm::sin(theta))
            })
            .collect();
        Self {
            cols: grad_cols,
            rows: grad_rows,
            gradients,
        }
    }

    /// Number of gradient columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of gradient rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Gradient vector at grid node `(row, col)`.
    #[inline]
    pub fn gradient(&self, row: usize, col: usize) -> DVec2 {
        self.gradients[row * self.cols + col]
    }

    /// Sample the field at `(x, y)`, where `x` runs along columns and `y` along rows.
    ///
    /// Precondition: `0 <= x < cols - 1` and `0 <= y < rows - 1`. This is only
    /// checked in debug builds; use [`NoiseField::try_sample`] for untrusted input.
    ///
    /// Returns exactly `0.0` at integer grid nodes. Values stay within roughly
    /// `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        debug_assert!(
            self.in_range(x, y),
            "noise query ({x}, {y}) outside {}x{} gradient grid",
            self.cols,
            self.rows
        );

        let x0 = x.floor();
        let y0 = y.floor();
        let sx = x - x0;
        let sy = y - y0;
        let col = x0 as usize;
        let row = y0 as usize;

        let p = DVec2::new(x, y);
        let dot = |r: usize, c: usize| {
            let node = DVec2::new(c as f64, r as f64);
            self.gradient(r, c).dot(p - node)
        };

        let n00 = dot(row, col);
        let n10 = dot(row, col + 1);
        let n01 = dot(row + 1, col);
        let n11 = dot(row + 1, col + 1);

        let top = lerp(n00, n10, sx);
        let bottom = lerp(n01, n11, sx);
        lerp(top, bottom, sy)
    }

    /// Checked variant of [`NoiseField::sample`].
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::NoiseOutOfRange`] if `(x, y)` violates the
    /// sampling precondition.
    pub fn try_sample(&self, x: f64, y: f64) -> Result<f64, TerrainError> {
        if !self.in_range(x, y) {
            return Err(TerrainError::NoiseOutOfRange {
                x,
                y,
                max_x: self.cols.saturating_sub(1) as f64,
                max_y: self.rows.saturating_sub(1) as f64,
            });
        }
        Ok(self.sample(x, y))
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        let max_x = self.cols.saturating_sub(1) as f64;
        let max_y = self.rows.saturating_sub(1) as f64;
        (0.0..max_x).contains(&x) && (0.0..max_y).contains(&y)
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
