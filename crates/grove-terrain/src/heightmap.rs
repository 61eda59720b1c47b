//! Heightmap grids: noise sampling onto a fine grid and box-blur smoothing.

use rand::Rng;

use crate::error::{TerrainError, check_resolution};
use crate::noise_field::NoiseField;

/// A `rows × cols` grid of terrain heights, stored row-major.
///
/// Heights are raw interpolated noise values with no fixed range. The grid is
/// read-only once built; the mesher and the scatterer both read the same one.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightmap {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Heightmap {
    /// Build a heightmap by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data }
    }

    /// Build a heightmap from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::RaggedRows`] if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TerrainError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(TerrainError::RaggedRows {
                row,
                len: r.len(),
                expected: cols,
            });
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows (`ny`).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`nx`).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Height at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the grid.
    #[inline]
    pub fn height_at(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} heightmap",
            self.rows,
            self.cols
        );
        self.data[row * self.cols + col]
    }

    /// Height at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    /// One row of heights.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// All heights, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Smallest and largest height, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data.iter().fold(None, |acc, &h| match acc {
            None => Some((h, h)),
            Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
        })
    }

    /// One box-blur pass with a square kernel of half-width `kernel_width / 2`.
    ///
    /// Every cell becomes the mean of the in-bounds cells of its window. Cells
    /// outside the grid are skipped rather than clamped or wrapped, so edge and
    /// corner cells average fewer samples than interior ones. The result is a
    /// new grid; the pass never reads values it has already written.
    pub fn box_blur(&self, kernel_width: usize) -> Self {
        let half = kernel_width / 2;
        Self::from_fn(self.rows, self.cols, |row, col| {
            let r0 = row.saturating_sub(half);
            let r1 = (row + half).min(self.rows - 1);
            let c0 = col.saturating_sub(half);
            let c1 = (col + half).min(self.cols - 1);
            let mut sum = 0.0;
            let mut count = 0usize;
            for r in r0..=r1 {
                for &h in &self.row(r)[c0..=c1] {
                    sum += h;
                    count += 1;
                }
            }
            sum / count as f64
        })
    }
}

/// Parameters for noise-based heightmap generation.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapParams {
    /// Gradient grid columns. At least 2.
    pub grad_cols: usize,
    /// Gradient grid rows. At least 2.
    pub grad_rows: usize,
    /// Heightmap columns. At least 2.
    pub nx: usize,
    /// Heightmap rows. At least 2.
    pub ny: usize,
    /// Number of sequential box-blur passes. 0 keeps the raw noise.
    pub smooth_passes: u32,
    /// Box-blur window width in cells. At least 1, at most `min(nx, ny)`.
    pub smooth_kernel_width: usize,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            grad_cols: 5,
            grad_rows: 5,
            nx: 100,
            ny: 100,
            smooth_passes: 2,
            smooth_kernel_width: 3,
        }
    }
}

impl HeightmapParams {
    /// Check every precondition of [`HeightmapBuilder::build`].
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition.
    pub fn validate(&self) -> Result<(), TerrainError> {
        check_resolution("grad_cols", self.grad_cols, 2)?;
        check_resolution("grad_rows", self.grad_rows, 2)?;
        check_resolution("nx", self.nx, 2)?;
        check_resolution("ny", self.ny, 2)?;
        check_resolution("smooth_kernel_width", self.smooth_kernel_width, 1)?;
        if self.smooth_kernel_width > self.nx || self.smooth_kernel_width > self.ny {
            return Err(TerrainError::KernelTooWide {
                width: self.smooth_kernel_width,
                nx: self.nx,
                ny: self.ny,
            });
        }
        Ok(())
    }
}

/// Samples a [`NoiseField`] onto a heightmap grid and smooths it.
pub struct HeightmapBuilder {
    params: HeightmapParams,
}

impl HeightmapBuilder {
    /// Create a builder after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns a [`TerrainError`] if the parameters violate a precondition.
    pub fn new(params: HeightmapParams) -> Result<Self, TerrainError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }

    /// Build the raw noise heightmap, before smoothing.
    ///
    /// Cell `(row, col)` samples the field at
    /// `x = col·(grad_cols-1)/nx`, `y = row·(grad_rows-1)/ny`.
    pub fn sample_raw<R: Rng + ?Sized>(&self, rng: &mut R) -> Heightmap {
        let p = &self.params;
        let field = NoiseField::new(p.grad_cols, p.grad_rows, rng);
        let x_step = (p.grad_cols - 1) as f64 / p.nx as f64;
        let y_step = (p.grad_rows - 1) as f64 / p.ny as f64;
        Heightmap::from_fn(p.ny, p.nx, |row, col| {
            field.sample(col as f64 * x_step, row as f64 * y_step)
        })
    }

    /// Build the heightmap: raw noise followed by `smooth_passes` box blurs.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Heightmap {
        let mut heightmap = self.sample_raw(rng);
        for _ in 0..self.params.smooth_passes {
            heightmap = heightmap.box_blur(self.params.smooth_kernel_width);
        }
        tracing::debug!(
            rows = heightmap.rows(),
            cols = heightmap.cols(),
            passes = self.params.smooth_passes,
            "heightmap built"
        );
        heightmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::scene_rng;

    fn params(smooth_passes: u32) -> HeightmapParams {
        HeightmapParams {
            grad_cols: 5,
            grad_rows: 4,
            nx: 12,
            ny: 9,
            smooth_passes,
            smooth_kernel_width: 3,
        }
    }

    #[test]
    fn test_zero_passes_returns_raw_noise() {
        let p = params(0);
        let built = HeightmapBuilder::new(p.clone()).unwrap().build(&mut scene_rng(17));

        let field = NoiseField::new(p.grad_cols, p.grad_rows, &mut scene_rng(17));
        for row in 0..p.ny {
            for col in 0..p.nx {
                let x = col as f64 * ((p.grad_cols - 1) as f64 / p.nx as f64);
                let y = row as f64 * ((p.grad_rows - 1) as f64 / p.ny as f64);
                assert_eq!(built.height_at(row, col), field.sample(x, y));
            }
        }
    }

    #[test]
    fn test_dimensions_follow_params() {
        let map = HeightmapBuilder::new(params(1)).unwrap().build(&mut scene_rng(1));
        assert_eq!((map.rows(), map.cols()), (9, 12));
        assert_eq!(map.as_slice().len(), 9 * 12);
    }

    #[test]
    fn test_blur_stays_within_neighborhood_bounds() {
        let raw = HeightmapBuilder::new(params(0)).unwrap().build(&mut scene_rng(23));
        let width = 5;
        let half = width / 2;
        let blurred = raw.box_blur(width);
        for row in 0..raw.rows() {
            for col in 0..raw.cols() {
                let mut lo = f64::INFINITY;
                let mut hi = f64::NEG_INFINITY;
                for r in row.saturating_sub(half)..=(row + half).min(raw.rows() - 1) {
                    for c in col.saturating_sub(half)..=(col + half).min(raw.cols() - 1) {
                        lo = lo.min(raw.height_at(r, c));
                        hi = hi.max(raw.height_at(r, c));
                    }
                }
                let v = blurred.height_at(row, col);
                assert!(
                    v >= lo - 1e-12 && v <= hi + 1e-12,
                    "blurred ({row}, {col}) = {v} outside [{lo}, {hi}]"
                );
            }
        }
    }

    #[test]
    fn test_blur_skips_out_of_bounds_cells() {
        // Corner of a 3x3 window sees only 4 cells; the center sees all 9.
        let map = Heightmap::from_rows(vec![
            vec![9.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        let blurred = map.box_blur(3);
        assert_eq!(blurred.height_at(0, 0), 9.0 / 4.0);
        assert_eq!(blurred.height_at(1, 1), 9.0 / 9.0);
        assert_eq!(blurred.height_at(0, 1), 9.0 / 6.0);
        assert_eq!(blurred.height_at(2, 2), 0.0);
    }

    #[test]
    fn test_passes_are_sequential() {
        let raw = HeightmapBuilder::new(params(0)).unwrap().build(&mut scene_rng(5));
        let twice = HeightmapBuilder::new(params(2)).unwrap().build(&mut scene_rng(5));
        assert_eq!(twice, raw.box_blur(3).box_blur(3));
    }

    #[test]
    fn test_width_one_kernel_is_identity() {
        let raw = HeightmapBuilder::new(params(0)).unwrap().build(&mut scene_rng(5));
        assert_eq!(raw.box_blur(1), raw);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let mut p = params(1);
        p.nx = 1;
        assert!(matches!(
            HeightmapBuilder::new(p),
            Err(TerrainError::ResolutionTooSmall { name: "nx", .. })
        ));

        let mut p = params(1);
        p.smooth_kernel_width = 10;
        assert_eq!(
            HeightmapBuilder::new(p).err(),
            Some(TerrainError::KernelTooWide {
                width: 10,
                nx: 12,
                ny: 9
            })
        );

        let mut p = params(1);
        p.grad_rows = 0;
        assert!(HeightmapBuilder::new(p).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let err = Heightmap::from_rows(vec![vec![0.0, 1.0], vec![2.0]]).unwrap_err();
        assert_eq!(
            err,
            TerrainError::RaggedRows {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_get_and_min_max() {
        let map = Heightmap::from_rows(vec![vec![-1.0, 2.0], vec![0.5, 0.0]]).unwrap();
        assert_eq!(map.get(1, 0), Some(0.5));
        assert_eq!(map.get(2, 0), None);
        assert_eq!(map.min_max(), Some((-1.0, 2.0)));
    }
}
