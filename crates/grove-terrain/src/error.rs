//! Terrain generation error types.

/// Precondition violations detected at the boundary of the generation pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// A grid resolution is below the minimum the algorithm needs.
    #[error("{name} must be at least {min}, got {value}")]
    ResolutionTooSmall {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
    },

    /// The smoothing kernel does not fit inside the heightmap.
    #[error("smoothing kernel width {width} exceeds the {nx}x{ny} heightmap")]
    KernelTooWide {
        /// Kernel width.
        width: usize,
        /// Heightmap columns.
        nx: usize,
        /// Heightmap rows.
        ny: usize,
    },

    /// A real-valued parameter is negative, NaN, or infinite.
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// Heightmap rows passed in have differing lengths.
    #[error("heightmap row {row} has {len} columns, expected {expected}")]
    RaggedRows {
        /// Index of the first mismatching row.
        row: usize,
        /// Its length.
        len: usize,
        /// Length of row 0.
        expected: usize,
    },

    /// A noise query fell outside the gradient grid.
    #[error("noise query ({x}, {y}) outside [0, {max_x}) x [0, {max_y})")]
    NoiseOutOfRange {
        /// Query x.
        x: f64,
        /// Query y.
        y: f64,
        /// Exclusive upper bound for x.
        max_x: f64,
        /// Exclusive upper bound for y.
        max_y: f64,
    },
}

/// Reject resolutions below `min`.
pub(crate) fn check_resolution(
    name: &'static str,
    value: usize,
    min: usize,
) -> Result<(), TerrainError> {
    if value < min {
        return Err(TerrainError::ResolutionTooSmall { name, value, min });
    }
    Ok(())
}

/// Reject negative or non-finite real parameters.
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<(), TerrainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(TerrainError::InvalidParameter { name, value });
    }
    Ok(())
}
