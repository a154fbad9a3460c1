//! Engine error taxonomy
//!
//! Only conditions that abort a run are errors. Missing data within a
//! dekad window and pixels with zero valid dekads are recovered locally
//! (zero-fill, mask-out) by the aggregators and the engine; they never
//! surface here.

use thiserror::Error;

/// Errors surfaced by the water-balance engine entry points
#[derive(Debug, Error)]
pub enum EngineError {
    /// Season/exclusion indices or threshold list fail fast-path validation
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Inputs arrived on incompatible grids; the engine never reprojects
    #[error("grid mismatch in {context}: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    GridMismatch {
        /// Which input disagreed with the analysis grid
        context: String,
        /// Expected grid width in pixels
        expected_width: usize,
        /// Expected grid height in pixels
        expected_height: usize,
        /// Actual grid width in pixels
        actual_width: usize,
        /// Actual grid height in pixels
        actual_height: usize,
    },

    /// Configuration document could not be parsed
    #[error("failed to parse configuration document: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A suitability raster failed shape or value-range validation
    #[error("malformed suitability raster: {0}")]
    MalformedRaster(String),
}

impl EngineError {
    /// Build a [`EngineError::GridMismatch`] from `(width, height)` pairs
    pub fn grid_mismatch(
        context: impl Into<String>,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        EngineError::GridMismatch {
            context: context.into(),
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        }
    }
}
