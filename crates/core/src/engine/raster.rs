//! Classified suitability bands and the stacked multi-band output
//!
//! One [`ClassBand`] per deficit threshold, stacked into a
//! [`SuitabilityRaster`] keyed by the threshold values. The raster is the
//! engine's sole output; export formats belong to downstream consumers.

use crate::core_types::error::EngineError;
use crate::core_types::field::MaskedField;
use crate::engine::balance::{classify_fraction, SuitabilityClass};
use serde::{Deserialize, Serialize};

/// Per-pixel suitability classes for one deficit threshold
///
/// Class codes are 1 (Low), 2 (Moderate), 3 (High); masked pixels store 0
/// with their validity bit cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBand {
    threshold_mm: f32,
    classes: Vec<u8>,
    valid: Vec<bool>,
    width: usize,
    height: usize,
}

impl ClassBand {
    /// Classify a fraction-suitable field into a band
    ///
    /// Pixels masked in the fraction field (zero valid dekads upstream)
    /// stay masked in the band.
    pub fn from_fraction_field(threshold_mm: f32, fraction: &MaskedField) -> Self {
        let mut classes = vec![0u8; fraction.len()];
        let mut valid = vec![false; fraction.len()];
        for i in 0..fraction.len() {
            if fraction.valid_at(i) {
                classes[i] = classify_fraction(fraction.value_at(i)).code();
                valid[i] = true;
            }
        }

        ClassBand {
            threshold_mm,
            classes,
            valid,
            width: fraction.width(),
            height: fraction.height(),
        }
    }

    /// Deficit threshold identifying this band (mm, negative)
    pub fn threshold_mm(&self) -> f32 {
        self.threshold_mm
    }

    /// Grid width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` pair
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Class at grid position, `None` where masked
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn class_at(&self, x: usize, y: usize) -> Option<SuitabilityClass> {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        let idx = y * self.width + x;
        if self.valid[idx] {
            SuitabilityClass::from_code(self.classes[idx])
        } else {
            None
        }
    }

    /// Row-major class codes (0 where masked)
    pub fn codes(&self) -> &[u8] {
        &self.classes
    }

    /// Row-major validity bits
    pub fn validity(&self) -> &[bool] {
        &self.valid
    }

    /// Number of valid pixels
    pub fn count_valid(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// Number of valid pixels carrying `class`
    pub fn count_class(&self, class: SuitabilityClass) -> usize {
        self.classes
            .iter()
            .zip(&self.valid)
            .filter(|&(&code, &v)| v && code == class.code())
            .count()
    }
}

/// Multi-band suitability output, one band per configured threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityRaster {
    bands: Vec<ClassBand>,
}

impl SuitabilityRaster {
    /// Stack bands in configured threshold order
    pub fn from_bands(bands: Vec<ClassBand>) -> Self {
        SuitabilityRaster { bands }
    }

    /// Bands in configured threshold order
    pub fn bands(&self) -> &[ClassBand] {
        &self.bands
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Band for an exact threshold value, `None` when absent
    ///
    /// Lookup uses the same `f32` constants the run was configured with.
    pub fn band_for(&self, threshold_mm: f32) -> Option<&ClassBand> {
        self.bands.iter().find(|b| b.threshold_mm == threshold_mm)
    }

    /// Grid dimensions shared by all bands, `None` for an empty raster
    pub fn dims(&self) -> Option<(usize, usize)> {
        self.bands.first().map(ClassBand::dims)
    }

    /// Shape and value-range sanity checks
    ///
    /// Intended for rasters that crossed a serialization boundary; rasters
    /// built by the engine satisfy these by construction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedRaster`] when the raster is empty,
    /// bands disagree on grid dimensions, a threshold is non-negative, or
    /// a valid pixel carries a class code outside 1..=3.
    pub fn validate(&self) -> Result<(), EngineError> {
        let Some(dims) = self.dims() else {
            return Err(EngineError::MalformedRaster(
                "raster contains no bands".to_string(),
            ));
        };

        for band in &self.bands {
            if band.dims() != dims {
                return Err(EngineError::MalformedRaster(format!(
                    "band {} on {}x{} grid, expected {}x{}",
                    band.threshold_mm,
                    band.width(),
                    band.height(),
                    dims.0,
                    dims.1
                )));
            }
            if !band.threshold_mm.is_finite() || band.threshold_mm >= 0.0 {
                return Err(EngineError::MalformedRaster(format!(
                    "band threshold {} is not a negative mm value",
                    band.threshold_mm
                )));
            }
            for (i, (&code, &valid)) in band.classes.iter().zip(&band.valid).enumerate() {
                if valid && SuitabilityClass::from_code(code).is_none() {
                    return Err(EngineError::MalformedRaster(format!(
                        "band {} pixel {i} carries class code {code}",
                        band.threshold_mm
                    )));
                }
            }
        }

        Ok(())
    }
}
