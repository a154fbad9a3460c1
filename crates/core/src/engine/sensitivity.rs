//! Threshold sensitivity summaries
//!
//! Tabulates how the class distribution shifts across the swept deficit
//! thresholds. Spatial statistics (fragmentation, regional breakdown)
//! belong to downstream consumers; this stays at whole-raster tallies.

use crate::engine::balance::SuitabilityClass;
use crate::engine::raster::{ClassBand, SuitabilityRaster};
use serde::{Deserialize, Serialize};

/// Class tallies for one threshold band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSummary {
    /// Deficit threshold identifying the band (mm, negative)
    pub threshold_mm: f32,
    /// Valid (non-masked) pixels in the band
    pub valid_pixels: usize,
    /// Pixels classified High
    pub high_pixels: usize,
    /// Pixels classified Moderate
    pub moderate_pixels: usize,
    /// Pixels classified Low
    pub low_pixels: usize,
    /// High share of valid pixels, percent
    pub pct_high: f32,
    /// Moderate share of valid pixels, percent
    pub pct_moderate: f32,
    /// Low share of valid pixels, percent
    pub pct_low: f32,
}

impl ThresholdSummary {
    fn for_band(band: &ClassBand) -> Self {
        let valid_pixels = band.count_valid();
        let high_pixels = band.count_class(SuitabilityClass::High);
        let moderate_pixels = band.count_class(SuitabilityClass::Moderate);
        let low_pixels = band.count_class(SuitabilityClass::Low);

        let pct = |count: usize| {
            if valid_pixels == 0 {
                0.0
            } else {
                100.0 * count as f32 / valid_pixels as f32
            }
        };

        ThresholdSummary {
            threshold_mm: band.threshold_mm(),
            valid_pixels,
            high_pixels,
            moderate_pixels,
            low_pixels,
            pct_high: pct(high_pixels),
            pct_moderate: pct(moderate_pixels),
            pct_low: pct(low_pixels),
        }
    }
}

/// Summarize every band of a suitability raster, in band order
pub fn summarize_thresholds(raster: &SuitabilityRaster) -> Vec<ThresholdSummary> {
    raster.bands().iter().map(ThresholdSummary::for_band).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::field::MaskedField;
    use approx::assert_relative_eq;

    #[test]
    fn test_summary_tallies_classes() {
        // 0.8 High, 0.5 Moderate, 0.4 Moderate, 0.1 Low, one masked
        let mut fraction = MaskedField::from_values(5, 1, vec![0.8, 0.5, 0.4, 0.1, 0.9]);
        fraction.set_invalid(4, 0);
        let raster = SuitabilityRaster::from_bands(vec![ClassBand::from_fraction_field(
            -50.0, &fraction,
        )]);

        let summaries = summarize_thresholds(&raster);
        assert_eq!(summaries.len(), 1);

        let summary = &summaries[0];
        assert_relative_eq!(summary.threshold_mm, -50.0);
        assert_eq!(summary.valid_pixels, 4);
        assert_eq!(summary.high_pixels, 1);
        assert_eq!(summary.moderate_pixels, 2);
        assert_eq!(summary.low_pixels, 1);
        assert_relative_eq!(summary.pct_high, 25.0);
        assert_relative_eq!(summary.pct_moderate, 50.0);
        assert_relative_eq!(summary.pct_low, 25.0);
    }

    #[test]
    fn test_summary_handles_fully_masked_band() {
        let fraction = MaskedField::all_invalid(3, 1);
        let raster = SuitabilityRaster::from_bands(vec![ClassBand::from_fraction_field(
            -50.0, &fraction,
        )]);

        let summary = &summarize_thresholds(&raster)[0];
        assert_eq!(summary.valid_pixels, 0);
        assert_relative_eq!(summary.pct_high, 0.0, epsilon = f32::EPSILON);
        assert_relative_eq!(summary.pct_low, 0.0, epsilon = f32::EPSILON);
    }

    #[test]
    fn test_summaries_follow_band_order() {
        let fraction = MaskedField::filled(1, 1, 0.5);
        let raster = SuitabilityRaster::from_bands(vec![
            ClassBand::from_fraction_field(-25.0, &fraction),
            ClassBand::from_fraction_field(-75.0, &fraction),
        ]);

        let thresholds: Vec<f32> = summarize_thresholds(&raster)
            .iter()
            .map(|s| s.threshold_mm)
            .collect();
        assert_eq!(thresholds, vec![-25.0, -75.0]);
    }
}
