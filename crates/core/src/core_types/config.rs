//! Run configuration
//!
//! One immutable [`AnalysisConfig`] value is built per run, validated
//! before any computation starts, and passed explicitly into every
//! component. There is no ambient configuration state.
//!
//! Dekad indices are 0-based (0..36). The active season is the inclusive
//! index range `[season_start + exclude_first, season_end - exclude_last]`:
//! the excluded margins model crop establishment and harvest, when the
//! field must stay flooded and drying cycles are off the table.

use crate::core_types::calendar::DEKADS_PER_YEAR;
use crate::core_types::error::EngineError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Parameters of one suitability analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analysis year (drives the dekad calendar)
    pub year: i32,
    /// First dekad of the rice season (0-based index)
    pub season_start_dekad: usize,
    /// Last dekad of the rice season (0-based index, inclusive)
    pub season_end_dekad: usize,
    /// Establishment dekads excluded after season start
    pub exclude_first_dekads: usize,
    /// Harvest dekads excluded before season end
    pub exclude_last_dekads: usize,
    /// Analysis grid scale in meters per pixel
    pub analysis_scale_m: f32,
    /// Supplemental-irrigation floor applied to dekad rainfall (mm)
    pub irrigation_floor_mm: f32,
    /// Water-deficit thresholds to sweep (mm, strictly negative)
    pub deficit_thresholds_mm: Vec<f32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            year: 2020,
            season_start_dekad: 10,
            season_end_dekad: 28,
            exclude_first_dekads: 2,
            exclude_last_dekads: 1,
            analysis_scale_m: 250.0,
            irrigation_floor_mm: 5.0,
            deficit_thresholds_mm: vec![-25.0, -50.0, -75.0, -100.0, -125.0, -150.0, -175.0],
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from a JSON document and validate it
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParse`] when the document is not valid
    /// JSON for this schema, or [`EngineError::InvalidConfiguration`] when
    /// the parsed parameters fail [`AnalysisConfig::validate`].
    pub fn from_json_str(document: &str) -> Result<Self, EngineError> {
        let config: AnalysisConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail-fast parameter validation
    ///
    /// Runs before any computation; a configuration that passes here can
    /// drive the whole pipeline without further parameter checks.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] when:
    /// - the threshold list is empty, or contains a non-negative or
    ///   non-finite value
    /// - season indices are out of range or reversed
    /// - the exclusions leave an empty active window
    /// - the irrigation floor is negative or non-finite
    /// - the analysis scale is not strictly positive
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.deficit_thresholds_mm.is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "deficit threshold list is empty".to_string(),
            ));
        }
        for &threshold in &self.deficit_thresholds_mm {
            if !threshold.is_finite() || threshold >= 0.0 {
                return Err(EngineError::InvalidConfiguration(format!(
                    "deficit thresholds must be negative mm values, got {threshold}"
                )));
            }
        }

        if self.season_end_dekad >= DEKADS_PER_YEAR {
            return Err(EngineError::InvalidConfiguration(format!(
                "season end dekad {} outside 0..{DEKADS_PER_YEAR}",
                self.season_end_dekad
            )));
        }
        if self.season_start_dekad >= self.season_end_dekad {
            return Err(EngineError::InvalidConfiguration(format!(
                "season end dekad ({}) must be after season start ({})",
                self.season_end_dekad, self.season_start_dekad
            )));
        }

        let active_start = self.season_start_dekad + self.exclude_first_dekads;
        let Some(active_end) = self.season_end_dekad.checked_sub(self.exclude_last_dekads) else {
            return Err(EngineError::InvalidConfiguration(format!(
                "harvest exclusion ({}) exceeds season end dekad ({})",
                self.exclude_last_dekads, self.season_end_dekad
            )));
        };
        if active_start > active_end {
            return Err(EngineError::InvalidConfiguration(format!(
                "active season window is empty after exclusions ({active_start}..={active_end})"
            )));
        }

        if !self.irrigation_floor_mm.is_finite() || self.irrigation_floor_mm < 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "irrigation floor must be a non-negative mm value, got {}",
                self.irrigation_floor_mm
            )));
        }
        if !self.analysis_scale_m.is_finite() || self.analysis_scale_m <= 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "analysis scale must be positive meters, got {}",
                self.analysis_scale_m
            )));
        }

        Ok(())
    }

    /// Inclusive dekad index range of the active season
    ///
    /// Only meaningful on a validated configuration.
    ///
    /// # Panics
    ///
    /// Panics if the harvest exclusion exceeds the season end (rejected by
    /// [`AnalysisConfig::validate`]).
    pub fn active_dekad_range(&self) -> RangeInclusive<usize> {
        assert!(
            self.exclude_last_dekads <= self.season_end_dekad,
            "active_dekad_range called on unvalidated configuration"
        );
        let start = self.season_start_dekad + self.exclude_first_dekads;
        let end = self.season_end_dekad - self.exclude_last_dekads;
        start..=end
    }

    /// Number of dekads in the active season window
    pub fn active_dekad_count(&self) -> usize {
        self.active_dekad_range().count()
    }
}
