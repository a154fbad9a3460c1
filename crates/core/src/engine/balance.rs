//! Scalar water-balance kernels
//!
//! The per-pixel arithmetic of the suitability engine, written as plain
//! scalar functions so the field pipeline is a straightforward lift of
//! independently tested pieces.
//!
//! Sign convention: a negative balance means the paddy dries during the
//! dekad. AWD wants exactly that, but only down to the configured stress
//! threshold; drying past it risks yield loss.

use serde::{Deserialize, Serialize};

/// Fraction of suitable dekads at or above which a pixel classifies High
pub const HIGH_FRACTION: f32 = 0.66;

/// Fraction of suitable dekads at or above which a pixel classifies
/// Moderate (when below the High cut)
pub const MODERATE_FRACTION: f32 = 0.33;

/// Ordinal AWD suitability class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuitabilityClass {
    /// Fewer than 33% of valid dekads suitable
    Low,
    /// 33% to 66% of valid dekads suitable
    Moderate,
    /// At least 66% of valid dekads suitable
    High,
}

impl SuitabilityClass {
    /// Numeric class code (1..=3)
    pub fn code(self) -> u8 {
        match self {
            SuitabilityClass::Low => 1,
            SuitabilityClass::Moderate => 2,
            SuitabilityClass::High => 3,
        }
    }

    /// Class from its numeric code, `None` for anything outside 1..=3
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(SuitabilityClass::Low),
            2 => Some(SuitabilityClass::Moderate),
            3 => Some(SuitabilityClass::High),
            _ => None,
        }
    }
}

/// Supplemental-irrigation floor on dekad rainfall
///
/// Models farmers topping up to the floor when rainfall is insufficient:
/// values below the floor are raised to it, values at or above pass
/// through unchanged.
pub fn apply_irrigation_floor(rainfall_mm: f32, floor_mm: f32) -> f32 {
    rainfall_mm.max(floor_mm)
}

/// Signed dekad water balance in mm
///
/// Negative means net water deficit (the field dries).
pub fn water_balance_mm(rainfall_mm: f32, pet_mm: f32, percolation_mm: f32) -> f32 {
    rainfall_mm - pet_mm - percolation_mm
}

/// Dual-sided suitability predicate for one dekad
///
/// A dekad suits AWD drying when the balance is negative (the field
/// actually dries) but not below the deficit threshold (no crop stress).
/// `deficit_threshold_mm` is negative.
pub fn dekad_is_suitable(water_balance_mm: f32, deficit_threshold_mm: f32) -> bool {
    water_balance_mm < 0.0 && water_balance_mm >= deficit_threshold_mm
}

/// Map a fraction of suitable dekads to its ordinal class
///
/// Evaluation order supplies the tie-breaks: the High test runs first, so
/// a fraction of exactly 0.66 is High, and exactly 0.33 is Moderate.
pub fn classify_fraction(fraction_suitable: f32) -> SuitabilityClass {
    if fraction_suitable >= HIGH_FRACTION {
        SuitabilityClass::High
    } else if fraction_suitable >= MODERATE_FRACTION {
        SuitabilityClass::Moderate
    } else {
        SuitabilityClass::Low
    }
}
