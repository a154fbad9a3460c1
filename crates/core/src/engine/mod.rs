//! Water-balance and suitability engine
//!
//! Combines the three upstream fields per active-season dekad, reduces
//! the per-dekad suitability decisions into a fraction per pixel, and
//! classifies the fraction once per configured deficit threshold.
//!
//! The whole stage is pure over immutable inputs, so both natural
//! parallel axes are free of synchronization: pixels within a band, and
//! bands across the threshold sweep.

mod balance;
mod pipeline;
mod raster;
mod sensitivity;

pub use balance::{
    apply_irrigation_floor, classify_fraction, dekad_is_suitable, water_balance_mm,
    SuitabilityClass, HIGH_FRACTION, MODERATE_FRACTION,
};
pub use pipeline::run_suitability_analysis;
pub use raster::{ClassBand, SuitabilityRaster};
pub use sensitivity::{summarize_thresholds, ThresholdSummary};

use crate::core_types::field::{DekadField, MaskedField};
use rayon::prelude::*;
use tracing::debug;

/// Compute signed water balances for a season of dekads
///
/// Applies the supplemental-irrigation floor to each dekad's rainfall,
/// then subtracts PET and the broadcast percolation rate. Validity
/// follows the masked-field rule at every pixel: the balance is valid
/// only where rainfall, PET, and percolation are all valid.
///
/// # Arguments
///
/// * `rainfall` - Dekad rainfall fields in active-season order
/// * `pet` - Dekad PET fields, same order and dekad keys as `rainfall`
/// * `percolation` - Static dekad-equivalent percolation rates
/// * `irrigation_floor_mm` - Rainfall floor applied before the balance
///
/// # Returns
///
/// One balance field per input dekad, tagged with the dekad key
///
/// # Panics
///
/// Panics if the rainfall and PET sequences differ in length or disagree
/// on a dekad key: per-dekad fields must only ever combine with fields
/// for the same dekad.
pub fn water_balance_fields(
    rainfall: &[DekadField],
    pet: &[DekadField],
    percolation: &MaskedField,
    irrigation_floor_mm: f32,
) -> Vec<DekadField> {
    assert_eq!(
        rainfall.len(),
        pet.len(),
        "rainfall and PET cover different dekad counts"
    );

    rainfall
        .iter()
        .zip(pet)
        .map(|(rain, pet_dekad)| {
            assert_eq!(
                rain.start(),
                pet_dekad.start(),
                "dekad key mismatch between rainfall and PET"
            );

            let floored = rain
                .field()
                .map(|r| apply_irrigation_floor(r, irrigation_floor_mm));
            let balance = floored
                .zip_map(pet_dekad.field(), |r, p| r - p)
                .zip_map(percolation, |net, q| net - q);

            DekadField::new(rain.start(), balance)
        })
        .collect()
}

/// Evaluate one deficit threshold over a season of balance fields
///
/// Per pixel: counts valid dekads and dekads passing the dual-sided
/// predicate, divides with explicit masked semantics (a pixel with zero
/// valid dekads is masked out, never a NaN), and classifies the fraction.
/// Pixel tallies run in parallel.
///
/// # Panics
///
/// Panics if `balances` is empty or the fields disagree on dimensions.
pub fn evaluate_threshold(balances: &[DekadField], threshold_mm: f32) -> ClassBand {
    assert!(!balances.is_empty(), "no balance fields to evaluate");
    let (width, height) = balances[0].field().dims();
    for dekad_field in balances {
        assert!(
            dekad_field.field().dims() == (width, height),
            "balance fields disagree on grid dimensions"
        );
    }

    let tallies: Vec<(f32, f32)> = (0..width * height)
        .into_par_iter()
        .map(|i| {
            let mut valid_dekads = 0u32;
            let mut suitable_dekads = 0u32;
            for dekad_field in balances {
                let field = dekad_field.field();
                if field.valid_at(i) {
                    valid_dekads += 1;
                    if dekad_is_suitable(field.value_at(i), threshold_mm) {
                        suitable_dekads += 1;
                    }
                }
            }
            (suitable_dekads as f32, valid_dekads as f32)
        })
        .collect();

    let (suitable, valid): (Vec<f32>, Vec<f32>) = tallies.into_iter().unzip();
    let suitable = MaskedField::from_values(width, height, suitable);
    let valid_counts = MaskedField::from_values(width, height, valid);

    // Masked division handles the zero-valid-dekad pixels: the denominator
    // is zero there, so the fraction (and the band) stays masked.
    let fraction = suitable.masked_div(&valid_counts);

    let band = ClassBand::from_fraction_field(threshold_mm, &fraction);
    debug!(
        "threshold {} mm: {} of {} pixels classified",
        threshold_mm,
        band.count_valid(),
        width * height
    );
    band
}

/// Run the full threshold sweep and stack the resulting bands
///
/// Thresholds are independent (disjoint output bands, shared read-only
/// inputs), so the sweep runs them in parallel and gathers bands in the
/// configured order.
///
/// # Panics
///
/// Panics if `balances` is empty or the fields disagree on dimensions.
pub fn threshold_sweep(balances: &[DekadField], thresholds_mm: &[f32]) -> SuitabilityRaster {
    let bands: Vec<ClassBand> = thresholds_mm
        .par_iter()
        .map(|&threshold| evaluate_threshold(balances, threshold))
        .collect();
    SuitabilityRaster::from_bands(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, d).unwrap()
    }

    fn dekad_field(day: u32, value: f32) -> DekadField {
        DekadField::new(date(day), MaskedField::filled(1, 1, value))
    }

    #[test]
    fn test_water_balance_applies_floor_and_broadcast() {
        // Rain 3 -> floored to 5; 5 - 40 PET - 30 percolation = -65
        let rainfall = vec![dekad_field(1, 3.0), dekad_field(11, 80.0)];
        let pet = vec![dekad_field(1, 40.0), dekad_field(11, 40.0)];
        let percolation = MaskedField::filled(1, 1, 30.0);

        let balances = water_balance_fields(&rainfall, &pet, &percolation, 5.0);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].start(), date(1));
        assert_relative_eq!(balances[0].field().get(0, 0), -65.0);
        // 80 passes the floor unchanged: 80 - 40 - 30 = 10
        assert_relative_eq!(balances[1].field().get(0, 0), 10.0);
    }

    #[test]
    fn test_water_balance_masks_where_any_input_masked() {
        let rainfall = vec![DekadField::new(date(1), MaskedField::filled(2, 1, 50.0))];
        let pet = vec![DekadField::new(date(1), MaskedField::filled(2, 1, 40.0))];
        let mut percolation = MaskedField::filled(2, 1, 30.0);
        percolation.set_invalid(1, 0);

        let balances = water_balance_fields(&rainfall, &pet, &percolation, 5.0);
        assert!(balances[0].field().is_valid(0, 0));
        assert!(!balances[0].field().is_valid(1, 0));
    }

    #[test]
    #[should_panic(expected = "dekad key mismatch")]
    fn test_water_balance_rejects_mismatched_keys() {
        let rainfall = vec![dekad_field(1, 10.0)];
        let pet = vec![dekad_field(11, 40.0)];
        let percolation = MaskedField::filled(1, 1, 30.0);
        let _ = water_balance_fields(&rainfall, &pet, &percolation, 5.0);
    }

    #[test]
    fn test_fraction_uses_valid_dekads_as_denominator() {
        // 16 dekads: 10 valid (7 suitable), 6 masked. Fraction must be
        // 7/10 = 0.7 -> High; dividing by the nominal season length would
        // give 7/16 = 0.4375 -> Moderate
        let mut balances = Vec::new();
        for i in 0..16u32 {
            let mut field = if i < 7 {
                MaskedField::filled(1, 1, -20.0) // suitable at T = -50
            } else {
                MaskedField::filled(1, 1, 10.0) // not drying
            };
            if i >= 10 {
                field.set_invalid(0, 0);
            }
            balances.push(DekadField::new(date(1 + i), field));
        }

        let band = evaluate_threshold(&balances, -50.0);
        assert_eq!(band.class_at(0, 0), Some(SuitabilityClass::High));
    }

    #[test]
    fn test_zero_valid_dekads_masks_pixel() {
        let mut field = MaskedField::filled(1, 1, -20.0);
        field.set_invalid(0, 0);
        let balances = vec![DekadField::new(date(1), field)];

        let band = evaluate_threshold(&balances, -50.0);
        assert_eq!(
            band.class_at(0, 0),
            None,
            "division by zero valid dekads must mask, not crash or NaN"
        );
    }

    #[test]
    fn test_sweep_produces_band_per_threshold_in_order() {
        let balances = vec![dekad_field(1, -40.0)];
        let thresholds = [-25.0, -50.0, -75.0];

        let raster = threshold_sweep(&balances, &thresholds);
        assert_eq!(raster.band_count(), 3);
        let ordered: Vec<f32> = raster.bands().iter().map(ClassBand::threshold_mm).collect();
        assert_eq!(ordered, thresholds);
    }

    #[test]
    fn test_sweep_monotone_in_threshold() {
        // One pixel, balances -20/-60/-100: strict threshold admits one
        // dekad (1/3 -> Moderate), lenient admits all (3/3 -> High)
        let balances = vec![
            dekad_field(1, -20.0),
            dekad_field(11, -60.0),
            dekad_field(21, -100.0),
        ];

        let raster = threshold_sweep(&balances, &[-50.0, -110.0]);
        assert_eq!(
            raster.band_for(-50.0).unwrap().class_at(0, 0),
            Some(SuitabilityClass::Moderate)
        );
        assert_eq!(
            raster.band_for(-110.0).unwrap().class_at(0, 0),
            Some(SuitabilityClass::High)
        );
    }

    #[test]
    fn test_positive_balances_classify_low() {
        let balances = vec![dekad_field(1, 15.0), dekad_field(11, 3.0)];
        let band = evaluate_threshold(&balances, -50.0);
        assert_eq!(band.class_at(0, 0), Some(SuitabilityClass::Low));
    }
}
