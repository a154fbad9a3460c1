//! Threshold-sweep properties over hand-built balance series
//!
//! Drives the engine surface directly with synthetic per-dekad balance
//! fields: partial missing data, fully masked pixels, and randomized
//! series checked for threshold monotonicity.

use awd_balance_core::engine::{evaluate_threshold, water_balance_fields};
use awd_balance_core::{threshold_sweep, DekadField, MaskedField, SuitabilityClass};
use chrono::{Duration, NaiveDate};

fn dekad_start(step: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 5, 1).unwrap() + Duration::days(10 * step as i64)
}

/// One-pixel balance series; `None` marks a masked dekad
fn series_to_fields(series: &[Option<f32>]) -> Vec<DekadField> {
    series
        .iter()
        .enumerate()
        .map(|(step, value)| {
            let field = match value {
                Some(v) => MaskedField::filled(1, 1, *v),
                None => MaskedField::all_invalid(1, 1),
            };
            DekadField::new(dekad_start(step), field)
        })
        .collect()
}

#[test]
fn test_partial_series_divides_by_observed_dekads() {
    // 16-dekad season, 6 dekads missing: the denominator is the 10
    // observed dekads. 7 of them dry inside the threshold, so the
    // fraction is 0.7 -> High; a nominal-length denominator would give
    // 7/16 -> Moderate.
    let mut series = vec![Some(-20.0); 7];
    series.extend(vec![Some(10.0); 3]);
    series.extend(vec![None; 6]);
    assert_eq!(series.len(), 16);

    let balances = series_to_fields(&series);
    let band = evaluate_threshold(&balances, -50.0);
    assert_eq!(band.class_at(0, 0), Some(SuitabilityClass::High));
}

#[test]
fn test_fully_masked_series_masks_pixel() {
    let balances = series_to_fields(&[None, None, None]);
    let raster = threshold_sweep(&balances, &[-25.0, -100.0]);

    for band in raster.bands() {
        assert_eq!(
            band.class_at(0, 0),
            None,
            "zero valid dekads must mask the pixel, not divide by zero"
        );
    }
}

#[test]
fn test_single_valid_dekad_decides_pixel() {
    let balances = series_to_fields(&[None, Some(-30.0), None]);

    let band = evaluate_threshold(&balances, -50.0);
    assert_eq!(
        band.class_at(0, 0),
        Some(SuitabilityClass::High),
        "1 of 1 observed dekads suitable"
    );

    let band = evaluate_threshold(&balances, -25.0);
    assert_eq!(
        band.class_at(0, 0),
        Some(SuitabilityClass::Low),
        "0 of 1 observed dekads suitable"
    );
}

#[test]
fn test_random_series_never_lose_class_as_threshold_relaxes() {
    // 8x8 grid, 12 dekads of random balances with random dropouts. The
    // suitable window [T, 0) only widens as T falls, so per-pixel class
    // codes must be non-decreasing across a strict-to-lenient sweep.
    const WIDTH: usize = 8;
    const HEIGHT: usize = 8;
    const DEKADS: usize = 12;

    let balances: Vec<DekadField> = (0..DEKADS)
        .map(|step| {
            let mut field = MaskedField::all_invalid(WIDTH, HEIGHT);
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    if rand::random::<f32>() < 0.85 {
                        let balance = rand::random::<f32>() * 250.0 - 200.0;
                        field.set(x, y, balance);
                    }
                }
            }
            DekadField::new(dekad_start(step), field)
        })
        .collect();

    let thresholds = [-25.0, -50.0, -75.0, -100.0, -150.0, -200.0];
    let raster = threshold_sweep(&balances, &thresholds);

    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let mut previous = 0u8;
            for &threshold in &thresholds {
                let band = raster.band_for(threshold).unwrap();
                let code = band.class_at(x, y).map_or(0, SuitabilityClass::code);
                assert!(
                    code >= previous,
                    "pixel ({x},{y}) fell from class {previous} to {code} at {threshold} mm"
                );
                previous = code;
            }
        }
    }
}

#[test]
fn test_balance_fields_to_sweep_round() {
    // Two dekads, shared percolation of 30 mm: rain 3 floors to 5,
    // 5 - 40 - 30 = -65; rain 80 gives +10
    let rainfall = vec![
        DekadField::new(dekad_start(0), MaskedField::filled(1, 1, 3.0)),
        DekadField::new(dekad_start(1), MaskedField::filled(1, 1, 80.0)),
    ];
    let pet = vec![
        DekadField::new(dekad_start(0), MaskedField::filled(1, 1, 40.0)),
        DekadField::new(dekad_start(1), MaskedField::filled(1, 1, 40.0)),
    ];
    let percolation = MaskedField::filled(1, 1, 30.0);

    let balances = water_balance_fields(&rainfall, &pet, &percolation, 5.0);
    let raster = threshold_sweep(&balances, &[-50.0, -75.0]);

    // -65 is outside -50 (0/2) but inside -75 (1/2 -> Moderate)
    assert_eq!(
        raster.band_for(-50.0).unwrap().class_at(0, 0),
        Some(SuitabilityClass::Low)
    );
    assert_eq!(
        raster.band_for(-75.0).unwrap().class_at(0, 0),
        Some(SuitabilityClass::Moderate)
    );
}
