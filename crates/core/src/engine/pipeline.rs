//! End-to-end suitability pipeline
//!
//! Wires the calendar, aggregators, soil classifier, and threshold sweep
//! into one entry point. Validation runs first; once it passes, every
//! downstream stage is a pure function over pre-aligned in-memory fields.

use crate::aggregate::{aggregate_dekad_pet, aggregate_dekad_rainfall};
use crate::core_types::calendar::DekadCalendar;
use crate::core_types::config::AnalysisConfig;
use crate::core_types::error::EngineError;
use crate::core_types::field::MaskMap;
use crate::engine::raster::SuitabilityRaster;
use crate::engine::{threshold_sweep, water_balance_fields};
use crate::soil::assign_percolation_rates;
use crate::sources::{DailyPrecipitationSource, EightDayCompositeSource, StaticSoilFields};
use tracing::info;

/// Compute the multi-band AWD suitability raster for one run
///
/// Steps: validate the configuration and grids, generate the dekad
/// calendar, aggregate rainfall and PET for every active-season dekad,
/// assign percolation rates, compute water balances, and sweep the
/// configured deficit thresholds.
///
/// # Arguments
///
/// * `config` - Validated-on-entry run parameters
/// * `extent` - Valid-crop extent mask on the analysis grid
/// * `rainfall_source` - Daily precipitation fields
/// * `pet_source` - 8-day evapotranspiration composites
/// * `soils` - Static clay/sand fields
///
/// # Returns
///
/// One classified band per configured threshold, stacked in configured
/// order
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfiguration`] for a bad parameter set
/// and [`EngineError::GridMismatch`] when the soil fields are not on the
/// extent's grid. Source fields on a wrong grid panic inside the
/// aggregators; alignment is the acquisition layer's contract.
pub fn run_suitability_analysis(
    config: &AnalysisConfig,
    extent: &MaskMap,
    rainfall_source: &dyn DailyPrecipitationSource,
    pet_source: &dyn EightDayCompositeSource,
    soils: &StaticSoilFields,
) -> Result<SuitabilityRaster, EngineError> {
    config.validate()?;
    soils.check_grid(extent)?;

    let active_range = config.active_dekad_range();
    info!(
        "suitability analysis {}: dekads {}..={}, {} thresholds, {}x{} grid ({} valid pixels)",
        config.year,
        active_range.start(),
        active_range.end(),
        config.deficit_thresholds_mm.len(),
        extent.width(),
        extent.height(),
        extent.count_valid()
    );

    let calendar = DekadCalendar::for_year(config.year);
    let active_dekads = &calendar.dekads()[active_range];

    let mut rainfall = Vec::with_capacity(active_dekads.len());
    let mut pet = Vec::with_capacity(active_dekads.len());
    for dekad in active_dekads {
        rainfall.push(aggregate_dekad_rainfall(dekad, rainfall_source, extent));
        pet.push(aggregate_dekad_pet(dekad, pet_source, extent));
    }

    let percolation = assign_percolation_rates(soils, extent);
    let balances = water_balance_fields(
        &rainfall,
        &pet,
        &percolation,
        config.irrigation_floor_mm,
    );

    let raster = threshold_sweep(&balances, &config.deficit_thresholds_mm);
    info!(
        "suitability analysis complete: {} bands over {} active dekads",
        raster.band_count(),
        balances.len()
    );
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::field::MaskedField;
    use crate::sources::{CompositeStore, DailyFieldStore};

    fn soils_on(width: usize, height: usize) -> StaticSoilFields {
        StaticSoilFields::new(
            MaskedField::filled(width, height, 50.0),
            MaskedField::filled(width, height, 10.0),
        )
        .unwrap()
    }

    #[test]
    fn test_pipeline_rejects_bad_config_before_computing() {
        let config = AnalysisConfig {
            deficit_thresholds_mm: vec![],
            ..AnalysisConfig::default()
        };
        let extent = MaskMap::all_valid(1, 1);

        let err = run_suitability_analysis(
            &config,
            &extent,
            &DailyFieldStore::new(1, 1),
            &CompositeStore::new(1, 1),
            &soils_on(1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_pipeline_rejects_soils_on_wrong_grid() {
        let config = AnalysisConfig::default();
        let extent = MaskMap::all_valid(2, 2);

        let err = run_suitability_analysis(
            &config,
            &extent,
            &DailyFieldStore::new(2, 2),
            &CompositeStore::new(2, 2),
            &soils_on(3, 2),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::GridMismatch { .. }));
    }

    #[test]
    fn test_pipeline_runs_with_empty_sources() {
        // No rainfall, no PET: every active dekad gets floored rain minus
        // percolation, a constant deficit, so classification still works.
        let config = AnalysisConfig::default();
        let extent = MaskMap::all_valid(2, 2);

        let raster = run_suitability_analysis(
            &config,
            &extent,
            &DailyFieldStore::new(2, 2),
            &CompositeStore::new(2, 2),
            &soils_on(2, 2),
        )
        .unwrap();

        assert_eq!(raster.band_count(), config.deficit_thresholds_mm.len());
        raster.validate().expect("pipeline output must validate");

        // Heavy clay: floor 5 - 0 PET - 30 percolation = -25 every dekad,
        // suitable for every threshold at or below -25
        let band = raster.band_for(-50.0).unwrap();
        assert_eq!(
            band.class_at(0, 0),
            Some(crate::engine::SuitabilityClass::High)
        );
    }
}
