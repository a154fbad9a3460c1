//! Overlap-weighted PET aggregation
//!
//! The evapotranspiration source ships 8-day composite totals whose
//! windows do not line up with dekads. Each composite intersecting a dekad
//! contributes `tile_total * overlap_days / 8`, which assumes the 8-day
//! total is uniformly distributed across its window. That is an
//! approximation, not an exact daily disaggregation.
//!
//! Pixels with no contributing tile coverage are unmasked to zero: absence
//! of PET data is treated as zero PET for that pixel-dekad, not as missing.
//! Combined with the fixed 8-day search back-window, a composite source
//! with gaps or irregular spacing can silently under-count PET for a whole
//! dekad; that matches the source platform's behavior and is kept as-is.

use crate::core_types::calendar::Dekad;
use crate::core_types::field::{DekadField, MaskMap, MaskedField};
use crate::sources::{EightDayCompositeSource, COMPOSITE_LENGTH_DAYS};
use chrono::Duration;
use tracing::debug;

/// Apportion 8-day PET composites onto one dekad
///
/// Candidate tiles are those starting in `[dekad.start - 8 days,
/// dekad.end)`: a tile can begin up to 8 days before the dekad and still
/// reach into it. For each candidate with positive overlap the
/// contribution is `tile_value * overlap_days / 8`, summed per pixel.
///
/// # Arguments
///
/// * `dekad` - The dekad window to cover
/// * `source` - 8-day composite tiles on the analysis grid
/// * `extent` - Valid-crop extent mask
///
/// # Returns
///
/// PET in mm per dekad, valid wherever the extent is valid; zero where no
/// tile covers a pixel
///
/// # Panics
///
/// Panics if a tile field is not on the extent's grid; inputs are
/// expected to be pre-aligned by the acquisition layer.
pub fn aggregate_dekad_pet(
    dekad: &Dekad,
    source: &dyn EightDayCompositeSource,
    extent: &MaskMap,
) -> DekadField {
    let (width, height) = extent.dims();
    let mut totals = vec![0.0f32; width * height];

    let search_from = dekad.start() - Duration::days(COMPOSITE_LENGTH_DAYS);
    let candidates = source.tiles_starting_in(search_from, dekad.end());

    let mut contributing = 0u32;
    for tile in &candidates {
        let overlap_days = dekad.overlap_days(tile.start, tile.end());
        if overlap_days <= 0 {
            continue;
        }
        assert!(
            tile.values.dims() == extent.dims(),
            "composite tile starting {} is not on the analysis grid",
            tile.start
        );

        let weight = overlap_days as f32 / COMPOSITE_LENGTH_DAYS as f32;
        for (i, total) in totals.iter_mut().enumerate() {
            if tile.values.valid_at(i) {
                *total += tile.values.value_at(i) * weight;
            }
        }
        contributing += 1;
    }

    debug!(
        "pet dekad {}: {} of {} candidate tiles overlap",
        dekad.start(),
        contributing,
        candidates.len()
    );

    let field = MaskedField::from_values(width, height, totals).masked_by(extent);
    DekadField::new(dekad.start(), field)
}
