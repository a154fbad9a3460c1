//! Dekad rainfall aggregation
//!
//! Sums a daily precipitation source over one dekad window. Days the
//! source does not cover contribute zero: in the daily precipitation
//! product, absence is not an explicit missing-data marker, so the sum is
//! taken over whatever days are available rather than failing the dekad.
//! This is a documented simplifying assumption, not corrected here.

use crate::core_types::calendar::{Dekad, DEKAD_LENGTH_DAYS};
use crate::core_types::field::{DekadField, MaskMap, MaskedField};
use crate::sources::DailyPrecipitationSource;
use chrono::Duration;
use tracing::debug;

/// Sum daily rainfall over `[dekad.start, dekad.end)`
///
/// The result is masked to the valid-crop extent and tagged with the
/// dekad start date. A day present in the source but masked at a pixel
/// contributes zero at that pixel, same as an absent day.
///
/// # Arguments
///
/// * `dekad` - The dekad window to aggregate
/// * `source` - Daily precipitation fields on the analysis grid
/// * `extent` - Valid-crop extent mask
///
/// # Returns
///
/// Rainfall totals in mm per dekad, valid wherever the extent is valid
///
/// # Panics
///
/// Panics if a source field is not on the extent's grid; inputs are
/// expected to be pre-aligned by the acquisition layer.
pub fn aggregate_dekad_rainfall(
    dekad: &Dekad,
    source: &dyn DailyPrecipitationSource,
    extent: &MaskMap,
) -> DekadField {
    let (width, height) = extent.dims();
    let mut totals = vec![0.0f32; width * height];
    let mut days_present = 0u32;

    for offset in 0..DEKAD_LENGTH_DAYS {
        let day = dekad.start() + Duration::days(offset);
        let Some(daily) = source.daily_rainfall(day) else {
            continue;
        };
        assert!(
            daily.dims() == extent.dims(),
            "daily rainfall field for {day} is not on the analysis grid"
        );

        days_present += 1;
        for (i, total) in totals.iter_mut().enumerate() {
            if daily.valid_at(i) {
                *total += daily.value_at(i);
            }
        }
    }

    debug!(
        "rainfall dekad {}: {}/{} source days present",
        dekad.start(),
        days_present,
        DEKAD_LENGTH_DAYS
    );

    let field = MaskedField::from_values(width, height, totals).masked_by(extent);
    DekadField::new(dekad.start(), field)
}
