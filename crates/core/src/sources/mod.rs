//! External data-source interfaces
//!
//! The engine never performs acquisition, reprojection, or caching; it
//! consumes fields already aligned to the analysis grid through the traits
//! here. Map-backed stores are provided for callers whose acquisition
//! layer materializes fields up front (and for tests).
//!
//! Retry policy lives with the acquisition layer, not here: a source that
//! has no field for a date simply returns nothing and the aggregators
//! apply their documented zero-fill fallbacks.

use crate::core_types::{EngineError, MaskMap, MaskedField};
use chrono::{Duration, NaiveDate};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Native window length of the evapotranspiration composites, in days
pub const COMPOSITE_LENGTH_DAYS: i64 = 8;

/// One value per day on the analysis grid
///
/// `None` means the source has nothing for that date; the rainfall
/// aggregator treats absence as a zero contribution (absence is not an
/// explicit missing-data marker in the daily precipitation product).
pub trait DailyPrecipitationSource {
    /// Rainfall field for one day, if the source covers it
    fn daily_rainfall(&self, date: NaiveDate) -> Option<&MaskedField>;
}

/// An 8-day evapotranspiration composite and its window start
#[derive(Debug, Clone, Copy)]
pub struct CompositeTile<'a> {
    /// Inclusive start of the tile window
    pub start: NaiveDate,
    /// Composite totals over the tile window (mm per 8 days)
    pub values: &'a MaskedField,
}

impl CompositeTile<'_> {
    /// Exclusive end of the tile window (`start + 8 days`)
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(COMPOSITE_LENGTH_DAYS)
    }
}

/// Native 8-day composite source with arbitrary tile spacing
///
/// Tile starts are not necessarily calendar-aligned or gap-free; the PET
/// aggregator queries a window wide enough to catch every tile that can
/// intersect a dekad.
pub trait EightDayCompositeSource {
    /// All tiles whose start date lies in `[from, to)`, ascending by start
    fn tiles_starting_in(&self, from: NaiveDate, to: NaiveDate) -> Vec<CompositeTile<'_>>;
}

/// Map-backed daily precipitation store
#[derive(Debug, Clone)]
pub struct DailyFieldStore {
    width: usize,
    height: usize,
    fields: FxHashMap<NaiveDate, MaskedField>,
}

impl DailyFieldStore {
    /// Empty store pinned to the analysis grid dimensions
    pub fn new(width: usize, height: usize) -> Self {
        DailyFieldStore {
            width,
            height,
            fields: FxHashMap::default(),
        }
    }

    /// Insert one day's field
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GridMismatch`] when the field is not on the
    /// store's grid.
    pub fn insert(&mut self, date: NaiveDate, field: MaskedField) -> Result<(), EngineError> {
        if field.dims() != (self.width, self.height) {
            return Err(EngineError::grid_mismatch(
                format!("daily rainfall field for {date}"),
                (self.width, self.height),
                field.dims(),
            ));
        }
        self.fields.insert(date, field);
        Ok(())
    }

    /// Number of stored days
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the store holds no days
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl DailyPrecipitationSource for DailyFieldStore {
    fn daily_rainfall(&self, date: NaiveDate) -> Option<&MaskedField> {
        self.fields.get(&date)
    }
}

/// Map-backed 8-day composite store
#[derive(Debug, Clone)]
pub struct CompositeStore {
    width: usize,
    height: usize,
    tiles: FxHashMap<NaiveDate, MaskedField>,
}

impl CompositeStore {
    /// Empty store pinned to the analysis grid dimensions
    pub fn new(width: usize, height: usize) -> Self {
        CompositeStore {
            width,
            height,
            tiles: FxHashMap::default(),
        }
    }

    /// Insert one composite tile keyed by its window start
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GridMismatch`] when the tile is not on the
    /// store's grid.
    pub fn insert(&mut self, start: NaiveDate, values: MaskedField) -> Result<(), EngineError> {
        if values.dims() != (self.width, self.height) {
            return Err(EngineError::grid_mismatch(
                format!("composite tile starting {start}"),
                (self.width, self.height),
                values.dims(),
            ));
        }
        self.tiles.insert(start, values);
        Ok(())
    }

    /// Number of stored tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the store holds no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl EightDayCompositeSource for CompositeStore {
    fn tiles_starting_in(&self, from: NaiveDate, to: NaiveDate) -> Vec<CompositeTile<'_>> {
        let mut tiles: Vec<CompositeTile<'_>> = self
            .tiles
            .iter()
            .filter(|&(&start, _)| start >= from && start < to)
            .map(|(&start, values)| CompositeTile { start, values })
            .collect();
        tiles.sort_by_key(|tile| tile.start);
        tiles
    }
}

/// Static per-pixel soil texture fields (clay %, sand %)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticSoilFields {
    clay_pct: MaskedField,
    sand_pct: MaskedField,
}

impl StaticSoilFields {
    /// Pair the two texture fields
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GridMismatch`] when the fields disagree on
    /// grid dimensions.
    pub fn new(clay_pct: MaskedField, sand_pct: MaskedField) -> Result<Self, EngineError> {
        if !clay_pct.same_dims(&sand_pct) {
            return Err(EngineError::grid_mismatch(
                "sand field vs clay field",
                clay_pct.dims(),
                sand_pct.dims(),
            ));
        }
        Ok(StaticSoilFields { clay_pct, sand_pct })
    }

    /// Clay content field (0-100 %)
    pub fn clay_pct(&self) -> &MaskedField {
        &self.clay_pct
    }

    /// Sand content field (0-100 %)
    pub fn sand_pct(&self) -> &MaskedField {
        &self.sand_pct
    }

    /// Grid dimensions shared by both fields
    pub fn dims(&self) -> (usize, usize) {
        self.clay_pct.dims()
    }

    /// Check agreement with an extent mask's grid
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GridMismatch`] naming the soil fields when
    /// the grids disagree.
    pub fn check_grid(&self, extent: &MaskMap) -> Result<(), EngineError> {
        if self.dims() != extent.dims() {
            return Err(EngineError::grid_mismatch(
                "soil fields vs extent mask",
                extent.dims(),
                self.dims(),
            ));
        }
        Ok(())
    }
}
