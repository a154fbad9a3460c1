//! AWD Water-Balance Core Library
//!
//! Computes a dekad-level (10-day) agricultural water balance from three
//! satellite/model data sources and classifies rice pixels into an ordinal
//! suitability index for alternate-wetting-and-drying (AWD) irrigation,
//! swept across a set of water-deficit thresholds.
//!
//! ## Pipeline
//!
//! - Dekad calendar: 36 fixed 10-day periods per year
//! - Rainfall aggregation: daily precipitation summed per dekad
//! - PET aggregation: 8-day composites apportioned by window overlap
//! - Percolation assignment: soil texture classes mapped to fixed rates
//! - Water-balance engine: irrigation floor, signed balance, per-dekad
//!   suitability predicate, valid-dekad fraction, ordinal classification
//!   per threshold
//!
//! Data acquisition, reprojection, and export live outside this crate;
//! the engine consumes pre-aligned in-memory fields through the traits in
//! [`sources`] and produces a multi-band class raster.

// Core types and utilities
pub mod core_types;

// Temporal alignment of raw sources onto the dekad calendar
pub mod aggregate;

// Static soil classification
pub mod soil;

// External data-source interfaces
pub mod sources;

// Water-balance and suitability engine
pub mod engine;

// Re-export core types
pub use core_types::{AnalysisConfig, Dekad, DekadCalendar, DekadField, EngineError};
pub use core_types::{MaskMap, MaskedField, DEKADS_PER_YEAR, DEKAD_LENGTH_DAYS};

// Re-export source interfaces
pub use sources::{
    CompositeStore, CompositeTile, DailyFieldStore, DailyPrecipitationSource,
    EightDayCompositeSource, StaticSoilFields, COMPOSITE_LENGTH_DAYS,
};

// Re-export the engine surface
pub use engine::{
    run_suitability_analysis, summarize_thresholds, threshold_sweep, ClassBand, SuitabilityClass,
    SuitabilityRaster, ThresholdSummary,
};
pub use soil::{assign_percolation_rates, TextureClass};
