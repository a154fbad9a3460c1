//! Core types: dekad calendar, masked fields, run configuration, errors

pub mod calendar;
pub mod config;
pub mod error;
pub mod field;

pub use calendar::{Dekad, DekadCalendar, DEKADS_PER_YEAR, DEKAD_LENGTH_DAYS};
pub use config::AnalysisConfig;
pub use error::EngineError;
pub use field::{DekadField, MaskMap, MaskedField};
