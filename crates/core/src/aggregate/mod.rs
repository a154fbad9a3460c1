//! Temporal alignment of raw sources onto the dekad calendar
//!
//! Each aggregator maps one time-indexed source onto one dekad, producing
//! a scalar field tagged with the dekad start. The two aggregators are
//! independent of each other and share only the calendar.

mod pet;
mod rainfall;

pub use pet::aggregate_dekad_pet;
pub use rainfall::aggregate_dekad_rainfall;
