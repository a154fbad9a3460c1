//! Dekad calendar generation
//!
//! A dekad is a fixed-length 10-day period. The analysis year is divided
//! into 36 dekads starting at January 1, with no alignment to month
//! boundaries: dekad `i` starts exactly `10 * i` days after January 1.
//! The final dekad may overrun December 31; sources simply have no
//! coverage past year-end and the zero-fill rules apply there.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of dekads in an analysis year
pub const DEKADS_PER_YEAR: usize = 36;

/// Length of one dekad in days
pub const DEKAD_LENGTH_DAYS: i64 = 10;

/// A single half-open 10-day period `[start, start + 10 days)`
///
/// Immutable once generated by [`DekadCalendar::for_year`]. The start date
/// doubles as the identifying key for every per-dekad field derived
/// downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dekad {
    index: usize,
    start: NaiveDate,
}

impl Dekad {
    /// Dekad index within the year (0..36)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Inclusive start date
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end date (`start + 10 days`)
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(DEKAD_LENGTH_DAYS)
    }

    /// Whether `date` falls inside the half-open interval
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end()
    }

    /// Number of days this dekad shares with the half-open window
    /// `[window_start, window_end)`
    ///
    /// # Arguments
    ///
    /// * `window_start` - Inclusive start of the other window
    /// * `window_end` - Exclusive end of the other window
    ///
    /// # Returns
    ///
    /// Overlap length in whole days, zero when the windows are disjoint
    pub fn overlap_days(&self, window_start: NaiveDate, window_end: NaiveDate) -> i64 {
        let overlap_start = self.start.max(window_start);
        let overlap_end = self.end().min(window_end);
        (overlap_end - overlap_start).num_days().max(0)
    }
}

/// The canonical sequence of 36 dekads covering one year
///
/// Generated once per run and shared by every aggregator. Pure and
/// deterministic: the same year always yields the same calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DekadCalendar {
    year: i32,
    dekads: Vec<Dekad>,
}

impl DekadCalendar {
    /// Build the calendar for a year
    ///
    /// # Panics
    ///
    /// Panics if `year` is outside the range representable by
    /// [`chrono::NaiveDate`] (roughly ±262 000).
    pub fn for_year(year: i32) -> Self {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap_or_else(|| panic!("year {year} outside supported calendar range"));

        let dekads = (0..DEKADS_PER_YEAR)
            .map(|index| Dekad {
                index,
                start: jan1 + Duration::days(DEKAD_LENGTH_DAYS * index as i64),
            })
            .collect();

        DekadCalendar { year, dekads }
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// All 36 dekads in index order
    pub fn dekads(&self) -> &[Dekad] {
        &self.dekads
    }

    /// Dekad by index, `None` when out of range
    pub fn dekad(&self, index: usize) -> Option<&Dekad> {
        self.dekads.get(index)
    }

    /// The dekad containing `date`, `None` when the date falls outside
    /// every dekad of this year
    pub fn containing(&self, date: NaiveDate) -> Option<&Dekad> {
        self.dekads.iter().find(|d| d.contains(date))
    }
}
