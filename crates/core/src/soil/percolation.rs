//! Soil texture classification and percolation rates
//!
//! Maps the two static soil fields (clay %, sand %) through an ordered
//! rule list into four texture classes, each with a fixed daily
//! percolation rate. The rules are first-match-wins and deliberately do
//! NOT partition clay/sand space: clay in [35, 45) with sand > 52 slips
//! past both the clay-loam sand cap and the sandy-clay-loam clay cap and
//! lands in the default class. That fallthrough is the source dataset's
//! actual behavior and is preserved exactly.

use crate::core_types::calendar::DEKAD_LENGTH_DAYS;
use crate::core_types::field::{MaskMap, MaskedField};
use crate::sources::StaticSoilFields;
use serde::{Deserialize, Serialize};

/// Soil texture class from the ordered classification rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureClass {
    /// clay >= 45
    HeavyClay,
    /// 20 <= clay < 45 and sand <= 52
    ClayLoam,
    /// 20 <= clay < 35 and sand > 52
    SandyClayLoam,
    /// Everything the first three rules did not claim
    Unclassified,
}

impl TextureClass {
    /// Classify one pixel's texture, first matching rule wins
    ///
    /// Rule order matters: a pixel is only tested against a rule when
    /// every earlier rule declined it.
    pub fn from_texture(clay_pct: f32, sand_pct: f32) -> Self {
        if clay_pct >= 45.0 {
            TextureClass::HeavyClay
        } else if (20.0..45.0).contains(&clay_pct) && sand_pct <= 52.0 {
            TextureClass::ClayLoam
        } else if (20.0..35.0).contains(&clay_pct) && sand_pct > 52.0 {
            TextureClass::SandyClayLoam
        } else {
            TextureClass::Unclassified
        }
    }

    /// Numeric class code (1..=4)
    pub fn code(self) -> u8 {
        match self {
            TextureClass::HeavyClay => 1,
            TextureClass::ClayLoam => 2,
            TextureClass::SandyClayLoam => 3,
            TextureClass::Unclassified => 4,
        }
    }

    /// Fixed percolation rate in mm/day
    pub fn daily_percolation_mm(self) -> f32 {
        match self {
            TextureClass::HeavyClay => 3.0,
            TextureClass::ClayLoam => 4.0,
            TextureClass::SandyClayLoam => 9.0,
            TextureClass::Unclassified => 12.0,
        }
    }

    /// Dekad-equivalent percolation rate in mm per 10 days
    pub fn dekad_percolation_mm(self) -> f32 {
        self.daily_percolation_mm() * DEKAD_LENGTH_DAYS as f32
    }
}

/// Assign each pixel its dekad-equivalent percolation rate
///
/// The output is static: no time dimension, broadcast against every
/// dekad's rainfall/PET pair downstream. Masked wherever either soil
/// field is masked or the extent is invalid.
///
/// # Panics
///
/// Panics if the soil fields and extent are not on the same grid; call
/// [`StaticSoilFields::check_grid`] first for a recoverable error.
pub fn assign_percolation_rates(soils: &StaticSoilFields, extent: &MaskMap) -> MaskedField {
    soils
        .clay_pct()
        .zip_map(soils.sand_pct(), |clay, sand| {
            TextureClass::from_texture(clay, sand).dekad_percolation_mm()
        })
        .masked_by(extent)
}
