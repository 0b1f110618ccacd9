/// Yield threshold table for the crop-yield classifier.
///
/// Defines the Good and Moderate bands for each measured variable. This is
/// the single source of truth for the numeric limits; the classifier and the
/// configuration loader both read them from here rather than hardcoding
/// values.
///
/// Each variable has one Good band and a two-sided Moderate band straddling
/// it ("slightly low" below, "slightly high" above). The edge shared between
/// the Good band and each Moderate side is inclusive on the Good side only,
/// so a value sits in at most one of the three.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{FIELD_HUMIDITY, FIELD_PRECIPITATION, FIELD_TEMPERATURE};

// ---------------------------------------------------------------------------
// Band
// ---------------------------------------------------------------------------

/// A closed, open, or half-open interval over one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
    #[serde(default = "inclusive")]
    pub min_inclusive: bool,
    #[serde(default = "inclusive")]
    pub max_inclusive: bool,
}

fn inclusive() -> bool {
    true
}

impl Band {
    /// `[min, max]`
    pub const fn closed(min: f64, max: f64) -> Self {
        Self { min, max, min_inclusive: true, max_inclusive: true }
    }

    /// `[min, max)`
    pub const fn closed_open(min: f64, max: f64) -> Self {
        Self { min, max, min_inclusive: true, max_inclusive: false }
    }

    /// `(min, max]`
    pub const fn open_closed(min: f64, max: f64) -> Self {
        Self { min, max, min_inclusive: false, max_inclusive: true }
    }

    /// Returns `true` if `value` lies inside the band.
    ///
    /// NaN is never contained: every comparison against it is false.
    pub fn contains(&self, value: f64) -> bool {
        let above_min = if self.min_inclusive { value >= self.min } else { value > self.min };
        let below_max = if self.max_inclusive { value <= self.max } else { value < self.max };
        above_min && below_max
    }

    fn validate(&self, field: &'static str, band: &'static str) -> Result<(), BandError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(BandError::NonFiniteLimit { field, band });
        }
        if self.min > self.max {
            return Err(BandError::Inverted { field, band, min: self.min, max: self.max });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Per-variable bands
// ---------------------------------------------------------------------------

/// Good and Moderate bands for one measured variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableBands {
    pub good: Band,
    pub moderate_low: Band,
    pub moderate_high: Band,
}

impl VariableBands {
    pub fn is_good(&self, value: f64) -> bool {
        self.good.contains(value)
    }

    /// In either the slightly-low or the slightly-high band.
    pub fn is_moderate(&self, value: f64) -> bool {
        self.moderate_low.contains(value) || self.moderate_high.contains(value)
    }

    fn validate(&self, field: &'static str) -> Result<(), BandError> {
        self.good.validate(field, "good")?;
        self.moderate_low.validate(field, "moderate_low")?;
        self.moderate_high.validate(field, "moderate_high")
    }
}

// ---------------------------------------------------------------------------
// Threshold table
// ---------------------------------------------------------------------------

/// Default temperature bands, °C.
pub const TEMPERATURE_BANDS: VariableBands = VariableBands {
    good: Band::closed(20.0, 30.0),
    moderate_low: Band::closed_open(15.0, 20.0),
    moderate_high: Band::open_closed(30.0, 36.0),
};

/// Default relative humidity bands, %.
pub const HUMIDITY_BANDS: VariableBands = VariableBands {
    good: Band::closed(50.0, 75.0),
    moderate_low: Band::closed_open(40.0, 50.0),
    moderate_high: Band::open_closed(75.0, 85.0),
};

/// Default precipitation bands, mm.
///
/// The upper Moderate edge is the calibrated value, not a rounded one.
pub const PRECIPITATION_BANDS: VariableBands = VariableBands {
    good: Band::closed(8.91, 14.8),
    moderate_low: Band::closed_open(7.0, 8.91),
    moderate_high: Band::open_closed(14.8, 14.97158278),
};

/// The full band table consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldBands {
    #[serde(default = "default_temperature")]
    pub temperature_c: VariableBands,
    #[serde(default = "default_humidity")]
    pub humidity_pct: VariableBands,
    #[serde(default = "default_precipitation")]
    pub precipitation_mm: VariableBands,
}

fn default_temperature() -> VariableBands {
    TEMPERATURE_BANDS
}

fn default_humidity() -> VariableBands {
    HUMIDITY_BANDS
}

fn default_precipitation() -> VariableBands {
    PRECIPITATION_BANDS
}

impl Default for YieldBands {
    fn default() -> Self {
        DEFAULT_BANDS
    }
}

/// The calibrated band table used when no configuration overrides it.
pub const DEFAULT_BANDS: YieldBands = YieldBands {
    temperature_c: TEMPERATURE_BANDS,
    humidity_pct: HUMIDITY_BANDS,
    precipitation_mm: PRECIPITATION_BANDS,
};

impl YieldBands {
    /// Rejects tables with non-finite limits or a band whose min exceeds
    /// its max.
    pub fn validate(&self) -> Result<(), BandError> {
        self.temperature_c.validate(FIELD_TEMPERATURE)?;
        self.humidity_pct.validate(FIELD_HUMIDITY)?;
        self.precipitation_mm.validate(FIELD_PRECIPITATION)
    }
}

/// A band table that cannot be used for classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BandError {
    #[error("{field}.{band}: band limits must be finite")]
    NonFiniteLimit { field: &'static str, band: &'static str },
    #[error("{field}.{band}: min {min} is greater than max {max}")]
    Inverted {
        field: &'static str,
        band: &'static str,
        min: f64,
        max: f64,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
