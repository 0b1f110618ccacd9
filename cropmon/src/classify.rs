//! Crop-yield classification of weather observations.
//!
//! Rules are evaluated in precedence order and the first match wins:
//!
//! 1. Good: all three variables inside their Good band.
//! 2. Moderate: all three variables inside their Moderate band (low or high
//!    side, independently per variable).
//! 3. Poor: everything else.
//!
//! A single variable outside both bands forces Poor, even when the other
//! two are ideal. The rule only ever looks at the three measured values.

use serde::Serialize;

use crate::bands::{DEFAULT_BANDS, YieldBands};
use crate::logging::{self, Component};
use crate::model::{
    ClassifiedObservation, FIELD_HUMIDITY, FIELD_PRECIPITATION, FIELD_TEMPERATURE, Observation,
    ObservationError, YieldCategory,
};

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classifies a reading against the default band table.
///
/// Total over every `f64` input. NaN satisfies no band and therefore
/// classifies as Poor; `classify_observation` rejects such readings before
/// they get here.
pub fn classify(temperature_c: f64, humidity_pct: f64, precipitation_mm: f64) -> YieldCategory {
    classify_with(&DEFAULT_BANDS, temperature_c, humidity_pct, precipitation_mm)
}

/// Classifies a reading against a custom band table.
pub fn classify_with(
    bands: &YieldBands,
    temperature_c: f64,
    humidity_pct: f64,
    precipitation_mm: f64,
) -> YieldCategory {
    if bands.temperature_c.is_good(temperature_c)
        && bands.humidity_pct.is_good(humidity_pct)
        && bands.precipitation_mm.is_good(precipitation_mm)
    {
        YieldCategory::Good
    } else if bands.temperature_c.is_moderate(temperature_c)
        && bands.humidity_pct.is_moderate(humidity_pct)
        && bands.precipitation_mm.is_moderate(precipitation_mm)
    {
        YieldCategory::Moderate
    } else {
        YieldCategory::Poor
    }
}

// ---------------------------------------------------------------------------
// Observation validation
// ---------------------------------------------------------------------------

fn require(location: &str, field: &'static str, value: Option<f64>) -> Result<f64, ObservationError> {
    let value = value.ok_or_else(|| ObservationError::MissingField {
        location: location.to_string(),
        field,
    })?;

    if !value.is_finite() {
        return Err(ObservationError::NonFiniteValue {
            location: location.to_string(),
            field,
            value,
        });
    }

    Ok(value)
}

/// Validates the three required fields and classifies the observation.
///
/// Missing and non-finite values are rejected here rather than classified,
/// so they never reach aggregation or correlation.
pub fn classify_observation(
    bands: &YieldBands,
    observation: &Observation,
) -> Result<ClassifiedObservation, ObservationError> {
    let location = observation.location.as_str();
    let temperature_c = require(location, FIELD_TEMPERATURE, observation.temperature_c)?;
    let humidity_pct = require(location, FIELD_HUMIDITY, observation.humidity_pct)?;
    let precipitation_mm = require(location, FIELD_PRECIPITATION, observation.precipitation_mm)?;

    let category = classify_with(bands, temperature_c, humidity_pct, precipitation_mm);

    Ok(ClassifiedObservation::new(
        observation.location.clone(),
        observation.timestamp,
        temperature_c,
        humidity_pct,
        precipitation_mm,
        category,
    ))
}

// ---------------------------------------------------------------------------
// Batch classification
// ---------------------------------------------------------------------------

/// An input row excluded from classification, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedObservation {
    /// Position of the observation in the input sequence.
    pub index: usize,
    pub error: ObservationError,
}

/// Result of classifying a whole input sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationRun {
    /// Valid observations, in input order.
    pub classified: Vec<ClassifiedObservation>,
    pub skipped: Vec<SkippedObservation>,
}

impl ClassificationRun {
    pub fn total(&self) -> usize {
        self.classified.len() + self.skipped.len()
    }
}

/// Classifies every observation independently, keeping input order.
///
/// Rejected observations are reported in `skipped`; the batch itself never
/// fails.
pub fn classify_all(bands: &YieldBands, observations: &[Observation]) -> ClassificationRun {
    let mut run = ClassificationRun::default();

    for (index, observation) in observations.iter().enumerate() {
        match classify_observation(bands, observation) {
            Ok(classified) => run.classified.push(classified),
            Err(error) => {
                logging::log_skipped_observation(index, &error);
                run.skipped.push(SkippedObservation { index, error });
            }
        }
    }

    logging::log_run_summary(
        Component::Classifier,
        run.total(),
        run.classified.len(),
        run.skipped.len(),
    );

    run
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
