/// Core data types for the crop-yield weather classification service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small accessors, and no I/O.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Column name for air temperature, in degrees Celsius.
pub const FIELD_TEMPERATURE: &str = "temperature_c";

/// Column name for relative humidity, in percent.
pub const FIELD_HUMIDITY: &str = "humidity_pct";

/// Column name for precipitation, in millimetres.
pub const FIELD_PRECIPITATION: &str = "precipitation_mm";

/// Column name for the ordinal yield encoding used in correlation.
pub const FIELD_ENCODED_CATEGORY: &str = "encoded_category";

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single weather reading at a location, as handed over by the loader.
///
/// The three measured variables are optional so that a record with a
/// missing column can be carried through and reported as skipped instead
/// of being coerced to a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub location: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub humidity_pct: Option<f64>,
    #[serde(default)]
    pub precipitation_mm: Option<f64>,
}

impl Observation {
    /// Builds a fully populated observation without a timestamp.
    pub fn new(location: &str, temperature_c: f64, humidity_pct: f64, precipitation_mm: f64) -> Self {
        Self {
            location: location.to_string(),
            timestamp: None,
            temperature_c: Some(temperature_c),
            humidity_pct: Some(humidity_pct),
            precipitation_mm: Some(precipitation_mm),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Crop-yield suitability assigned by the classifier.
///
/// Declared worst to best so that the derived ordering matches the
/// ordinal encoding (Poor < Moderate < Good).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum YieldCategory {
    Poor,
    Moderate,
    Good,
}

impl YieldCategory {
    /// All categories, in the order a category axis is rendered.
    pub const ALL: [YieldCategory; 3] = [YieldCategory::Good, YieldCategory::Moderate, YieldCategory::Poor];

    /// Ordinal encoding used for correlation: Good = 2, Moderate = 1, Poor = 0.
    pub fn encode(self) -> f64 {
        match self {
            YieldCategory::Good => 2.0,
            YieldCategory::Moderate => 1.0,
            YieldCategory::Poor => 0.0,
        }
    }
}

impl fmt::Display for YieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YieldCategory::Good => write!(f, "Good"),
            YieldCategory::Moderate => write!(f, "Moderate"),
            YieldCategory::Poor => write!(f, "Poor"),
        }
    }
}

/// An observation that passed validation, with its category attached.
///
/// Produced only by `classify::classify_observation`; the category is fixed
/// at construction and there is no setter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedObservation {
    pub location: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    yield_category: YieldCategory,
}

impl ClassifiedObservation {
    pub(crate) fn new(
        location: String,
        timestamp: Option<DateTime<Utc>>,
        temperature_c: f64,
        humidity_pct: f64,
        precipitation_mm: f64,
        yield_category: YieldCategory,
    ) -> Self {
        Self {
            location,
            timestamp,
            temperature_c,
            humidity_pct,
            precipitation_mm,
            yield_category,
        }
    }

    pub fn yield_category(&self) -> YieldCategory {
        self.yield_category
    }

    /// Value of one correlation axis for this observation.
    pub fn value(&self, variable: Variable) -> f64 {
        match variable {
            Variable::TemperatureC => self.temperature_c,
            Variable::HumidityPct => self.humidity_pct,
            Variable::PrecipitationMm => self.precipitation_mm,
            Variable::EncodedCategory => self.yield_category.encode(),
        }
    }
}

/// The four numeric columns of the correlation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    TemperatureC,
    HumidityPct,
    PrecipitationMm,
    EncodedCategory,
}

impl Variable {
    /// Column order of the correlation matrix.
    pub const ALL: [Variable; 4] = [
        Variable::TemperatureC,
        Variable::HumidityPct,
        Variable::PrecipitationMm,
        Variable::EncodedCategory,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Variable::TemperatureC => FIELD_TEMPERATURE,
            Variable::HumidityPct => FIELD_HUMIDITY,
            Variable::PrecipitationMm => FIELD_PRECIPITATION,
            Variable::EncodedCategory => FIELD_ENCODED_CATEGORY,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Variable::TemperatureC => 0,
            Variable::HumidityPct => 1,
            Variable::PrecipitationMm => 2,
            Variable::EncodedCategory => 3,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One of the three measured weather variables; the encoded category is
/// derived and not a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasuredVariable {
    TemperatureC,
    HumidityPct,
    PrecipitationMm,
}

impl MeasuredVariable {
    pub const ALL: [MeasuredVariable; 3] = [
        MeasuredVariable::TemperatureC,
        MeasuredVariable::HumidityPct,
        MeasuredVariable::PrecipitationMm,
    ];
}

impl From<MeasuredVariable> for Variable {
    fn from(variable: MeasuredVariable) -> Self {
        match variable {
            MeasuredVariable::TemperatureC => Variable::TemperatureC,
            MeasuredVariable::HumidityPct => Variable::HumidityPct,
            MeasuredVariable::PrecipitationMm => Variable::PrecipitationMm,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons an individual observation is rejected before classification.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum ObservationError {
    /// One of the three required numeric fields is absent.
    #[error("Missing field {field} at {location}")]
    MissingField { location: String, field: &'static str },
    /// A required field is NaN or infinite.
    #[error("Non-finite {field} at {location}: {value}")]
    NonFiniteValue {
        location: String,
        field: &'static str,
        value: f64,
    },
}

impl ObservationError {
    pub fn location(&self) -> &str {
        match self {
            ObservationError::MissingField { location, .. }
            | ObservationError::NonFiniteValue { location, .. } => location,
        }
    }
}

/// The correlation matrix cannot be computed from the given data.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum CorrelationError {
    #[error("Insufficient data for correlation: {observations} observation(s), need at least 2")]
    TooFewObservations { observations: usize },
    /// Every listed column holds a single repeated value.
    #[error("Insufficient data for correlation: zero variance in {}", join_variables(.variables))]
    ZeroVariance { variables: Vec<Variable> },
    /// The pair's coefficient could not be represented as a finite number.
    #[error("Correlation between {a} and {b} is not a finite number")]
    NonFiniteCoefficient { a: Variable, b: Variable },
}

fn join_variables(variables: &[Variable]) -> String {
    variables
        .iter()
        .map(|v| v.column_name())
        .collect::<Vec<_>>()
        .join(", ")
}
