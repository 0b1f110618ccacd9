//! Crop-yield suitability from weather observations.
//!
//! Classifies each observation into Good / Moderate / Poor from threshold
//! bands over temperature, humidity and precipitation, counts categories
//! per location, and correlates the raw variables with the ordinal yield
//! encoding. Loading raw records and rendering results are left to the
//! caller.

pub mod analysis;
pub mod bands;
pub mod classify;
pub mod config;
pub mod logging;
pub mod model;
pub mod report;

pub use analysis::correlation::{CorrelationMatrix, correlate};
pub use analysis::distribution::{BoxSummary, distribution_by_category};
pub use analysis::groupings::{CategoryCounts, LocationYieldCounts, aggregate};
pub use bands::{DEFAULT_BANDS, YieldBands};
pub use classify::{ClassificationRun, SkippedObservation, classify, classify_all, classify_with};
pub use model::{
    ClassifiedObservation, CorrelationError, MeasuredVariable, Observation, ObservationError,
    Variable, YieldCategory,
};
pub use report::{CorrelationOutcome, YieldReport, build_report};
