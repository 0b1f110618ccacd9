//! Full classification pass consumed by the presentation layer.
//!
//! Runs the classifier once, then feeds the same classified sequence to the
//! aggregator and the correlation analyzer independently. A report is never
//! updated in place: any input change means building a new one.

use serde::Serialize;

use crate::analysis::correlation::{self, CorrelationMatrix};
use crate::analysis::groupings::{self, LocationYieldCounts};
use crate::bands::YieldBands;
use crate::classify::{self, SkippedObservation};
use crate::model::{ClassifiedObservation, CorrelationError, Observation};

/// Correlation result as exposed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationOutcome {
    Matrix(CorrelationMatrix),
    Insufficient { reason: CorrelationError },
}

impl CorrelationOutcome {
    pub fn matrix(&self) -> Option<&CorrelationMatrix> {
        match self {
            CorrelationOutcome::Matrix(matrix) => Some(matrix),
            CorrelationOutcome::Insufficient { .. } => None,
        }
    }
}

impl From<Result<CorrelationMatrix, CorrelationError>> for CorrelationOutcome {
    fn from(result: Result<CorrelationMatrix, CorrelationError>) -> Self {
        match result {
            Ok(matrix) => CorrelationOutcome::Matrix(matrix),
            Err(reason) => CorrelationOutcome::Insufficient { reason },
        }
    }
}

/// Classified dataset, per-location counts and correlation, plus the rows
/// that could not be classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldReport {
    pub classified: Vec<ClassifiedObservation>,
    pub skipped: Vec<SkippedObservation>,
    pub counts: LocationYieldCounts,
    pub correlation: CorrelationOutcome,
}

impl YieldReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Classify, aggregate and correlate `observations` in one pass.
pub fn build_report(bands: &YieldBands, observations: &[Observation]) -> YieldReport {
    let run = classify::classify_all(bands, observations);
    let counts = groupings::aggregate(&run.classified);
    let correlation = correlation::correlate(&run.classified).into();

    YieldReport {
        classified: run.classified,
        skipped: run.skipped,
        counts,
        correlation,
    }
}
