/// Per-category distribution summaries for box-plot views.
///
/// For each yield category, summarizes one measured variable with the five
/// box-plot statistics plus Tukey whiskers and outliers, ready for a
/// renderer to draw "temperature vs crop yield" and similar charts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{ClassifiedObservation, MeasuredVariable, Variable, YieldCategory};

/// Whiskers extend this many IQRs beyond the box.
pub const WHISKER_IQR: f64 = 1.5;

/// Box-plot statistics for one variable within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest observation at or above `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation at or below `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Observations beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Summarizes a non-empty, sorted slice.
    fn from_sorted(sorted: &[f64]) -> Self {
        let q1 = quantile(sorted, 0.25);
        let q3 = quantile(sorted, 0.75);
        let low_fence = q1 - WHISKER_IQR * (q3 - q1);
        let high_fence = q3 + WHISKER_IQR * (q3 - q1);

        // The box always lies within the fences, so `inside` yields at least
        // one value.
        let mut inside = sorted
            .iter()
            .copied()
            .filter(|&v| v >= low_fence && v <= high_fence);
        let lower_whisker = inside.next().unwrap_or(q1);
        let upper_whisker = inside.last().unwrap_or(lower_whisker);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Self {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median: quantile(sorted, 0.5),
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        }
    }
}

/// Quantile of a non-empty sorted slice, linearly interpolated between the
/// two closest ranks.
///
/// Weighted as a blend of the two ranks, not `lo + (hi - lo) * t`, so the
/// span between values of opposite sign cannot overflow.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let t = rank - lo as f64;
    sorted[lo] * (1.0 - t) + sorted[hi] * t
}

/// Summarizes one measured variable separately for each yield category.
///
/// Categories with no observations are absent from the result.
pub fn distribution_by_category(
    observations: &[ClassifiedObservation],
    variable: MeasuredVariable,
) -> BTreeMap<YieldCategory, BoxSummary> {
    let variable = Variable::from(variable);

    let mut grouped: BTreeMap<YieldCategory, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        grouped
            .entry(obs.yield_category())
            .or_default()
            .push(obs.value(variable));
    }

    grouped
        .into_iter()
        .map(|(category, mut values)| {
            values.sort_by(f64::total_cmp);
            (category, BoxSummary::from_sorted(&values))
        })
        .collect()
}
