/// Per-location yield category counts.
///
/// Organizes the flat classified sequence into one count row per location,
/// with every category present (zero included) so a renderer always has a
/// complete category axis.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::logging::{self, Component};
use crate::model::{ClassifiedObservation, YieldCategory};

/// Count of observations per yield category for one location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub good: usize,
    pub moderate: usize,
    pub poor: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: YieldCategory) -> usize {
        match category {
            YieldCategory::Good => self.good,
            YieldCategory::Moderate => self.moderate,
            YieldCategory::Poor => self.poor,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.moderate + self.poor
    }

    fn record(&mut self, category: YieldCategory) {
        match category {
            YieldCategory::Good => self.good += 1,
            YieldCategory::Moderate => self.moderate += 1,
            YieldCategory::Poor => self.poor += 1,
        }
    }
}

/// Location → category counts.
///
/// Keys are compared exactly (case-sensitive, untrimmed). Iteration order
/// is lexicographic by location, which callers should not rely on for
/// display ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocationYieldCounts {
    counts: BTreeMap<String, CategoryCounts>,
}

impl LocationYieldCounts {
    /// Counts for `location`, or `None` if it had no observations.
    pub fn get(&self, location: &str) -> Option<&CategoryCounts> {
        self.counts.get(location)
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryCounts)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of observations counted across all locations.
    pub fn total(&self) -> usize {
        self.counts.values().map(CategoryCounts::total).sum()
    }
}

/// Groups classified observations by location and counts each category.
pub fn aggregate(observations: &[ClassifiedObservation]) -> LocationYieldCounts {
    let mut counts: BTreeMap<String, CategoryCounts> = BTreeMap::new();

    for obs in observations {
        counts
            .entry(obs.location.clone())
            .or_default()
            .record(obs.yield_category());
    }

    logging::debug(
        Component::Aggregator,
        None,
        &format!("{} observations across {} locations", observations.len(), counts.len()),
    );

    LocationYieldCounts { counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::DEFAULT_BANDS;
    use crate::classify::classify_observation;
    use crate::model::Observation;

    fn classified(location: &str, t: f64, h: f64, p: f64) -> ClassifiedObservation {
        classify_observation(&DEFAULT_BANDS, &Observation::new(location, t, h, p))
            .expect("complete observation should classify")
    }

    #[test]
    fn test_empty_input_yields_no_locations() {
        let counts = aggregate(&[]);
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_absent_categories_are_zero_not_missing() {
        let counts = aggregate(&[classified("A", 22.0, 60.0, 10.0)]);
        let a = counts.get("A").expect("location A should be present");

        assert_eq!(a.good, 1);
        assert_eq!(a.moderate, 0);
        assert_eq!(a.poor, 0);
    }

    #[test]
    fn test_per_location_total_matches_input() {
        let observations = vec![
            classified("A", 22.0, 60.0, 10.0),
            classified("A", 35.0, 90.0, 20.0),
            classified("A", 17.0, 45.0, 7.5),
            classified("B", 16.0, 45.0, 7.5),
        ];
        let counts = aggregate(&observations);

        for location in ["A", "B"] {
            let expected = observations.iter().filter(|o| o.location == location).count();
            assert_eq!(counts.get(location).unwrap().total(), expected);
        }
        assert_eq!(counts.total(), observations.len());
    }

    #[test]
    fn test_location_keys_are_case_sensitive() {
        let counts = aggregate(&[
            classified("Farm", 22.0, 60.0, 10.0),
            classified("farm", 22.0, 60.0, 10.0),
            classified("farm ", 22.0, 60.0, 10.0),
        ]);
        assert_eq!(counts.len(), 3);
        assert!(counts.get("FARM").is_none());
    }

    #[test]
    fn test_get_by_category() {
        let counts = aggregate(&[
            classified("A", 35.0, 90.0, 20.0),
            classified("A", 35.0, 90.0, 20.0),
        ]);
        let a = counts.get("A").unwrap();
        assert_eq!(a.get(YieldCategory::Poor), 2);
        assert_eq!(a.get(YieldCategory::Good), 0);
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let counts = aggregate(&[classified("B", 16.0, 45.0, 7.5)]);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json, serde_json::json!({"B": {"good": 0, "moderate": 1, "poor": 0}}));
    }
}
