/// Data analysis over classified observations.
///
/// Every function here is a pure, single-pass computation over an
/// in-memory slice; results are rebuilt from scratch on each call.
///
/// Submodules:
/// - `groupings` — per-location yield category counts.
/// - `correlation` — Pearson correlation of weather variables against the
///   encoded yield category.
/// - `distribution` — per-category box-plot summaries of each variable.

pub mod correlation;
pub mod distribution;
pub mod groupings;
