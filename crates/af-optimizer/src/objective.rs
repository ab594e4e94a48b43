//! Pluggable scoring functions.

use af_types::{AfResult, WeightedSamples};

/// Scores a parameter vector against the run's weighted samples.
///
/// Implementations must be pure: the search may call `score` any number of
/// times with re-derived candidates. Orientation (higher or lower is better)
/// is configured on the search, not here.
pub trait Objective {
    fn score(&self, params: &[f64], aux: &WeightedSamples) -> AfResult<f64>;

    /// Human-readable objective name.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Objective for F
where
    F: Fn(&[f64], &WeightedSamples) -> AfResult<f64>,
{
    fn score(&self, params: &[f64], aux: &WeightedSamples) -> AfResult<f64> {
        self(params, aux)
    }
}
