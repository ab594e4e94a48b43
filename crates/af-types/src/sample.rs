use serde::{Deserialize, Serialize};

use crate::errors::{AfResult, InputError};

/// One observation at a position along the sampled axis (e.g. time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub coordinate: f64,
    pub observation: f64,
}

impl Sample {
    pub fn new(coordinate: f64, observation: f64) -> Self {
        Self {
            coordinate,
            observation,
        }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((coordinate, observation): (f64, f64)) -> Self {
        Self::new(coordinate, observation)
    }
}

/// Extract the coordinate column of a sample sequence.
pub fn coordinates(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.coordinate).collect()
}

/// Samples paired with their per-sample weights.
///
/// This is the auxiliary data handed to every objective evaluation. The
/// weights are computed once per run and sum to 1 whenever samples exist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedSamples {
    samples: Vec<Sample>,
    weights: Vec<f64>,
}

impl WeightedSamples {
    pub fn new(samples: Vec<Sample>, weights: Vec<f64>) -> AfResult<Self> {
        if samples.len() != weights.len() {
            return Err(InputError::LengthMismatch {
                what: "weights".to_string(),
                expected: samples.len(),
                actual: weights.len(),
            }
            .into());
        }
        Ok(Self { samples, weights })
    }

    /// Auxiliary data for objectives that do not look at samples.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate `(sample, weight)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Sample, f64)> + '_ {
        self.samples.iter().zip(self.weights.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_preserve_order() {
        let samples: Vec<Sample> = vec![(2.0, 1.0).into(), (0.5, 3.0).into()];
        assert_eq!(coordinates(&samples), vec![2.0, 0.5]);
    }

    #[test]
    fn weighted_samples_require_matching_lengths() {
        let samples = vec![Sample::new(0.0, 1.0), Sample::new(1.0, 2.0)];
        assert!(WeightedSamples::new(samples.clone(), vec![1.0]).is_err());

        let aux = WeightedSamples::new(samples, vec![0.25, 0.75]).unwrap();
        assert_eq!(aux.len(), 2);
        let pairs: Vec<(f64, f64)> = aux.iter().map(|(s, w)| (s.observation, w)).collect();
        assert_eq!(pairs, vec![(1.0, 0.25), (2.0, 0.75)]);
    }

    #[test]
    fn empty_aux() {
        let aux = WeightedSamples::empty();
        assert!(aux.is_empty());
        assert!(aux.weights().is_empty());
    }
}
