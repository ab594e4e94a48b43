//! Density-reciprocal sample weighting.
//!
//! Each sample is weighted by the inverse of an unnormalized Gaussian kernel
//! density estimate at its coordinate, then the weights are normalized to sum
//! to one. Clustered samples share their weight while isolated samples keep
//! most of theirs, so an aggregate over weighted residuals behaves as if the
//! axis had been sampled uniformly.

use serde::{Deserialize, Serialize};

use af_types::{AfResult, InputError, WeightingError};

/// Reusable weighting policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityWeighter {
    /// Kernel bandwidth. `None` selects `2 * range / n`.
    pub bandwidth: Option<f64>,
}

impl DensityWeighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bandwidth(bandwidth: f64) -> Self {
        Self {
            bandwidth: Some(bandwidth),
        }
    }

    pub fn weights(&self, values: &[f64]) -> AfResult<Vec<f64>> {
        compute_weights(values, self.bandwidth)
    }
}

/// Default bandwidth: twice the coordinate range divided by the sample count.
pub fn default_bandwidth(values: &[f64]) -> f64 {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    2.0 * (max - min) / values.len() as f64
}

/// Normalized reciprocal Gaussian kernel density at every coordinate.
///
/// Fails on empty or non-finite input, on an explicit bandwidth that is not
/// strictly positive, when the default bandwidth collapses to zero because
/// every coordinate is identical, and when the coordinate range overflows.
pub fn compute_weights(values: &[f64], bandwidth: Option<f64>) -> AfResult<Vec<f64>> {
    if values.is_empty() {
        return Err(InputError::EmptySamples.into());
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(InputError::NonFinite {
            what: "coordinates".to_string(),
            index,
        }
        .into());
    }

    let bandwidth = match bandwidth {
        Some(bw) if bw.is_finite() && bw > 0.0 => bw,
        Some(bw) => {
            return Err(InputError::InvalidParameter {
                name: "bandwidth".to_string(),
                message: format!("must be finite and positive, got {}", bw),
            }
            .into())
        }
        None => {
            let bw = default_bandwidth(values);
            if bw == 0.0 {
                return Err(WeightingError::DegenerateBandwidth {
                    value: values[0],
                    count: values.len(),
                }
                .into());
            }
            if !bw.is_finite() {
                return Err(InputError::InvalidParameter {
                    name: "bandwidth".to_string(),
                    message: "coordinate range overflows the default bandwidth, pass an explicit bandwidth"
                        .to_string(),
                }
                .into());
            }
            bw
        }
    };

    // The self term contributes exp(0) = 1, so every density is at least 1.
    let inverse: Vec<f64> = values
        .iter()
        .map(|&xi| {
            let density: f64 = values
                .iter()
                .map(|&xj| {
                    let z = (xj - xi) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            1.0 / density
        })
        .collect();

    let total: f64 = inverse.iter().sum();
    Ok(inverse.into_iter().map(|w| w / total).collect())
}
