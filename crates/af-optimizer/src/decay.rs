//! Reference objective: driven two-exponential decay.
//!
//! A latent driver decays at rate `rl` from a unit initial value. The observed
//! variable decays at rate `rd` toward `baseline`, driven by the latent decay
//! and scaled by `scale`, starting from `scale * id + baseline`.

use serde::{Deserialize, Serialize};

use af_types::{AfResult, InputError, ObjectiveError, Sample, WeightedSamples};

use crate::objective::Objective;

/// Initial value of the latent driver.
const LATENT_INITIAL: f64 = 1.0;

/// Named view of the five model parameters `[rl, id, rd, scale, baseline]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayParams {
    /// Latent decay rate.
    pub rl: f64,
    /// Initial displacement of the observed variable.
    pub id: f64,
    /// Observed decay rate.
    pub rd: f64,
    pub scale: f64,
    pub baseline: f64,
}

impl DecayParams {
    pub const LEN: usize = 5;

    pub fn new(rl: f64, id: f64, rd: f64, scale: f64, baseline: f64) -> Self {
        Self {
            rl,
            id,
            rd,
            scale,
            baseline,
        }
    }

    pub fn from_slice(params: &[f64]) -> AfResult<Self> {
        match *params {
            [rl, id, rd, scale, baseline] => Ok(Self::new(rl, id, rd, scale, baseline)),
            _ => Err(InputError::LengthMismatch {
                what: "decay parameters".to_string(),
                expected: Self::LEN,
                actual: params.len(),
            }
            .into()),
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.rl, self.id, self.rd, self.scale, self.baseline]
    }

    /// Closed-form model value at `t`. Fails when the two rates coincide.
    pub fn predict(&self, t: f64) -> Result<f64, ObjectiveError> {
        if self.rd == self.rl {
            return Err(ObjectiveError::SingularModel { rate: self.rl });
        }
        let coupling = self.rl * LATENT_INITIAL / (self.rd - self.rl);
        let order1 = coupling * (-self.rl * t).exp();
        let order2 = (self.id - coupling) * (-self.rd * t).exp();
        Ok(self.scale * (order1 + order2) + self.baseline)
    }

    /// Noise-free samples of the model at the given coordinates.
    pub fn simulate(&self, times: &[f64]) -> AfResult<Vec<Sample>> {
        times
            .iter()
            .map(|&t| -> AfResult<Sample> { Ok(Sample::new(t, self.predict(t)?)) })
            .collect()
    }
}

/// Weighted root-mean-square residual of [`DecayParams`] against the samples.
///
/// Weights are expected to be normalized already, so no division by their
/// sum takes place. Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoCompartmentDecay;

impl TwoCompartmentDecay {
    pub fn new() -> Self {
        Self
    }
}

impl Objective for TwoCompartmentDecay {
    fn score(&self, params: &[f64], aux: &WeightedSamples) -> AfResult<f64> {
        let model = DecayParams::from_slice(params)?;
        if aux.is_empty() {
            return Err(InputError::EmptySamples.into());
        }

        let mut sum_sq: f64 = 0.0;
        for (sample, weight) in aux.iter() {
            let residual = model.predict(sample.coordinate)? - sample.observation;
            sum_sq += weight * residual * residual;
        }
        Ok(sum_sq.sqrt())
    }

    fn name(&self) -> &str {
        "two_compartment_decay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_types::AfError;

    fn reference() -> DecayParams {
        DecayParams::new(0.5, 2.0, 0.2, 3.0, 1.0)
    }

    fn uniform(samples: Vec<Sample>) -> WeightedSamples {
        let w = 1.0 / samples.len() as f64;
        let weights = vec![w; samples.len()];
        WeightedSamples::new(samples, weights).unwrap()
    }

    #[test]
    fn starts_at_scaled_displacement_plus_baseline() {
        let p = reference();
        let y0 = p.predict(0.0).unwrap();
        assert!((y0 - (p.scale * p.id + p.baseline)).abs() < 1e-12);
    }

    #[test]
    fn decays_to_baseline() {
        let p = reference();
        assert!((p.predict(200.0).unwrap() - p.baseline).abs() < 1e-9);
    }

    #[test]
    fn matches_hand_computed_value() {
        let p = reference();
        // coupling = 0.5 / (0.2 - 0.5) = -5/3
        let coupling = -5.0 / 3.0;
        let expected = 3.0 * (coupling * (-1.0f64).exp() + (2.0 - coupling) * (-0.4f64).exp()) + 1.0;
        assert!((p.predict(2.0).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn exact_parameters_score_zero() {
        let p = reference();
        let times: Vec<f64> = (0..=10).map(f64::from).collect();
        let aux = uniform(p.simulate(&times).unwrap());
        let score = TwoCompartmentDecay.score(&p.to_vec(), &aux).unwrap();
        assert!(score.abs() < 1e-12);
    }

    #[test]
    fn score_is_weighted_rms() {
        let aux = WeightedSamples::new(
            vec![Sample::new(0.0, 7.0 + 1.0), Sample::new(0.0, 7.0 - 3.0)],
            vec![0.75, 0.25],
        )
        .unwrap();
        // predicted(0) = 3 * 2 + 1 = 7, residuals -1 and 3
        let score = TwoCompartmentDecay.score(&reference().to_vec(), &aux).unwrap();
        assert!((score - (0.75f64 * 1.0 + 0.25 * 9.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn equal_rates_are_singular() {
        let aux = uniform(vec![Sample::new(1.0, 1.0)]);
        let err = TwoCompartmentDecay
            .score(&[0.3, 1.0, 0.3, 1.0, 0.0], &aux)
            .unwrap_err();
        assert!(matches!(
            err,
            AfError::Objective(ObjectiveError::SingularModel { .. })
        ));
    }

    #[test]
    fn wrong_parameter_count() {
        let aux = uniform(vec![Sample::new(1.0, 1.0)]);
        assert!(TwoCompartmentDecay.score(&[0.3, 1.0], &aux).is_err());
        assert!(DecayParams::from_slice(&[0.0; 6]).is_err());
    }

    #[test]
    fn empty_samples_rejected() {
        let err = TwoCompartmentDecay
            .score(&reference().to_vec(), &WeightedSamples::empty())
            .unwrap_err();
        assert!(matches!(err, AfError::Input(InputError::EmptySamples)));
    }

    #[test]
    fn params_round_trip_through_slice() {
        let p = reference();
        assert_eq!(DecayParams::from_slice(&p.to_vec()).unwrap(), p);
    }
}
