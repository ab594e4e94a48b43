//! Search configuration.

use serde::{Deserialize, Serialize};

use af_types::{AfResult, InputError};

/// Whether we are maximizing or minimizing the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveDirection {
    #[default]
    Maximize,
    Minimize,
}

impl ObjectiveDirection {
    /// Strict improvement test. Ties and non-finite candidates never win.
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        if !candidate.is_finite() {
            return false;
        }
        match self {
            ObjectiveDirection::Maximize => candidate > incumbent,
            ObjectiveDirection::Minimize => candidate < incumbent,
        }
    }
}

/// Tuning knobs for [`AdaptiveLocalSearch`](crate::AdaptiveLocalSearch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Iteration cap.
    pub iterations: usize,

    pub direction: ObjectiveDirection,

    /// Initial per-dimension step scale. `None` means all ones.
    pub alpha0: Option<Vec<f64>>,

    /// Step growth factor after an improving iteration (> 1).
    pub gamma_better: f64,

    /// Step shrink factor after a non-improving iteration (in (0, 1)).
    pub gamma_worse: f64,

    /// The run stops once the compounded step scale drops to this value.
    pub alpha_tol: f64,

    /// Kernel bandwidth for sample weighting. `None` uses the range-based default.
    pub bandwidth: Option<f64>,

    /// Seed for the perturbation source. `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Keep the incumbent value after every iteration in the result.
    pub record_history: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            direction: ObjectiveDirection::Maximize,
            alpha0: None,
            gamma_better: 1.1,
            gamma_worse: 0.9,
            alpha_tol: 1e-3,
            bandwidth: None,
            seed: None,
            record_history: false,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_direction(mut self, direction: ObjectiveDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn minimize(self) -> Self {
        self.with_direction(ObjectiveDirection::Minimize)
    }

    pub fn with_alpha0(mut self, alpha0: Vec<f64>) -> Self {
        self.alpha0 = Some(alpha0);
        self
    }

    pub fn with_gammas(mut self, better: f64, worse: f64) -> Self {
        self.gamma_better = better;
        self.gamma_worse = worse;
        self
    }

    pub fn with_alpha_tol(mut self, tol: f64) -> Self {
        self.alpha_tol = tol;
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    /// Check the configuration against an `n`-dimensional problem.
    pub fn validate(&self, n: usize) -> AfResult<()> {
        if self.iterations == 0 {
            return Err(InputError::ZeroIterations.into());
        }
        if !(self.gamma_better.is_finite() && self.gamma_better > 1.0) {
            return Err(invalid("gamma_better", format!("must exceed 1, got {}", self.gamma_better)));
        }
        if !(self.gamma_worse > 0.0 && self.gamma_worse < 1.0) {
            return Err(invalid("gamma_worse", format!("must lie in (0, 1), got {}", self.gamma_worse)));
        }
        if !(self.alpha_tol.is_finite() && self.alpha_tol > 0.0) {
            return Err(invalid("alpha_tol", format!("must be positive, got {}", self.alpha_tol)));
        }
        if let Some(alpha0) = &self.alpha0 {
            if alpha0.len() != n {
                return Err(InputError::LengthMismatch {
                    what: "alpha0".to_string(),
                    expected: n,
                    actual: alpha0.len(),
                }
                .into());
            }
            if let Some(bad) = alpha0.iter().find(|a| !(a.is_finite() && **a > 0.0)) {
                return Err(invalid("alpha0", format!("entries must be positive, got {}", bad)));
            }
        }
        Ok(())
    }

    /// Owned copy of the starting step scale for an `n`-dimensional problem.
    pub fn initial_alpha(&self, n: usize) -> Vec<f64> {
        self.alpha0.clone().unwrap_or_else(|| vec![1.0; n])
    }
}

fn invalid(name: &str, message: String) -> af_types::AfError {
    InputError::InvalidParameter {
        name: name.to_string(),
        message,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_types::AfError;

    #[test]
    fn defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.iterations, 100);
        assert_eq!(config.direction, ObjectiveDirection::Maximize);
        assert_eq!(config.gamma_better, 1.1);
        assert_eq!(config.gamma_worse, 0.9);
        assert_eq!(config.alpha_tol, 1e-3);
        assert_eq!(config.initial_alpha(3), vec![1.0, 1.0, 1.0]);
        assert!(config.validate(3).is_ok());
    }

    #[test]
    fn direction_comparisons() {
        let max = ObjectiveDirection::Maximize;
        let min = ObjectiveDirection::Minimize;
        assert!(max.is_better(2.0, 1.0));
        assert!(!max.is_better(1.0, 1.0));
        assert!(min.is_better(0.5, 1.0));
        assert!(!min.is_better(1.0, 1.0));
        for dir in [max, min] {
            assert!(!dir.is_better(f64::NAN, 1.0));
            assert!(!dir.is_better(f64::INFINITY, 1.0));
            assert!(!dir.is_better(f64::NEG_INFINITY, 1.0));
        }
    }

    #[test]
    fn builder_chain() {
        let config = SearchConfig::new()
            .with_iterations(500)
            .minimize()
            .with_alpha0(vec![0.1, 0.2])
            .with_gammas(1.2, 0.95)
            .with_alpha_tol(1e-6)
            .with_bandwidth(0.5)
            .with_seed(7)
            .with_history(true);
        assert_eq!(config.iterations, 500);
        assert_eq!(config.direction, ObjectiveDirection::Minimize);
        assert_eq!(config.initial_alpha(2), vec![0.1, 0.2]);
        assert_eq!(config.seed, Some(7));
        assert!(config.record_history);
        assert!(config.validate(2).is_ok());
    }

    #[test]
    fn rejects_zero_iterations() {
        let err = SearchConfig::new().with_iterations(0).validate(1).unwrap_err();
        assert!(matches!(err, AfError::Input(InputError::ZeroIterations)));
    }

    #[test]
    fn rejects_bad_gammas_and_tolerance() {
        assert!(SearchConfig::new().with_gammas(1.0, 0.9).validate(1).is_err());
        assert!(SearchConfig::new().with_gammas(1.1, 1.0).validate(1).is_err());
        assert!(SearchConfig::new().with_gammas(1.1, 0.0).validate(1).is_err());
        assert!(SearchConfig::new().with_alpha_tol(0.0).validate(1).is_err());
    }

    #[test]
    fn rejects_bad_alpha0() {
        let err = SearchConfig::new()
            .with_alpha0(vec![1.0, 1.0])
            .validate(3)
            .unwrap_err();
        assert!(matches!(
            err,
            AfError::Input(InputError::LengthMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(SearchConfig::new().with_alpha0(vec![1.0, -0.5]).validate(2).is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"iterations": 250, "direction": "minimize", "seed": 3}"#)
                .unwrap();
        assert_eq!(config.iterations, 250);
        assert_eq!(config.direction, ObjectiveDirection::Minimize);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.gamma_better, 1.1);
        assert!(config.alpha0.is_none());
    }
}
