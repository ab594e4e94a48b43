//! Adaptive-step stochastic local search.
//!
//! Every iteration draws a candidate uniformly from a box of half-width
//! `alpha[i] / 2` centred on the incumbent, scores it, and either adopts it
//! (growing every step by `gamma_better`) or discards it (shrinking every step
//! by `gamma_worse`). A single scalar tracks the compounded rescaling and ends
//! the run once it falls to `alpha_tol`.
//!
//! The tracker is shared by all dimensions even though `alpha` is kept per
//! dimension. Since every dimension is rescaled by the same factor the tracker
//! equals `alpha[i] / alpha0[i]` for every `i`.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use uuid::Uuid;

use af_types::{coordinates, AfResult, Bounds, InputError, ObjectiveError, Sample, WeightedSamples};

use crate::config::SearchConfig;
use crate::objective::Objective;
use crate::run::{IterationReport, SearchControl, SearchResult, Termination};
use crate::weighting::compute_weights;

type Observer<'a> = Box<dyn FnMut(&IterationReport<'_>) -> SearchControl + 'a>;

/// Mutable state of a single run.
#[derive(Debug, Clone)]
struct SearchState {
    best_x: Vec<f64>,
    best_value: f64,
    alpha: Vec<f64>,
    tolerance: f64,
    iteration: usize,
}

impl SearchState {
    fn rescale(&mut self, factor: f64) {
        for a in &mut self.alpha {
            *a *= factor;
        }
        self.tolerance *= factor;
    }
}

/// Derivative-free local optimizer with an adaptive step size.
pub struct AdaptiveLocalSearch<'a, O: Objective + ?Sized> {
    objective: &'a O,
    config: SearchConfig,
    observer: Option<Observer<'a>>,
}

impl<'a, O: Objective + ?Sized> AdaptiveLocalSearch<'a, O> {
    pub fn new(objective: &'a O, config: SearchConfig) -> Self {
        Self {
            objective,
            config,
            observer: None,
        }
    }

    /// Register a callback run after every iteration.
    ///
    /// Returning [`SearchControl::Stop`] ends the run before the next
    /// candidate is drawn; the result then reports [`Termination::Cancelled`].
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&IterationReport<'_>) -> SearchControl + 'a,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search, drawing perturbations from the configured seed (or a
    /// fresh one when no seed is set).
    pub fn optimize(
        &mut self,
        x0: &[f64],
        bounds: Option<&Bounds>,
        samples: &[Sample],
    ) -> AfResult<SearchResult> {
        let mut rng: StdRng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };
        self.optimize_with_rng(x0, bounds, samples, &mut rng)
    }

    /// Run the search with a caller-supplied perturbation source.
    pub fn optimize_with_rng<R: Rng>(
        &mut self,
        x0: &[f64],
        bounds: Option<&Bounds>,
        samples: &[Sample],
        rng: &mut R,
    ) -> AfResult<SearchResult> {
        let started_at = Utc::now();
        let n = x0.len();
        self.validate(x0, bounds)?;

        let aux = self.build_aux(samples)?;
        let direction = self.config.direction;

        let mut best_x = x0.to_vec();
        if let Some(bounds) = bounds {
            bounds.clamp(&mut best_x);
        }
        let best_value = self.objective.score(&best_x, &aux)?;
        if !best_value.is_finite() {
            return Err(ObjectiveError::NonFinite { value: best_value }.into());
        }

        let mut state = SearchState {
            best_x,
            best_value,
            alpha: self.config.initial_alpha(n),
            tolerance: 1.0,
            iteration: 0,
        };

        info!(
            "Starting adaptive search: objective={}, dimensions={}, samples={}, max_iterations={}, initial_value={}",
            self.objective.name(),
            n,
            aux.len(),
            self.config.iterations,
            state.best_value
        );

        let mut history = self
            .config
            .record_history
            .then(|| Vec::with_capacity(self.config.iterations));
        let mut termination = Termination::MaxIterations;
        let mut improvements = 0;
        let mut rejected = 0;

        for iteration in 1..=self.config.iterations {
            let mut candidate: Vec<f64> = state
                .best_x
                .iter()
                .zip(&state.alpha)
                .map(|(x, a)| x + (rng.random::<f64>() - 0.5) * a)
                .collect();
            if let Some(bounds) = bounds {
                bounds.clamp(&mut candidate);
            }

            let candidate_value = match self.objective.score(&candidate, &aux) {
                Ok(value) if value.is_finite() => Some(value),
                Ok(value) => {
                    rejected += 1;
                    debug!("Iteration {}: rejecting non-finite score {}", iteration, value);
                    None
                }
                Err(e) => {
                    rejected += 1;
                    debug!("Iteration {}: rejecting candidate: {}", iteration, e);
                    None
                }
            };

            let improved = match candidate_value {
                Some(value) if direction.is_better(value, state.best_value) => {
                    debug!(
                        "Iteration {}: improved {} -> {}",
                        iteration, state.best_value, value
                    );
                    state.best_x = candidate;
                    state.best_value = value;
                    state.rescale(self.config.gamma_better);
                    improvements += 1;
                    true
                }
                _ => {
                    state.rescale(self.config.gamma_worse);
                    false
                }
            };
            state.iteration = iteration;

            if let Some(history) = history.as_mut() {
                history.push(state.best_value);
            }

            let control = match self.observer.as_mut() {
                Some(observer) => observer(&IterationReport {
                    iteration,
                    improved,
                    candidate_value,
                    best_value: state.best_value,
                    best_params: &state.best_x,
                    alpha: &state.alpha,
                    tolerance: state.tolerance,
                }),
                None => SearchControl::Continue,
            };

            if state.tolerance <= self.config.alpha_tol {
                termination = Termination::ToleranceReached;
                break;
            }
            if control == SearchControl::Stop {
                termination = Termination::Cancelled;
                break;
            }
        }

        if rejected > 0 {
            warn!(
                "{} of {} candidates were rejected because the objective failed",
                rejected, state.iteration
            );
        }
        info!(
            "Adaptive search finished after {} iterations ({:?}): best_value={}, tolerance={:.3e}",
            state.iteration, termination, state.best_value, state.tolerance
        );

        Ok(SearchResult {
            run_id: Uuid::new_v4(),
            objective: self.objective.name().to_string(),
            direction,
            best_params: state.best_x,
            best_value: state.best_value,
            iterations_run: state.iteration,
            final_tolerance: state.tolerance,
            final_alpha: state.alpha,
            termination,
            improvements,
            rejected_evaluations: rejected,
            history,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn validate(&self, x0: &[f64], bounds: Option<&Bounds>) -> AfResult<()> {
        if x0.is_empty() {
            return Err(InputError::InvalidParameter {
                name: "x0".to_string(),
                message: "must have at least one dimension".to_string(),
            }
            .into());
        }
        if let Some(index) = x0.iter().position(|v| !v.is_finite()) {
            return Err(InputError::NonFinite {
                what: "x0".to_string(),
                index,
            }
            .into());
        }
        if let Some(bounds) = bounds {
            bounds.check_dimension(x0.len())?;
        }
        self.config.validate(x0.len())
    }

    /// Weight the samples once; every objective call of the run shares the result.
    fn build_aux(&self, samples: &[Sample]) -> AfResult<WeightedSamples> {
        if samples.is_empty() {
            return Ok(WeightedSamples::empty());
        }
        let weights = compute_weights(&coordinates(samples), self.config.bandwidth)?;
        WeightedSamples::new(samples.to_vec(), weights)
    }
}

/// One-shot search with the given objective.
pub fn optimize<O: Objective + ?Sized>(
    x0: &[f64],
    bounds: Option<&Bounds>,
    samples: &[Sample],
    config: SearchConfig,
    objective: &O,
) -> AfResult<SearchResult> {
    AdaptiveLocalSearch::new(objective, config).optimize(x0, bounds, samples)
}
