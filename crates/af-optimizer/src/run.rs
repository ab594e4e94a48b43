//! Run outcomes and per-iteration reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ObjectiveDirection;

/// Unique search run identifier.
pub type RunId = Uuid;

/// Why the search loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The iteration cap was reached.
    MaxIterations,
    /// The compounded step scale fell to `alpha_tol`.
    ToleranceReached,
    /// An observer asked the run to stop.
    Cancelled,
}

/// Returned by an iteration observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchControl {
    Continue,
    Stop,
}

/// Snapshot handed to the observer after every iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationReport<'a> {
    /// 1-based iteration index.
    pub iteration: usize,
    pub improved: bool,
    /// Score of this iteration's candidate, `None` if the objective failed.
    pub candidate_value: Option<f64>,
    pub best_value: f64,
    pub best_params: &'a [f64],
    /// Step scale after this iteration's rescale.
    pub alpha: &'a [f64],
    pub tolerance: f64,
}

/// Final state of a search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub run_id: RunId,
    pub objective: String,
    pub direction: ObjectiveDirection,
    pub best_params: Vec<f64>,
    pub best_value: f64,
    pub iterations_run: usize,
    pub final_tolerance: f64,
    pub final_alpha: Vec<f64>,
    pub termination: Termination,
    /// Accepted candidates.
    pub improvements: usize,
    /// Candidates whose objective failed or returned a non-finite score.
    pub rejected_evaluations: usize,
    /// Incumbent value after each iteration, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<f64>>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchResult {
    pub fn converged(&self) -> bool {
        self.termination == Termination::ToleranceReached
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SearchResult {
        let started_at = Utc::now();
        SearchResult {
            run_id: Uuid::new_v4(),
            objective: "two_compartment_decay".to_string(),
            direction: ObjectiveDirection::Minimize,
            best_params: vec![0.5, 2.0],
            best_value: 0.01,
            iterations_run: 42,
            final_tolerance: 9e-4,
            final_alpha: vec![9e-4, 9e-4],
            termination: Termination::ToleranceReached,
            improvements: 10,
            rejected_evaluations: 0,
            history: None,
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(15),
        }
    }

    #[test]
    fn convergence_flag_and_duration() {
        let result = sample_result();
        assert!(result.converged());
        assert_eq!(result.duration_ms(), 15);

        let capped = SearchResult {
            termination: Termination::MaxIterations,
            ..result
        };
        assert!(!capped.converged());
    }

    #[test]
    fn result_serialization() {
        let result = sample_result();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["termination"], "tolerance_reached");
        assert_eq!(json["direction"], "minimize");
        assert!(json.get("history").is_none());

        let back: SearchResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
