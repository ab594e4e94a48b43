//! # af-optimizer
//!
//! Derivative-free local optimization for AdaptFit.
//!
//! Provides density-reciprocal sample weighting, the pluggable [`Objective`]
//! trait with a two-compartment decay reference model, and an adaptive-step
//! stochastic local search that ties them together.

mod config;
mod decay;
mod objective;
mod run;
mod search;
mod weighting;

pub use config::{ObjectiveDirection, SearchConfig};
pub use decay::{DecayParams, TwoCompartmentDecay};
pub use objective::Objective;
pub use run::{IterationReport, RunId, SearchControl, SearchResult, Termination};
pub use search::{optimize, AdaptiveLocalSearch};
pub use weighting::{compute_weights, default_bandwidth, DensityWeighter};
