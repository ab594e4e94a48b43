//! Sample ingestion for AdaptFit.
//!
//! Reads `(coordinate, observation)` series from CSV so they can be handed to
//! the optimizer as auxiliary data.

pub mod loaders;

pub use loaders::*;
