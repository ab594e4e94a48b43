//! # af-types
//!
//! Shared vocabulary for AdaptFit: the error taxonomy, parameter bounds and
//! the sample series handed to objectives.

pub mod bounds;
pub mod errors;
pub mod sample;

pub use bounds::*;
pub use errors::*;
pub use sample::*;
