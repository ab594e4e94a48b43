//! Box constraints on parameter vectors.

use serde::{Deserialize, Serialize};

use crate::errors::{AfResult, InputError};

/// Closed interval constraints, one `(lower, upper)` pair per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct Bounds {
    ranges: Vec<(f64, f64)>,
}

impl Bounds {
    /// Build bounds, rejecting NaN limits and any `lower > upper`.
    pub fn new(ranges: Vec<(f64, f64)>) -> AfResult<Self> {
        Ok(Self::try_from(ranges)?)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[(f64, f64)] {
        &self.ranges
    }

    /// Fails unless there is exactly one range per parameter.
    pub fn check_dimension(&self, n: usize) -> AfResult<()> {
        if self.ranges.len() != n {
            return Err(InputError::LengthMismatch {
                what: "bounds".to_string(),
                expected: n,
                actual: self.ranges.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Clamp every coordinate into its interval in place.
    pub fn clamp(&self, x: &mut [f64]) {
        for (value, &(lower, upper)) in x.iter_mut().zip(&self.ranges) {
            *value = value.clamp(lower, upper);
        }
    }

    /// Whether every coordinate lies inside its closed interval.
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.ranges.len()
            && x
                .iter()
                .zip(&self.ranges)
                .all(|(value, &(lower, upper))| *value >= lower && *value <= upper)
    }
}

impl TryFrom<Vec<(f64, f64)>> for Bounds {
    type Error = InputError;

    fn try_from(ranges: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        for (dimension, &(lower, upper)) in ranges.iter().enumerate() {
            if lower.is_nan() || upper.is_nan() || lower > upper {
                return Err(InputError::InvalidBounds {
                    dimension,
                    lower,
                    upper,
                });
            }
        }
        Ok(Self { ranges })
    }
}

impl From<Bounds> for Vec<(f64, f64)> {
    fn from(bounds: Bounds) -> Self {
        bounds.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AfError;

    #[test]
    fn rejects_inverted_interval() {
        let err = Bounds::new(vec![(0.0, 1.0), (2.0, 1.0)]).unwrap_err();
        match err {
            AfError::Input(InputError::InvalidBounds { dimension, .. }) => assert_eq!(dimension, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_nan_limit() {
        assert!(Bounds::new(vec![(f64::NAN, 1.0)]).is_err());
    }

    #[test]
    fn degenerate_interval_is_allowed() {
        let bounds = Bounds::new(vec![(1.5, 1.5)]).unwrap();
        let mut x = vec![3.0];
        bounds.clamp(&mut x);
        assert_eq!(x, vec![1.5]);
    }

    #[test]
    fn clamp_and_contains() {
        let bounds = Bounds::new(vec![(0.0, 1.0), (-2.0, 2.0)]).unwrap();
        let mut x = vec![1.7, -5.0];
        assert!(!bounds.contains(&x));
        bounds.clamp(&mut x);
        assert_eq!(x, vec![1.0, -2.0]);
        assert!(bounds.contains(&x));
    }

    #[test]
    fn dimension_check() {
        let bounds = Bounds::new(vec![(0.0, 1.0); 3]).unwrap();
        assert!(bounds.check_dimension(3).is_ok());
        assert!(bounds.check_dimension(5).is_err());
    }

    #[test]
    fn serde_round_trip_validates() {
        let bounds = Bounds::new(vec![(0.0, 1.0), (2.0, 3.0)]).unwrap();
        let json = serde_json::to_string(&bounds).unwrap();
        assert_eq!(json, "[[0.0,1.0],[2.0,3.0]]");
        let back: Bounds = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bounds);

        let bad: Result<Bounds, _> = serde_json::from_str("[[3.0,1.0]]");
        assert!(bad.is_err());
    }
}
