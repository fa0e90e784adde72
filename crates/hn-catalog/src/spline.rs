//! Piecewise-linear curves.

use crate::error::{CatalogError, CatalogResult};

/// Piecewise-linear curve over strictly increasing sample points.
///
/// Evaluation outside the sampled range holds the first/last value.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSpline {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearSpline {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> CatalogResult<Self> {
        if x.is_empty() {
            return Err(CatalogError::InvalidCurve { what: "no samples" });
        }
        if x.len() != y.len() {
            return Err(CatalogError::InvalidCurve {
                what: "x and y lengths differ",
            });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(CatalogError::InvalidCurve {
                what: "non-finite sample",
            });
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CatalogError::InvalidCurve {
                what: "x values not strictly increasing",
            });
        }
        Ok(Self { x, y })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> CatalogResult<Self> {
        let (x, y) = pairs.iter().copied().unzip();
        Self::new(x, y)
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn value(&self, at: f64) -> f64 {
        let n = self.x.len();
        if at <= self.x[0] {
            return self.y[0];
        }
        if at >= self.x[n - 1] {
            return self.y[n - 1];
        }
        // First sample strictly greater than `at`; guaranteed in 1..n here.
        let hi = self.x.partition_point(|&xi| xi <= at);
        let lo = hi - 1;
        let t = (at - self.x[lo]) / (self.x[hi] - self.x[lo]);
        self.y[lo] + t * (self.y[hi] - self.y[lo])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_samples() {
        let s = LinearSpline::from_pairs(&[(0.0, 0.0), (10.0, 100.0), (20.0, 0.0)]).unwrap();
        assert_eq!(s.value(5.0), 50.0);
        assert_eq!(s.value(10.0), 100.0);
        assert_eq!(s.value(15.0), 50.0);
    }

    #[test]
    fn holds_end_values() {
        let s = LinearSpline::from_pairs(&[(1.0, 2.0), (3.0, 4.0)]).unwrap();
        assert_eq!(s.value(-10.0), 2.0);
        assert_eq!(s.value(10.0), 4.0);
    }

    #[test]
    fn single_sample_is_constant() {
        let s = LinearSpline::from_pairs(&[(1.0, 0.7)]).unwrap();
        assert_eq!(s.value(0.0), 0.7);
        assert_eq!(s.value(50.0), 0.7);
    }

    #[test]
    fn rejects_bad_samples() {
        assert!(LinearSpline::new(vec![], vec![]).is_err());
        assert!(LinearSpline::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(LinearSpline::from_pairs(&[(1.0, 0.0), (1.0, 1.0)]).is_err());
        assert!(LinearSpline::from_pairs(&[(0.0, f64::NAN)]).is_err());
    }
}
