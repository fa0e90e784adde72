//! Tunable constants of the topology passes.

use hn_core::{HnResult, Real, ensure_positive};
use hn_geometry::DEFAULT_TOLERANCE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkSettings {
    /// Distance under which two points are the same location [m].
    pub geometric_tolerance: Real,
    /// A building branch closer than this to an edge end attaches at the end
    /// instead of splitting the edge [m].
    pub branch_snap_distance: Real,
    /// Pass cap for pairwise restart loops, as a multiple of the squared
    /// initial segment count. Zero reports the first required split.
    pub max_passes_factor: usize,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            geometric_tolerance: DEFAULT_TOLERANCE,
            branch_snap_distance: 1.0,
            max_passes_factor: 4,
        }
    }
}

impl NetworkSettings {
    pub fn validate(&self) -> HnResult<()> {
        ensure_positive(self.geometric_tolerance, "geometric tolerance")?;
        ensure_positive(self.branch_snap_distance, "branch snap distance")?;
        Ok(())
    }

    /// Pass cap for pairwise scans over `count` items (edges or route
    /// segments), where every pair may add one split.
    pub fn pairwise_pass_limit(&self, count: usize) -> usize {
        let n = count.max(1);
        self.max_passes_factor.saturating_mul(n.saturating_mul(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = NetworkSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.geometric_tolerance, 0.01);
        assert_eq!(s.pairwise_pass_limit(0), 4);
        assert_eq!(s.pairwise_pass_limit(10), 400);
    }

    #[test]
    fn zero_tolerance_is_rejected() {
        let s = NetworkSettings {
            geometric_tolerance: 0.0,
            ..NetworkSettings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn nan_snap_distance_is_rejected() {
        let s = NetworkSettings {
            branch_snap_distance: f64::NAN,
            ..NetworkSettings::default()
        };
        assert!(s.validate().is_err());
    }
}
