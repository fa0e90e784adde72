//! Straight line segments and their queries.

use hn_core::Real;

use crate::{Point3, Vector3};

/// Default distance below which a point counts as lying on a segment.
pub const DEFAULT_TOLERANCE: Real = 0.01;

/// Squared magnitude under which a direction vector counts as zero.
const DEGENERATE_EPS: Real = 1e-18;

/// A segment described by a start point and a direction vector.
///
/// The segment covers `start + t * direction` for `t` in `[0, 1]`; queries
/// that talk about the infinite line ignore that bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point3,
    pub direction: Vector3,
}

impl Line {
    /// Segment from `p1` to `p2`.
    pub fn new(p1: Point3, p2: Point3) -> Self {
        Self {
            start: p1,
            direction: p2 - p1,
        }
    }

    pub fn end(&self) -> Point3 {
        self.start + self.direction
    }

    pub fn length(&self) -> Real {
        self.direction.norm()
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction.norm_squared() < DEGENERATE_EPS
    }

    pub fn point_at(&self, t: Real) -> Point3 {
        self.start + self.direction * t
    }

    /// Line parameter of the orthogonal projection of `point`.
    ///
    /// Returns 0 for a degenerate segment.
    pub fn projection_parameter(&self, point: &Point3) -> Real {
        let len2 = self.direction.norm_squared();
        if len2 < DEGENERATE_EPS {
            return 0.0;
        }
        (point - self.start).dot(&self.direction) / len2
    }

    /// Orthogonal projection of `point` onto the infinite line.
    pub fn foot_of_perpendicular(&self, point: &Point3) -> Point3 {
        self.point_at(self.projection_parameter(point))
    }

    /// Distance from `point` to the infinite line.
    pub fn perpendicular_distance(&self, point: &Point3) -> Real {
        (point - self.foot_of_perpendicular(point)).norm()
    }

    /// Distance from `point` to the segment: perpendicular when the projection
    /// falls inside the segment, else to the nearer endpoint.
    pub fn distance_to_point(&self, point: &Point3) -> Real {
        let t = self.projection_parameter(point);
        if self.is_degenerate() {
            return (point - self.start).norm();
        }
        if (0.0..=1.0).contains(&t) {
            (point - self.point_at(t)).norm()
        } else {
            let d_start = (point - self.start).norm();
            let d_end = (point - self.end()).norm();
            d_start.min(d_end)
        }
    }

    /// True if `point` lies on the segment within `tolerance`.
    ///
    /// Degenerate segments contain nothing.
    pub fn contains_point(&self, point: &Point3, tolerance: Real) -> bool {
        if self.is_degenerate() {
            return false;
        }
        if self.perpendicular_distance(point) >= tolerance {
            return false;
        }
        // Boundary slack expressed in parameter space.
        let slack = tolerance / self.length();
        let t = self.projection_parameter(point);
        t >= -slack && t <= 1.0 + slack
    }

    /// Closest-approach point between the two infinite lines.
    ///
    /// For intersecting lines this is the intersection point; for skew lines
    /// it is the midpoint of the shortest connecting segment. Parallel or
    /// degenerate lines have no unique answer and yield `None`. The point is
    /// not guaranteed to lie on either segment.
    pub fn intersection(&self, other: &Line) -> Option<Point3> {
        let u = self.direction;
        let v = other.direction;
        let w = self.start - other.start;

        let a = u.dot(&u);
        let b = u.dot(&v);
        let c = v.dot(&v);
        let d = u.dot(&w);
        let e = v.dot(&w);

        if a < DEGENERATE_EPS || c < DEGENERATE_EPS {
            return None;
        }
        let denom = a * c - b * b;
        // Relative test: the Gram determinant scales with a*c.
        if denom <= 1e-12 * a * c {
            return None;
        }

        let sc = (b * e - c * d) / denom;
        let tc = (a * e - b * d) / denom;
        let p_self = self.point_at(sc);
        let p_other = other.point_at(tc);
        Some(nalgebra::center(&p_self, &p_other))
    }
}
