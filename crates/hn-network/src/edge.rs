//! Network edges (pipe segments).

use hn_core::units::{MassRate, Power};
use hn_core::{EdgeId, NodeId, PipeId};
use hn_geometry::{Line, Point3};

/// A pipe segment between two nodes.
///
/// Length is derived from the endpoint positions (and interior waypoints, if
/// any) by the owning network; it is never set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub(crate) node1: NodeId,
    pub(crate) node2: NodeId,
    /// Interior route points from `node1` to `node2`.
    pub(crate) waypoints: Vec<Point3>,
    pub(crate) length: f64,
    /// Catalog pipe; `None` until assigned or sized.
    pub pipe: Option<PipeId>,
    /// Building branches may attach to supply edges.
    pub is_supply: bool,
    pub nominal_heating_demand: Power,
    pub nominal_mass_flow: MassRate,
    /// UA / (ṁ·cp) of the sized pipe; undefined without flow.
    pub temperature_change_indicator: Option<f64>,
    /// Per-metre U-value of the sized pipe [W/(m·K)].
    pub u_value: Option<f64>,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        node1: NodeId,
        node2: NodeId,
        is_supply: bool,
        pipe: Option<PipeId>,
    ) -> Self {
        Self {
            id,
            node1,
            node2,
            waypoints: Vec::new(),
            length: 0.0,
            pipe,
            is_supply,
            nominal_heating_demand: Power::default(),
            nominal_mass_flow: MassRate::default(),
            temperature_change_indicator: None,
            u_value: None,
        }
    }

    pub fn node1(&self) -> NodeId {
        self.node1
    }

    pub fn node2(&self) -> NodeId {
        self.node2
    }

    pub fn endpoints(&self) -> [NodeId; 2] {
        [self.node1, self.node2]
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn waypoints(&self) -> &[Point3] {
        &self.waypoints
    }

    /// Straight edges have no interior waypoints.
    pub fn is_straight(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.node1 == node || self.node2 == node
    }

    pub fn shares_endpoint(&self, other: &Edge) -> bool {
        self.touches(other.node1) || self.touches(other.node2)
    }

    /// The endpoint opposite `node`.
    ///
    /// Panics if `node` is not an endpoint; callers reach edges through the
    /// adjacency index, so a mismatch means the index is stale.
    pub fn other_end(&self, node: NodeId) -> NodeId {
        if self.node1 == node {
            self.node2
        } else if self.node2 == node {
            self.node1
        } else {
            panic!("{node} is not an endpoint of {}", self.id)
        }
    }

    pub(crate) fn clear_results(&mut self) {
        self.nominal_heating_demand = Power::default();
        self.nominal_mass_flow = MassRate::default();
        self.temperature_change_indicator = None;
        self.u_value = None;
    }
}

/// Polyline length from `start` through `waypoints` to `end`.
pub(crate) fn route_length(start: &Point3, waypoints: &[Point3], end: &Point3) -> f64 {
    let mut length = 0.0;
    let mut prev = start;
    for p in waypoints.iter().chain(std::iter::once(end)) {
        length += (p - prev).norm();
        prev = p;
    }
    length
}

/// An edge's route as a polyline: `node1`, the waypoints, then `node2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Point3>,
}

/// Closest point of a [`Route`] to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteProjection {
    /// Index of the segment holding `point`.
    pub segment: usize,
    pub point: Point3,
    /// Distance from the route start to `point`, measured along the route.
    pub along: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

impl Route {
    pub fn new(start: Point3, waypoints: &[Point3], end: Point3) -> Self {
        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(start);
        points.extend_from_slice(waypoints);
        points.push(end);
        Self { points }
    }

    /// Segment `k` runs from point `k` to point `k + 1`.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|l| l.length()).sum()
    }

    /// Closest point on the route; the first segment wins ties.
    pub fn project(&self, point: &Point3) -> RouteProjection {
        let mut best = RouteProjection {
            segment: 0,
            point: self.points[0],
            along: 0.0,
            distance: (point - self.points[0]).norm(),
        };
        let mut offset = 0.0;
        for (k, line) in self.segments().enumerate() {
            let t = line.projection_parameter(point).clamp(0.0, 1.0);
            let foot = line.point_at(t);
            let distance = (point - foot).norm();
            if k == 0 || distance < best.distance {
                best = RouteProjection {
                    segment: k,
                    point: foot,
                    along: offset + t * line.length(),
                    distance,
                };
            }
            offset += line.length();
        }
        best
    }

    /// Point `distance` along the route from its start, with its segment.
    /// Clamped to the route ends.
    pub fn point_along(&self, distance: f64) -> (usize, Point3) {
        let mut remaining = distance.max(0.0);
        let last = self.points.len().saturating_sub(2);
        for (k, line) in self.segments().enumerate() {
            let length = line.length();
            if remaining <= length || k == last {
                let t = if length > 0.0 {
                    (remaining / length).min(1.0)
                } else {
                    0.0
                };
                return (k, line.point_at(t));
            }
            remaining -= length;
        }
        (0, self.points[0])
    }
}
