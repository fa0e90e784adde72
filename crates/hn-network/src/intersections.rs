//! Junction generation where edges cross.
//!
//! The scan is pairwise over edge route segments and restarts after every
//! split, so one pass is O(S²) in the segment count and a dense crossing
//! layout costs O(S³) overall. That is fine for district networks of a few
//! hundred edges; it is not meant for arbitrarily large inputs.

use hn_core::{EdgeId, NodeId};
use hn_geometry::{Line, Point3};
use tracing::{debug, info};

use crate::edge::Edge;
use crate::error::{NetworkError, NetworkResult};
use crate::network::Network;

/// Nodes and edges created by [`Network::generate_intersections`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intersections {
    pub added_nodes: Vec<NodeId>,
    pub added_edges: Vec<EdgeId>,
}

impl Intersections {
    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty() && self.added_edges.is_empty()
    }
}

/// An edge together with the route segment a crossing lies on.
type EdgeSegment = (EdgeId, usize);

#[derive(Debug)]
enum Crossing {
    /// Both routes cross away from their endpoints.
    Interior {
        point: Point3,
        edges: [EdgeSegment; 2],
    },
    /// An endpoint of one edge lies on the interior of another edge's route.
    Tee { node: NodeId, edge: EdgeSegment },
}

impl Network {
    /// Insert a Mixer wherever two edge routes cross and split both edges
    /// there; waypointed edges split at the crossing segment. An edge end
    /// touching another edge's interior splits only the touched edge. Edges
    /// that already share an endpoint are never split against each other.
    ///
    /// Fails with [`NetworkError::IterationLimit`] if the splits do not
    /// settle; nodes and edges added up to that point stay in the network.
    pub fn generate_intersections(&mut self) -> NetworkResult<Intersections> {
        self.settings.validate()?;
        let segments = self.edges.values().map(|e| e.waypoints.len() + 1).sum();
        let limit = self.settings.pairwise_pass_limit(segments);
        let mut added = Intersections::default();
        let mut passes = 0;

        while let Some(crossing) = self.find_crossing() {
            if passes == limit {
                return Err(NetworkError::IterationLimit {
                    what: "intersection generation",
                    limit,
                });
            }
            passes += 1;

            match crossing {
                Crossing::Interior { point, edges } => {
                    let junction = match self.node_at(&point) {
                        Some(existing) => existing,
                        None => {
                            let m = self.insert_mixer(point)?;
                            added.added_nodes.push(m);
                            m
                        }
                    };
                    for (edge, segment) in edges {
                        added
                            .added_edges
                            .push(self.split_edge_at(edge, junction, segment)?);
                    }
                    debug!(node = %junction, a = %edges[0].0, b = %edges[1].0, "split crossing edges");
                }
                Crossing::Tee {
                    node,
                    edge: (edge, segment),
                } => {
                    added
                        .added_edges
                        .push(self.split_edge_at(edge, node, segment)?);
                    debug!(node = %node, edge = %edge, "split edge at touching end");
                }
            }
            self.rebuild_adjacency();
        }

        info!(
            nodes = added.added_nodes.len(),
            edges = added.added_edges.len(),
            passes,
            "intersection generation finished"
        );
        Ok(added)
    }

    /// First crossing in edge-id pair order, then segment order.
    fn find_crossing(&self) -> Option<Crossing> {
        let tol = self.settings.geometric_tolerance;
        let routes: Vec<(&Edge, Vec<Line>)> = self
            .edges
            .values()
            .map(|e| (e, self.edge_route(e.id).segments().collect()))
            .collect();

        for (i, (a, segs_a)) in routes.iter().enumerate() {
            for (b, segs_b) in &routes[i + 1..] {
                if a.shares_endpoint(b) {
                    continue;
                }
                for (ka, line_a) in segs_a.iter().enumerate() {
                    for (kb, line_b) in segs_b.iter().enumerate() {
                        let Some(point) = line_a.intersection(line_b) else {
                            continue;
                        };
                        if !line_a.contains_point(&point, tol)
                            || !line_b.contains_point(&point, tol)
                        {
                            continue;
                        }
                        match (self.endpoint_near(a, &point), self.endpoint_near(b, &point)) {
                            // Two distinct nodes on the same spot; not ours to merge.
                            (Some(_), Some(_)) => continue,
                            (Some(node), None) => {
                                return Some(Crossing::Tee {
                                    node,
                                    edge: (b.id, kb),
                                });
                            }
                            (None, Some(node)) => {
                                return Some(Crossing::Tee {
                                    node,
                                    edge: (a.id, ka),
                                });
                            }
                            (None, None) => {
                                return Some(Crossing::Interior {
                                    point,
                                    edges: [(a.id, ka), (b.id, kb)],
                                });
                            }
                        }
                    }
                }
            }
        }
        None
    }

    fn endpoint_near(&self, edge: &Edge, point: &Point3) -> Option<NodeId> {
        let tol = self.settings.geometric_tolerance;
        edge.endpoints()
            .into_iter()
            .find(|&n| (self.node_by_id(n).position - point).norm() < tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRole;

    fn node(net: &mut Network, id: u32, x: f64, y: f64) -> NodeId {
        net.add_node(NodeId::new(id), Point3::new(x, y, 0.0), NodeRole::Mixer, true).unwrap()
    }

    #[test]
    fn tee_splits_only_the_touched_edge() {
        let mut net = Network::new("tee");
        let a = node(&mut net, 1, 0.0, 0.0);
        let b = node(&mut net, 2, 10.0, 0.0);
        let c = node(&mut net, 3, 5.0, 0.0);
        let d = node(&mut net, 4, 5.0, 5.0);
        net.add_edge(EdgeId::new(1), a, b, true, None).unwrap();
        net.add_edge(EdgeId::new(2), c, d, false, None).unwrap();

        let added = net.generate_intersections().unwrap();
        assert!(added.added_nodes.is_empty());
        assert_eq!(added.added_edges.len(), 1);
        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 3);
        assert_eq!(net.degree(c), 3);
    }

    #[test]
    fn parallel_edges_are_left_alone() {
        let mut net = Network::new("parallel");
        let a = node(&mut net, 1, 0.0, 0.0);
        let b = node(&mut net, 2, 10.0, 0.0);
        let c = node(&mut net, 3, 0.0, 1.0);
        let d = node(&mut net, 4, 10.0, 1.0);
        net.add_edge(EdgeId::new(1), a, b, true, None).unwrap();
        net.add_edge(EdgeId::new(2), c, d, true, None).unwrap();
        assert!(net.generate_intersections().unwrap().is_empty());
        assert_eq!(net.edge_count(), 2);
    }

    #[test]
    fn segments_whose_lines_cross_outside_do_not_split() {
        let mut net = Network::new("apart");
        let a = node(&mut net, 1, 0.0, 0.0);
        let b = node(&mut net, 2, 4.0, 0.0);
        let c = node(&mut net, 3, 5.0, -5.0);
        let d = node(&mut net, 4, 5.0, 5.0);
        net.add_edge(EdgeId::new(1), a, b, true, None).unwrap();
        net.add_edge(EdgeId::new(2), c, d, true, None).unwrap();
        assert!(net.generate_intersections().unwrap().is_empty());
    }

    #[test]
    fn grid_gets_a_junction_per_crossing() {
        let mut net = Network::new("grid");
        let mut id = 0;
        let mut next = || {
            id += 1;
            id
        };
        for k in 1..=3 {
            let y = 10.0 * k as f64;
            let left = node(&mut net, next(), 0.0, y);
            let right = node(&mut net, next(), 40.0, y);
            net.add_edge(net.next_edge_id().unwrap(), left, right, true, None).unwrap();
            let bottom = node(&mut net, next(), y, -5.0);
            let top = node(&mut net, next(), y, 45.0);
            net.add_edge(net.next_edge_id().unwrap(), bottom, top, true, None).unwrap();
        }
        let before = net.total_length();

        let added = net.generate_intersections().unwrap();
        assert_eq!(added.added_nodes.len(), 9);
        assert_eq!(net.edge_count(), 24);
        assert!((net.total_length() - before).abs() < 1e-9);
        assert!(net.generate_intersections().unwrap().is_empty());
    }

    #[test]
    fn pass_cap_is_reported() {
        let mut net = Network::new("capped");
        net.settings.max_passes_factor = 0;
        let a = node(&mut net, 1, 0.0, 0.0);
        let b = node(&mut net, 2, 10.0, 10.0);
        let c = node(&mut net, 3, 0.0, 10.0);
        let d = node(&mut net, 4, 10.0, 0.0);
        net.add_edge(EdgeId::new(1), a, b, true, None).unwrap();
        net.add_edge(EdgeId::new(2), c, d, true, None).unwrap();
        assert_eq!(
            net.generate_intersections(),
            Err(NetworkError::IterationLimit {
                what: "intersection generation",
                limit: 0
            })
        );
    }

    #[test]
    fn crossing_on_a_collapsed_edge_splits_its_route() {
        let mut net = Network::new("bent");
        let a = node(&mut net, 1, 0.0, 0.0);
        let m1 = node(&mut net, 2, 30.0, 0.0);
        let m2 = node(&mut net, 3, 30.0, 20.0);
        let s = node(&mut net, 4, 50.0, 20.0);
        net.add_edge(EdgeId::new(1), a, m1, true, None).unwrap();
        net.add_edge(EdgeId::new(2), m1, m2, true, None).unwrap();
        net.add_edge(EdgeId::new(3), m2, s, true, None).unwrap();
        assert_eq!(net.collapse_redundant_edges(), 2);
        let c = node(&mut net, 5, 25.0, 10.0);
        let d = node(&mut net, 6, 35.0, 10.0);
        net.add_edge(EdgeId::new(4), c, d, false, None).unwrap();
        let before = net.total_length();

        let added = net.generate_intersections().unwrap();
        assert_eq!(added.added_nodes.len(), 1);
        let junction = added.added_nodes[0];
        assert_eq!(net[junction].position, Point3::new(30.0, 10.0, 0.0));
        assert_eq!(net.degree(junction), 4);
        assert_eq!(net.edge_count(), 4);

        let trunk = &net[EdgeId::new(1)];
        assert_eq!(trunk.endpoints(), [junction, s]);
        assert_eq!(trunk.waypoints(), &[Point3::new(30.0, 20.0, 0.0)]);
        assert_eq!(trunk.length(), 30.0);
        assert!((net.total_length() - before).abs() < 1e-9);
        assert!(net.generate_intersections().unwrap().is_empty());
    }
}
