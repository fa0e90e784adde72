//! Attaching unconnected substations to the supply network.

use hn_core::{EdgeId, NodeId};
use hn_geometry::Point3;
use tracing::{debug, info, warn};

use crate::error::NetworkResult;
use crate::network::Network;
use crate::node::NodeRole;

/// Outcome of [`Network::connect_buildings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingConnections {
    /// New branch edges, one per connected substation.
    pub branches: Vec<EdgeId>,
    /// Mixers inserted into supply edges to carry the branches.
    pub added_nodes: Vec<NodeId>,
    /// Substations left without a connection (no supply edge to attach to).
    pub unconnected: Vec<NodeId>,
}

impl Network {
    /// Connect every substation without edges to its closest supply edge.
    ///
    /// Substations are handled in id order. The branch leaves the supply edge
    /// at the closest point of its route; within `branch_snap_distance` of an
    /// edge end (measured along the route) it leaves from that end instead,
    /// or from a new Mixer placed the snap distance in from the end when the
    /// end is not a Mixer. The branch carries the supply edge's pipe and is
    /// itself a supply edge only when `extend_supply_pipes` is set, so later
    /// buildings may attach to it.
    pub fn connect_buildings(
        &mut self,
        extend_supply_pipes: bool,
    ) -> NetworkResult<BuildingConnections> {
        self.settings.validate()?;
        let pending: Vec<NodeId> = self
            .nodes_with_role(NodeRole::Substation)
            .filter(|n| self.degree(n.id) == 0)
            .map(|n| n.id)
            .collect();
        let mut result = BuildingConnections::default();

        for substation in pending {
            let position = self.node_by_id(substation).position;
            let Some(edge) = self.closest_supply_edge(&position) else {
                warn!(node = %substation, "no supply edge to connect building to");
                result.unconnected.push(substation);
                continue;
            };
            let pipe = self.edge_by_id(edge).pipe;

            let branch_from = match self.branch_point(edge, &position) {
                BranchPoint::Existing(node) => node,
                BranchPoint::Split { point, segment } => {
                    let mixer = self.insert_mixer(point)?;
                    self.split_edge_at(edge, mixer, segment)?;
                    result.added_nodes.push(mixer);
                    mixer
                }
                BranchPoint::Inline { segment } => {
                    // The building sits on the pipe; it becomes a pass-through.
                    self.split_edge_at(edge, substation, segment)?;
                    self.rebuild_adjacency();
                    debug!(node = %substation, edge = %edge, "building placed inline");
                    continue;
                }
            };

            let branch = self.add_edge(
                self.next_edge_id()?,
                branch_from,
                substation,
                extend_supply_pipes,
                pipe,
            )?;
            debug!(node = %substation, from = %branch_from, edge = %branch, "connected building");
            result.branches.push(branch);
        }

        info!(
            connected = result.branches.len(),
            unconnected = result.unconnected.len(),
            "building connection finished"
        );
        Ok(result)
    }

    /// Closest supply edge by distance to its route; the lowest id wins
    /// ties.
    fn closest_supply_edge(&self, position: &Point3) -> Option<EdgeId> {
        let mut best: Option<(EdgeId, f64)> = None;
        for e in self.edges.values().filter(|e| e.is_supply) {
            let d = self.edge_route(e.id).project(position).distance;
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((e.id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    fn branch_point(&self, edge: EdgeId, position: &Point3) -> BranchPoint {
        let tol = self.settings.geometric_tolerance;
        let snap = self.settings.branch_snap_distance.max(tol);
        let e = self.edge_by_id(edge);
        let route = self.edge_route(edge);
        let length = route.length();

        let foot = route.project(position);
        let (near, near_dist, at_start) = if foot.along <= 0.5 * length {
            (e.node1, foot.along, true)
        } else {
            (e.node2, length - foot.along, false)
        };

        if near_dist >= snap {
            if foot.distance < tol {
                return BranchPoint::Inline {
                    segment: foot.segment,
                };
            }
            return BranchPoint::Split {
                point: foot.point,
                segment: foot.segment,
            };
        }
        if self.node_by_id(near).is_mixer() || length <= snap + tol {
            return BranchPoint::Existing(near);
        }
        let (segment, point) = route.point_along(if at_start { snap } else { length - snap });
        BranchPoint::Split { point, segment }
    }
}

enum BranchPoint {
    Existing(NodeId),
    Split { point: Point3, segment: usize },
    Inline { segment: usize },
}
