//! Shortest supply paths from sources to substations.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use hn_core::{EdgeId, NodeId};
use tracing::{debug, info};

use crate::error::{NetworkError, NetworkResult};
use crate::network::Network;
use crate::node::NodeRole;

/// The shortest route feeding one substation.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyPath {
    pub source: NodeId,
    pub substation: NodeId,
    /// Edges in order from the source to the substation.
    pub edges: Vec<EdgeId>,
    /// Sum of the edge lengths.
    pub length: f64,
}

/// Min-heap entry; equal distances pop in discovery order.
#[derive(Debug, Clone, Copy)]
struct Queued {
    dist: f64,
    seq: u64,
    node: NodeId,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Per-run scratch: tentative distances and the edge each node was reached by.
#[derive(Debug, Default)]
struct ShortestPathTree {
    dist: BTreeMap<NodeId, f64>,
    via: BTreeMap<NodeId, EdgeId>,
}

impl Network {
    /// Shortest path from the nearest source to every substation, weighted by
    /// edge length.
    ///
    /// Ties between sources go to the lower source id. Fails if there is no
    /// source, if a substation has no positive demand, or if a substation is
    /// reachable from none of the sources.
    pub fn find_shortest_paths_for_buildings(&self) -> NetworkResult<BTreeMap<NodeId, SupplyPath>> {
        let sources: Vec<NodeId> = self.nodes_with_role(NodeRole::Source).map(|n| n.id).collect();
        if sources.is_empty() {
            return Err(NetworkError::NoSource);
        }
        let substations: Vec<NodeId> = self
            .nodes_with_role(NodeRole::Substation)
            .map(|n| n.id)
            .collect();
        for &s in &substations {
            let demand = self.node_by_id(s).max_heating_demand.value;
            if !(demand.is_finite() && demand > 0.0) {
                return Err(NetworkError::NonPositiveDemand { node: s, demand });
            }
        }

        let mut best: BTreeMap<NodeId, (NodeId, f64, usize)> = BTreeMap::new();
        let trees: Vec<ShortestPathTree> = sources.iter().map(|&s| self.dijkstra(s)).collect();
        for (k, tree) in trees.iter().enumerate() {
            for &s in &substations {
                let Some(&d) = tree.dist.get(&s) else {
                    continue;
                };
                if best.get(&s).is_none_or(|&(_, best_d, _)| d < best_d) {
                    best.insert(s, (sources[k], d, k));
                }
            }
        }

        let mut paths = BTreeMap::new();
        for &s in &substations {
            let Some(&(source, _, k)) = best.get(&s) else {
                return Err(NetworkError::Unreachable { substation: s });
            };
            let edges = trees[k].trace(s, self);
            let length = edges.iter().map(|&e| self.edge_by_id(e).length).sum();
            debug!(substation = %s, source = %source, edges = edges.len(), length, "supply path");
            paths.insert(
                s,
                SupplyPath {
                    source,
                    substation: s,
                    edges,
                    length,
                },
            );
        }
        info!(paths = paths.len(), sources = sources.len(), "shortest supply paths found");
        Ok(paths)
    }

    fn dijkstra(&self, source: NodeId) -> ShortestPathTree {
        let mut tree = ShortestPathTree::default();
        let mut heap = BinaryHeap::new();
        let mut seq = 0;

        tree.dist.insert(source, 0.0);
        heap.push(Queued {
            dist: 0.0,
            seq,
            node: source,
        });

        while let Some(Queued { dist, node, .. }) = heap.pop() {
            if tree.dist.get(&node).is_some_and(|&d| dist > d) {
                continue;
            }
            for (edge, next) in self.neighbors(node) {
                let candidate = dist + self.edge_by_id(edge).length;
                if tree.dist.get(&next).is_none_or(|&d| candidate < d) {
                    tree.dist.insert(next, candidate);
                    tree.via.insert(next, edge);
                    seq += 1;
                    heap.push(Queued {
                        dist: candidate,
                        seq,
                        node: next,
                    });
                }
            }
        }
        tree
    }
}

impl ShortestPathTree {
    /// Edges from the tree root to `target`, root first.
    fn trace(&self, target: NodeId, net: &Network) -> Vec<EdgeId> {
        let mut edges = Vec::new();
        let mut node = target;
        while let Some(&edge) = self.via.get(&node) {
            edges.push(edge);
            node = net.edge_by_id(edge).other_end(node);
        }
        edges.reverse();
        edges
    }
}
