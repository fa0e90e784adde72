//! Topology reduction passes: dead ends, redundant nodes and short edges.

use std::collections::BTreeSet;

use hn_core::{EdgeId, HnError, NodeId, ensure_finite};
use hn_geometry::Point3;
use tracing::{debug, info};

use crate::edge::Edge;
use crate::error::NetworkResult;
use crate::network::Network;

/// A maximal run of redundant nodes between two non-redundant ends.
#[derive(Debug)]
struct Chain {
    start: NodeId,
    end: NodeId,
    edges: Vec<EdgeId>,
    interior: Vec<NodeId>,
    waypoints: Vec<Point3>,
}

impl Network {
    /// Remove Mixers that lead nowhere, repeatedly, until only nodes on a
    /// route between sources and substations (or on a loop) remain.
    ///
    /// Returns the number of removed nodes.
    pub fn clean_dead_ends(&mut self) -> usize {
        let mut removed = 0;
        // Each round removes at least one node, so node count bounds it.
        for _ in 0..=self.node_count() {
            let dead = self.mark_dead_ends();
            if dead.is_empty() {
                break;
            }
            for &n in &dead {
                self.nodes.remove(&n);
            }
            self.edges
                .retain(|_, e| !dead.contains(&e.node1) && !dead.contains(&e.node2));
            self.rebuild_adjacency();
            removed += dead.len();
            debug!(count = dead.len(), "removed dead ends");
        }
        info!(removed, "dead-end pruning finished");
        removed
    }

    /// Fixed point of: a non-terminal node with at most one live neighbour is
    /// dead.
    fn mark_dead_ends(&self) -> BTreeSet<NodeId> {
        let mut dead = BTreeSet::new();
        loop {
            let mut changed = false;
            for node in self.nodes.values().filter(|n| !n.role.is_terminal()) {
                if dead.contains(&node.id) {
                    continue;
                }
                let live: BTreeSet<NodeId> = self
                    .neighbors(node.id)
                    .map(|(_, n)| n)
                    .filter(|n| !dead.contains(n))
                    .collect();
                if live.len() <= 1 {
                    dead.insert(node.id);
                    changed = true;
                }
            }
            if !changed {
                return dead;
            }
        }
    }

    fn is_redundant(&self, node: NodeId) -> bool {
        self.node_by_id(node).is_mixer() && self.degree(node) == 2
    }

    /// Replace every run of degree-2 Mixers by a single edge.
    ///
    /// The new edge takes the id, pipe and supply flag of the run's first
    /// edge; the removed Mixers become its waypoints, so its length equals
    /// the summed length of the run. Runs whose two ends are the same node,
    /// and loops made only of redundant nodes, are left untouched.
    ///
    /// Returns the number of removed nodes.
    pub fn collapse_redundant_edges(&mut self) -> usize {
        let chains = self.redundant_chains();
        let mut removed = 0;

        for chain in chains {
            let first = self.edge_by_id(chain.edges[0]);
            let mut merged = Edge::new(first.id, chain.start, chain.end, first.is_supply, first.pipe);
            merged.waypoints = chain.waypoints;

            for e in &chain.edges {
                self.edges.remove(e);
            }
            for n in &chain.interior {
                self.nodes.remove(n);
            }
            removed += chain.interior.len();
            let id = self.place_edge(merged);
            debug!(edge = %id, from = %chain.start, to = %chain.end, nodes = chain.interior.len(), "collapsed run");
        }
        self.rebuild_adjacency();
        info!(removed, "redundant-node collapsing finished");
        removed
    }

    /// Copy of this network with redundant runs collapsed; `self` is left
    /// as is.
    pub fn collapsed_copy(&self) -> Network {
        let mut copy = self.clone();
        copy.name = format!("{} (reduced)", self.name);
        copy.collapse_redundant_edges();
        copy
    }

    fn redundant_chains(&self) -> Vec<Chain> {
        let mut used: BTreeSet<EdgeId> = BTreeSet::new();
        let mut chains = Vec::new();

        for &start in self.nodes.keys() {
            if self.is_redundant(start) {
                continue;
            }
            for &first in self.incident_edges(start) {
                if used.contains(&first) {
                    continue;
                }
                let mut chain = Chain {
                    start,
                    end: start,
                    edges: Vec::new(),
                    interior: Vec::new(),
                    waypoints: Vec::new(),
                };
                let mut from = start;
                let mut edge = first;
                loop {
                    used.insert(edge);
                    chain.edges.push(edge);
                    let e = self.edge_by_id(edge);
                    let to = e.other_end(from);
                    if e.node1 == from {
                        chain.waypoints.extend(e.waypoints.iter().copied());
                    } else {
                        chain.waypoints.extend(e.waypoints.iter().rev().copied());
                    }
                    if to == start || !self.is_redundant(to) {
                        chain.end = to;
                        break;
                    }
                    chain.interior.push(to);
                    chain.waypoints.push(self.node_by_id(to).position);
                    edge = self
                        .incident_edges(to)
                        .iter()
                        .copied()
                        .find(|&next| next != edge)
                        .unwrap_or(edge);
                    from = to;
                }
                if chain.edges.len() > 1 && chain.end != chain.start {
                    chains.push(chain);
                }
            }
        }
        chains
    }

    /// Merge edges shorter than `threshold` away by folding their Mixer end
    /// into the opposite end. Sources and substations never move; an edge
    /// between two of them is kept.
    ///
    /// Returns the number of merged edges.
    pub fn remove_short_edges(&mut self, threshold: f64) -> NetworkResult<usize> {
        ensure_finite(threshold, "short-edge threshold")?;
        if threshold < 0.0 {
            return Err(HnError::InvalidArg {
                what: format!("short-edge threshold must not be negative, got {threshold}"),
            }
            .into());
        }

        let budget = self.edge_count();
        let mut merged = 0;
        for _ in 0..budget {
            let Some((short, mixer, keep)) = self.find_short_edge(threshold) else {
                break;
            };
            let others: Vec<EdgeId> = self
                .incident_edges(mixer)
                .iter()
                .copied()
                .filter(|&e| e != short)
                .collect();
            for e in others {
                let first = self.edge_by_id(e).node1 == mixer;
                self.repoint(e, keep, first);
            }
            self.edges.remove(&short);
            self.nodes.remove(&mixer);
            self.edges.retain(|_, e| e.node1 != e.node2);
            self.rebuild_adjacency();
            merged += 1;
            debug!(edge = %short, removed = %mixer, into = %keep, "merged short edge");
        }
        info!(merged, threshold, "short-edge removal finished");
        Ok(merged)
    }

    /// First edge below `threshold` with a Mixer end: `(edge, mixer, kept)`.
    fn find_short_edge(&self, threshold: f64) -> Option<(EdgeId, NodeId, NodeId)> {
        self.edges
            .values()
            .filter(|e| e.length < threshold)
            .find_map(|e| {
                if self.node_by_id(e.node2).is_mixer() {
                    Some((e.id, e.node2, e.node1))
                } else if self.node_by_id(e.node1).is_mixer() {
                    Some((e.id, e.node1, e.node2))
                } else {
                    None
                }
            })
    }
}
