//! Graph connectivity queries.

use std::collections::BTreeSet;

use hn_core::NodeId;

use crate::network::Network;

impl Network {
    /// True iff every node is reachable from every other.
    ///
    /// A network without nodes or without edges is never connected.
    pub fn check_connected_graph(&self) -> bool {
        let Some(first) = self.edges.values().next() else {
            return false;
        };
        if self.nodes.is_empty() {
            return false;
        }
        let visited = self.flood(first.node1);
        visited.len() == self.nodes.len()
    }

    /// Node sets of all connected components, each sorted, ordered by their
    /// smallest node id.
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        let mut seen = BTreeSet::new();
        let mut components = Vec::new();
        for &id in self.nodes.keys() {
            if seen.contains(&id) {
                continue;
            }
            let component = self.flood(id);
            seen.extend(component.iter().copied());
            components.push(component.into_iter().collect());
        }
        components
    }

    fn flood(&self, start: NodeId) -> BTreeSet<NodeId> {
        let mut visited = BTreeSet::from([start]);
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            for (_, next) in self.neighbors(n) {
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        visited
    }
}
