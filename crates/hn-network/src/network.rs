//! The network container and its mutation primitives.

use std::collections::BTreeMap;
use std::ops::Index;

use hn_catalog::LinearSpline;
use hn_core::units::Power;
use hn_core::{EdgeId, NodeId, PipeId};
use hn_geometry::{Extents, Point3};
use tracing::debug;

use crate::edge::{Edge, Route, route_length};
use crate::error::{NetworkError, NetworkResult};
use crate::node::{Node, NodeRole};
use crate::settings::NetworkSettings;

/// Pipe layout of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkType {
    /// One pipe per edge.
    SinglePipe,
    /// Supply and return pipe per edge.
    #[default]
    DoublePipe,
}

impl NetworkType {
    pub fn pipes_per_edge(self) -> usize {
        match self {
            NetworkType::SinglePipe => 1,
            NetworkType::DoublePipe => 2,
        }
    }
}

/// A district-heating network: nodes, edges and the adjacency index.
///
/// Nodes and edges are kept in id-ordered maps so every algorithm iterates in
/// a deterministic order. The adjacency index maps each node to its incident
/// edges (sorted by edge id) and is rebuilt from the edge map by every
/// structural mutation before the call returns.
#[derive(Debug, Clone)]
pub struct Network {
    pub name: String,
    pub network_type: NetworkType,
    /// Offset of the local coordinate system.
    pub origin: Point3,
    /// Catalog pipes the sizing pass may pick from; empty means all.
    pub available_pipes: Vec<PipeId>,
    /// Simultaneity factor over number of buildings served by an edge.
    pub simultaneity: Option<LinearSpline>,
    pub settings: NetworkSettings,
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) edges: BTreeMap<EdgeId, Edge>,
    pub(crate) adjacency: BTreeMap<NodeId, Vec<EdgeId>>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new("")
    }
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            network_type: NetworkType::default(),
            origin: Point3::origin(),
            available_pipes: Vec::new(),
            simultaneity: None,
            settings: NetworkSettings::default(),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            adjacency: BTreeMap::new(),
        }
    }

    /// Replace the settings after checking them.
    pub fn with_settings(mut self, settings: NetworkSettings) -> NetworkResult<Self> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Node lookup for ids that must exist.
    ///
    /// Panics on an unknown id: that means the caller fabricated an id or
    /// held on to one across a deletion.
    pub fn node_by_id(&self, id: NodeId) -> &Node {
        self.nodes
            .get(&id)
            .unwrap_or_else(|| panic!("{id} does not exist in network '{}'", self.name))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Edge lookup for ids that must exist; panics like [`Network::node_by_id`].
    pub fn edge_by_id(&self, id: EdgeId) -> &Edge {
        self.edges
            .get(&id)
            .unwrap_or_else(|| panic!("{id} does not exist in network '{}'", self.name))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges incident to `node`, ordered by edge id.
    pub fn incident_edges(&self, node: NodeId) -> &[EdgeId] {
        self.adjacency.get(&node).map_or(&[], Vec::as_slice)
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.incident_edges(node).len()
    }

    /// `(edge, neighbour)` pairs around `node`.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.incident_edges(node)
            .iter()
            .map(move |&e| (e, self.edge_by_id(e).other_end(node)))
    }

    /// Polyline from `node1` through the waypoints to `node2`.
    pub fn edge_route(&self, edge: EdgeId) -> Route {
        let e = self.edge_by_id(edge);
        Route::new(
            self.node_by_id(e.node1).position,
            &e.waypoints,
            self.node_by_id(e.node2).position,
        )
    }

    /// Nodes with the given role, in id order.
    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.role == role)
    }

    pub fn substation_count(&self) -> usize {
        self.nodes_with_role(NodeRole::Substation).count()
    }

    pub fn source_count(&self) -> usize {
        self.nodes_with_role(NodeRole::Source).count()
    }

    /// Sum of all edge lengths.
    pub fn total_length(&self) -> f64 {
        self.edges.values().map(|e| e.length).sum()
    }

    /// Total pipe length counting supply and return pipes.
    pub fn total_pipe_length(&self) -> f64 {
        self.total_length() * self.network_type.pipes_per_edge() as f64
    }

    /// Bounds of all node positions and edge waypoints in local coordinates.
    pub fn extents(&self) -> Option<Extents> {
        let points = self
            .nodes
            .values()
            .map(|n| &n.position)
            .chain(self.edges.values().flat_map(|e| e.waypoints.iter()));
        Extents::from_points(points)
    }

    /// Position of a node in world coordinates (local position plus origin).
    pub fn world_position(&self, node: NodeId) -> Point3 {
        self.origin + self.node_by_id(node).position.coords
    }

    /// Closest node within the geometric tolerance of `position`.
    pub fn node_at(&self, position: &Point3) -> Option<NodeId> {
        let tol = self.settings.geometric_tolerance;
        self.nodes
            .values()
            .map(|n| (n.id, (n.position - position).norm()))
            .filter(|&(_, d)| d < tol)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Id for a new node: one past the highest id, or the lowest unused id
    /// once `u32::MAX` is taken.
    pub fn next_node_id(&self) -> NetworkResult<NodeId> {
        free_id(self.nodes.keys().map(|id| id.get()))
            .map(NodeId::new)
            .ok_or(NetworkError::IdsExhausted { what: "node" })
    }

    /// Id for a new edge, allocated like [`Network::next_node_id`].
    pub fn next_edge_id(&self) -> NetworkResult<EdgeId> {
        free_id(self.edges.keys().map(|id| id.get()))
            .map(EdgeId::new)
            .ok_or(NetworkError::IdsExhausted { what: "edge" })
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Insert a node, or with `dedupe` return an existing node within the
    /// geometric tolerance of `position` (left untouched).
    ///
    /// A taken `preferred_id` is replaced by the next free id.
    pub fn add_node(
        &mut self,
        preferred_id: NodeId,
        position: Point3,
        role: NodeRole,
        dedupe: bool,
    ) -> NetworkResult<NodeId> {
        if dedupe {
            if let Some(existing) = self.node_at(&position) {
                return Ok(existing);
            }
        }
        let id = if self.nodes.contains_key(&preferred_id) {
            self.next_node_id()?
        } else {
            preferred_id
        };
        self.nodes.insert(id, Node::new(id, position, role));
        self.rebuild_adjacency();
        debug!(node = %id, ?role, "added node");
        Ok(id)
    }

    /// Insert an edge between two existing nodes; its length is computed
    /// from the endpoint positions. A taken `id` is replaced by the next
    /// free id.
    ///
    /// Panics if either endpoint does not exist or both are the same node.
    pub fn add_edge(
        &mut self,
        id: EdgeId,
        node1: NodeId,
        node2: NodeId,
        is_supply: bool,
        pipe: Option<PipeId>,
    ) -> NetworkResult<EdgeId> {
        let id = self.insert_edge(Edge::new(id, node1, node2, is_supply, pipe))?;
        self.rebuild_adjacency();
        Ok(id)
    }

    /// Re-point the first endpoint of `edge`; the length follows.
    pub fn change_node1(&mut self, edge: EdgeId, node: NodeId) {
        self.repoint(edge, node, true);
        self.rebuild_adjacency();
    }

    /// Re-point the second endpoint of `edge`; the length follows.
    pub fn change_node2(&mut self, edge: EdgeId, node: NodeId) {
        self.repoint(edge, node, false);
        self.rebuild_adjacency();
    }

    /// Move a node; lengths of all incident edges are recomputed.
    pub fn set_node_position(&mut self, node: NodeId, position: Point3) {
        let incident = self.incident_edges(node).to_vec();
        self.nodes
            .get_mut(&node)
            .unwrap_or_else(|| panic!("{node} does not exist"))
            .position = position;
        for e in incident {
            self.update_length(e);
        }
    }

    pub fn set_max_heating_demand(&mut self, node: NodeId, demand: Power) {
        self.nodes
            .get_mut(&node)
            .unwrap_or_else(|| panic!("{node} does not exist"))
            .max_heating_demand = demand;
    }

    pub fn set_role(&mut self, node: NodeId, role: NodeRole) {
        self.nodes
            .get_mut(&node)
            .unwrap_or_else(|| panic!("{node} does not exist"))
            .role = role;
    }

    pub fn set_pipe(&mut self, edge: EdgeId, pipe: Option<PipeId>) {
        self.edge_mut(edge).pipe = pipe;
    }

    pub fn set_supply(&mut self, edge: EdgeId, is_supply: bool) {
        self.edge_mut(edge).is_supply = is_supply;
    }

    /// Replace the interior route of `edge`; the length follows.
    pub fn set_waypoints(&mut self, edge: EdgeId, waypoints: Vec<Point3>) {
        self.edge_mut(edge).waypoints = waypoints;
        self.update_length(edge);
    }

    /// Remove an edge; its endpoints stay.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Option<Edge> {
        let removed = self.edges.remove(&edge);
        if removed.is_some() {
            self.rebuild_adjacency();
            debug!(edge = %edge, "removed edge");
        }
        removed
    }

    /// Remove a node together with all incident edges.
    pub fn remove_node(&mut self, node: NodeId) -> Option<Node> {
        let removed = self.nodes.remove(&node)?;
        self.edges.retain(|_, e| !e.touches(node));
        self.rebuild_adjacency();
        debug!(node = %node, "removed node");
        Some(removed)
    }

    /// Drop all nodes and edges; metadata and settings stay.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.adjacency.clear();
    }

    /// Repopulate the node → incident-edge index from the edge map.
    ///
    /// Every mutating method calls this before returning; it is public for
    /// callers that want to assert the index is current.
    pub fn rebuild_adjacency(&mut self) {
        let mut adjacency: BTreeMap<NodeId, Vec<EdgeId>> =
            self.nodes.keys().map(|&id| (id, Vec::new())).collect();
        // Edge map is id-ordered, so each list comes out sorted.
        for e in self.edges.values() {
            for n in e.endpoints() {
                adjacency
                    .get_mut(&n)
                    .unwrap_or_else(|| panic!("{} references missing {n}", e.id))
                    .push(e.id);
            }
        }
        self.adjacency = adjacency;
    }

    // ---------------------------------------------------------------------
    // Crate-internal building blocks. These do not rebuild adjacency; the
    // public operation composing them does so before returning.
    // ---------------------------------------------------------------------

    pub(crate) fn edge_mut(&mut self, edge: EdgeId) -> &mut Edge {
        self.edges
            .get_mut(&edge)
            .unwrap_or_else(|| panic!("{edge} does not exist"))
    }

    /// Insert a fully formed edge, moving it to a free id if its own is
    /// taken.
    pub(crate) fn insert_edge(&mut self, mut edge: Edge) -> NetworkResult<EdgeId> {
        if self.edges.contains_key(&edge.id) {
            edge.id = self.next_edge_id()?;
        }
        Ok(self.place_edge(edge))
    }

    /// Insert an edge whose id is known to be free; its length is computed.
    pub(crate) fn place_edge(&mut self, edge: Edge) -> EdgeId {
        assert!(
            self.nodes.contains_key(&edge.node1) && self.nodes.contains_key(&edge.node2),
            "{} references a missing node ({} / {})",
            edge.id,
            edge.node1,
            edge.node2
        );
        assert_ne!(edge.node1, edge.node2, "{} would be a self-loop", edge.id);
        assert!(!self.edges.contains_key(&edge.id), "{} is already taken", edge.id);
        let id = edge.id;
        self.edges.insert(id, edge);
        self.update_length(id);
        debug!(edge = %id, "added edge");
        id
    }

    pub(crate) fn insert_mixer(&mut self, position: Point3) -> NetworkResult<NodeId> {
        let id = self.next_node_id()?;
        self.nodes
            .insert(id, Node::new(id, position, NodeRole::Mixer));
        debug!(node = %id, "added mixer");
        Ok(id)
    }

    pub(crate) fn repoint(&mut self, edge: EdgeId, node: NodeId, first: bool) {
        assert!(self.nodes.contains_key(&node), "{node} does not exist");
        let e = self.edge_mut(edge);
        if first {
            e.node1 = node;
        } else {
            e.node2 = node;
        }
        self.update_length(edge);
    }

    pub(crate) fn update_length(&mut self, edge: EdgeId) {
        let e = self.edge_by_id(edge);
        let p1 = self.node_by_id(e.node1).position;
        let p2 = self.node_by_id(e.node2).position;
        let length = route_length(&p1, &e.waypoints, &p2);
        self.edge_mut(edge).length = length;
    }

    /// Split `edge` at `node`, which lies on route segment `segment`: the
    /// edge keeps `node → node2`, a new edge `node1 → node` is created with
    /// the same pipe and supply flag. Waypoints before the segment go to the
    /// new edge, the rest stay; one falling on `node` itself is dropped.
    pub(crate) fn split_edge_at(
        &mut self,
        edge: EdgeId,
        node: NodeId,
        segment: usize,
    ) -> NetworkResult<EdgeId> {
        let tol = self.settings.geometric_tolerance;
        let at = self.node_by_id(node).position;
        let original = self.edge_by_id(edge);
        let split = segment.min(original.waypoints.len());
        let mut head_route = original.waypoints[..split].to_vec();
        let mut tail_route = original.waypoints[split..].to_vec();
        if head_route.last().is_some_and(|w| (*w - at).norm() < tol) {
            head_route.pop();
        }
        if tail_route.first().is_some_and(|w| (*w - at).norm() < tol) {
            tail_route.remove(0);
        }

        let mut head = Edge::new(
            self.next_edge_id()?,
            original.node1,
            node,
            original.is_supply,
            original.pipe,
        );
        head.waypoints = head_route;
        self.edge_mut(edge).waypoints = tail_route;
        self.repoint(edge, node, true);
        Ok(self.place_edge(head))
    }
}

/// One past the highest taken id, else the lowest gap; `None` when every
/// `u32` is taken. `taken` must be ascending.
fn free_id<I>(taken: I) -> Option<u32>
where
    I: DoubleEndedIterator<Item = u32> + Clone,
{
    let Some(top) = taken.clone().next_back() else {
        return Some(0);
    };
    if let Some(next) = top.checked_add(1) {
        return Some(next);
    }
    let mut expected = 0_u32;
    for id in taken {
        if id != expected {
            return Some(expected);
        }
        expected = expected.checked_add(1)?;
    }
    None
}

impl Index<NodeId> for Network {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node_by_id(id)
    }
}

impl Index<EdgeId> for Network {
    type Output = Edge;

    fn index(&self, id: EdgeId) -> &Edge {
        self.edge_by_id(id)
    }
}
