//! Network vertices.

use hn_core::NodeId;
use hn_core::units::Power;
use hn_geometry::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRole {
    /// Supply origin (heating plant).
    Source,
    /// Pure topological junction.
    Mixer,
    /// Building connection point with a heating demand.
    Substation,
}

impl NodeRole {
    /// Sources and substations are never removed or merged by cleanup passes.
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeRole::Source | NodeRole::Substation)
    }
}

/// A graph vertex.
///
/// Incident edges are not stored here; they live in the owning network's
/// adjacency index.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Point3,
    pub role: NodeRole,
    /// Design heating load; only meaningful for substations.
    pub max_heating_demand: Power,
}

impl Node {
    pub fn new(id: NodeId, position: Point3, role: NodeRole) -> Self {
        Self {
            id,
            position,
            role,
            max_heating_demand: Power::default(),
        }
    }

    pub fn is_substation(&self) -> bool {
        self.role == NodeRole::Substation
    }

    pub fn is_source(&self) -> bool {
        self.role == NodeRole::Source
    }

    pub fn is_mixer(&self) -> bool {
        self.role == NodeRole::Mixer
    }
}
