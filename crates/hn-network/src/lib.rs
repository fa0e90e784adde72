//! hn-network: district-heating network topology and pipe sizing.
//!
//! Provides:
//! - The network model (nodes, edges, adjacency index) and its mutation API
//! - Topology passes: intersection generation, building connection,
//!   dead-end pruning, redundant-node collapsing, short-edge removal
//! - Shortest supply paths and demand aggregation
//! - Hydraulic pipe sizing against a catalog
//!
//! Every mutating call rebuilds the adjacency index before it returns, so
//! readers never observe stale adjacency.
//!
//! # Example
//!
//! ```
//! use hn_core::{EdgeId, NodeId, watts};
//! use hn_geometry::Point3;
//! use hn_network::{Network, NodeRole};
//!
//! let mut net = Network::new("demo");
//! let a = net.add_node(NodeId::new(1), Point3::new(0.0, 0.0, 0.0), NodeRole::Source, true).unwrap();
//! let b = net.add_node(NodeId::new(2), Point3::new(10.0, 0.0, 0.0), NodeRole::Mixer, true).unwrap();
//! let c = net.add_node(NodeId::new(3), Point3::new(20.0, 0.0, 0.0), NodeRole::Mixer, true).unwrap();
//! net.add_edge(EdgeId::new(1), a, b, true, None).unwrap();
//! net.add_edge(EdgeId::new(2), b, c, true, None).unwrap();
//!
//! let d = net.add_node(NodeId::new(4), Point3::new(10.0, 5.0, 0.0), NodeRole::Substation, true).unwrap();
//! net.set_max_heating_demand(d, watts(5000.0));
//! net.connect_buildings(false).unwrap();
//!
//! let paths = net.find_shortest_paths_for_buildings().unwrap();
//! assert_eq!(paths[&d].length, 15.0);
//! assert!(net.check_connected_graph());
//! ```

pub mod buildings;
pub mod cleanup;
pub mod connectivity;
pub mod edge;
pub mod error;
pub mod intersections;
pub mod network;
pub mod node;
pub mod paths;
pub mod settings;
pub mod sizing;

pub use buildings::BuildingConnections;
pub use edge::{Edge, Route, RouteProjection};
pub use error::{NetworkError, NetworkResult};
pub use intersections::Intersections;
pub use network::{Network, NetworkType};
pub use node::{Node, NodeRole};
pub use paths::SupplyPath;
pub use settings::NetworkSettings;
pub use sizing::{PipeHydraulics, SizingParams, SizingReport, friction_factor, pipe_hydraulics};
