//! Conversion between network files and the engine types.

use std::collections::BTreeMap;

use hn_catalog::{LinearSpline, NetworkFluid, PipeCatalog, PipeCatalogEntry};
use hn_core::{NodeId, deg_c, delta_k, kg_per_m3, mm, watts};
use hn_geometry::Point3;
use hn_network::{Network, NetworkSettings, NetworkType, NodeRole, SizingParams, SupplyPath};
use tracing::debug;

use crate::ProjectResult;
use crate::schema::{
    CurveDef, EdgeDef, EdgeResult, ExtentsDef, NetworkFile, NetworkResults, NetworkTypeDef, NodeDef,
    NodeKind, PathResult,
};
use crate::validate::validate_file;

fn point(p: &[f64; 3]) -> Point3 {
    Point3::new(p[0], p[1], p[2])
}

fn coords(p: &Point3) -> [f64; 3] {
    [p.x, p.y, p.z]
}

fn role(kind: NodeKind) -> NodeRole {
    match kind {
        NodeKind::Source => NodeRole::Source,
        NodeKind::Mixer => NodeRole::Mixer,
        NodeKind::Substation => NodeRole::Substation,
    }
}

fn kind(role: NodeRole) -> NodeKind {
    match role {
        NodeRole::Source => NodeKind::Source,
        NodeRole::Mixer => NodeKind::Mixer,
        NodeRole::Substation => NodeKind::Substation,
    }
}

fn curve(def: &CurveDef) -> ProjectResult<LinearSpline> {
    Ok(LinearSpline::new(def.x.clone(), def.y.clone())?)
}

/// Build the network described by `file`.
///
/// Node and edge ids are taken from the file as they are; nodes are not
/// deduplicated by position.
pub fn to_network(file: &NetworkFile) -> ProjectResult<Network> {
    validate_file(file)?;

    let mut net = Network::new(file.name.clone()).with_settings(NetworkSettings {
        geometric_tolerance: file.settings.geometric_tolerance_m,
        branch_snap_distance: file.settings.branch_snap_distance_m,
        max_passes_factor: file.settings.max_passes_factor,
    })?;
    net.network_type = match file.network_type {
        NetworkTypeDef::SinglePipe => NetworkType::SinglePipe,
        NetworkTypeDef::DoublePipe => NetworkType::DoublePipe,
    };
    net.origin = point(&file.origin);
    net.available_pipes = file.available_pipes.clone();
    net.simultaneity = file.simultaneity.as_ref().map(curve).transpose()?;

    for n in &file.nodes {
        let id = net.add_node(n.id, point(&n.position), role(n.kind), false)?;
        net.set_max_heating_demand(id, watts(n.max_heating_demand_w));
    }
    for e in &file.edges {
        let id = net.add_edge(e.id, e.node1, e.node2, e.supply, e.pipe)?;
        if !e.waypoints.is_empty() {
            net.set_waypoints(id, e.waypoints.iter().map(point).collect());
        }
    }
    debug!(
        name = %net.name,
        nodes = net.node_count(),
        edges = net.edge_count(),
        "network built from file"
    );
    Ok(net)
}

/// Pipe catalog from the file's pipe list.
pub fn catalog_from_file(file: &NetworkFile) -> ProjectResult<PipeCatalog> {
    let entries = file.pipes.iter().map(|p| {
        PipeCatalogEntry::new(
            p.id,
            p.name.clone(),
            mm(p.outside_diameter_mm),
            mm(p.wall_thickness_mm),
            mm(p.roughness_mm),
        )
        .with_insulation(mm(p.insulation_thickness_mm), p.insulation_conductivity_w_m_k)
        .with_wall_conductivity(p.wall_conductivity_w_m_k)
    });
    Ok(PipeCatalog::from_entries(entries)?)
}

pub fn fluid_from_file(file: &NetworkFile) -> ProjectResult<NetworkFluid> {
    let f = &file.fluid;
    let mut fluid = NetworkFluid::water();
    fluid.name = f.name.clone();
    fluid.density = kg_per_m3(f.density_kg_m3);
    fluid.specific_heat = f.heat_capacity_j_kg_k;
    fluid.conductivity = f.conductivity_w_m_k;
    if let Some(viscosity) = &f.kinematic_viscosity {
        fluid.kinematic_viscosity = curve(viscosity)?;
    }
    Ok(fluid)
}

pub fn sizing_params(file: &NetworkFile) -> SizingParams {
    SizingParams {
        temperature_setpoint: deg_c(file.sizing.temperature_setpoint_c),
        temperature_difference: delta_k(file.sizing.temperature_difference_k),
        max_pressure_loss: file.sizing.max_pressure_loss_pa_per_m,
    }
}

impl NetworkFile {
    /// Replace the topology sections with the current state of `net`; the
    /// catalog, fluid, settings and sizing sections are kept.
    pub fn update_from_network(&mut self, net: &Network) {
        self.nodes = net
            .nodes()
            .map(|n| NodeDef {
                id: n.id,
                position: coords(&n.position),
                kind: kind(n.role),
                max_heating_demand_w: n.max_heating_demand.value,
            })
            .collect();
        self.edges = net
            .edges()
            .map(|e| EdgeDef {
                id: e.id,
                node1: e.node1(),
                node2: e.node2(),
                supply: e.is_supply,
                pipe: e.pipe,
                waypoints: e.waypoints().iter().map(coords).collect(),
            })
            .collect();
    }
}

/// Per-edge results and network summary for export.
pub fn results_from_network(
    net: &Network,
    paths: Option<&BTreeMap<NodeId, SupplyPath>>,
) -> NetworkResults {
    NetworkResults {
        name: net.name.clone(),
        connected: net.check_connected_graph(),
        node_count: net.node_count(),
        edge_count: net.edge_count(),
        substation_count: net.substation_count(),
        total_length_m: net.total_length(),
        total_pipe_length_m: net.total_pipe_length(),
        extents: net.extents().map(|ext| ExtentsDef {
            min: coords(&ext.min),
            max: coords(&ext.max),
        }),
        edges: net
            .edges()
            .map(|e| EdgeResult {
                id: e.id,
                node1: e.node1(),
                node2: e.node2(),
                supply: e.is_supply,
                length_m: e.length(),
                pipe: e.pipe,
                heating_demand_w: e.nominal_heating_demand.value,
                mass_flow_kg_s: e.nominal_mass_flow.value,
                u_value_w_m_k: e.u_value,
                temperature_change_indicator: e.temperature_change_indicator,
            })
            .collect(),
        paths: paths
            .map(|paths| {
                paths
                    .values()
                    .map(|p| PathResult {
                        substation: p.substation,
                        source: p.source,
                        edges: p.edges.clone(),
                        length_m: p.length,
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}
