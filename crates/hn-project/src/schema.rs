//! Network file schema definitions.
//!
//! Quantities carry their unit in the field name; conversion to the engine's
//! typed units happens in [`crate::convert`].

use hn_core::{EdgeId, NodeId, PipeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkFile {
    pub name: String,
    #[serde(default)]
    pub network_type: NetworkTypeDef,
    /// Offset of the local coordinate system [m].
    #[serde(default)]
    pub origin: [f64; 3],
    #[serde(default)]
    pub settings: SettingsDef,
    #[serde(default)]
    pub sizing: SizingDef,
    #[serde(default)]
    pub fluid: FluidDef,
    #[serde(default)]
    pub pipes: Vec<PipeDef>,
    /// Pipes the sizing pass may choose from; empty means all of `pipes`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_pipes: Vec<PipeId>,
    /// Simultaneity factor over number of buildings served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simultaneity: Option<CurveDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NetworkTypeDef {
    SinglePipe,
    #[default]
    DoublePipe,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsDef {
    #[serde(default = "default_geometric_tolerance")]
    pub geometric_tolerance_m: f64,
    #[serde(default = "default_branch_snap_distance")]
    pub branch_snap_distance_m: f64,
    #[serde(default = "default_max_passes_factor")]
    pub max_passes_factor: usize,
}

fn default_geometric_tolerance() -> f64 {
    0.01
}

fn default_branch_snap_distance() -> f64 {
    1.0
}

fn default_max_passes_factor() -> usize {
    4
}

impl Default for SettingsDef {
    fn default() -> Self {
        Self {
            geometric_tolerance_m: default_geometric_tolerance(),
            branch_snap_distance_m: default_branch_snap_distance(),
            max_passes_factor: default_max_passes_factor(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizingDef {
    #[serde(default = "default_temperature_setpoint")]
    pub temperature_setpoint_c: f64,
    #[serde(default = "default_temperature_difference")]
    pub temperature_difference_k: f64,
    #[serde(default = "default_max_pressure_loss")]
    pub max_pressure_loss_pa_per_m: f64,
}

fn default_temperature_setpoint() -> f64 {
    80.0
}

fn default_temperature_difference() -> f64 {
    20.0
}

fn default_max_pressure_loss() -> f64 {
    150.0
}

impl Default for SizingDef {
    fn default() -> Self {
        Self {
            temperature_setpoint_c: default_temperature_setpoint(),
            temperature_difference_k: default_temperature_difference(),
            max_pressure_loss_pa_per_m: default_max_pressure_loss(),
        }
    }
}

/// Fluid properties; defaults to water.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    pub name: String,
    pub density_kg_m3: f64,
    pub heat_capacity_j_kg_k: f64,
    pub conductivity_w_m_k: f64,
    /// Kinematic viscosity [m²/s] over temperature [°C]; water if omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinematic_viscosity: Option<CurveDef>,
}

impl Default for FluidDef {
    fn default() -> Self {
        Self {
            name: "Water".to_string(),
            density_kg_m3: 998.0,
            heat_capacity_j_kg_k: 4180.0,
            conductivity_w_m_k: 0.6,
            kinematic_viscosity: None,
        }
    }
}

/// Sampled curve; `x` strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurveDef {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipeDef {
    pub id: PipeId,
    pub name: String,
    pub outside_diameter_mm: f64,
    pub wall_thickness_mm: f64,
    pub roughness_mm: f64,
    #[serde(default)]
    pub insulation_thickness_mm: f64,
    #[serde(default)]
    pub insulation_conductivity_w_m_k: f64,
    #[serde(default = "default_wall_conductivity")]
    pub wall_conductivity_w_m_k: f64,
}

fn default_wall_conductivity() -> f64 {
    hn_catalog::pipe::STEEL_CONDUCTIVITY
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: NodeId,
    /// Local coordinates [m].
    pub position: [f64; 3],
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_heating_demand_w: f64,
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Source,
    Mixer,
    Substation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    pub id: EdgeId,
    pub node1: NodeId,
    pub node2: NodeId,
    #[serde(default)]
    pub supply: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe: Option<PipeId>,
    /// Interior route points from `node1` to `node2` [m].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<[f64; 3]>,
}

/// Derived per-network results written by the `size` and `paths` commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkResults {
    pub name: String,
    pub connected: bool,
    pub node_count: usize,
    pub edge_count: usize,
    pub substation_count: usize,
    pub total_length_m: f64,
    pub total_pipe_length_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extents: Option<ExtentsDef>,
    #[serde(default)]
    pub edges: Vec<EdgeResult>,
    #[serde(default)]
    pub paths: Vec<PathResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtentsDef {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeResult {
    pub id: EdgeId,
    pub node1: NodeId,
    pub node2: NodeId,
    pub supply: bool,
    pub length_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe: Option<PipeId>,
    pub heating_demand_w: f64,
    pub mass_flow_kg_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u_value_w_m_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_change_indicator: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathResult {
    pub substation: NodeId,
    pub source: NodeId,
    pub edges: Vec<EdgeId>,
    pub length_m: f64,
}
