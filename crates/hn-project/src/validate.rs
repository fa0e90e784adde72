//! Network file validation logic.

use std::collections::HashSet;

use crate::schema::{CurveDef, EdgeDef, FluidDef, NetworkFile, NodeDef, PipeDef, SettingsDef, SizingDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

fn invalid(field: impl Into<String>, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must not be negative"))
    }
}

fn finite_point(field: impl Into<String>, p: &[f64; 3]) -> Result<(), ValidationError> {
    match p.iter().find(|v| !v.is_finite()) {
        Some(&v) => Err(invalid(field, v, "coordinate must be finite")),
        None => Ok(()),
    }
}

pub fn validate_file(file: &NetworkFile) -> Result<(), ValidationError> {
    finite_point("origin", &file.origin)?;
    validate_settings(&file.settings)?;
    validate_sizing(&file.sizing)?;
    validate_fluid(&file.fluid)?;

    let mut pipe_ids = HashSet::new();
    for pipe in &file.pipes {
        if !pipe_ids.insert(pipe.id) {
            return Err(ValidationError::DuplicateId {
                id: pipe.id.to_string(),
                context: "pipes".to_string(),
            });
        }
        validate_pipe(pipe)?;
    }
    for id in &file.available_pipes {
        if !pipe_ids.contains(id) {
            return Err(ValidationError::MissingReference {
                id: id.to_string(),
                context: "available_pipes".to_string(),
            });
        }
    }
    if let Some(curve) = &file.simultaneity {
        validate_curve("simultaneity", curve)?;
    }

    let mut node_ids = HashSet::new();
    for node in &file.nodes {
        if !node_ids.insert(node.id) {
            return Err(ValidationError::DuplicateId {
                id: node.id.to_string(),
                context: "nodes".to_string(),
            });
        }
        validate_node(node)?;
    }

    let mut edge_ids = HashSet::new();
    for edge in &file.edges {
        if !edge_ids.insert(edge.id) {
            return Err(ValidationError::DuplicateId {
                id: edge.id.to_string(),
                context: "edges".to_string(),
            });
        }
        validate_edge(edge, &node_ids, &pipe_ids)?;
    }

    Ok(())
}

fn validate_settings(settings: &SettingsDef) -> Result<(), ValidationError> {
    positive("settings.geometric_tolerance_m", settings.geometric_tolerance_m)?;
    positive("settings.branch_snap_distance_m", settings.branch_snap_distance_m)?;
    if settings.max_passes_factor == 0 {
        return Err(invalid("settings.max_passes_factor", 0.0, "must be positive"));
    }
    Ok(())
}

fn validate_sizing(sizing: &SizingDef) -> Result<(), ValidationError> {
    // Absolute zero is the hard floor; the fluid curve decides the rest.
    if !(sizing.temperature_setpoint_c.is_finite() && sizing.temperature_setpoint_c > -273.15) {
        return Err(invalid(
            "sizing.temperature_setpoint_c",
            sizing.temperature_setpoint_c,
            "must be above absolute zero",
        ));
    }
    positive("sizing.temperature_difference_k", sizing.temperature_difference_k)?;
    positive("sizing.max_pressure_loss_pa_per_m", sizing.max_pressure_loss_pa_per_m)?;
    Ok(())
}

fn validate_fluid(fluid: &FluidDef) -> Result<(), ValidationError> {
    positive("fluid.density_kg_m3", fluid.density_kg_m3)?;
    positive("fluid.heat_capacity_j_kg_k", fluid.heat_capacity_j_kg_k)?;
    positive("fluid.conductivity_w_m_k", fluid.conductivity_w_m_k)?;
    if let Some(curve) = &fluid.kinematic_viscosity {
        validate_curve("fluid.kinematic_viscosity", curve)?;
        for &v in &curve.y {
            positive("fluid.kinematic_viscosity", v)?;
        }
    }
    Ok(())
}

fn validate_curve(field: &str, curve: &CurveDef) -> Result<(), ValidationError> {
    if curve.x.is_empty() || curve.x.len() != curve.y.len() {
        return Err(invalid(
            field,
            curve.x.len() as f64,
            "needs at least one sample and equally many x and y values",
        ));
    }
    if let Some(&v) = curve.x.iter().chain(&curve.y).find(|v| !v.is_finite()) {
        return Err(invalid(field, v, "samples must be finite"));
    }
    if let Some(w) = curve.x.windows(2).find(|w| w[1] <= w[0]) {
        return Err(invalid(field, w[1], "x values must be strictly increasing"));
    }
    Ok(())
}

fn validate_pipe(pipe: &PipeDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("pipe {} {name}", pipe.id);
    positive(field("outside_diameter_mm"), pipe.outside_diameter_mm)?;
    positive(field("wall_thickness_mm"), pipe.wall_thickness_mm)?;
    let inside = pipe.outside_diameter_mm - 2.0 * pipe.wall_thickness_mm;
    if inside <= 0.0 {
        return Err(invalid(
            field("wall_thickness_mm"),
            pipe.wall_thickness_mm,
            "leaves no inside diameter",
        ));
    }
    non_negative(field("roughness_mm"), pipe.roughness_mm)?;
    non_negative(field("insulation_thickness_mm"), pipe.insulation_thickness_mm)?;
    positive(field("wall_conductivity_w_m_k"), pipe.wall_conductivity_w_m_k)?;
    if pipe.insulation_thickness_mm > 0.0 {
        positive(
            field("insulation_conductivity_w_m_k"),
            pipe.insulation_conductivity_w_m_k,
        )?;
    }
    Ok(())
}

fn validate_node(node: &NodeDef) -> Result<(), ValidationError> {
    finite_point(format!("node {} position", node.id), &node.position)?;
    non_negative(
        format!("node {} max_heating_demand_w", node.id),
        node.max_heating_demand_w,
    )
}

fn validate_edge(
    edge: &EdgeDef,
    node_ids: &HashSet<hn_core::NodeId>,
    pipe_ids: &HashSet<hn_core::PipeId>,
) -> Result<(), ValidationError> {
    for n in [edge.node1, edge.node2] {
        if !node_ids.contains(&n) {
            return Err(ValidationError::MissingReference {
                id: n.to_string(),
                context: format!("{} endpoints", edge.id),
            });
        }
    }
    if edge.node1 == edge.node2 {
        return Err(ValidationError::InvalidValue {
            field: format!("{} node2", edge.id),
            value: edge.node2.to_string(),
            reason: "edge must connect two different nodes".to_string(),
        });
    }
    if let Some(pipe) = edge.pipe {
        if !pipe_ids.contains(&pipe) {
            return Err(ValidationError::MissingReference {
                id: pipe.to_string(),
                context: format!("{} pipe", edge.id),
            });
        }
    }
    for p in &edge.waypoints {
        finite_point(format!("{} waypoints", edge.id), p)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NodeKind, PipeDef};
    use hn_core::{EdgeId, NodeId, PipeId};

    fn minimal() -> NetworkFile {
        NetworkFile {
            name: "t".to_string(),
            network_type: Default::default(),
            origin: [0.0; 3],
            settings: SettingsDef::default(),
            sizing: SizingDef::default(),
            fluid: FluidDef::default(),
            pipes: vec![PipeDef {
                id: PipeId::new(1),
                name: "DN20".to_string(),
                outside_diameter_mm: 26.9,
                wall_thickness_mm: 2.6,
                roughness_mm: 0.07,
                insulation_thickness_mm: 0.0,
                insulation_conductivity_w_m_k: 0.0,
                wall_conductivity_w_m_k: 50.0,
            }],
            available_pipes: vec![],
            simultaneity: None,
            nodes: vec![
                NodeDef {
                    id: NodeId::new(1),
                    position: [0.0, 0.0, 0.0],
                    kind: NodeKind::Source,
                    max_heating_demand_w: 0.0,
                },
                NodeDef {
                    id: NodeId::new(2),
                    position: [10.0, 0.0, 0.0],
                    kind: NodeKind::Substation,
                    max_heating_demand_w: 5000.0,
                },
            ],
            edges: vec![EdgeDef {
                id: EdgeId::new(1),
                node1: NodeId::new(1),
                node2: NodeId::new(2),
                supply: true,
                pipe: Some(PipeId::new(1)),
                waypoints: vec![],
            }],
        }
    }

    #[test]
    fn minimal_file_is_valid() {
        validate_file(&minimal()).unwrap();
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut f = minimal();
        f.nodes.push(f.nodes[0].clone());
        assert!(matches!(
            validate_file(&f),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let mut f = minimal();
        f.edges[0].node2 = NodeId::new(9);
        assert_eq!(
            validate_file(&f),
            Err(ValidationError::MissingReference {
                id: "node#9".to_string(),
                context: "edge#1 endpoints".to_string(),
            })
        );
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut f = minimal();
        f.edges[0].node2 = NodeId::new(1);
        assert!(matches!(
            validate_file(&f),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unknown_pipe_references_are_rejected() {
        let mut f = minimal();
        f.edges[0].pipe = Some(PipeId::new(4));
        assert!(matches!(
            validate_file(&f),
            Err(ValidationError::MissingReference { .. })
        ));

        let mut f = minimal();
        f.available_pipes = vec![PipeId::new(4)];
        assert!(matches!(
            validate_file(&f),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let mut f = minimal();
        f.pipes[0].wall_thickness_mm = 14.0;
        assert!(matches!(
            validate_file(&f),
            Err(ValidationError::InvalidValue { .. })
        ));

        let mut f = minimal();
        f.sizing.max_pressure_loss_pa_per_m = 0.0;
        assert!(validate_file(&f).is_err());

        let mut f = minimal();
        f.nodes[1].max_heating_demand_w = -1.0;
        assert!(validate_file(&f).is_err());
    }

    #[test]
    fn unsorted_curve_is_rejected() {
        let mut f = minimal();
        f.simultaneity = Some(CurveDef {
            x: vec![1.0, 1.0],
            y: vec![1.0, 0.9],
        });
        assert!(validate_file(&f).is_err());
    }
}
