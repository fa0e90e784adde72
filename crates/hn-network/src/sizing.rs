//! Hydraulic pipe sizing against a catalog.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::f64::consts::PI;

use hn_catalog::{NetworkFluid, PipeCatalog, PipeCatalogEntry};
use hn_core::units::{Density, KinViscosity, MassRate, TempInterval, Temperature};
use hn_core::{EdgeId, HnResult, NodeId, PipeId, delta_k, deg_c, ensure_positive, kgps, watts};
use tracing::{debug, info, warn};

use crate::error::{NetworkError, NetworkResult};
use crate::network::Network;
use crate::paths::SupplyPath;

/// Reynolds number below which flow is treated as laminar.
const LAMINAR_REYNOLDS: f64 = 2300.0;

/// Design conditions for [`Network::size_pipe_dimensions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingParams {
    /// Supply temperature; selects the fluid viscosity.
    pub temperature_setpoint: Temperature,
    /// Supply/return spread used to turn heat demand into mass flow.
    pub temperature_difference: TempInterval,
    /// Pressure-loss budget per metre of pipe [Pa/m].
    pub max_pressure_loss: f64,
}

impl Default for SizingParams {
    fn default() -> Self {
        Self {
            temperature_setpoint: deg_c(80.0),
            temperature_difference: delta_k(20.0),
            max_pressure_loss: 150.0,
        }
    }
}

impl SizingParams {
    pub fn validate(&self) -> HnResult<()> {
        ensure_positive(self.temperature_setpoint.value, "temperature setpoint")?;
        ensure_positive(self.temperature_difference.value, "temperature difference")?;
        ensure_positive(self.max_pressure_loss, "max pressure loss")?;
        Ok(())
    }
}

/// Flow state of one pipe at a given mass flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeHydraulics {
    /// Mean velocity [m/s].
    pub velocity: f64,
    pub reynolds: f64,
    /// Darcy friction factor.
    pub friction_factor: f64,
    /// Pressure loss per metre [Pa/m].
    pub pressure_loss: f64,
}

/// Darcy friction factor: 64/Re when laminar, Swamee-Jain otherwise.
pub fn friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    if reynolds <= 0.0 {
        return 0.0;
    }
    if reynolds < LAMINAR_REYNOLDS {
        64.0 / reynolds
    } else {
        let a = relative_roughness / 3.7;
        let b = 5.74 / reynolds.powf(0.9);
        0.25 / (a + b).log10().powi(2)
    }
}

/// Velocity, Reynolds number and pressure loss per metre for `mass_flow`
/// through `pipe`.
pub fn pipe_hydraulics(
    pipe: &PipeCatalogEntry,
    mass_flow: MassRate,
    density: Density,
    kinematic_viscosity: KinViscosity,
) -> PipeHydraulics {
    let d = pipe.inside_diameter().value;
    let rho = density.value;
    let area = PI * d * d / 4.0;
    let velocity = mass_flow.value.abs() / (rho * area);
    let reynolds = velocity * d / kinematic_viscosity;
    let f = friction_factor(reynolds, pipe.roughness.value / d);
    // Darcy-Weisbach per unit length: f * rho/2 * v^2 / d
    let pressure_loss = f * rho / 2.0 * velocity * velocity / d;
    PipeHydraulics {
        velocity,
        reynolds,
        friction_factor: f,
        pressure_loss,
    }
}

/// Summary of a sizing run.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingReport {
    /// Number of edges that received a pipe.
    pub sized: usize,
    /// Edges where no pipe met the pressure-loss budget; they got the largest.
    pub fallback_largest: Vec<EdgeId>,
    /// Edges off every supply path whose demand was borrowed from neighbours.
    pub filled_from_neighbours: Vec<EdgeId>,
    /// The supply paths the demands were aggregated along.
    pub paths: BTreeMap<NodeId, SupplyPath>,
}

/// Per-edge outcome computed before anything is written back.
struct EdgeSizing {
    edge: EdgeId,
    pipe: PipeId,
    demand: f64,
    mass_flow: f64,
    u_value: f64,
    indicator: Option<f64>,
}

impl Network {
    /// Select a catalog pipe for every edge.
    ///
    /// Each substation's demand is added to every edge on its shortest supply
    /// path, scaled by the simultaneity curve for the number of buildings an
    /// edge serves. Edges on no path take half of the largest nonzero demand
    /// nearest to either end. The mass flow follows from the demand and the
    /// temperature difference; the chosen pipe is the one with the smallest
    /// inside diameter whose pressure loss per metre stays below the budget,
    /// or the largest pipe if none does.
    ///
    /// All inputs are validated and all paths are computed before any edge is
    /// touched, so a failed run leaves earlier results in place.
    pub fn size_pipe_dimensions(
        &mut self,
        fluid: &NetworkFluid,
        catalog: &PipeCatalog,
        params: &SizingParams,
    ) -> NetworkResult<SizingReport> {
        params.validate()?;
        fluid.validate()?;
        let usable = if self.available_pipes.is_empty() {
            catalog.clone()
        } else {
            catalog.subset(&self.available_pipes)?
        };
        if usable.is_empty() {
            return Err(NetworkError::EmptyCatalog);
        }
        let candidates = usable.by_inside_diameter();
        let paths = self.find_shortest_paths_for_buildings()?;

        let (demand, filled) = self.edge_demands(&paths);

        let cp = fluid.specific_heat;
        let dt = params.temperature_difference.value;
        let nu = fluid.kinematic_viscosity_at(params.temperature_setpoint);
        let mut fallback = Vec::new();
        let mut outcomes = Vec::with_capacity(self.edge_count());

        for e in self.edges.values() {
            let q = demand.get(&e.id).copied().unwrap_or(0.0);
            let m_dot = q / (dt * cp);
            let chosen = candidates
                .iter()
                .find(|p| {
                    pipe_hydraulics(p, kgps(m_dot), fluid.density, nu).pressure_loss
                        < params.max_pressure_loss
                })
                .copied();
            let pipe = match chosen {
                Some(p) => p,
                None => {
                    warn!(edge = %e.id, mass_flow = m_dot, "no pipe meets the pressure-loss budget, using the largest");
                    fallback.push(e.id);
                    candidates[candidates.len() - 1]
                }
            };
            let u_value = pipe.u_value();
            let indicator = (m_dot > 0.0).then(|| u_value * e.length / (m_dot * cp));
            debug!(edge = %e.id, pipe = %pipe.id, demand = q, mass_flow = m_dot, "sized edge");
            outcomes.push(EdgeSizing {
                edge: e.id,
                pipe: pipe.id,
                demand: q,
                mass_flow: m_dot,
                u_value,
                indicator,
            });
        }

        for o in &outcomes {
            let e = self.edge_mut(o.edge);
            e.clear_results();
            e.pipe = Some(o.pipe);
            e.nominal_heating_demand = watts(o.demand);
            e.nominal_mass_flow = kgps(o.mass_flow);
            e.u_value = Some(o.u_value);
            e.temperature_change_indicator = o.indicator;
        }

        info!(
            sized = outcomes.len(),
            fallback = fallback.len(),
            filled = filled.len(),
            "pipe sizing finished"
        );
        Ok(SizingReport {
            sized: outcomes.len(),
            fallback_largest: fallback,
            filled_from_neighbours: filled,
            paths,
        })
    }

    /// Reset demand, flow and thermal results on every edge; pipes stay.
    pub fn clear_sizing_results(&mut self) {
        for e in self.edges.values_mut() {
            e.clear_results();
        }
    }

    /// Aggregated design demand per edge [W] and the edges filled from
    /// neighbours.
    fn edge_demands(
        &self,
        paths: &BTreeMap<NodeId, SupplyPath>,
    ) -> (BTreeMap<EdgeId, f64>, Vec<EdgeId>) {
        let mut demand: BTreeMap<EdgeId, f64> = self.edges.keys().map(|&e| (e, 0.0)).collect();
        let mut served: BTreeMap<EdgeId, usize> = BTreeMap::new();

        for path in paths.values() {
            let q = self.node_by_id(path.substation).max_heating_demand.value;
            for e in &path.edges {
                *demand.entry(*e).or_default() += q;
                *served.entry(*e).or_default() += 1;
            }
        }

        if let Some(curve) = &self.simultaneity {
            for (e, &count) in &served {
                if let Some(q) = demand.get_mut(e) {
                    *q *= curve.value(count as f64);
                }
            }
        }

        let aggregated = demand.clone();
        let mut filled = Vec::new();
        for (&id, q) in demand.iter_mut() {
            if *q != 0.0 {
                continue;
            }
            let e = self.edge_by_id(id);
            let nearest = self
                .nearest_nonzero_demand(e.node1, id, &aggregated)
                .max(self.nearest_nonzero_demand(e.node2, id, &aggregated));
            if nearest > 0.0 {
                *q = 0.5 * nearest;
                filled.push(id);
            }
        }
        (demand, filled)
    }

    /// Largest nonzero demand among the edges closest (in hops) to `start`,
    /// not crossing `skip`; 0 if none is reachable.
    fn nearest_nonzero_demand(
        &self,
        start: NodeId,
        skip: EdgeId,
        demand: &BTreeMap<EdgeId, f64>,
    ) -> f64 {
        let mut seen_nodes = BTreeSet::from([start]);
        let mut seen_edges = BTreeSet::from([skip]);
        let mut frontier = VecDeque::from([start]);

        while !frontier.is_empty() {
            let mut next = VecDeque::new();
            let mut best = 0.0_f64;
            for node in frontier {
                for (edge, other) in self.neighbors(node) {
                    if !seen_edges.insert(edge) {
                        continue;
                    }
                    let q = demand.get(&edge).copied().unwrap_or(0.0);
                    best = best.max(q);
                    if seen_nodes.insert(other) {
                        next.push_back(other);
                    }
                }
            }
            if best > 0.0 {
                return best;
            }
            frontier = next;
        }
        0.0
    }
}
