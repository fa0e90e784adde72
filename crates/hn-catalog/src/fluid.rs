//! Heat-carrier fluid properties.

use hn_core::units::{Conductivity, Density, KinViscosity, SpecHeatCapacity, Temperature, to_deg_c};

use crate::error::{CatalogError, CatalogResult};
use crate::spline::LinearSpline;

/// Kinematic viscosity of liquid water [m²/s] over temperature [°C].
const WATER_VISCOSITY: [(f64, f64); 11] = [
    (0.0, 1.792e-6),
    (10.0, 1.307e-6),
    (20.0, 1.004e-6),
    (30.0, 0.801e-6),
    (40.0, 0.658e-6),
    (50.0, 0.553e-6),
    (60.0, 0.474e-6),
    (70.0, 0.413e-6),
    (80.0, 0.365e-6),
    (90.0, 0.326e-6),
    (100.0, 0.294e-6),
];

/// Constant-property fluid with a temperature-dependent viscosity curve.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkFluid {
    pub name: String,
    pub density: Density,
    pub specific_heat: SpecHeatCapacity,
    pub conductivity: Conductivity,
    /// Kinematic viscosity [m²/s] over temperature [°C].
    pub kinematic_viscosity: LinearSpline,
}

impl NetworkFluid {
    pub fn water() -> Self {
        Self {
            name: "Water".to_string(),
            density: hn_core::kg_per_m3(998.0),
            specific_heat: 4180.0,
            conductivity: 0.6,
            kinematic_viscosity: LinearSpline::from_pairs(&WATER_VISCOSITY)
                .expect("water viscosity table is well formed"),
        }
    }

    pub fn kinematic_viscosity_at(&self, t: Temperature) -> KinViscosity {
        self.kinematic_viscosity.value(to_deg_c(t))
    }

    pub fn validate(&self) -> CatalogResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.density.value) {
            return Err(CatalogError::InvalidFluid { what: "density" });
        }
        if !positive(self.specific_heat) {
            return Err(CatalogError::InvalidFluid {
                what: "specific heat",
            });
        }
        if !positive(self.conductivity) {
            return Err(CatalogError::InvalidFluid {
                what: "conductivity",
            });
        }
        if self.kinematic_viscosity.y().iter().any(|&v| !positive(v)) {
            return Err(CatalogError::InvalidFluid {
                what: "kinematic viscosity",
            });
        }
        Ok(())
    }
}
