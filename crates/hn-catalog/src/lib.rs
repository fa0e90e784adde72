//! hn-catalog: read-only reference data consumed by the sizing pass.
//!
//! Provides:
//! - Pipe catalog entries (dimensions, roughness, insulation) and lookup
//! - Fluid properties with a temperature-dependent viscosity curve
//! - Piecewise-linear curves (viscosity, simultaneity)
//!
//! # Example
//!
//! ```
//! use hn_catalog::{NetworkFluid, PipeCatalog, PipeCatalogEntry};
//! use hn_core::{PipeId, mm};
//!
//! let pipe = PipeCatalogEntry::new(PipeId::new(1), "DN100", mm(114.3), mm(3.6), mm(0.07))
//!     .with_insulation(mm(45.0), 0.027);
//! let catalog = PipeCatalog::from_entries([pipe]).unwrap();
//! assert!(catalog.get(PipeId::new(1)).unwrap().inside_diameter().value > 0.1);
//!
//! let water = NetworkFluid::water();
//! assert!(water.kinematic_viscosity_at(hn_core::deg_c(80.0)) < 1e-6);
//! ```

pub mod error;
pub mod fluid;
pub mod pipe;
pub mod spline;

pub use error::{CatalogError, CatalogResult};
pub use fluid::NetworkFluid;
pub use pipe::{PipeCatalog, PipeCatalogEntry};
pub use spline::LinearSpline;
