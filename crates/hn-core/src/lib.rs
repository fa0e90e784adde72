//! hn-core: shared foundation for heatnet.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float checks)
//! - ids (typed identifiers for nodes, edges and catalog pipes)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{HnError, HnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
