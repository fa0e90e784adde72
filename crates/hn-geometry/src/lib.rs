//! hn-geometry: geometric helpers used to derive network topology from
//! raw coordinates.
//!
//! Provides:
//! - `Line`: segment/line queries (closest approach, distance, containment)
//! - `Extents`: axis-aligned bounds of a point set
//!
//! # Example
//!
//! ```
//! use hn_geometry::{Line, Point3, DEFAULT_TOLERANCE};
//!
//! let a = Line::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 0.0));
//! let b = Line::new(Point3::new(0.0, 10.0, 0.0), Point3::new(10.0, 0.0, 0.0));
//! let p = a.intersection(&b).unwrap();
//! assert!(a.contains_point(&p, DEFAULT_TOLERANCE));
//! assert!(b.contains_point(&p, DEFAULT_TOLERANCE));
//! ```

pub mod extents;
pub mod line;

pub use extents::Extents;
pub use line::{DEFAULT_TOLERANCE, Line};

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
