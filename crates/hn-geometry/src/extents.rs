//! Axis-aligned bounds.

use crate::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min: Point3,
    pub max: Point3,
}

impl Extents {
    /// Bounds of all points, or `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut ext = Self {
            min: first,
            max: first,
        };
        for p in iter {
            ext.include(p);
        }
        Some(ext)
    }

    pub fn include(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}
