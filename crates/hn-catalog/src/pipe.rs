//! Pipe catalog entries and lookup.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use hn_core::units::{Conductivity, Length};
use hn_core::PipeId;

use crate::error::{CatalogError, CatalogResult};

/// Thermal conductivity of steel [W/(m·K)], used when an entry gives none.
pub const STEEL_CONDUCTIVITY: Conductivity = 50.0;

/// Immutable catalog record for one pipe dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeCatalogEntry {
    pub id: PipeId,
    pub name: String,
    pub outside_diameter: Length,
    pub wall_thickness: Length,
    /// Absolute surface roughness.
    pub roughness: Length,
    pub insulation_thickness: Length,
    pub insulation_conductivity: Conductivity,
    pub wall_conductivity: Conductivity,
}

impl PipeCatalogEntry {
    /// Uninsulated steel pipe.
    pub fn new(
        id: PipeId,
        name: impl Into<String>,
        outside_diameter: Length,
        wall_thickness: Length,
        roughness: Length,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            outside_diameter,
            wall_thickness,
            roughness,
            insulation_thickness: Length::default(),
            insulation_conductivity: 0.0,
            wall_conductivity: STEEL_CONDUCTIVITY,
        }
    }

    pub fn with_insulation(mut self, thickness: Length, conductivity: Conductivity) -> Self {
        self.insulation_thickness = thickness;
        self.insulation_conductivity = conductivity;
        self
    }

    pub fn with_wall_conductivity(mut self, conductivity: Conductivity) -> Self {
        self.wall_conductivity = conductivity;
        self
    }

    pub fn inside_diameter(&self) -> Length {
        self.outside_diameter - self.wall_thickness * 2.0
    }

    pub fn has_insulation(&self) -> bool {
        self.insulation_thickness.value > 0.0
    }

    /// Heat transfer coefficient per metre of pipe [W/(m·K)] through wall and
    /// insulation, from the series resistance of the two cylindrical shells.
    pub fn u_value(&self) -> f64 {
        let d_in = self.inside_diameter().value;
        let d_out = self.outside_diameter.value;
        let mut resistance = (d_out / d_in).ln() / (2.0 * PI * self.wall_conductivity);
        if self.has_insulation() {
            let d_ins = d_out + 2.0 * self.insulation_thickness.value;
            resistance += (d_ins / d_out).ln() / (2.0 * PI * self.insulation_conductivity);
        }
        1.0 / resistance
    }

    pub fn validate(&self) -> CatalogResult<()> {
        let invalid = |what| CatalogError::InvalidPipe { pipe: self.id, what };
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !positive(self.outside_diameter.value) {
            return Err(invalid("outside diameter"));
        }
        if !positive(self.wall_thickness.value) {
            return Err(invalid("wall thickness"));
        }
        if !positive(self.inside_diameter().value) {
            return Err(invalid("inside diameter"));
        }
        if !non_negative(self.roughness.value) {
            return Err(invalid("roughness"));
        }
        if !positive(self.wall_conductivity) {
            return Err(invalid("wall conductivity"));
        }
        if !non_negative(self.insulation_thickness.value) {
            return Err(invalid("insulation thickness"));
        }
        if self.has_insulation() && !positive(self.insulation_conductivity) {
            return Err(invalid("insulation conductivity"));
        }
        Ok(())
    }
}

/// Read-only pipe lookup table keyed by catalog id.
#[derive(Debug, Clone, Default)]
pub struct PipeCatalog {
    entries: BTreeMap<PipeId, PipeCatalogEntry>,
}

impl PipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from validated entries; duplicate ids are rejected.
    pub fn from_entries(entries: impl IntoIterator<Item = PipeCatalogEntry>) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, entry: PipeCatalogEntry) -> CatalogResult<()> {
        entry.validate()?;
        if self.entries.contains_key(&entry.id) {
            return Err(CatalogError::DuplicatePipe { pipe: entry.id });
        }
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    pub fn get(&self, id: PipeId) -> CatalogResult<&PipeCatalogEntry> {
        self.entries
            .get(&id)
            .ok_or(CatalogError::UnknownPipe { pipe: id })
    }

    pub fn contains(&self, id: PipeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PipeCatalogEntry> {
        self.entries.values()
    }

    /// Catalog restricted to `ids`; an unknown id is an error.
    pub fn subset(&self, ids: &[PipeId]) -> CatalogResult<Self> {
        let mut entries = BTreeMap::new();
        for &id in ids {
            entries.insert(id, self.get(id)?.clone());
        }
        Ok(Self { entries })
    }

    /// Entries ordered by inside diameter, ties broken by id.
    pub fn by_inside_diameter(&self) -> Vec<&PipeCatalogEntry> {
        let mut sorted: Vec<_> = self.entries.values().collect();
        sorted.sort_by(|a, b| {
            a.inside_diameter()
                .value
                .total_cmp(&b.inside_diameter().value)
                .then(a.id.cmp(&b.id))
        });
        sorted
    }
}
