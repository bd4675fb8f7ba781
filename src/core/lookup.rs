//! Data-fetch collaborators injected into the engine.
//!
//! The calculators never perform I/O. Fetching impact factors and facility
//! snapshots is the caller's job, expressed through two single-method traits that
//! are trivial to fake in tests. In-memory implementations are provided for maps
//! and slices.

use crate::{
    errors::{Error, Result},
    models::{
        FacilityEmissionsSnapshot, ImpactFactors, Material, MaterialCategory, PackagingCategory,
        ProvenanceTier,
    },
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolves impact factors for a material by name.
pub trait FactorLookup {
    /// Factors for `name` in `category`, or `None` if the source has no entry.
    ///
    /// # Errors
    /// Implementations return an error only when the source itself fails.
    fn factors_for(&self, name: &str, category: MaterialCategory) -> Result<Option<ImpactFactors>>;
}

/// Fetches the authoritative emissions snapshot for a facility.
pub trait SnapshotLookup {
    /// The most recent snapshot for `facility_id`, or `None` if nothing is recorded.
    ///
    /// # Errors
    /// Implementations return an error only when the source itself fails.
    fn latest_snapshot(&self, facility_id: &str) -> Result<Option<FacilityEmissionsSnapshot>>;
}

impl FactorLookup for HashMap<String, ImpactFactors> {
    fn factors_for(&self, name: &str, _category: MaterialCategory) -> Result<Option<ImpactFactors>> {
        Ok(self.get(name).copied())
    }
}

impl SnapshotLookup for [FacilityEmissionsSnapshot] {
    fn latest_snapshot(&self, facility_id: &str) -> Result<Option<FacilityEmissionsSnapshot>> {
        Ok(self
            .iter()
            .filter(|snapshot| snapshot.facility_id == facility_id)
            .max_by_key(|snapshot| snapshot.recorded_at)
            .cloned())
    }
}

impl SnapshotLookup for Vec<FacilityEmissionsSnapshot> {
    fn latest_snapshot(&self, facility_id: &str) -> Result<Option<FacilityEmissionsSnapshot>> {
        self.as_slice().latest_snapshot(facility_id)
    }
}

/// A bill-of-materials line before factors are resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    /// Material name, used as the factor key
    pub name: String,
    /// Routing category
    pub category: MaterialCategory,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Declared unit
    pub unit: String,
    /// Provenance of the factor source
    pub provenance: ProvenanceTier,
    /// Packaging sub-category
    #[serde(default)]
    pub packaging_category: Option<PackagingCategory>,
    /// EPR material code
    #[serde(default)]
    pub epr_material_code: Option<String>,
}

/// Resolves factors for every BOM line.
///
/// # Errors
/// Returns [`Error::MissingData`] naming the first line without factors, or
/// whatever error the lookup itself reports.
pub fn resolve_materials(lines: &[BomLine], lookup: &dyn FactorLookup) -> Result<Vec<Material>> {
    lines
        .iter()
        .map(|line| {
            let factors =
                lookup
                    .factors_for(&line.name, line.category)?
                    .ok_or_else(|| Error::MissingData {
                        what: format!("impact factors for '{}'", line.name),
                    })?;
            let mut material = Material::new(
                &line.name,
                line.category,
                line.quantity,
                &line.unit,
                factors,
                line.provenance,
            );
            material.packaging_category = line.packaging_category;
            material.epr_material_code.clone_from(&line.epr_material_code);
            Ok(material)
        })
        .collect()
}
