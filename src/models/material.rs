//! Material model - A single line item consumed or produced at one lifecycle stage.
//!
//! Materials carry per-unit impact factors that have already been resolved from a
//! factor source. Their impact is the normalized quantity times each factor.
//! Maturation synthetics are the exception to normalization: they are expressed
//! per bottle, so their quantity is used as-is.

use crate::{
    core::units::normalize_inferred,
    errors::{Error, Result, ensure_non_negative},
};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Name prefix marking materials injected by the maturation calculator
pub const MATURATION_MARKER: &str = "[Maturation]";

/// Unit used by per-bottle synthetic materials
pub const PER_BOTTLE_UNIT: &str = "unit";

/// What a material is, used to route it to a lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    /// Raw agricultural or processing input
    Ingredient,
    /// Packaging placed on market with the product
    Packaging,
    /// Line generated by the maturation calculator
    MaturationSynthetic,
}

/// Where a material's impact factors came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceTier {
    /// Measured by the reporting company
    Primary,
    /// Provided by a supplier
    Supplier,
    /// Modelled from a generic database
    DatabaseModelled,
}

impl ProvenanceTier {
    /// All tiers, highest confidence first.
    pub const ALL: [Self; 3] = [Self::Primary, Self::Supplier, Self::DatabaseModelled];
}

/// Sub-category for packaging lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackagingCategory {
    /// Bottle, can, pouch
    Container,
    /// Cork, cap, stopper
    Closure,
    /// Label or sleeve
    Label,
}

/// Per-unit impact factors for one material.
///
/// Units are per base unit (kg or L), or per bottle for maturation synthetics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactFactors {
    /// kg CO2e
    pub climate: f64,
    /// m3 water
    pub water: f64,
    /// m2a land use
    pub land: f64,
    /// kg waste
    pub waste: f64,
    /// kg NMVOC-eq photochemical ozone formation
    #[serde(default)]
    pub ozone_formation: f64,
}

impl ImpactFactors {
    /// Factors with only a climate value.
    #[must_use]
    pub const fn climate_only(climate: f64) -> Self {
        Self {
            climate,
            water: 0.0,
            land: 0.0,
            waste: 0.0,
            ozone_formation: 0.0,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure_non_negative("climate factor", self.climate)?;
        ensure_non_negative("water factor", self.water)?;
        ensure_non_negative("land factor", self.land)?;
        ensure_non_negative("waste factor", self.waste)?;
        ensure_non_negative("ozone formation factor", self.ozone_formation)?;
        Ok(())
    }

    /// Multiplies every factor by a base quantity.
    #[must_use]
    pub fn times(&self, quantity: f64) -> ImpactTotals {
        ImpactTotals {
            climate: self.climate * quantity,
            water: self.water * quantity,
            land: self.land * quantity,
            waste: self.waste * quantity,
            ozone_formation: self.ozone_formation * quantity,
        }
    }
}

/// Summed impacts, each category accumulated independently
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactTotals {
    /// kg CO2e
    pub climate: f64,
    /// m3 water
    pub water: f64,
    /// m2a land use
    pub land: f64,
    /// kg waste
    pub waste: f64,
    /// kg NMVOC-eq
    pub ozone_formation: f64,
}

impl Add for ImpactTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            climate: self.climate + rhs.climate,
            water: self.water + rhs.water,
            land: self.land + rhs.land,
            waste: self.waste + rhs.waste,
            ozone_formation: self.ozone_formation + rhs.ozone_formation,
        }
    }
}

impl AddAssign for ImpactTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ImpactTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Free-form provenance attached to a material
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialMetadata {
    /// Display/processing priority (lower is more important)
    #[serde(default)]
    pub priority: Option<u8>,
    /// Data-quality tag, e.g. `Secondary_Estimated`
    #[serde(default)]
    pub data_quality_tag: Option<String>,
    /// Factor source, e.g. `secondary_modelled`
    #[serde(default)]
    pub source: Option<String>,
    /// Note recording how the quantity was derived
    #[serde(default)]
    pub source_reference: Option<String>,
    /// Human-readable methodology note
    #[serde(default)]
    pub methodology: Option<String>,
}

/// A declared quantity with its unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numeric value in `unit`
    pub value: f64,
    /// Declared unit (`g`, `kg`, `ml`, `L`)
    pub unit: String,
}

impl Quantity {
    /// Creates a quantity.
    #[must_use]
    pub fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }
}

/// One bill-of-materials line with resolved impact factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Routing category
    pub category: MaterialCategory,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Declared unit
    pub unit: String,
    /// Per-unit impact factors
    pub factors: ImpactFactors,
    /// Provenance of the factors
    pub provenance: ProvenanceTier,
    /// Packaging sub-category, packaging lines only
    #[serde(default)]
    pub packaging_category: Option<PackagingCategory>,
    /// EPR material code (e.g. `glass`), packaging lines only
    #[serde(default)]
    pub epr_material_code: Option<String>,
    /// Source and methodology notes
    #[serde(default)]
    pub metadata: MaterialMetadata,
}

impl Material {
    /// Creates a material without packaging details or metadata.
    #[must_use]
    pub fn new(
        name: &str,
        category: MaterialCategory,
        quantity: f64,
        unit: &str,
        factors: ImpactFactors,
        provenance: ProvenanceTier,
    ) -> Self {
        Self {
            name: name.to_string(),
            category,
            quantity,
            unit: unit.to_string(),
            factors,
            provenance,
            packaging_category: None,
            epr_material_code: None,
            metadata: MaterialMetadata::default(),
        }
    }

    /// Marks this material as packaging of the given sub-category and EPR material.
    #[must_use]
    pub fn with_packaging(mut self, category: PackagingCategory, epr_material_code: &str) -> Self {
        self.category = MaterialCategory::Packaging;
        self.packaging_category = Some(category);
        self.epr_material_code = Some(epr_material_code.to_string());
        self
    }

    /// True for lines routed to processing: calculator output or a marker-named line.
    #[must_use]
    pub fn is_maturation(&self) -> bool {
        self.category == MaterialCategory::MaturationSynthetic
            || self.name.starts_with(MATURATION_MARKER)
    }

    /// Quantity in the canonical base unit.
    ///
    /// # Errors
    /// Fails if the quantity is negative or the unit is not convertible.
    pub fn base_quantity(&self) -> Result<f64> {
        if self.category == MaterialCategory::MaturationSynthetic {
            if self.unit != PER_BOTTLE_UNIT {
                return Err(Error::UnsupportedUnit {
                    unit: self.unit.clone(),
                    expected: PER_BOTTLE_UNIT.to_string(),
                });
            }
            return ensure_non_negative("quantity", self.quantity);
        }
        normalize_inferred(self.quantity, &self.unit)
            .map(|(quantity, _)| quantity)
            .map_err(|e| match e {
                Error::InvalidQuantity { value, .. } => Error::InvalidQuantity {
                    field: format!("quantity of '{}'", self.name),
                    value,
                },
                other => other,
            })
    }

    /// Normalized quantity times each factor.
    ///
    /// # Errors
    /// Fails on any invariant violation: negative quantity or factor, or an
    /// unsupported unit.
    pub fn impacts(&self) -> Result<ImpactTotals> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Material name cannot be empty"));
        }
        self.factors.validate()?;
        Ok(self.factors.times(self.base_quantity()?))
    }
}
