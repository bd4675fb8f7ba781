//! LCA result - the aggregate output of a product recalculation.

use crate::{
    core::{maturation::MaturationOutcome, quality::DataQuality},
    models::{AllocationResult, ImpactTotals, Material},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle-stage bucket a material is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    /// Ingredients and other raw inputs
    RawMaterials,
    /// Processing, including maturation
    Processing,
    /// Packaging placed on market
    Packaging,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RawMaterials => write!(f, "raw materials"),
            Self::Processing => write!(f, "processing"),
            Self::Packaging => write!(f, "packaging"),
        }
    }
}

/// Materials routed to one stage and their summed impacts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageBreakdown {
    /// Materials in this stage
    pub materials: Vec<Material>,
    /// Sum of their impacts
    pub totals: ImpactTotals,
}

/// Result of one product LCA calculation.
///
/// A result is never mutated after it is returned; recalculation produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcaResult {
    /// Sum over all three stages
    pub totals: ImpactTotals,
    /// Raw materials bucket
    pub raw_materials: StageBreakdown,
    /// Processing bucket (includes maturation synthetics)
    pub processing: StageBreakdown,
    /// Packaging bucket
    pub packaging: StageBreakdown,
    /// Every material, synthetics included
    pub materials_count: usize,
    /// Provenance-weighted quality grade
    pub data_quality: DataQuality,
    /// Maturation figures, when the product is matured
    pub maturation: Option<MaturationOutcome>,
    /// Facility share, reported beside the stage totals
    pub facility_allocation: Option<AllocationResult>,
}

impl LcaResult {
    /// Climate total per unit including the allocated facility share.
    #[must_use]
    pub fn climate_including_facility(&self) -> f64 {
        self.totals.climate
            + self
                .facility_allocation
                .as_ref()
                .map_or(0.0, |allocation| allocation.co2e_per_unit)
    }

    /// Breakdown for one stage.
    #[must_use]
    pub const fn stage(&self, stage: LifecycleStage) -> &StageBreakdown {
        match stage {
            LifecycleStage::RawMaterials => &self.raw_materials,
            LifecycleStage::Processing => &self.processing,
            LifecycleStage::Packaging => &self.packaging,
        }
    }
}
