//! Material impact aggregation - routes materials to lifecycle stages and sums them.
//!
//! Routing is decided by material category, with the maturation marker as the only
//! name-based rule: packaging goes to packaging, maturation lines go to processing,
//! everything else goes to raw materials. Every material lands in exactly one bucket.

use crate::{
    errors::Result,
    models::{ImpactTotals, LifecycleStage, Material, MaterialCategory, StageBreakdown},
};
use tracing::trace;

/// The three stage buckets and their combined totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageAggregation {
    /// Raw materials bucket
    pub raw_materials: StageBreakdown,
    /// Processing bucket
    pub processing: StageBreakdown,
    /// Packaging bucket
    pub packaging: StageBreakdown,
    /// raw materials + processing + packaging
    pub totals: ImpactTotals,
    /// Number of materials aggregated
    pub materials_count: usize,
}

/// The stage a material belongs to.
#[must_use]
pub fn route(material: &Material) -> LifecycleStage {
    if material.category == MaterialCategory::Packaging {
        LifecycleStage::Packaging
    } else if material.is_maturation() {
        LifecycleStage::Processing
    } else {
        LifecycleStage::RawMaterials
    }
}

/// Routes and sums a list of materials.
///
/// # Errors
/// Fails on the first material whose impacts cannot be computed (negative
/// quantity or factor, unsupported unit). Nothing is silently skipped.
pub fn aggregate(materials: &[Material]) -> Result<StageAggregation> {
    let mut aggregation = StageAggregation::default();

    for material in materials {
        let impacts = material.impacts()?;
        let stage = route(material);
        trace!(material = %material.name, %stage, climate = impacts.climate, "Routed material");

        let bucket = match stage {
            LifecycleStage::RawMaterials => &mut aggregation.raw_materials,
            LifecycleStage::Processing => &mut aggregation.processing,
            LifecycleStage::Packaging => &mut aggregation.packaging,
        };
        bucket.totals += impacts;
        bucket.materials.push(material.clone());
    }

    aggregation.totals = aggregation.raw_materials.totals
        + aggregation.processing.totals
        + aggregation.packaging.totals;
    aggregation.materials_count = materials.len();
    Ok(aggregation)
}
