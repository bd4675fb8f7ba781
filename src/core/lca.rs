//! Product LCA pipeline - maturation, aggregation and data quality in one pass.

use crate::{
    config::{EngineDefaults, QualityBands},
    core::{
        aggregation::aggregate,
        maturation::{MaturationCalculator, is_calculated_synthetic},
        quality::score_materials,
        units::{MeasureKind, normalize},
    },
    errors::Result,
    models::{AllocationResult, LcaResult, Material, MaturationProfile, Quantity},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything needed to recalculate one product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LcaInput {
    /// Bill of materials with resolved factors
    pub materials: Vec<Material>,
    /// Maturation profile, for matured products
    #[serde(default)]
    pub maturation: Option<MaturationProfile>,
    /// Declared bottle size; the configured default when absent
    #[serde(default)]
    pub bottle_size: Option<Quantity>,
    /// Facility share, computed separately by the allocation engine
    #[serde(default)]
    pub facility_allocation: Option<AllocationResult>,
}

/// Runs a full product recalculation
#[derive(Debug, Clone, Copy)]
pub struct LcaCalculator<'a> {
    defaults: &'a EngineDefaults,
    bands: &'a QualityBands,
}

impl<'a> LcaCalculator<'a> {
    /// Creates a calculator over the given defaults and quality bands.
    #[must_use]
    pub const fn new(defaults: &'a EngineDefaults, bands: &'a QualityBands) -> Self {
        Self { defaults, bands }
    }

    /// Calculates the LCA for one product.
    ///
    /// When a maturation profile is present, synthetics from an earlier calculation
    /// are replaced by freshly computed ones, so recalculating never double counts.
    /// Caller lines that only carry the maturation marker are kept.
    ///
    /// # Errors
    /// Propagates the first validation error from unit normalization, the
    /// maturation calculator or any material.
    pub fn calculate(&self, input: &LcaInput) -> Result<LcaResult> {
        let bottle_size_litres = input
            .bottle_size
            .as_ref()
            .map(|size| normalize(size.value, &size.unit, MeasureKind::Volume))
            .transpose()?;

        let maturation = MaturationCalculator::new(self.defaults)
            .calculate(input.maturation.as_ref(), bottle_size_litres)?;

        let materials: Vec<Material> = match &maturation {
            Some(outcome) => {
                let mut regular: Vec<Material> = input
                    .materials
                    .iter()
                    .filter(|material| !is_calculated_synthetic(material))
                    .cloned()
                    .collect();
                let replaced = input.materials.len() - regular.len();
                if replaced > 0 {
                    debug!(replaced, "Replacing stale maturation lines");
                }
                regular.extend(outcome.materials());
                regular
            }
            None => input.materials.clone(),
        };

        let aggregation = aggregate(&materials)?;
        let data_quality = self.bands.grade(&score_materials(&materials));

        info!(
            materials = aggregation.materials_count,
            climate = aggregation.totals.climate,
            quality = %data_quality.label,
            matured = maturation.is_some(),
            "Calculated product LCA"
        );

        Ok(LcaResult {
            totals: aggregation.totals,
            raw_materials: aggregation.raw_materials,
            processing: aggregation.processing,
            packaging: aggregation.packaging,
            materials_count: aggregation.materials_count,
            data_quality,
            maturation,
            facility_allocation: input.facility_allocation.clone(),
        })
    }
}
