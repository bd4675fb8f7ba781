//! Maturation impact calculation - barrel aging and warehousing.
//!
//! Given a [`MaturationProfile`] this module produces exactly two synthetic
//! materials, `[Maturation] Barrel` and `[Maturation] Warehouse Energy`, expressed
//! per bottle, together with the evaporation-adjusted output volume and bottle count.
//!
//! Evaporative loss (the angel's share) compounds annually:
//! `retention = (1 - rate)^years`, with fractional years allowed. The lost ethanol
//! feeds only the photochemical-ozone channel on the warehouse material; the
//! maturation climate total is barrel plus warehouse energy and nothing else.

use crate::{
    config::EngineDefaults,
    errors::{Error, Result, ensure_non_negative},
    models::{
        ImpactFactors, MATURATION_MARKER, Material, MaterialCategory, MaterialMetadata,
        MaturationProfile, PER_BOTTLE_UNIT, ProvenanceTier,
    },
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Processing priority given to maturation synthetics
pub const MATURATION_PRIORITY: u8 = 3;
/// Data-quality tag given to maturation synthetics
pub const MATURATION_DATA_QUALITY_TAG: &str = "Secondary_Estimated";
/// Factor source given to maturation synthetics
pub const MATURATION_SOURCE: &str = "secondary_modelled";

/// Name of the barrel synthetic material
pub fn barrel_material_name() -> String {
    format!("{MATURATION_MARKER} Barrel")
}

/// Name of the warehouse energy synthetic material
pub fn warehouse_material_name() -> String {
    format!("{MATURATION_MARKER} Warehouse Energy")
}

/// True for a line this calculator produced, as opposed to a caller's line that
/// merely carries the maturation marker.
#[must_use]
pub fn is_calculated_synthetic(material: &Material) -> bool {
    material.category == MaterialCategory::MaturationSynthetic
        || material.name == barrel_material_name()
        || material.name == warehouse_material_name()
}

/// Fraction of the fill remaining after `years` at `annual_loss_rate`.
#[must_use]
pub fn retention(annual_loss_rate: f64, years: f64) -> f64 {
    (1.0 - annual_loss_rate).powf(years)
}

/// Everything the maturation step produces for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturationOutcome {
    /// Litres filled into barrels
    pub fill_volume_litres: f64,
    /// Annual loss rate that was applied
    pub annual_loss_rate: f64,
    /// Fraction of the fill remaining at the end
    pub retention: f64,
    /// Litres remaining after evaporation
    pub output_volume_litres: f64,
    /// Litres lost to evaporation
    pub volume_lost_litres: f64,
    /// Bottles the impacts are spread over
    pub bottle_count: u64,
    /// True if the bottle count came from the profile rather than the volume
    pub bottle_count_overridden: bool,
    /// Embodied carbon of every barrel filled, kg CO2e
    pub barrel_co2e_total: f64,
    /// Warehouse energy over the full duration, kg CO2e
    pub warehouse_co2e_total: f64,
    /// kg of ethanol evaporated
    pub ethanol_lost_kg: f64,
    /// kg NMVOC-eq from the evaporated ethanol
    pub voc_total: f64,
    /// Per-bottle barrel material
    pub barrel_material: Material,
    /// Per-bottle warehouse material, carrying the VOC impact
    pub warehouse_material: Material,
}

impl MaturationOutcome {
    /// Barrel plus warehouse energy; evaporative loss is not part of it.
    #[must_use]
    pub fn total_co2e(&self) -> f64 {
        self.barrel_co2e_total + self.warehouse_co2e_total
    }

    /// Barrel kg CO2e per bottle
    #[must_use]
    pub const fn barrel_co2e_per_bottle(&self) -> f64 {
        self.barrel_material.factors.climate
    }

    /// Warehouse kg CO2e per bottle
    #[must_use]
    pub const fn warehouse_co2e_per_bottle(&self) -> f64 {
        self.warehouse_material.factors.climate
    }

    /// Combined maturation kg CO2e per bottle
    #[must_use]
    pub fn co2e_per_bottle(&self) -> f64 {
        self.barrel_co2e_per_bottle() + self.warehouse_co2e_per_bottle()
    }

    /// kg NMVOC-eq per bottle
    #[must_use]
    pub const fn voc_per_bottle(&self) -> f64 {
        self.warehouse_material.factors.ozone_formation
    }

    /// Barrel kg CO2e per litre of output
    #[must_use]
    pub fn barrel_co2e_per_litre(&self) -> f64 {
        if self.output_volume_litres > 0.0 {
            self.barrel_co2e_total / self.output_volume_litres
        } else {
            0.0
        }
    }

    /// The two synthetic materials, barrel first.
    #[must_use]
    pub fn materials(&self) -> [Material; 2] {
        [self.barrel_material.clone(), self.warehouse_material.clone()]
    }
}

// Cast safety: bottle counts are far below 2^52, so u64 -> f64 is exact.
#[allow(clippy::cast_precision_loss)]
fn per_bottle(label: &str, total: f64, bottles: u64) -> Result<f64> {
    if bottles == 0 {
        if total == 0.0 {
            return Ok(0.0);
        }
        return Err(Error::validation(format!(
            "Maturation yields no whole bottles to carry {total:.3} kg of {label} impact"
        )));
    }
    Ok(total / bottles as f64)
}

// Relative slack on the bottle division, so an exact multiple such as 210 L of
// 700 ml bottles never floors to one bottle short.
const BOTTLE_FLOOR_TOLERANCE: f64 = 1e-12;

/// Whole bottles that can be filled from `volume_litres`.
// Cast safety: both inputs are finite and non-negative, so the floor fits in u64.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_bottles(volume_litres: f64, bottle_size_litres: f64) -> u64 {
    (volume_litres / bottle_size_litres * (1.0 + BOTTLE_FLOOR_TOLERANCE)).floor() as u64
}

/// Computes maturation impacts against a set of defaults
#[derive(Debug, Clone, Copy)]
pub struct MaturationCalculator<'a> {
    defaults: &'a EngineDefaults,
}

impl<'a> MaturationCalculator<'a> {
    /// Creates a calculator bound to a default set.
    #[must_use]
    pub const fn new(defaults: &'a EngineDefaults) -> Self {
        Self { defaults }
    }

    /// The profile's explicit loss rate, or its climate zone's default.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the rate is outside `[0, max_annual_loss_rate]`
    /// or not below 1.
    pub fn annual_loss_rate(&self, profile: &MaturationProfile) -> Result<f64> {
        let maturation = &self.defaults.maturation;
        let rate = profile
            .annual_loss_rate
            .unwrap_or_else(|| maturation.evaporation.rate_for(profile.climate_zone));
        if !rate.is_finite()
            || rate < 0.0
            || rate >= 1.0
            || rate > maturation.max_annual_loss_rate
        {
            return Err(Error::validation(format!(
                "Annual loss rate {rate} must be between 0 and {}",
                maturation.max_annual_loss_rate
            )));
        }
        Ok(rate)
    }

    /// Embodied kg CO2e of one barrel.
    ///
    /// An explicit override wins; a reused barrel carries the reconditioning-only
    /// factor regardless of size; a new barrel uses the size table.
    ///
    /// # Errors
    /// Fails on a negative override or when no barrel sizes are configured.
    pub fn co2e_per_barrel(&self, profile: &MaturationProfile) -> Result<f64> {
        if let Some(value) = profile.co2e_per_barrel_override {
            return ensure_non_negative("co2e_per_barrel_override", value);
        }
        let maturation = &self.defaults.maturation;
        if profile.barrel.is_reused() {
            return Ok(maturation.reused_barrel_co2e_kg);
        }
        maturation
            .new_barrel_co2e_for(profile.barrel.size_litres)
            .ok_or_else(|| Error::MissingData {
                what: format!(
                    "new barrel CO2e default for {} L barrels",
                    profile.barrel.size_litres
                ),
            })
    }

    fn validate(profile: &MaturationProfile) -> Result<()> {
        let size = profile.barrel.size_litres;
        if !size.is_finite() || size <= 0.0 {
            return Err(Error::InvalidQuantity {
                field: "barrel size".to_string(),
                value: size,
            });
        }
        if !(profile.fill_fraction > 0.0 && profile.fill_fraction <= 1.0) {
            return Err(Error::validation(format!(
                "Fill fraction must be in (0, 1], got {}",
                profile.fill_fraction
            )));
        }
        ensure_non_negative("duration_years", profile.duration_years)?;
        if !(0.0..=1.0).contains(&profile.abv) {
            return Err(Error::validation(format!(
                "ABV must be a fraction between 0 and 1, got {}",
                profile.abv
            )));
        }
        if let Some(energy) = profile.annual_energy_kwh_per_barrel {
            ensure_non_negative("annual_energy_kwh_per_barrel", energy)?;
        }
        Ok(())
    }

    /// Computes the maturation step.
    ///
    /// Returns `Ok(None)` when there is no profile: nothing is injected.
    ///
    /// # Arguments
    /// * `profile` - The product's maturation profile, if it has one
    /// * `bottle_size_litres` - Declared bottle size; the configured default when `None`
    ///
    /// # Errors
    /// Returns a validation error for out-of-range profile values, a non-positive
    /// bottle size, or impacts that cannot be spread over zero bottles.
    pub fn calculate(
        &self,
        profile: Option<&MaturationProfile>,
        bottle_size_litres: Option<f64>,
    ) -> Result<Option<MaturationOutcome>> {
        let Some(profile) = profile else {
            return Ok(None);
        };
        Self::validate(profile)?;
        let maturation = &self.defaults.maturation;

        let bottle_size = bottle_size_litres.unwrap_or(maturation.default_bottle_size_litres);
        if !bottle_size.is_finite() || bottle_size <= 0.0 {
            return Err(Error::InvalidQuantity {
                field: "bottle size".to_string(),
                value: bottle_size,
            });
        }

        let barrels = f64::from(profile.fill_count);
        let years = profile.duration_years;

        // Volume and evaporation
        let fill_volume = profile.barrel.size_litres * profile.fill_fraction * barrels;
        let annual_loss_rate = self.annual_loss_rate(profile)?;
        let retention = retention(annual_loss_rate, years);
        let output_volume = fill_volume * retention;
        let volume_lost = fill_volume * (1.0 - retention);

        let (bottle_count, bottle_count_overridden) = match profile.bottle_count_override {
            Some(count) => (count, true),
            None => (whole_bottles(output_volume, bottle_size), false),
        };

        // Barrel and warehouse carbon
        let barrel_co2e_total = self.co2e_per_barrel(profile)? * barrels;
        let annual_kwh = profile
            .annual_energy_kwh_per_barrel
            .unwrap_or(maturation.default_annual_energy_kwh_per_barrel);
        let warehouse_co2e_total = annual_kwh
            * barrels
            * years
            * self.defaults.grid_factors.factor_for(profile.energy_source);

        // Angel's share ethanol, reported as photochemical ozone formation only
        let ethanol_lost_kg = volume_lost * profile.abv * maturation.ethanol_density_kg_per_litre;
        let voc_total = ethanol_lost_kg * maturation.ethanol_to_nmvoc_factor;

        let barrel_per_bottle = per_bottle("barrel", barrel_co2e_total, bottle_count)?;
        let warehouse_per_bottle = per_bottle("warehouse", warehouse_co2e_total, bottle_count)?;
        let voc_per_bottle = per_bottle("VOC", voc_total, bottle_count)?;

        debug!(
            fill_volume,
            retention,
            output_volume,
            bottle_count,
            bottle_count_overridden,
            barrel_co2e_total,
            warehouse_co2e_total,
            voc_total,
            "Computed maturation impacts"
        );

        let basis = if bottle_count_overridden {
            "bottle count overridden by user"
        } else {
            "bottle count derived from output volume"
        };
        let methodology = format!(
            "{} x{}, {} years maturation in a {} climate zone ({:.1}% annual loss), warehouse on {}",
            profile.barrel,
            profile.fill_count,
            years,
            profile.climate_zone,
            annual_loss_rate * 100.0,
            profile.energy_source,
        );

        let barrel_material = synthetic_material(
            barrel_material_name(),
            ImpactFactors::climate_only(barrel_per_bottle),
            format!(
                "Total {barrel_co2e_total:.3} kg CO2e across {bottle_count} bottles ({basis})"
            ),
            methodology.clone(),
        );
        let warehouse_material = synthetic_material(
            warehouse_material_name(),
            ImpactFactors {
                ozone_formation: voc_per_bottle,
                ..ImpactFactors::climate_only(warehouse_per_bottle)
            },
            format!(
                "Total {warehouse_co2e_total:.3} kg CO2e and {voc_total:.3} kg NMVOC-eq across {bottle_count} bottles ({basis})"
            ),
            methodology,
        );

        Ok(Some(MaturationOutcome {
            fill_volume_litres: fill_volume,
            annual_loss_rate,
            retention,
            output_volume_litres: output_volume,
            volume_lost_litres: volume_lost,
            bottle_count,
            bottle_count_overridden,
            barrel_co2e_total,
            warehouse_co2e_total,
            ethanol_lost_kg,
            voc_total,
            barrel_material,
            warehouse_material,
        }))
    }
}

fn synthetic_material(
    name: String,
    factors: ImpactFactors,
    source_reference: String,
    methodology: String,
) -> Material {
    Material {
        metadata: MaterialMetadata {
            priority: Some(MATURATION_PRIORITY),
            data_quality_tag: Some(MATURATION_DATA_QUALITY_TAG.to_string()),
            source: Some(MATURATION_SOURCE.to_string()),
            source_reference: Some(source_reference),
            methodology: Some(methodology),
        },
        ..Material::new(
            &name,
            MaterialCategory::MaturationSynthetic,
            1.0,
            PER_BOTTLE_UNIT,
            factors,
            ProvenanceTier::DatabaseModelled,
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::models::{BarrelCondition, ClimateZone, EnergySource};
    use crate::test_utils::*;

    fn calculate(profile: &MaturationProfile, bottle: Option<f64>) -> Result<MaturationOutcome> {
        let defaults = EngineDefaults::default();
        MaturationCalculator::new(&defaults)
            .calculate(Some(profile), bottle)?
            .ok_or_else(|| Error::validation("expected an outcome"))
    }

    #[test]
    fn test_no_profile_injects_nothing() -> Result<()> {
        let defaults = EngineDefaults::default();
        let outcome = MaturationCalculator::new(&defaults).calculate(None, Some(0.7))?;
        assert!(outcome.is_none());
        Ok(())
    }

    #[test]
    fn test_retention_closed_form() {
        assert_close(retention(0.02, 12.0), 0.7847, 1e-4);
        assert_close(retention(0.05, 12.0), 0.5404, 1e-4);
        assert_close(retention(0.12, 3.0), 0.6815, 1e-4);
        // Six months uses real exponentiation, not a rounded year
        assert_close(retention(0.12, 0.5), 0.88_f64.sqrt(), 1e-12);
        assert_eq!(retention(0.05, 0.0), 1.0);
    }

    #[test]
    fn test_regression_fixture_single_malt() -> Result<()> {
        let outcome = calculate(&fixture_profile(), Some(0.7))?;

        assert_close(outcome.fill_volume_litres, 1000.0, 1e-9);
        assert_close(outcome.output_volume_litres, 784.7, 0.05);
        assert_eq!(outcome.bottle_count, 1121);
        assert!(!outcome.bottle_count_overridden);
        assert_close(outcome.barrel_co2e_per_bottle(), 0.178, 0.0005);
        assert_close(outcome.warehouse_co2e_per_bottle(), 0.166, 0.0005);
        assert_close(outcome.co2e_per_bottle(), 0.344, 0.001);
        assert_close(outcome.voc_per_bottle(), 0.038, 0.0005);
        Ok(())
    }

    #[test]
    fn test_bottle_count_override_is_not_recomputed() -> Result<()> {
        let mut profile = fixture_profile();
        profile.fill_count = 1;
        profile.bottle_count_override = Some(287);

        let outcome = calculate(&profile, Some(0.7))?;
        assert_eq!(outcome.bottle_count, 287);
        assert!(outcome.bottle_count_overridden);
        assert_close(outcome.barrel_co2e_per_bottle(), 40.0 / 287.0, 1e-12);
        assert_close(outcome.barrel_co2e_per_bottle(), 0.139, 0.0005);
        assert!(
            outcome
                .barrel_material
                .metadata
                .source_reference
                .as_deref()
                .unwrap()
                .contains("overridden by user")
        );
        Ok(())
    }

    #[test]
    fn test_scaling_one_vs_thousand_barrels() -> Result<()> {
        let mut one = fixture_profile();
        one.fill_count = 1;
        let mut thousand = fixture_profile();
        thousand.fill_count = 1000;

        let small = calculate(&one, Some(0.7))?;
        let large = calculate(&thousand, Some(0.7))?;

        assert_close(large.barrel_co2e_total, small.barrel_co2e_total * 1000.0, 1e-9);
        assert_close(
            large.warehouse_co2e_total,
            small.warehouse_co2e_total * 1000.0,
            1e-6,
        );
        assert_close(large.output_volume_litres, small.output_volume_litres * 1000.0, 1e-6);

        // Proportional bottle counts keep per-bottle figures constant
        let mut one_fixed = one.clone();
        one_fixed.bottle_count_override = Some(224);
        let mut thousand_fixed = thousand.clone();
        thousand_fixed.bottle_count_override = Some(224_000);
        let small = calculate(&one_fixed, Some(0.7))?;
        let large = calculate(&thousand_fixed, Some(0.7))?;
        assert_close(large.co2e_per_bottle(), small.co2e_per_bottle(), 1e-12);
        assert_close(large.voc_per_bottle(), small.voc_per_bottle(), 1e-12);
        Ok(())
    }

    #[test]
    fn test_doubling_barrels_doubles_totals() -> Result<()> {
        let mut double = fixture_profile();
        double.fill_count = 10;
        let base = calculate(&fixture_profile(), Some(0.7))?;
        let doubled = calculate(&double, Some(0.7))?;
        assert_close(doubled.barrel_co2e_total, base.barrel_co2e_total * 2.0, 1e-9);
        assert_close(doubled.warehouse_co2e_total, base.warehouse_co2e_total * 2.0, 1e-9);
        Ok(())
    }

    #[test]
    fn test_reused_barrels_carry_reconditioning_only() -> Result<()> {
        let new = calculate(&fixture_profile(), Some(0.7))?;

        let mut reused_profile = fixture_profile();
        reused_profile.barrel.condition = BarrelCondition::Reused;
        let reused = calculate(&reused_profile, Some(0.7))?;

        assert_close(new.barrel_co2e_total, 200.0, 1e-9);
        assert_close(reused.barrel_co2e_total, 2.5, 1e-9);
        assert_close(reused.barrel_co2e_total / new.barrel_co2e_total, 0.0125, 1e-9);

        // Second fill of a barrel marked new counts as reused
        let mut second_fill = fixture_profile();
        second_fill.barrel.fill_number = 2;
        assert_close(calculate(&second_fill, Some(0.7))?.barrel_co2e_total, 2.5, 1e-9);
        Ok(())
    }

    #[test]
    fn test_barrel_defaults_by_size_and_override() -> Result<()> {
        let defaults = EngineDefaults::default();
        let calculator = MaturationCalculator::new(&defaults);

        let mut profile = fixture_profile();
        profile.barrel.size_litres = 225.0;
        assert_eq!(calculator.co2e_per_barrel(&profile)?, 55.0);
        profile.barrel.size_litres = 500.0;
        assert_eq!(calculator.co2e_per_barrel(&profile)?, 65.0);

        profile.co2e_per_barrel_override = Some(72.5);
        assert_eq!(calculator.co2e_per_barrel(&profile)?, 72.5);
        profile.barrel.condition = BarrelCondition::Reused;
        assert_eq!(calculator.co2e_per_barrel(&profile)?, 72.5);

        profile.co2e_per_barrel_override = Some(-1.0);
        assert!(calculator.co2e_per_barrel(&profile).is_err());
        Ok(())
    }

    #[test]
    fn test_climate_total_excludes_angels_share() -> Result<()> {
        let outcome = calculate(&fixture_profile(), Some(0.7))?;
        assert!(outcome.volume_lost_litres > 0.0);
        assert_eq!(
            outcome.total_co2e(),
            outcome.barrel_co2e_total + outcome.warehouse_co2e_total
        );
        // VOC lives on the warehouse line only
        assert_eq!(outcome.barrel_material.factors.ozone_formation, 0.0);
        assert!(outcome.voc_total > 0.0);
        assert!(outcome.voc_per_bottle() > 0.0);
        Ok(())
    }

    #[test]
    fn test_voc_zero_without_loss_or_alcohol() -> Result<()> {
        let mut no_loss = fixture_profile();
        no_loss.annual_loss_rate = Some(0.0);
        let outcome = calculate(&no_loss, Some(0.7))?;
        assert_eq!(outcome.volume_lost_litres, 0.0);
        assert_eq!(outcome.voc_total, 0.0);

        let mut no_alcohol = fixture_profile();
        no_alcohol.abv = 0.0;
        let outcome = calculate(&no_alcohol, Some(0.7))?;
        assert!(outcome.volume_lost_litres > 0.0);
        assert_eq!(outcome.voc_total, 0.0);
        Ok(())
    }

    #[test]
    fn test_zero_barrels_is_zero_not_error() -> Result<()> {
        let mut profile = fixture_profile();
        profile.fill_count = 0;
        let outcome = calculate(&profile, Some(0.7))?;
        assert_eq!(outcome.bottle_count, 0);
        assert_eq!(outcome.total_co2e(), 0.0);
        assert_eq!(outcome.co2e_per_bottle(), 0.0);
        assert_eq!(outcome.voc_per_bottle(), 0.0);
        Ok(())
    }

    #[test]
    fn test_zero_duration_has_no_warehouse_or_evaporation() -> Result<()> {
        let mut profile = fixture_profile();
        profile.duration_years = 0.0;
        let outcome = calculate(&profile, Some(0.7))?;
        assert_eq!(outcome.retention, 1.0);
        assert_eq!(outcome.warehouse_co2e_total, 0.0);
        assert_eq!(outcome.voc_total, 0.0);
        assert_eq!(outcome.bottle_count, 1428);
        Ok(())
    }

    #[test]
    fn test_half_filled_barrels_raise_per_litre_impact() -> Result<()> {
        let full = calculate(&fixture_profile(), Some(0.7))?;
        let mut half_profile = fixture_profile();
        half_profile.fill_fraction = 0.5;
        let half = calculate(&half_profile, Some(0.7))?;

        assert_close(half.output_volume_litres, full.output_volume_litres / 2.0, 1e-9);
        assert_close(half.barrel_co2e_total, full.barrel_co2e_total, 1e-9);
        assert_close(
            half.barrel_co2e_per_litre(),
            full.barrel_co2e_per_litre() * 2.0,
            1e-9,
        );
        Ok(())
    }

    #[test]
    fn test_energy_sources() -> Result<()> {
        let mut profile = fixture_profile();
        profile.energy_source = EnergySource::Renewable;
        assert_eq!(calculate(&profile, Some(0.7))?.warehouse_co2e_total, 0.0);

        profile.energy_source = EnergySource::NaturalGas;
        assert_close(
            calculate(&profile, Some(0.7))?.warehouse_co2e_total,
            15.0 * 5.0 * 12.0 * 0.183,
            1e-9,
        );

        profile.energy_source = EnergySource::GridElectricity;
        profile.annual_energy_kwh_per_barrel = Some(0.0);
        assert_eq!(calculate(&profile, Some(0.7))?.warehouse_co2e_total, 0.0);
        Ok(())
    }

    #[test]
    fn test_default_bottle_size_and_zone_rate() -> Result<()> {
        let mut profile = fixture_profile();
        profile.climate_zone = ClimateZone::Tropical;
        profile.duration_years = 3.0;
        let outcome = calculate(&profile, None)?;
        assert_close(outcome.retention, 0.6815, 1e-4);
        assert_eq!(outcome.annual_loss_rate, 0.12);
        // 1000 L * 0.681472 / 0.75 L
        assert_eq!(outcome.bottle_count, 908);
        Ok(())
    }

    #[test]
    fn test_synthetic_material_metadata() -> Result<()> {
        let outcome = calculate(&fixture_profile(), Some(0.7))?;
        let [barrel, warehouse] = outcome.materials();

        assert_eq!(barrel.name, "[Maturation] Barrel");
        assert_eq!(warehouse.name, "[Maturation] Warehouse Energy");
        for material in [&barrel, &warehouse] {
            assert_eq!(material.category, MaterialCategory::MaturationSynthetic);
            assert_eq!(material.quantity, 1.0);
            assert_eq!(material.unit, PER_BOTTLE_UNIT);
            assert_eq!(material.provenance, ProvenanceTier::DatabaseModelled);
            assert_eq!(material.metadata.priority, Some(3));
            assert_eq!(
                material.metadata.data_quality_tag.as_deref(),
                Some("Secondary_Estimated")
            );
            assert_eq!(material.metadata.source.as_deref(), Some("secondary_modelled"));
            let methodology = material.metadata.methodology.as_deref().unwrap();
            assert!(methodology.contains("American oak"));
            assert!(methodology.contains("12 years"));
            assert!(methodology.contains("temperate"));
        }
        let reference = barrel.metadata.source_reference.unwrap();
        assert!(reference.contains("1121 bottles"));
        assert!(reference.contains("200.000 kg CO2e"));
        assert!(reference.contains("derived from output volume"));
        Ok(())
    }

    #[test]
    fn test_exact_multiple_fills_every_bottle() -> Result<()> {
        let mut profile = fixture_profile();
        profile.fill_count = 1;
        profile.barrel.size_litres = 210.0;
        profile.duration_years = 0.0;

        let bottle = crate::core::units::normalize(
            700.0,
            "ml",
            crate::core::units::MeasureKind::Volume,
        )?;
        assert_eq!(calculate(&profile, Some(bottle))?.bottle_count, 300);
        assert_eq!(calculate(&profile, Some(0.35))?.bottle_count, 600);

        profile.fill_count = 3;
        profile.barrel.size_litres = 100.0;
        assert_eq!(calculate(&profile, Some(0.1))?.bottle_count, 3000);
        Ok(())
    }

    #[test]
    fn test_loss_rate_of_one_or_more_is_rejected_even_if_configured() {
        let mut defaults = EngineDefaults::default();
        defaults.maturation.max_annual_loss_rate = 1.5;
        let mut profile = fixture_profile();
        profile.annual_loss_rate = Some(1.2);
        profile.duration_years = 2.5;

        let result = MaturationCalculator::new(&defaults).calculate(Some(&profile), Some(0.7));
        assert!(matches!(result, Err(Error::Validation { .. })));

        profile.annual_loss_rate = Some(1.0);
        let result = MaturationCalculator::new(&defaults).calculate(Some(&profile), Some(0.7));
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_calculated_synthetics_are_told_apart_from_marker_lines() -> Result<()> {
        let outcome = calculate(&fixture_profile(), Some(0.7))?;
        for material in outcome.materials() {
            assert!(is_calculated_synthetic(&material));
        }
        let seasoning = test_material(
            "[Maturation] Sherry seasoning",
            MaterialCategory::Ingredient,
            2.0,
            "L",
            0.4,
        );
        assert!(seasoning.is_maturation());
        assert!(!is_calculated_synthetic(&seasoning));
        Ok(())
    }

    #[test]
    fn test_invalid_profiles_are_rejected() {
        let mut profile = fixture_profile();
        profile.annual_loss_rate = Some(0.3);
        assert!(matches!(
            calculate(&profile, Some(0.7)).unwrap_err(),
            Error::Validation { .. }
        ));

        let mut profile = fixture_profile();
        profile.duration_years = -1.0;
        assert!(matches!(
            calculate(&profile, Some(0.7)).unwrap_err(),
            Error::InvalidQuantity { .. }
        ));

        let mut profile = fixture_profile();
        profile.abv = 63.0;
        assert!(calculate(&profile, Some(0.7)).is_err());

        let mut profile = fixture_profile();
        profile.fill_fraction = 0.0;
        assert!(calculate(&profile, Some(0.7)).is_err());

        assert!(calculate(&fixture_profile(), Some(0.0)).is_err());
    }

    #[test]
    fn test_impacts_without_bottles_are_an_error() {
        let mut profile = fixture_profile();
        profile.bottle_count_override = Some(0);
        assert!(matches!(
            calculate(&profile, Some(0.7)).unwrap_err(),
            Error::Validation { message } if message.contains("no whole bottles")
        ));
    }
}
