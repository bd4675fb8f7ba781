//! Shared test fixtures for the impact engine.
//!
//! The maturation fixture is the single-malt regression case used throughout the
//! test suite: five new 200 L American oak barrels, 12 years in a temperate
//! warehouse, bottled at 700 ml.

#![allow(clippy::unwrap_used)]

use crate::models::{
    BarrelCondition, BarrelSpec, ClimateZone, EnergySource, FacilityEmissionsSnapshot,
    ImpactFactors, Material, MaterialCategory, MaturationProfile, PackagingCategory,
    ProvenanceTier,
};
use chrono::NaiveDate;

/// Asserts `actual` is within `tolerance` of `expected`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

/// The single-malt regression profile.
///
/// # Defaults
/// * 5 new 200 L American oak barrels, first fill
/// * temperate zone (2 % per year), 12 years
/// * 63 % ABV
/// * grid electricity, 15 kWh per barrel per year
pub fn fixture_profile() -> MaturationProfile {
    let barrel = BarrelSpec {
        wood: "American oak".to_string(),
        size_litres: 200.0,
        condition: BarrelCondition::New,
        fill_number: 1,
    };
    let mut profile = MaturationProfile::new(
        barrel,
        5,
        ClimateZone::Temperate,
        12.0,
        0.63,
        EnergySource::GridElectricity,
    );
    profile.annual_energy_kwh_per_barrel = Some(15.0);
    profile
}

/// Creates a material with climate-only factors.
pub fn test_material(
    name: &str,
    category: MaterialCategory,
    quantity: f64,
    unit: &str,
    climate: f64,
) -> Material {
    Material::new(
        name,
        category,
        quantity,
        unit,
        ImpactFactors::climate_only(climate),
        ProvenanceTier::Supplier,
    )
}

/// Two ingredients and a glass bottle for one 700 ml product.
///
/// # Provenance
/// * grain: primary
/// * yeast: database-modelled
/// * bottle: supplier, EPR code `glass`, 500 g
pub fn regular_materials() -> [Material; 3] {
    let grain = Material::new(
        "Malted barley",
        MaterialCategory::Ingredient,
        1.2,
        "kg",
        ImpactFactors {
            climate: 0.5,
            water: 0.2,
            land: 1.5,
            waste: 0.01,
            ozone_formation: 0.0,
        },
        ProvenanceTier::Primary,
    );
    let yeast = Material::new(
        "Distillers yeast",
        MaterialCategory::Ingredient,
        10.0,
        "g",
        ImpactFactors::climate_only(1.8),
        ProvenanceTier::DatabaseModelled,
    );
    let bottle = Material::new(
        "Flint bottle 70cl",
        MaterialCategory::Packaging,
        500.0,
        "g",
        ImpactFactors {
            climate: 1.1,
            water: 0.005,
            land: 0.0,
            waste: 0.05,
            ozone_formation: 0.0,
        },
        ProvenanceTier::Supplier,
    )
    .with_packaging(PackagingCategory::Container, "glass");
    [grain, yeast, bottle]
}

/// Creates a snapshot recorded at 09:00 on `recorded`, covering the previous
/// calendar year.
///
/// # Defaults
/// * `facility_name`: "Glen Test"
pub fn test_snapshot(
    facility_id: &str,
    total_co2e: f64,
    payload: serde_json::Value,
    recorded: (i32, u32, u32),
) -> FacilityEmissionsSnapshot {
    let (year, month, day) = recorded;
    FacilityEmissionsSnapshot {
        facility_id: facility_id.to_string(),
        facility_name: "Glen Test".to_string(),
        total_co2e,
        payload,
        period_start: NaiveDate::from_ymd_opt(year - 1, 1, 1).unwrap(),
        period_end: NaiveDate::from_ymd_opt(year - 1, 12, 31).unwrap(),
        recorded_at: NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    }
}
