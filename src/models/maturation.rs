//! Maturation profile - describes a barrel-aging step for one product.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Warehouse climate, each mapping to a default annual evaporation rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateZone {
    /// Cool, damp (e.g. Scotland)
    Temperate,
    /// Large seasonal swings (e.g. Kentucky)
    Continental,
    /// Hot year-round (e.g. Taiwan, India)
    Tropical,
}

impl fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperate => write!(f, "temperate"),
            Self::Continental => write!(f, "continental"),
            Self::Tropical => write!(f, "tropical"),
        }
    }
}

/// Whether the barrel is on its first use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrelCondition {
    /// Newly coopered
    New,
    /// Previously filled
    Reused,
}

/// Energy feeding the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergySource {
    /// National grid electricity
    GridElectricity,
    /// On-site natural gas
    NaturalGas,
    /// Certified renewable supply
    Renewable,
    /// Blend of the above
    Mixed,
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridElectricity => write!(f, "grid electricity"),
            Self::NaturalGas => write!(f, "natural gas"),
            Self::Renewable => write!(f, "renewable"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

const fn first_fill() -> u32 {
    1
}

const fn full_barrel() -> f64 {
    1.0
}

/// The cask used for maturation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrelSpec {
    /// Wood description for methodology notes, e.g. "American oak"
    pub wood: String,
    /// Nominal capacity in litres
    pub size_litres: f64,
    /// New or reused
    pub condition: BarrelCondition,
    /// 1 for a first fill, 2 for the second, ...
    #[serde(default = "first_fill")]
    pub fill_number: u32,
}

impl BarrelSpec {
    /// A reused barrel is one marked reused or on its second fill or later.
    #[must_use]
    pub const fn is_reused(&self) -> bool {
        matches!(self.condition, BarrelCondition::Reused) || self.fill_number >= 2
    }
}

impl fmt::Display for BarrelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let condition = if self.is_reused() { "reused" } else { "new" };
        write!(f, "{condition} {} {} L barrel", self.wood, self.size_litres)
    }
}

/// Maturation parameters for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturationProfile {
    /// Cask specification
    pub barrel: BarrelSpec,
    /// Number of barrels filled
    pub fill_count: u32,
    /// Fraction of each barrel's capacity actually filled
    #[serde(default = "full_barrel")]
    pub fill_fraction: f64,
    /// Warehouse climate
    pub climate_zone: ClimateZone,
    /// Explicit annual loss rate, overriding the climate-zone default
    #[serde(default)]
    pub annual_loss_rate: Option<f64>,
    /// Years in barrel, fractional allowed
    pub duration_years: f64,
    /// Alcohol by volume as a fraction (0.63 for 63 %)
    pub abv: f64,
    /// Warehouse energy source
    pub energy_source: EnergySource,
    /// Annual warehouse energy per barrel in kWh; configuration default when absent
    #[serde(default)]
    pub annual_energy_kwh_per_barrel: Option<f64>,
    /// Per-barrel embodied CO2e, overriding every default
    #[serde(default)]
    pub co2e_per_barrel_override: Option<f64>,
    /// Bottles produced, overriding the volume-derived count
    #[serde(default)]
    pub bottle_count_override: Option<u64>,
}

impl MaturationProfile {
    /// Creates a profile with a full fill and every optional field unset.
    #[must_use]
    pub const fn new(
        barrel: BarrelSpec,
        fill_count: u32,
        climate_zone: ClimateZone,
        duration_years: f64,
        abv: f64,
        energy_source: EnergySource,
    ) -> Self {
        Self {
            barrel,
            fill_count,
            fill_fraction: 1.0,
            climate_zone,
            annual_loss_rate: None,
            duration_years,
            abv,
            energy_source,
            annual_energy_kwh_per_barrel: None,
            co2e_per_barrel_override: None,
            bottle_count_override: None,
        }
    }
}
