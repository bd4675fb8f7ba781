//! Versioned calculation defaults.
//!
//! Climate-zone evaporation rates, barrel embodied carbon, grid factors and the
//! physical constants used by the maturation calculator live in one structure that
//! is passed into the calculators. `EngineDefaults::default()` is the pinned
//! reference set the regression fixtures are written against; a `[defaults]` table
//! in `config.toml` overrides individual values.

use crate::{
    errors::{Error, Result},
    models::{ClimateZone, EnergySource},
};
use serde::{Deserialize, Serialize};

/// Version string of the built-in default set
pub const DEFAULTS_VERSION: &str = "2024.1";

/// Annual evaporative loss fraction per climate zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaporationRates {
    /// Temperate zone rate
    pub temperate: f64,
    /// Continental zone rate
    pub continental: f64,
    /// Tropical zone rate
    pub tropical: f64,
}

impl Default for EvaporationRates {
    fn default() -> Self {
        Self {
            temperate: 0.02,
            continental: 0.05,
            tropical: 0.12,
        }
    }
}

impl EvaporationRates {
    /// Default rate for a zone.
    #[must_use]
    pub const fn rate_for(&self, zone: ClimateZone) -> f64 {
        match zone {
            ClimateZone::Temperate => self.temperate,
            ClimateZone::Continental => self.continental,
            ClimateZone::Tropical => self.tropical,
        }
    }
}

/// Embodied carbon of one new barrel of a given size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrelEmission {
    /// Nominal size in litres
    pub size_litres: f64,
    /// kg CO2e per barrel
    pub co2e_kg: f64,
}

/// Grid emission factors, kg CO2e per kWh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridFactors {
    /// National grid electricity
    pub grid_electricity: f64,
    /// Natural gas
    pub natural_gas: f64,
    /// Renewable supply
    pub renewable: f64,
    /// Mixed supply
    pub mixed: f64,
}

impl Default for GridFactors {
    fn default() -> Self {
        Self {
            grid_electricity: 0.207,
            natural_gas: 0.183,
            renewable: 0.0,
            mixed: 0.120,
        }
    }
}

impl GridFactors {
    /// Factor for an energy source.
    #[must_use]
    pub const fn factor_for(&self, source: EnergySource) -> f64 {
        match source {
            EnergySource::GridElectricity => self.grid_electricity,
            EnergySource::NaturalGas => self.natural_gas,
            EnergySource::Renewable => self.renewable,
            EnergySource::Mixed => self.mixed,
        }
    }
}

/// Maturation-specific defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaturationDefaults {
    /// Default annual loss per climate zone
    pub evaporation: EvaporationRates,
    /// Upper bound on any annual loss rate, default or explicit
    pub max_annual_loss_rate: f64,
    /// New-barrel embodied carbon by size
    pub new_barrel_co2e: Vec<BarrelEmission>,
    /// Reconditioning-only carbon of a reused barrel, any size
    pub reused_barrel_co2e_kg: f64,
    /// Bottle size used when the product does not declare one
    pub default_bottle_size_litres: f64,
    /// Warehouse energy per barrel per year when the profile does not declare one
    pub default_annual_energy_kwh_per_barrel: f64,
    /// kg per litre of ethanol
    pub ethanol_density_kg_per_litre: f64,
    /// kg NMVOC-eq per kg of ethanol evaporated
    pub ethanol_to_nmvoc_factor: f64,
}

impl Default for MaturationDefaults {
    fn default() -> Self {
        Self {
            evaporation: EvaporationRates::default(),
            max_annual_loss_rate: 0.25,
            new_barrel_co2e: vec![
                BarrelEmission {
                    size_litres: 200.0,
                    co2e_kg: 40.0,
                },
                BarrelEmission {
                    size_litres: 225.0,
                    co2e_kg: 55.0,
                },
                BarrelEmission {
                    size_litres: 500.0,
                    co2e_kg: 65.0,
                },
            ],
            reused_barrel_co2e_kg: 0.5,
            default_bottle_size_litres: 0.75,
            default_annual_energy_kwh_per_barrel: 15.0,
            ethanol_density_kg_per_litre: 0.789,
            ethanol_to_nmvoc_factor: 0.4,
        }
    }
}

impl MaturationDefaults {
    /// Embodied carbon of a new barrel; sizes between table entries use the
    /// nearest tabulated size.
    #[must_use]
    pub fn new_barrel_co2e_for(&self, size_litres: f64) -> Option<f64> {
        self.new_barrel_co2e
            .iter()
            .min_by(|a, b| {
                let da = (a.size_litres - size_litres).abs();
                let db = (b.size_litres - size_litres).abs();
                da.total_cmp(&db)
            })
            .map(|entry| entry.co2e_kg)
    }
}

/// The complete versioned default set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineDefaults {
    /// Identifies which default set produced a result
    pub version: String,
    /// Maturation defaults
    pub maturation: MaturationDefaults,
    /// Warehouse energy factors
    pub grid_factors: GridFactors,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            version: DEFAULTS_VERSION.to_string(),
            maturation: MaturationDefaults::default(),
            grid_factors: GridFactors::default(),
        }
    }
}

fn check_fraction(name: &str, value: f64, upper: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 || value >= upper {
        return Err(Error::Config {
            message: format!("{name} must be in [0, {upper}), got {value}"),
        });
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Config {
            message: format!("{name} must be a non-negative number, got {value}"),
        });
    }
    Ok(())
}

impl EngineDefaults {
    /// Checks every value is in range.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first out-of-range value.
    pub fn validate(&self) -> Result<()> {
        let m = &self.maturation;
        check_fraction("max_annual_loss_rate", m.max_annual_loss_rate, 1.0)?;
        for (name, rate) in [
            ("evaporation.temperate", m.evaporation.temperate),
            ("evaporation.continental", m.evaporation.continental),
            ("evaporation.tropical", m.evaporation.tropical),
        ] {
            if rate > m.max_annual_loss_rate {
                return Err(Error::Config {
                    message: format!(
                        "{name} ({rate}) exceeds max_annual_loss_rate ({})",
                        m.max_annual_loss_rate
                    ),
                });
            }
            check_fraction(name, rate, 1.0)?;
        }
        if m.new_barrel_co2e.is_empty() {
            return Err(Error::Config {
                message: "new_barrel_co2e must list at least one barrel size".to_string(),
            });
        }
        for entry in &m.new_barrel_co2e {
            check_non_negative("new_barrel_co2e.size_litres", entry.size_litres)?;
            check_non_negative("new_barrel_co2e.co2e_kg", entry.co2e_kg)?;
        }
        check_non_negative("reused_barrel_co2e_kg", m.reused_barrel_co2e_kg)?;
        if !(m.default_bottle_size_litres.is_finite() && m.default_bottle_size_litres > 0.0) {
            return Err(Error::Config {
                message: "default_bottle_size_litres must be greater than zero".to_string(),
            });
        }
        check_non_negative(
            "default_annual_energy_kwh_per_barrel",
            m.default_annual_energy_kwh_per_barrel,
        )?;
        check_non_negative("ethanol_density_kg_per_litre", m.ethanol_density_kg_per_litre)?;
        check_non_negative("ethanol_to_nmvoc_factor", m.ethanol_to_nmvoc_factor)?;

        let g = &self.grid_factors;
        check_non_negative("grid_factors.grid_electricity", g.grid_electricity)?;
        check_non_negative("grid_factors.natural_gas", g.natural_gas)?;
        check_non_negative("grid_factors.renewable", g.renewable)?;
        check_non_negative("grid_factors.mixed", g.mixed)?;
        Ok(())
    }
}
