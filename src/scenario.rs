//! Scenario files for the `impact-engine` binary.
//!
//! A scenario bundles one product recalculation with an optional facility
//! allocation and an optional PRN obligation year, so the whole engine can be
//! exercised from a single TOML file.

use crate::{
    config::AppConfig,
    core::{
        allocation::allocate_request,
        epr::{
            PlacedProduct, build_obligations, fulfilment_percentage, tonnage_by_material,
            total_spend,
        },
        lca::{LcaCalculator, LcaInput},
    },
    errors::{Error, Result},
    models::{AllocationRequest, LcaResult, PrnObligation},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};
use tracing::{info, warn};

/// PRN section of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EprScenario {
    /// Obligation year
    pub year: i32,
    /// Products placed on the market that year
    pub products: Vec<PlacedProduct>,
    /// Tonnes of credits already bought, by material code
    #[serde(default)]
    pub purchases: BTreeMap<String, f64>,
}

/// One scenario file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name
    pub name: String,
    /// Product to recalculate
    pub product: LcaInput,
    /// Facility allocation to attach to the product
    #[serde(default)]
    pub allocation: Option<AllocationRequest>,
    /// PRN obligation year to build
    #[serde(default)]
    pub epr: Option<EprScenario>,
}

/// Everything computed for a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Product LCA
    pub lca: LcaResult,
    /// PRN obligations, empty without an EPR section
    pub obligations: Vec<PrnObligation>,
    /// Spend on PRN credits
    pub prn_spend: f64,
    /// Overall PRN fulfilment, 0-100
    pub prn_fulfilment_pct: f64,
}

/// Parses a scenario from TOML.
///
/// # Errors
/// Returns [`Error::Validation`] if the TOML is malformed or missing fields.
pub fn parse_scenario(contents: &str) -> Result<Scenario> {
    toml::from_str(contents)
        .map_err(|e| Error::validation(format!("Failed to parse scenario: {e}")))
}

/// Reads and parses a scenario file.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read, or a parse error.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_scenario(&contents)
}

/// Runs every section of a scenario.
///
/// # Errors
/// Propagates the first calculation error.
pub fn run(scenario: &Scenario, config: &AppConfig) -> Result<ScenarioReport> {
    let mut input = scenario.product.clone();
    if let Some(request) = &scenario.allocation {
        input.facility_allocation = Some(allocate_request(request)?);
    }
    let lca = LcaCalculator::new(&config.defaults, &config.quality).calculate(&input)?;

    let obligations = match &scenario.epr {
        Some(epr) => {
            let targets = config.prn.targets_for_year(epr.year);
            if targets.is_empty() {
                warn!(year = epr.year, "No PRN targets configured for year");
            }
            let tonnage = tonnage_by_material(&epr.products)?;
            let mut obligations = build_obligations(&tonnage, &targets, epr.year)?;
            for obligation in &mut obligations {
                if let Some(bought) = epr.purchases.get(&obligation.material_code) {
                    obligation.record_purchase(*bought, None)?;
                }
            }
            obligations
        }
        None => Vec::new(),
    };

    info!(scenario = %scenario.name, "Scenario complete");
    Ok(ScenarioReport {
        name: scenario.name.clone(),
        prn_spend: total_spend(&obligations),
        prn_fulfilment_pct: fulfilment_percentage(&obligations),
        lca,
        obligations,
    })
}
