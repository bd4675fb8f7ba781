//! Packaging Recovery Note (PRN) obligation records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fulfilment state of one obligation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrnStatus {
    /// Something is owed and nothing has been bought
    NotStarted,
    /// Some credits bought, short of the obligation
    Partial,
    /// Within 0.1 % of the obligation, or nothing owed
    Fulfilled,
    /// More than 0.1 % above the obligation
    Exceeded,
}

impl fmt::Display for PrnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Partial => write!(f, "partial"),
            Self::Fulfilled => write!(f, "fulfilled"),
            Self::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// A published recycling target for one material in one obligation year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrnTarget {
    /// Obligation year
    pub year: i32,
    /// Material code, e.g. `glass`
    pub material_code: String,
    /// Display name
    pub material_name: String,
    /// Recycling target in percent
    pub target_pct: f64,
    /// Expected PRN price per tonne
    #[serde(default)]
    pub rate_per_tonne: f64,
}

/// One material's recycling obligation for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrnObligation {
    /// Obligation year
    pub year: i32,
    /// Material code
    pub material_code: String,
    /// Display name
    pub material_name: String,
    /// Tonnes placed on market
    pub tonnage_placed: f64,
    /// Recycling target in percent
    pub target_pct: f64,
    /// Tonnes of recovery credits owed
    pub obligation_tonnage: f64,
    /// Tonnes of recovery credits bought so far
    pub purchased_tonnage: f64,
    /// Price per tonne
    pub unit_cost: f64,
    /// Spend on credits bought so far
    pub total_cost: f64,
    /// Derived from obligation and purchased tonnage
    pub status: PrnStatus,
}
