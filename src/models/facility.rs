//! Facility emissions snapshot and allocation value objects.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A facility's aggregated emissions for one reporting period.
///
/// Values are period totals, not rates. Water and waste live in a semi-structured
/// payload whose shape has changed over time; see
/// [`crate::core::allocation::WATER_PATHS`] for how they are located.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityEmissionsSnapshot {
    /// Stable facility identifier
    pub facility_id: String,
    /// Display name used in provenance notes
    pub facility_name: String,
    /// Scope 1 + 2 emissions for the period, kg CO2e
    pub total_co2e: f64,
    /// Stored payload holding water and waste totals
    #[serde(default)]
    pub payload: serde_json::Value,
    /// First day of the reporting period
    pub period_start: NaiveDate,
    /// Last day of the reporting period
    pub period_end: NaiveDate,
    /// When this snapshot was recorded; the latest one wins
    pub recorded_at: NaiveDateTime,
}

impl FacilityEmissionsSnapshot {
    /// True if `date` falls inside the reporting period (inclusive).
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.period_start <= date && date <= self.period_end
    }
}

/// Input to the allocation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Facility totals for the period
    pub snapshot: FacilityEmissionsSnapshot,
    /// Everything the facility produced in the period
    pub total_production_volume: f64,
    /// This product's share of that production
    pub product_production_volume: f64,
}

/// Per-unit facility impacts attributed to one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Facility the impacts came from
    pub facility_id: String,
    /// kg CO2e per unit produced
    pub co2e_per_unit: f64,
    /// Water per unit produced
    pub water_per_unit: f64,
    /// Waste per unit produced
    pub waste_per_unit: f64,
    /// Product volume / total volume
    pub allocation_ratio: f64,
    /// Human-readable provenance sentence
    pub provenance: String,
}
