//! Facility allocation - distributes facility-level emissions across co-products.
//!
//! Allocation is by production volume: a product producing `p` of a facility's `t`
//! units carries `p / t` of the facility's CO2e, water and waste, expressed per unit.
//!
//! Water and waste live in a stored payload whose layout has changed over time. They
//! are located by trying [`WATER_PATHS`] and [`WASTE_PATHS`] in order; a missing or
//! malformed field resolves to zero instead of failing the allocation.

use crate::{
    core::lookup::SnapshotLookup,
    errors::{Error, Result, ensure_non_negative},
    models::{AllocationRequest, AllocationResult, FacilityEmissionsSnapshot},
};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

/// A key path into the stored payload
pub type PayloadPath = &'static [&'static str];

/// Where facility water totals have been stored, newest layout first
pub const WATER_PATHS: &[PayloadPath] = &[
    &["water", "total_consumption"],
    &["utilities", "water", "total"],
    &["water_consumption"],
    &["totals", "water"],
];

/// Where facility waste totals have been stored, newest layout first
pub const WASTE_PATHS: &[PayloadPath] = &[
    &["waste", "total_generated"],
    &["utilities", "waste", "total"],
    &["waste_generated"],
    &["totals", "waste"],
];

fn read_path(payload: &Value, path: PayloadPath) -> Option<f64> {
    let node = path.iter().try_fold(payload, |node, key| node.get(key))?;
    let value = match node {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// First usable numeric value along `paths`, or zero.
#[must_use]
pub fn first_payload_value(payload: &Value, paths: &[PayloadPath]) -> f64 {
    paths
        .iter()
        .find_map(|path| read_path(payload, path))
        .unwrap_or_else(|| {
            debug!(?paths, "No usable payload value found, defaulting to zero");
            0.0
        })
}

/// Facility water total for the period
#[must_use]
pub fn facility_water(snapshot: &FacilityEmissionsSnapshot) -> f64 {
    first_payload_value(&snapshot.payload, WATER_PATHS)
}

/// Facility waste total for the period
#[must_use]
pub fn facility_waste(snapshot: &FacilityEmissionsSnapshot) -> f64 {
    first_payload_value(&snapshot.payload, WASTE_PATHS)
}

/// Allocates a share of a facility's period totals to one product.
///
/// # Arguments
/// * `snapshot` - Facility totals for the period
/// * `total_volume` - Everything the facility produced
/// * `product_volume` - What this product produced
///
/// # Errors
/// - [`Error::InvalidQuantity`] if `total_volume` is not finite
/// - [`Error::ZeroVolume`] if `total_volume` is not greater than zero
/// - [`Error::InvalidAllocation`] if `product_volume` is not in `(0, total_volume]`
/// - [`Error::InvalidQuantity`] if the snapshot's CO2e total is negative or not finite
pub fn allocate(
    snapshot: &FacilityEmissionsSnapshot,
    total_volume: f64,
    product_volume: f64,
) -> Result<AllocationResult> {
    if !total_volume.is_finite() {
        return Err(Error::InvalidQuantity {
            field: "total production volume".to_string(),
            value: total_volume,
        });
    }
    if total_volume <= 0.0 {
        return Err(Error::ZeroVolume { total_volume });
    }
    if product_volume.is_nan() || product_volume <= 0.0 || product_volume > total_volume {
        return Err(Error::InvalidAllocation {
            product_volume,
            total_volume,
        });
    }
    let total_co2e = ensure_non_negative("facility total CO2e", snapshot.total_co2e)?;

    let ratio = product_volume / total_volume;
    let per_unit = |facility_total: f64| (facility_total * ratio) / product_volume;

    let provenance = format!(
        "Impacts allocated from '{}' facility data, based on a {:.2}% share of its total annual production volume.",
        snapshot.facility_name,
        ratio * 100.0
    );
    info!(
        facility = %snapshot.facility_id,
        ratio,
        "Allocated facility emissions"
    );

    Ok(AllocationResult {
        facility_id: snapshot.facility_id.clone(),
        co2e_per_unit: per_unit(total_co2e),
        water_per_unit: per_unit(facility_water(snapshot)),
        waste_per_unit: per_unit(facility_waste(snapshot)),
        allocation_ratio: ratio,
        provenance,
    })
}

/// [`allocate`] over a request value.
pub fn allocate_request(request: &AllocationRequest) -> Result<AllocationResult> {
    allocate(
        &request.snapshot,
        request.total_production_volume,
        request.product_production_volume,
    )
}

/// Fetches the facility's latest snapshot and allocates from it.
///
/// # Errors
/// Returns [`Error::MissingData`] when the facility has no snapshot, plus every
/// error [`allocate`] can return.
pub fn allocate_from_lookup(
    lookup: &dyn SnapshotLookup,
    facility_id: &str,
    total_volume: f64,
    product_volume: f64,
) -> Result<AllocationResult> {
    let snapshot = lookup
        .latest_snapshot(facility_id)?
        .ok_or_else(|| Error::MissingData {
            what: format!("emissions snapshot for facility '{facility_id}'"),
        })?;
    allocate(&snapshot, total_volume, product_volume)
}

/// The most recently recorded snapshot for a facility whose period covers `date`.
#[must_use]
pub fn latest_snapshot<'a>(
    snapshots: &'a [FacilityEmissionsSnapshot],
    facility_id: &str,
    date: NaiveDate,
) -> Option<&'a FacilityEmissionsSnapshot> {
    snapshots
        .iter()
        .filter(|snapshot| snapshot.facility_id == facility_id && snapshot.covers(date))
        .max_by_key(|snapshot| snapshot.recorded_at)
}
