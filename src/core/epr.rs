//! Extended Producer Responsibility - PRN obligations, fulfilment and spend.
//!
//! An obligation is `tonnage placed × target %`. Its status is a pure function of
//! the obligation and the tonnage of recovery credits bought against it, with a
//! symmetric ±0.1 % band around the obligation counted as fulfilled.

use crate::{
    core::units::{MeasureKind, normalize},
    errors::{Error, Result, ensure_non_negative},
    models::{Material, MaterialCategory, PrnObligation, PrnStatus, PrnTarget},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Lower edge of the fulfilled band, as a fraction of the obligation
pub const FULFILLED_LOWER: f64 = 0.999;
/// Upper edge of the fulfilled band, as a fraction of the obligation
pub const FULFILLED_UPPER: f64 = 1.001;

// Absorbs representation error at the band edges so that exactly 99.9 % of an
// obligation is always fulfilled.
const BAND_EPSILON: f64 = 1e-9;

/// Rounds half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

fn ensure_target_pct(target_pct: f64) -> Result<f64> {
    if (0.0..=100.0).contains(&target_pct) {
        Ok(target_pct)
    } else {
        Err(Error::validation(format!(
            "Recycling target must be between 0 and 100 %, got {target_pct}"
        )))
    }
}

/// Tonnes of recovery credits owed, to 3 decimals.
#[must_use]
pub fn obligation_tonnage(tonnage_placed: f64, target_pct: f64) -> f64 {
    round_to(tonnage_placed * target_pct / 100.0, 3)
}

/// Fulfilment status of an obligation given what has been bought.
#[must_use]
pub fn status(obligation: f64, purchased: f64) -> PrnStatus {
    if obligation <= 0.0 {
        return PrnStatus::Fulfilled;
    }
    if purchased <= 0.0 {
        return PrnStatus::NotStarted;
    }
    let slack = obligation * BAND_EPSILON;
    if purchased > obligation * FULFILLED_UPPER + slack {
        PrnStatus::Exceeded
    } else if purchased >= obligation * FULFILLED_LOWER - slack {
        PrnStatus::Fulfilled
    } else {
        PrnStatus::Partial
    }
}

/// Tonnes still to buy, never negative.
#[must_use]
pub fn remaining(obligation: f64, purchased: f64) -> f64 {
    round_to(obligation - purchased, 3).max(0.0)
}

/// Cost of `tonnage` at `rate_per_tonne`, to 2 decimals.
#[must_use]
pub fn cost(tonnage: f64, rate_per_tonne: f64) -> f64 {
    round_to(tonnage * rate_per_tonne, 2)
}

/// Builds one obligation per target material for `year`.
///
/// Materials with no tonnage entry are treated as zero tonnes placed, which
/// yields a fulfilled obligation with nothing owed.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] if any placed tonnage is negative and
/// [`Error::Validation`] for a target outside 0-100 %.
pub fn build_obligations(
    tonnage_by_material: &BTreeMap<String, f64>,
    targets: &[PrnTarget],
    year: i32,
) -> Result<Vec<PrnObligation>> {
    let obligations = targets
        .iter()
        .filter(|target| target.year == year)
        .map(|target| {
            let placed = tonnage_by_material
                .get(&target.material_code)
                .copied()
                .unwrap_or(0.0);
            let placed = ensure_non_negative(
                &format!("tonnage placed for '{}'", target.material_code),
                placed,
            )?;
            let target_pct = ensure_target_pct(target.target_pct)?;
            let obligation = obligation_tonnage(placed, target_pct);
            Ok(PrnObligation {
                year,
                material_code: target.material_code.clone(),
                material_name: target.material_name.clone(),
                tonnage_placed: placed,
                target_pct,
                obligation_tonnage: obligation,
                purchased_tonnage: 0.0,
                unit_cost: target.rate_per_tonne,
                total_cost: 0.0,
                status: status(obligation, 0.0),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        year,
        materials = obligations.len(),
        "Built PRN obligations"
    );
    Ok(obligations)
}

/// Sum of spend across obligations, to 2 decimals.
#[must_use]
pub fn total_spend(obligations: &[PrnObligation]) -> f64 {
    round_to(obligations.iter().map(|o| o.total_cost).sum(), 2)
}

/// Overall fulfilment as a whole percentage, capped at 100.
#[must_use]
pub fn fulfilment_percentage(obligations: &[PrnObligation]) -> f64 {
    let owed: f64 = obligations.iter().map(|o| o.obligation_tonnage).sum();
    if owed <= 0.0 {
        return 100.0;
    }
    let bought: f64 = obligations.iter().map(|o| o.purchased_tonnage).sum();
    (bought / owed * 100.0).round().min(100.0)
}

impl PrnObligation {
    /// Tonnes still to buy.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        remaining(self.obligation_tonnage, self.purchased_tonnage)
    }

    /// Records a purchase of recovery credits.
    ///
    /// # Arguments
    /// * `tonnage` - Tonnes bought in this purchase
    /// * `price_per_tonne` - New price per tonne, if it changed
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] for a negative tonnage or price.
    pub fn record_purchase(&mut self, tonnage: f64, price_per_tonne: Option<f64>) -> Result<()> {
        let tonnage = ensure_non_negative("purchased tonnage", tonnage)?;
        if let Some(price) = price_per_tonne {
            self.unit_cost = ensure_non_negative("price per tonne", price)?;
        }
        self.purchased_tonnage = round_to(self.purchased_tonnage + tonnage, 3);
        self.total_cost = cost(self.purchased_tonnage, self.unit_cost);
        self.status = status(self.obligation_tonnage, self.purchased_tonnage);
        debug!(
            material = %self.material_code,
            purchased = self.purchased_tonnage,
            status = %self.status,
            "Recorded PRN purchase"
        );
        Ok(())
    }

    /// Recomputes the obligation after the placed tonnage or target changed.
    ///
    /// Purchases already recorded are kept.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] for a negative tonnage and
    /// [`Error::Validation`] for a target outside 0-100 %.
    pub fn update_source(&mut self, tonnage_placed: f64, target_pct: f64) -> Result<()> {
        let tonnage_placed = ensure_non_negative("tonnage placed", tonnage_placed)?;
        let target_pct = ensure_target_pct(target_pct)?;
        self.tonnage_placed = tonnage_placed;
        self.target_pct = target_pct;
        self.obligation_tonnage = obligation_tonnage(tonnage_placed, target_pct);
        self.status = status(self.obligation_tonnage, self.purchased_tonnage);
        Ok(())
    }
}

/// A product's packaging and how many units of it were placed on the market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedProduct {
    /// Product display name
    pub name: String,
    /// Bill of materials for one unit
    pub materials: Vec<Material>,
    /// Units placed on the market in the obligation year
    pub units_placed: u64,
}

/// Tonnes of packaging placed on the market, grouped by EPR material code.
///
/// Only packaging lines carrying a material code count. Their quantities must be
/// masses.
///
/// # Errors
/// Returns [`Error::UnsupportedUnit`] for a packaging line declared in a volume
/// unit and [`Error::InvalidQuantity`] for a negative quantity.
#[allow(clippy::cast_precision_loss)]
pub fn tonnage_by_material(products: &[PlacedProduct]) -> Result<BTreeMap<String, f64>> {
    let mut tonnage = BTreeMap::new();
    for product in products {
        for material in &product.materials {
            if material.category != MaterialCategory::Packaging {
                continue;
            }
            let Some(code) = &material.epr_material_code else {
                debug!(
                    product = %product.name,
                    material = %material.name,
                    "Packaging line has no EPR material code"
                );
                continue;
            };
            let kg_per_unit = normalize(material.quantity, &material.unit, MeasureKind::Mass)?;
            *tonnage.entry(code.clone()).or_insert(0.0) +=
                kg_per_unit * product.units_placed as f64 / 1000.0;
        }
    }
    Ok(tonnage)
}
