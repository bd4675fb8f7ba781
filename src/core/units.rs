//! Unit normalization - converts declared quantities into canonical base units.
//!
//! Mass is normalized to kilograms and volume to litres before any impact arithmetic.
//! Only `g`, `kg`, `ml` and `L` are accepted; callers must pre-resolve anything more
//! exotic. There is no implicit "assume kg" fallback.

use crate::errors::{Error, Result, ensure_non_negative};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The physical dimension a quantity measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    /// Normalized to kilograms
    Mass,
    /// Normalized to litres
    Volume,
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mass => write!(f, "mass"),
            Self::Volume => write!(f, "volume"),
        }
    }
}

/// Accepted unit spellings (lowercased), the kind they measure and how many of
/// them make one base unit.
/// Sub-units divide by an exact count so `700 ml` is the nearest double to 0.7 L.
const UNIT_TABLE: &[(&str, MeasureKind, f64)] = &[
    ("g", MeasureKind::Mass, 1000.0),
    ("kg", MeasureKind::Mass, 1.0),
    ("ml", MeasureKind::Volume, 1000.0),
    ("l", MeasureKind::Volume, 1.0),
];

const ANY_UNIT: &str = "g, kg, ml or L";

fn lookup(unit: &str) -> Option<(MeasureKind, f64)> {
    let unit = unit.trim().to_ascii_lowercase();
    UNIT_TABLE
        .iter()
        .find(|(name, _, _)| *name == unit)
        .map(|&(_, kind, per_base)| (kind, per_base))
}

impl MeasureKind {
    /// Infers the kind measured by a declared unit.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedUnit`] if the unit is not one of the accepted units.
    pub fn of_unit(unit: &str) -> Result<Self> {
        lookup(unit)
            .map(|(kind, _)| kind)
            .ok_or_else(|| Error::UnsupportedUnit {
                unit: unit.to_string(),
                expected: ANY_UNIT.to_string(),
            })
    }

    /// Canonical base unit symbol for this kind.
    #[must_use]
    pub const fn base_unit(self) -> &'static str {
        match self {
            Self::Mass => "kg",
            Self::Volume => "L",
        }
    }

    /// Human-readable list of the units accepted for this kind.
    #[must_use]
    pub const fn accepted_units(self) -> &'static str {
        match self {
            Self::Mass => "g or kg",
            Self::Volume => "ml or L",
        }
    }
}

/// Converts `quantity` expressed in `unit` into the base unit of `kind`.
///
/// # Errors
/// - [`Error::UnsupportedUnit`] if the unit is unknown or measures a different kind
/// - [`Error::InvalidQuantity`] if the quantity is negative or not finite
pub fn normalize(quantity: f64, unit: &str, kind: MeasureKind) -> Result<f64> {
    let quantity = ensure_non_negative("quantity", quantity)?;
    match lookup(unit) {
        Some((unit_kind, per_base)) if unit_kind == kind => Ok(quantity / per_base),
        _ => Err(Error::UnsupportedUnit {
            unit: unit.to_string(),
            expected: kind.accepted_units().to_string(),
        }),
    }
}

/// Normalizes a quantity whose kind is implied by its unit.
///
/// Returns the base quantity together with the kind it was normalized to.
pub fn normalize_inferred(quantity: f64, unit: &str) -> Result<(f64, MeasureKind)> {
    let kind = MeasureKind::of_unit(unit)?;
    Ok((normalize(quantity, unit, kind)?, kind))
}
