//! PRN target configuration loaded from config.toml.
//!
//! Targets are published per obligation year; the EPR calculator builds one
//! obligation per target of the requested year.

use crate::{
    errors::{Error, Result},
    models::PrnTarget,
};
use serde::{Deserialize, Serialize};

/// All configured PRN targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrnTargetsConfig {
    /// Targets across all years
    #[serde(default)]
    pub targets: Vec<PrnTarget>,
}

impl PrnTargetsConfig {
    /// Targets published for `year`.
    #[must_use]
    pub fn targets_for_year(&self, year: i32) -> Vec<PrnTarget> {
        self.targets
            .iter()
            .filter(|target| target.year == year)
            .cloned()
            .collect()
    }

    /// Checks percentages, rates and duplicate entries.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for a target outside 0-100 %, a negative rate, or
    /// the same material listed twice for one year.
    pub fn validate(&self) -> Result<()> {
        for (i, target) in self.targets.iter().enumerate() {
            if !(0.0..=100.0).contains(&target.target_pct) {
                return Err(Error::Config {
                    message: format!(
                        "PRN target for {} in {} must be 0-100%, got {}",
                        target.material_code, target.year, target.target_pct
                    ),
                });
            }
            if !target.rate_per_tonne.is_finite() || target.rate_per_tonne < 0.0 {
                return Err(Error::Config {
                    message: format!(
                        "PRN rate for {} in {} must be non-negative",
                        target.material_code, target.year
                    ),
                });
            }
            let duplicate = self.targets[..i].iter().any(|earlier| {
                earlier.year == target.year && earlier.material_code == target.material_code
            });
            if duplicate {
                return Err(Error::Config {
                    message: format!(
                        "Duplicate PRN target for {} in {}",
                        target.material_code, target.year
                    ),
                });
            }
        }
        Ok(())
    }
}
