//! Data-quality label bands.
//!
//! The scorer only produces a numeric average; mapping that number to a label is
//! owned by the caller and configured here.

use crate::{
    core::quality::{DataQuality, DataQualityScore},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// One label band: scores at or above `min_score` get this label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBand {
    /// Inclusive lower bound, 0-100
    pub min_score: f64,
    /// Short label, e.g. "High"
    pub label: String,
    /// Sentence suitable for a compliance disclosure
    pub description: String,
}

/// Ordered label bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBands {
    /// Bands in any order; the highest matching `min_score` wins
    pub bands: Vec<QualityBand>,
}

impl Default for QualityBands {
    fn default() -> Self {
        Self {
            bands: vec![
                QualityBand {
                    min_score: 80.0,
                    label: "High".to_string(),
                    description: "Predominantly primary or supplier-specific data".to_string(),
                },
                QualityBand {
                    min_score: 50.0,
                    label: "Medium".to_string(),
                    description: "A mix of supplier-specific and modelled data".to_string(),
                },
                QualityBand {
                    min_score: 0.0,
                    label: "Low".to_string(),
                    description: "Predominantly generic database data".to_string(),
                },
            ],
        }
    }
}

impl QualityBands {
    /// The band a score falls into, if any band covers it.
    #[must_use]
    pub fn band_for(&self, score: f64) -> Option<&QualityBand> {
        self.bands
            .iter()
            .filter(|band| score >= band.min_score)
            .max_by(|a, b| a.min_score.total_cmp(&b.min_score))
    }

    /// Labels a score.
    ///
    /// A score below every band (only possible with unvalidated bands) is
    /// labelled "Unrated".
    #[must_use]
    pub fn grade(&self, score: &DataQualityScore) -> DataQuality {
        let (label, description) = self.band_for(score.score).map_or_else(
            || ("Unrated".to_string(), "No quality band covers this score".to_string()),
            |band| (band.label.clone(), band.description.clone()),
        );
        DataQuality {
            score: score.score,
            label,
            description,
            breakdown: score.tiers.clone(),
        }
    }

    /// Checks that bands exist and that every score in 0-100 gets a label.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if there are no bands or none starts at 0.
    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(Error::Config {
                message: "At least one quality band is required".to_string(),
            });
        }
        if self.band_for(0.0).is_none() {
            return Err(Error::Config {
                message: "The lowest quality band must start at 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_band_for_default_thresholds() {
        let bands = QualityBands::default();
        assert_eq!(bands.band_for(100.0).unwrap().label, "High");
        assert_eq!(bands.band_for(80.0).unwrap().label, "High");
        assert_eq!(bands.band_for(79.99).unwrap().label, "Medium");
        assert_eq!(bands.band_for(50.0).unwrap().label, "Medium");
        assert_eq!(bands.band_for(25.0).unwrap().label, "Low");
        assert_eq!(bands.band_for(0.0).unwrap().label, "Low");
        assert!(bands.validate().is_ok());
    }

    #[test]
    fn test_band_order_does_not_matter() {
        let toml_str = r#"
            [[bands]]
            min_score = 0.0
            label = "Estimated"
            description = "Estimated"

            [[bands]]
            min_score = 90.0
            label = "Verified"
            description = "Verified"
        "#;
        let bands: QualityBands = toml::from_str(toml_str).unwrap();
        assert_eq!(bands.band_for(95.0).unwrap().label, "Verified");
        assert_eq!(bands.band_for(60.0).unwrap().label, "Estimated");
    }

    #[test]
    fn test_validate_requires_zero_floor() {
        let bands = QualityBands {
            bands: vec![QualityBand {
                min_score: 10.0,
                label: "Some".to_string(),
                description: String::new(),
            }],
        };
        assert!(bands.validate().is_err());
        assert!(QualityBands { bands: Vec::new() }.validate().is_err());
    }

    #[test]
    fn test_grade_outside_every_band() {
        let bands = QualityBands {
            bands: vec![QualityBand {
                min_score: 90.0,
                label: "Verified".to_string(),
                description: String::new(),
            }],
        };
        let score = crate::core::quality::score_materials(&[]);
        assert_eq!(bands.grade(&score).label, "Unrated");
    }
}
