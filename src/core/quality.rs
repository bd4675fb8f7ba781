//! Data-quality scoring from material provenance.
//!
//! The score is the count-weighted mean of tier weights, 0-100. Turning a score
//! into a label is left to [`QualityBands`](crate::config::QualityBands).

use crate::models::{Material, ProvenanceTier};
use serde::{Deserialize, Serialize};

/// Weight of a provenance tier in the score
#[must_use]
pub const fn tier_weight(tier: ProvenanceTier) -> f64 {
    match tier {
        ProvenanceTier::Primary => 100.0,
        ProvenanceTier::Supplier => 75.0,
        ProvenanceTier::DatabaseModelled => 25.0,
    }
}

/// Count and share of one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBreakdown {
    /// The tier
    pub tier: ProvenanceTier,
    /// Materials in this tier
    pub count: usize,
    /// Share of all materials, 0-100
    pub percentage: f64,
}

/// Numeric score and per-tier breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityScore {
    /// Weighted mean, 0-100; 0 when there are no materials
    pub score: f64,
    /// Number of materials scored
    pub total: usize,
    /// One entry per tier, highest confidence first
    pub tiers: Vec<TierBreakdown>,
}

/// A score with its configured label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Weighted mean, 0-100
    pub score: f64,
    /// Band label
    pub label: String,
    /// Band description
    pub description: String,
    /// Per-tier counts and shares
    pub breakdown: Vec<TierBreakdown>,
}

/// Scores a sequence of provenance tiers.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_tiers<I>(tiers: I) -> DataQualityScore
where
    I: IntoIterator<Item = ProvenanceTier>,
{
    let mut counts = [0_usize; ProvenanceTier::ALL.len()];
    for tier in tiers {
        if let Some(index) = ProvenanceTier::ALL.iter().position(|t| *t == tier) {
            counts[index] += 1;
        }
    }
    let total: usize = counts.iter().sum();

    let share = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };
    let weighted: f64 = ProvenanceTier::ALL
        .iter()
        .zip(counts)
        .map(|(tier, count)| tier_weight(*tier) * count as f64)
        .sum();

    DataQualityScore {
        score: if total == 0 {
            0.0
        } else {
            weighted / total as f64
        },
        total,
        tiers: ProvenanceTier::ALL
            .iter()
            .zip(counts)
            .map(|(tier, count)| TierBreakdown {
                tier: *tier,
                count,
                percentage: share(count),
            })
            .collect(),
    }
}

/// Scores a list of materials by their provenance.
#[must_use]
pub fn score_materials(materials: &[Material]) -> DataQualityScore {
    score_tiers(materials.iter().map(|material| material.provenance))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::config::QualityBands;
    use crate::test_utils::*;

    #[test]
    fn test_empty_scores_zero() {
        let score = score_materials(&[]);
        assert_eq!(score.score, 0.0);
        assert_eq!(score.total, 0);
        assert_eq!(score.tiers.len(), 3);
        assert!(score.tiers.iter().all(|t| t.count == 0 && t.percentage == 0.0));
        assert!(!score.score.is_nan());
    }

    #[test]
    fn test_weighted_mean() {
        use ProvenanceTier::{DatabaseModelled, Primary, Supplier};
        let score = score_tiers([Primary, Supplier, DatabaseModelled, DatabaseModelled]);
        assert_eq!(score.score, (100.0 + 75.0 + 25.0 + 25.0) / 4.0);
        assert_eq!(score.tiers[0].count, 1);
        assert_eq!(score.tiers[2].count, 2);
        assert_eq!(score.tiers[2].percentage, 50.0);

        let all_primary = score_tiers([Primary; 5]);
        assert_eq!(all_primary.score, 100.0);
    }

    #[test]
    fn test_score_materials_uses_provenance() {
        // grain primary, yeast database, bottle supplier
        let score = score_materials(&regular_materials());
        assert_eq!(score.total, 3);
        assert_close(score.score, (100.0 + 25.0 + 75.0) / 3.0, 1e-12);
    }

    #[test]
    fn test_grade_with_default_bands() {
        let bands = QualityBands::default();
        let graded = bands.grade(&score_tiers([ProvenanceTier::Primary]));
        assert_eq!(graded.label, "High");
        assert_eq!(graded.score, 100.0);
        assert_eq!(graded.breakdown.len(), 3);

        let graded = bands.grade(&score_tiers([ProvenanceTier::DatabaseModelled]));
        assert_eq!(graded.label, "Low");
    }
}
