//! Fitted ordinal encoder.
//!
//! The encoder artifact stores the three category vocabularies in trained
//! rank order (worst→best, rank 0 = worst). It is the *single source* of
//! rank values: the grade enums in `domain` define the closed input
//! vocabulary, but the numbers fed to the model always come from this table,
//! so inference ranks cannot drift from the ranks the model was trained
//! against.

use serde::{Deserialize, Serialize};

use crate::domain::{Clarity, Color, Quality};
use crate::error::PricingError;

/// Ordinal-encoding table for the three categorical attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    /// Quality labels in rank order.
    pub quality: Vec<String>,
    /// Color labels in rank order.
    pub color: Vec<String>,
    /// Clarity labels in rank order.
    pub clarity: Vec<String>,
}

impl OrdinalEncoder {
    /// Map a categorical triple to its rank triple, in (quality, color,
    /// clarity) order.
    pub fn encode(
        &self,
        quality: Quality,
        color: Color,
        clarity: Clarity,
    ) -> Result<[f64; 3], PricingError> {
        Ok([
            rank_of(&self.quality, quality.label(), "quality")?,
            rank_of(&self.color, color.label(), "color")?,
            rank_of(&self.clarity, clarity.label(), "clarity")?,
        ])
    }
}

fn rank_of(vocabulary: &[String], label: &str, field: &'static str) -> Result<f64, PricingError> {
    vocabulary
        .iter()
        .position(|v| v == label)
        .map(|rank| rank as f64)
        .ok_or_else(|| PricingError::unknown_category(field, label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> OrdinalEncoder {
        OrdinalEncoder {
            quality: Quality::ALL.iter().map(|q| q.label().to_string()).collect(),
            color: Color::ALL.iter().map(|c| c.label().to_string()).collect(),
            clarity: Clarity::ALL.iter().map(|c| c.label().to_string()).collect(),
        }
    }

    #[test]
    fn encoding_is_strictly_monotonic_per_domain() {
        let enc = fitted();

        let quality_ranks: Vec<f64> = Quality::ALL
            .iter()
            .map(|&q| enc.encode(q, Color::J, Clarity::I1).unwrap()[0])
            .collect();
        assert!(quality_ranks.windows(2).all(|w| w[0] < w[1]));

        let color_ranks: Vec<f64> = Color::ALL
            .iter()
            .map(|&c| enc.encode(Quality::Fair, c, Clarity::I1).unwrap()[1])
            .collect();
        assert!(color_ranks.windows(2).all(|w| w[0] < w[1]));

        let clarity_ranks: Vec<f64> = Clarity::ALL
            .iter()
            .map(|&c| enc.encode(Quality::Fair, Color::J, c).unwrap()[2])
            .collect();
        assert!(clarity_ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn worst_grade_has_rank_zero() {
        let enc = fitted();
        let ranks = enc.encode(Quality::Fair, Color::J, Clarity::I1).unwrap();
        assert_eq!(ranks, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn reference_triple_matches_trained_ranks() {
        let enc = fitted();
        let ranks = enc
            .encode(Quality::VeryGood, Color::E, Clarity::SI1)
            .unwrap();
        assert_eq!(ranks, [2.0, 5.0, 2.0]);
    }

    #[test]
    fn label_missing_from_trained_vocabulary_is_rejected() {
        // An encoder fitted on a narrower vocabulary than the input domain.
        let enc = OrdinalEncoder {
            quality: vec!["Fair".to_string(), "Good".to_string()],
            color: Color::ALL.iter().map(|c| c.label().to_string()).collect(),
            clarity: Clarity::ALL.iter().map(|c| c.label().to_string()).collect(),
        };
        let err = enc
            .encode(Quality::Ideal, Color::E, Clarity::SI1)
            .unwrap_err();
        assert!(matches!(
            err,
            PricingError::UnknownCategory { field: "quality", .. }
        ));
    }
}
