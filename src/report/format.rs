//! Price summary and batch summary formatting.

use crate::app::pipeline::PricingPipeline;
use crate::domain::{DiamondFeatures, EncodedFeatureVector, FEATURE_NAMES, PricePrediction};
use crate::io::ingest::RowError;

/// One carat is 200 milligrams.
const MILLIGRAMS_PER_CARAT: f64 = 200.0;

/// Format a price for display: currency label + two decimals.
pub fn format_currency(amount: f64) -> String {
    format!("$US {amount:.2}")
}

/// Format the full single-prediction summary.
pub fn format_price_summary(
    features: &DiamondFeatures,
    encoded: &EncodedFeatureVector,
    prediction: &PricePrediction,
    pipeline: &PricingPipeline,
) -> String {
    let mut out = String::new();

    out.push_str("=== dprice - Diamond Price Recommendation ===\n");
    out.push_str(&format!(
        "Diamond: {:.2} ct ({:.2} mg) | {:.2} x {:.2} x {:.2} mm\n",
        features.weight,
        features.weight * MILLIGRAMS_PER_CARAT,
        features.length,
        features.width,
        features.depth,
    ));
    out.push_str(&format!(
        "Grades: quality={} | color={} | clarity={}\n",
        features.quality, features.color, features.clarity,
    ));

    out.push_str("\nEncoded features (model order):\n");
    for (name, value) in FEATURE_NAMES.iter().zip(encoded.as_array()) {
        out.push_str(&format!("- {name:<8} {value:.6}\n"));
    }

    out.push_str(&format!(
        "\nModel: {} (trained {})\n",
        pipeline.model.model.describe(),
        pipeline.model.trained_date,
    ));
    out.push_str(&format!(
        "Encoder: trained {}\n",
        pipeline.encoder.trained_date
    ));

    out.push_str(&format!(
        "\nRecommended price: {}\n",
        format_currency(prediction.amount)
    ));

    out
}

/// Format the batch run summary (counts + row errors).
pub fn format_batch_summary(
    rows_read: usize,
    priced: usize,
    row_errors: &[RowError],
) -> String {
    let mut out = String::new();

    out.push_str("=== dprice - Batch Pricing ===\n");
    out.push_str(&format!(
        "Rows: read={rows_read} | priced={priced} | failed={}\n",
        row_errors.len()
    ));

    if !row_errors.is_empty() {
        out.push_str("\nFailed rows:\n");
        for err in row_errors {
            out.push_str(&format!("- line {}: {}\n", err.line, err.message));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_has_two_decimals_and_label() {
        assert_eq!(format_currency(2501.3632), "$US 2501.36");
        assert_eq!(format_currency(84.0), "$US 84.00");
    }

    #[test]
    fn batch_summary_lists_row_errors() {
        let errors = vec![RowError {
            line: 3,
            message: "invalid `weight` value 'oops'".to_string(),
        }];
        let out = format_batch_summary(3, 2, &errors);
        assert!(out.contains("read=3 | priced=2 | failed=1"));
        assert!(out.contains("line 3"));
    }
}
