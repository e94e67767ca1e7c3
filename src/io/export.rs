//! Export batch pricing results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: the validated inputs plus the recommended price, two decimals.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::PricePrediction;
use crate::error::PricingError;
use crate::io::ingest::DiamondRow;

/// A successfully priced batch row.
#[derive(Debug, Clone)]
pub struct PricedRow {
    pub row: DiamondRow,
    pub prediction: PricePrediction,
}

/// Write priced rows to a CSV file.
pub fn write_prices_csv(path: &Path, priced: &[PricedRow]) -> Result<(), PricingError> {
    let mut file = File::create(path).map_err(|e| {
        PricingError::App(format!(
            "Failed to create results CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(
        file,
        "id,weight,length,width,depth,quality,color,clarity,price"
    )
    .map_err(|e| PricingError::App(format!("Failed to write results CSV header: {e}")))?;

    for p in priced {
        let f = &p.row.features;
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{:.2}",
            p.row.id.as_deref().unwrap_or(""),
            f.weight,
            f.length,
            f.width,
            f.depth,
            f.quality,
            f.color,
            f.clarity,
            p.prediction.amount,
        )
        .map_err(|e| PricingError::App(format!("Failed to write results CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Clarity, Color, DiamondFeatures, Quality};

    #[test]
    fn export_writes_header_and_two_decimal_prices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let priced = vec![PricedRow {
            row: DiamondRow {
                line: 2,
                id: Some("a".to_string()),
                features: DiamondFeatures {
                    weight: 0.7,
                    length: 5.76,
                    width: 5.7,
                    depth: 3.43,
                    quality: Quality::VeryGood,
                    color: Color::E,
                    clarity: Clarity::SI1,
                },
            },
            prediction: PricePrediction { amount: 2501.3632 },
        }];

        write_prices_csv(&path, &priced).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,weight,length,width,depth,quality,color,clarity,price"
        );
        assert_eq!(
            lines.next().unwrap(),
            "a,0.7,5.76,5.7,3.43,Very Good,E,SI1,2501.36"
        );
    }
}
