//! Read the two fitted artifacts (ordinal encoder + price model).
//!
//! Artifact JSON is the "portable" representation of a fitted pipeline half:
//! a small metadata header (tool, kind, trained date) plus the payload the
//! pipeline actually consumes. The `kind` field is checked on load so a
//! swapped pair of files fails loudly instead of producing silent nonsense.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::models::{OrdinalEncoder, RegressionModel};

/// File name of the serialized ordinal encoder inside the artifact directory.
pub const ENCODER_FILE: &str = "ordinal_encoder.json";
/// File name of the serialized regression model inside the artifact directory.
pub const MODEL_FILE: &str = "price_model.json";

/// Environment variable overriding the artifact directory (a `.env` file is
/// honored).
pub const ARTIFACT_DIR_ENV: &str = "DPRICE_ARTIFACT_DIR";

const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

const ENCODER_KIND: &str = "ordinal_encoder";
const MODEL_KIND: &str = "price_model";

/// Serialized ordinal encoder artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderFile {
    pub tool: String,
    pub kind: String,
    pub trained_date: NaiveDate,
    pub categories: OrdinalEncoder,
}

/// Serialized regression model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub kind: String,
    pub trained_date: NaiveDate,
    pub model: RegressionModel,
}

/// Resolved locations of the two artifact files.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
}

impl ArtifactPaths {
    /// Resolve the artifact directory: explicit flag, else the
    /// `DPRICE_ARTIFACT_DIR` environment variable, else `./artifacts`.
    pub fn resolve(flag: Option<PathBuf>) -> Self {
        dotenvy::dotenv().ok();
        let dir = flag
            .or_else(|| std::env::var(ARTIFACT_DIR_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR));
        Self { dir }
    }

    pub fn encoder_path(&self) -> PathBuf {
        self.dir.join(ENCODER_FILE)
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }
}

/// Load and validate the ordinal encoder artifact.
pub fn load_encoder(path: &Path) -> Result<EncoderFile, PricingError> {
    let file = File::open(path)
        .map_err(|e| PricingError::artifact_load(path, e.to_string()))?;
    let encoder: EncoderFile = serde_json::from_reader(file)
        .map_err(|e| PricingError::artifact_load(path, e.to_string()))?;

    if encoder.kind != ENCODER_KIND {
        return Err(PricingError::artifact_load(
            path,
            format!("expected kind '{ENCODER_KIND}', got '{}'", encoder.kind),
        ));
    }

    log::info!(
        "loaded ordinal encoder (trained {}) from {}",
        encoder.trained_date,
        path.display()
    );
    Ok(encoder)
}

/// Load and validate the regression model artifact.
pub fn load_model(path: &Path) -> Result<ModelFile, PricingError> {
    let file = File::open(path)
        .map_err(|e| PricingError::artifact_load(path, e.to_string()))?;
    let model: ModelFile = serde_json::from_reader(file)
        .map_err(|e| PricingError::artifact_load(path, e.to_string()))?;

    if model.kind != MODEL_KIND {
        return Err(PricingError::artifact_load(
            path,
            format!("expected kind '{MODEL_KIND}', got '{}'", model.kind),
        ));
    }

    log::info!(
        "loaded price model ({}, trained {}) from {}",
        model.model.describe(),
        model.trained_date,
        path.display()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinearModel;

    fn write_json(dir: &Path, name: &str, value: &impl Serialize) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        serde_json::to_writer_pretty(file, value).unwrap();
        path
    }

    #[test]
    fn model_file_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let written = ModelFile {
            tool: "dprice".to_string(),
            kind: MODEL_KIND.to_string(),
            trained_date: NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
            model: RegressionModel::Linear(LinearModel {
                intercept: 1.5,
                coefficients: vec![0.5; 7],
            }),
        };
        let path = write_json(dir.path(), MODEL_FILE, &written);

        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded.trained_date, written.trained_date);
        assert!((loaded.model.predict(&[1.0; 7]).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn missing_artifact_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_encoder(&dir.path().join(ENCODER_FILE)).unwrap_err();
        assert!(matches!(err, PricingError::ArtifactLoad { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn swapped_artifact_kinds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let model = ModelFile {
            tool: "dprice".to_string(),
            kind: MODEL_KIND.to_string(),
            trained_date: NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
            model: RegressionModel::Linear(LinearModel {
                intercept: 0.0,
                coefficients: vec![],
            }),
        };
        // A model file stored under the encoder name must not deserialize as
        // an encoder.
        let path = write_json(dir.path(), ENCODER_FILE, &model);
        assert!(matches!(
            load_encoder(&path).unwrap_err(),
            PricingError::ArtifactLoad { .. }
        ));
    }

    #[test]
    fn artifact_dir_resolution_prefers_explicit_flag() {
        let paths = ArtifactPaths::resolve(Some(PathBuf::from("/tmp/fitted")));
        assert_eq!(paths.encoder_path(), PathBuf::from("/tmp/fitted/ordinal_encoder.json"));
        assert_eq!(paths.model_path(), PathBuf::from("/tmp/fitted/price_model.json"));
    }
}
