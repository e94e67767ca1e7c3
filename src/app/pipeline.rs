//! The pricing pipeline shared by all front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> transform -> encode -> infer -> inverse-transform
//!
//! The CLI, batch, and TUI front-ends then focus on presentation.

use crate::domain::{DiamondFeatures, EncodedFeatureVector, PricePrediction};
use crate::error::PricingError;
use crate::io::artifacts::{self, ArtifactPaths, EncoderFile, ModelFile};

/// Box–Cox parameter applied to `weight`, calibrated on the training data.
///
/// Statistically paired with the fitted artifacts: swapping the model for one
/// trained against a different weight transform requires changing this value
/// alongside it.
pub const WEIGHT_LAMBDA: f64 = -0.0950413870690428;

/// Box–Cox parameter the *target* (price) was transformed with at training
/// time; predictions are mapped back to currency units by inverting it.
/// Paired with the fitted model exactly like [`WEIGHT_LAMBDA`].
pub const PRICE_LAMBDA: f64 = -0.06711272583112812;

/// Turns raw diamond attributes into a price recommendation.
///
/// Both fitted artifacts are loaded once at construction and never mutated
/// afterwards, so a pipeline can be shared freely across threads (the batch
/// front-end prices rows in parallel against one instance). For the
/// load-per-request behavior, construct a fresh pipeline per call — the
/// artifacts are small.
#[derive(Debug, Clone)]
pub struct PricingPipeline {
    pub encoder: EncoderFile,
    pub model: ModelFile,
}

impl PricingPipeline {
    /// Load both artifacts from the resolved artifact directory.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, PricingError> {
        let encoder = artifacts::load_encoder(&paths.encoder_path())?;
        let model = artifacts::load_model(&paths.model_path())?;
        Ok(Self { encoder, model })
    }

    /// Apply the fixed feature transforms and the fitted ordinal encoding.
    pub fn transform(
        &self,
        features: &DiamondFeatures,
    ) -> Result<EncodedFeatureVector, PricingError> {
        // 1) Validate numeric domains. The power transform is undefined at
        //    zero for negative λ, so weight must be strictly positive.
        if !features.weight.is_finite() || features.weight <= 0.0 {
            return Err(PricingError::invalid_input(
                "weight",
                format!("must be a finite value > 0 carats (got {})", features.weight),
            ));
        }
        for (name, value) in [
            ("length", features.length),
            ("width", features.width),
            ("depth", features.depth),
        ] {
            // log1p is defined for x > -1; physical measurements are >= 0.
            if !value.is_finite() || value < 0.0 {
                return Err(PricingError::InvalidInput {
                    field: name,
                    message: format!("must be a finite measurement >= 0 mm (got {value})"),
                });
            }
        }

        // 2) Fixed numeric transforms.
        let weight = crate::math::boxcox(features.weight, WEIGHT_LAMBDA);
        let length = features.length.ln_1p();
        let width = features.width.ln_1p();
        let depth = features.depth.ln_1p();

        // 3) Ordinal encoding through the fitted table.
        let [quality, color, clarity] =
            self.encoder
                .categories
                .encode(features.quality, features.color, features.clarity)?;

        let encoded = EncodedFeatureVector {
            weight,
            length,
            width,
            depth,
            quality,
            color,
            clarity,
        };
        log::debug!("encoded feature vector: {:?}", encoded.as_array());
        Ok(encoded)
    }

    /// Run inference and map the transformed-scale score back to currency.
    pub fn predict(
        &self,
        encoded: &EncodedFeatureVector,
    ) -> Result<PricePrediction, PricingError> {
        let score = self.model.model.predict(&encoded.as_array())?;
        if !score.is_finite() {
            return Err(PricingError::Inference(format!(
                "model produced a non-finite score ({score})"
            )));
        }

        let amount = crate::math::inv_boxcox(score, PRICE_LAMBDA);
        if !amount.is_finite() {
            return Err(PricingError::Inference(format!(
                "score {score} left the domain of the inverse price transform"
            )));
        }

        Ok(PricePrediction { amount })
    }

    /// The sole externally used entry point: transform then predict.
    pub fn run(&self, features: &DiamondFeatures) -> Result<PricePrediction, PricingError> {
        let encoded = self.transform(features)?;
        self.predict(&encoded)
    }
}
