//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the three ordered grade enums (`Quality`, `Color`, `Clarity`)
//! - raw diamond attributes (`DiamondFeatures`)
//! - the transformed feature vector (`EncodedFeatureVector`)
//! - the pipeline output (`PricePrediction`)

pub mod types;

pub use types::*;
