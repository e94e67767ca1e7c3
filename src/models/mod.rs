//! Fitted artifact primitives: the ordinal encoder and the regression model.
//!
//! Both are treated as opaque, swappable mapping objects: the pipeline only
//! relies on `encode(grades) → ranks` and `predict(vector) → scalar`, so an
//! artifact produced by a different modeling toolkit can be substituted
//! without touching the pipeline.

pub mod encoder;
pub mod regressor;

pub use encoder::*;
pub use regressor::*;
