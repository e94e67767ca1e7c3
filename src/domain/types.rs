//! Shared domain types.
//!
//! Grade enums are listed **worst→best** and form closed vocabularies; their
//! ordinal ranks are *not* defined here but looked up in the fitted encoder
//! artifact, so that the ranks used at inference time always match the ones
//! the model was trained against.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Cut quality grade (worst→best).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Quality {
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    #[value(name = "very-good")]
    VeryGood,
    Premium,
    Ideal,
}

/// Color grade (worst→best). D is colorless, J has a visible tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Color {
    J,
    I,
    H,
    G,
    F,
    E,
    D,
}

/// Clarity grade (worst→best), from "imperfect" to "internally flawless".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Clarity {
    I1,
    SI2,
    SI1,
    VS2,
    VS1,
    VVS2,
    VVS1,
    IF,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::Fair,
        Quality::Good,
        Quality::VeryGood,
        Quality::Premium,
        Quality::Ideal,
    ];

    /// Label as it appears in the trained vocabulary.
    pub fn label(self) -> &'static str {
        match self {
            Quality::Fair => "Fair",
            Quality::Good => "Good",
            Quality::VeryGood => "Very Good",
            Quality::Premium => "Premium",
            Quality::Ideal => "Ideal",
        }
    }

    pub fn from_label(s: &str) -> Result<Self, PricingError> {
        Self::ALL
            .into_iter()
            .find(|q| q.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PricingError::unknown_category("quality", s.trim()))
    }
}

impl Color {
    pub const ALL: [Color; 7] = [
        Color::J,
        Color::I,
        Color::H,
        Color::G,
        Color::F,
        Color::E,
        Color::D,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Color::J => "J",
            Color::I => "I",
            Color::H => "H",
            Color::G => "G",
            Color::F => "F",
            Color::E => "E",
            Color::D => "D",
        }
    }

    pub fn from_label(s: &str) -> Result<Self, PricingError> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PricingError::unknown_category("color", s.trim()))
    }
}

impl Clarity {
    pub const ALL: [Clarity; 8] = [
        Clarity::I1,
        Clarity::SI2,
        Clarity::SI1,
        Clarity::VS2,
        Clarity::VS1,
        Clarity::VVS2,
        Clarity::VVS1,
        Clarity::IF,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Clarity::I1 => "I1",
            Clarity::SI2 => "SI2",
            Clarity::SI1 => "SI1",
            Clarity::VS2 => "VS2",
            Clarity::VS1 => "VS1",
            Clarity::VVS2 => "VVS2",
            Clarity::VVS1 => "VVS1",
            Clarity::IF => "IF",
        }
    }

    pub fn from_label(s: &str) -> Result<Self, PricingError> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PricingError::unknown_category("clarity", s.trim()))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Clarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw diamond attributes as supplied by a caller.
///
/// Created once per prediction request; the pipeline consumes it without
/// mutation. `weight` is in carats (1 ct = 200 mg), the three measurements
/// are in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondFeatures {
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub depth: f64,
    pub quality: Quality,
    pub color: Color,
    pub clarity: Clarity,
}

/// Number of features the regression model consumes.
pub const FEATURE_COUNT: usize = 7;

/// Feature names in model order. Reordering silently corrupts predictions,
/// so every conversion to a plain vector goes through [`EncodedFeatureVector::as_array`].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "weight", "length", "width", "depth", "quality", "color", "clarity",
];

/// The seven attributes after transformation, in model order:
/// `weight` power-transformed, the measurements log-transformed, the grades
/// replaced by their trained ordinal ranks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedFeatureVector {
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub depth: f64,
    pub quality: f64,
    pub color: f64,
    pub clarity: f64,
}

impl EncodedFeatureVector {
    /// Flatten to the fixed order the model was trained on.
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.weight,
            self.length,
            self.width,
            self.depth,
            self.quality,
            self.color,
            self.clarity,
        ]
    }
}

/// A single price recommendation in currency units (US dollars).
///
/// Intended for display with two decimal places and a currency label; the
/// pipeline applies no clamping, so callers must not assume strict
/// non-negativity without validating it themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePrediction {
    pub amount: f64,
}
