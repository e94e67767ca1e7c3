//! Mathematical utilities: the Box–Cox power transform family.

pub mod power;

pub use power::*;
