//! Image preprocessing recipes for label photographs
//!
//! Each recipe is a fixed chain of steps producing a grayscale image tuned
//! for one recognition setting.

pub mod recipe;
pub mod steps;

pub use recipe::{PreprocessingResult, Recipe, StepTiming};
