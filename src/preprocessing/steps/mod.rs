//! Individual preprocessing steps

pub mod blur;
pub mod denoise;
pub mod gradient;
pub mod grayscale;
pub mod threshold;
pub mod upscale;
