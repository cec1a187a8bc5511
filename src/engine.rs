use crate::error::OcrError;
use image::DynamicImage;
use serde::Serialize;
use std::fmt;

/// Tesseract's default LSTM/legacy engine selection
pub const DEFAULT_ENGINE_MODE: u8 = 3;

/// Recognition settings for a single pass: `--oem`, `--psm` and `-l`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognitionConfig {
    pub engine_mode: u8,
    pub page_segmentation: u8,
    pub language: String,
}

impl RecognitionConfig {
    pub fn new(engine_mode: u8, page_segmentation: u8, language: impl Into<String>) -> Self {
        Self {
            engine_mode,
            page_segmentation,
            language: language.into(),
        }
    }

    /// Default engine mode with the given page segmentation mode
    pub fn with_psm(page_segmentation: u8, language: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENGINE_MODE, page_segmentation, language)
    }
}

impl fmt::Display for RecognitionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "--oem {} --psm {} -l {}",
            self.engine_mode, self.page_segmentation, self.language
        )
    }
}

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "tesseract")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize text in an already preprocessed image.
    ///
    /// Returns an empty string when nothing is detected.
    fn recognize(&self, image: &DynamicImage, config: &RecognitionConfig)
        -> Result<String, OcrError>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}
