//! Tesseract engine implementation
//!
//! Uses tesseract-static crate for static linking (no system dependencies).
//! Every pass creates its own Tesseract instance so the engine holds no mutable
//! state and can be shared across concurrent scans.

use super::download;
use crate::config::Config;
use crate::engine::{OcrEngine, RecognitionConfig, DEFAULT_ENGINE_MODE};
use crate::error::OcrError;
use image::DynamicImage;
use std::path::PathBuf;
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct TesseractEngine {
    /// Directory holding `<lang>.traineddata` files
    tessdata_dir: PathBuf,
    /// Whether missing traineddata may be downloaded into `tessdata_dir`
    download_missing: bool,
}

impl TesseractEngine {
    /// Create a Tesseract-based OCR engine for the configured language
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let (tessdata_dir, download_missing) = match &config.tessdata_path {
            Some(path) => (PathBuf::from(path), false),
            None => (download::cache_dir("tessdata")?, true),
        };

        let engine = Self {
            tessdata_dir,
            download_missing,
        };

        // Validate that tessdata is accessible by doing a test initialization
        drop(engine.instance(&config.language)?);

        tracing::info!(
            "Tesseract engine initialized (tessdata: {:?}, language: {})",
            engine.tessdata_dir,
            config.language
        );

        Ok(engine)
    }

    fn instance(&self, language: &str) -> Result<Tesseract, OcrError> {
        if self.download_missing {
            for lang in language.split('+') {
                download::ensure_cached(
                    &self.tessdata_dir,
                    &format!("{}.traineddata", lang),
                    &tessdata_url(lang),
                )?;
            }
        }

        let datapath = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| OcrError::InitializationError("Invalid tessdata path".to_string()))?;

        Tesseract::new(Some(datapath), Some(language)).map_err(|e| {
            OcrError::InitializationError(format!(
                "Failed to initialize Tesseract for '{}': {}",
                language, e
            ))
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - honors page segmentation and language per pass"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        config: &RecognitionConfig,
    ) -> Result<String, OcrError> {
        if config.engine_mode != DEFAULT_ENGINE_MODE {
            tracing::warn!(
                "Engine mode {} is not available, using default mode {}",
                config.engine_mode,
                DEFAULT_ENGINE_MODE
            );
        }

        // BMP is always supported by leptonica
        let mut bmp_data = Vec::new();
        image
            .to_rgb8()
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| OcrError::RecognitionError(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Recognizing {}x{} image with '{}'",
            image.width(),
            image.height(),
            config
        );

        let mut tess = self
            .instance(&config.language)?
            .set_variable("tessedit_pageseg_mode", &config.page_segmentation.to_string())
            .map_err(|e| {
                OcrError::RecognitionError(format!("Failed to set page segmentation: {}", e))
            })?;

        tess = tess
            .set_image_from_mem(&bmp_data)
            .map_err(|e| OcrError::RecognitionError(format!("Failed to set image: {}", e)))?;

        tess = tess
            .recognize()
            .map_err(|e| OcrError::RecognitionError(format!("Failed to recognize text: {}", e)))?;

        tess.get_text()
            .map_err(|e| OcrError::RecognitionError(format!("Failed to get text: {}", e)))
    }

    fn supported_languages(&self) -> Vec<String> {
        vec![
            "tur".to_string(), // Turkish
            "eng".to_string(), // English
            "deu".to_string(), // German
            "fra".to_string(), // French
        ]
    }
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // tessdata_fast keeps downloads small
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tessdata_url_points_at_fast_models() {
        assert_eq!(
            tessdata_url("tur"),
            "https://github.com/tesseract-ocr/tessdata_fast/raw/main/tur.traineddata"
        );
    }
}
