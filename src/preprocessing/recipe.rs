use crate::error::OcrError;
use image::DynamicImage;
use serde::Serialize;
use std::fmt;
use std::time::Instant;

use super::steps;

/// Preprocessing recipe names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipe {
    /// Clean, legible labels
    /// Steps: upscale 2x, grayscale, denoise
    Basic,
    /// Uneven lighting
    /// Steps: grayscale, gaussian 5x5, otsu threshold
    Adaptive,
    /// Embossed or low-contrast printing
    /// Steps: grayscale, scharr gradient difference, box 9x9, threshold 225
    Advanced,
}

impl Recipe {
    /// Get the recipe name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Adaptive => "adaptive",
            Self::Advanced => "advanced",
        }
    }

    /// Run the recipe on `image`, leaving the input untouched
    pub fn apply(&self, image: &DynamicImage) -> Result<PreprocessingResult, OcrError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::PreprocessingError(format!(
                "Cannot preprocess empty {}x{} image",
                image.width(),
                image.height()
            )));
        }

        let start = Instant::now();
        let mut timings = Vec::new();

        let processed = match self {
            Self::Basic => {
                let upscaled = timed("upscale", &mut timings, || steps::upscale::apply(image));
                let gray = timed("grayscale", &mut timings, || {
                    steps::grayscale::apply(&upscaled)
                });
                timed("denoise", &mut timings, || steps::denoise::apply(&gray))
            }
            Self::Adaptive => {
                let gray = timed("grayscale", &mut timings, || steps::grayscale::apply(image));
                let blurred = timed("gaussian", &mut timings, || {
                    steps::blur::gaussian_5x5(&gray)
                });
                timed("otsu", &mut timings, || steps::threshold::otsu(&blurred))
            }
            Self::Advanced => {
                let gray = timed("grayscale", &mut timings, || steps::grayscale::apply(image));
                let gradient = timed("gradient", &mut timings, || steps::gradient::apply(&gray));
                let blurred = timed("box", &mut timings, || steps::blur::box_9x9(&gradient));
                timed("threshold", &mut timings, || {
                    steps::threshold::binary(&blurred, steps::threshold::GRADIENT_LEVEL)
                })
            }
        };

        Ok(PreprocessingResult {
            image: DynamicImage::ImageLuma8(processed),
            total_time_ms: start.elapsed().as_millis() as u64,
            recipe: *self,
            steps: timings,
        })
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing information for a single preprocessing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessingResult {
    /// Preprocessed image (not serialized)
    #[serde(skip)]
    pub image: DynamicImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    pub recipe: Recipe,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

fn timed<T, F>(name: &str, timings: &mut Vec<StepTiming>, step_fn: F) -> T
where
    F: FnOnce() -> T,
{
    let step_start = Instant::now();
    let result = step_fn();
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms: step_start.elapsed().as_millis() as u64,
    });
    result
}
