use image::{DynamicImage, GrayImage};

/// Convert image to 8-bit luminance
/// Every recipe runs on a single channel after this step
pub fn apply(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}
