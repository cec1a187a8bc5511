use image::GrayImage;
use imageproc::filter::{box_filter, gaussian_blur_f32};

/// Sigma OpenCV derives for a 5x5 Gaussian kernel when sigma is left at 0:
/// 0.3 * ((5 - 1) * 0.5 - 1) + 0.8
const GAUSSIAN_5X5_SIGMA: f32 = 1.1;

/// Radius of the 9x9 box filter
const BOX_9X9_RADIUS: u32 = 4;

/// 5x5 Gaussian blur, smooths uneven illumination before Otsu
pub fn gaussian_5x5(image: &GrayImage) -> GrayImage {
    gaussian_blur_f32(image, GAUSSIAN_5X5_SIGMA)
}

/// 9x9 mean filter, merges gradient responses of neighbouring strokes
pub fn box_9x9(image: &GrayImage) -> GrayImage {
    box_filter(image, BOX_9X9_RADIUS, BOX_9X9_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_gaussian_preserves_uniform_image() {
        let img = GrayImage::from_pixel(20, 20, Luma([90]));
        let result = gaussian_5x5(&img);
        assert!(result.pixels().all(|p| (p.0[0] as i32 - 90).abs() <= 1));
    }

    #[test]
    fn test_box_spreads_single_bright_pixel() {
        let mut img = GrayImage::new(21, 21);
        img.put_pixel(10, 10, Luma([255]));

        let result = box_9x9(&img);

        assert!(result.get_pixel(10, 10).0[0] > 0);
        assert!(result.get_pixel(14, 14).0[0] > 0);
        assert_eq!(result.get_pixel(0, 0).0[0], 0);
        assert!(result.get_pixel(10, 10).0[0] < 255);
    }
}
