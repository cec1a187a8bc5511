use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Cut-off for the gradient magnitude in the advanced recipe
pub const GRADIENT_LEVEL: u8 = 225;

/// Binarize at the Otsu level of the image histogram
/// Good for bimodal labels under uneven lighting once blurred
pub fn otsu(image: &GrayImage) -> GrayImage {
    binary(image, otsu_level(image))
}

/// Binary threshold: pixels strictly above `level` become white, the rest black
pub fn binary(image: &GrayImage, level: u8) -> GrayImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        *pixel = if pixel.0[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarizes_image() {
        let img = GrayImage::from_fn(50, 50, |x, _| Luma([(x as u8 * 5).min(255)]));

        for pixel in otsu(&img).pixels() {
            assert!(
                pixel.0[0] == 0 || pixel.0[0] == 255,
                "Expected binary pixel, got {}",
                pixel.0[0]
            );
        }
    }

    #[test]
    fn test_otsu_separates_text_from_background() {
        let mut img = GrayImage::from_pixel(50, 20, Luma([240]));
        for x in 10..40 {
            img.put_pixel(x, 10, Luma([20])); // dark text
        }

        let result = otsu(&img);

        assert_eq!(result.get_pixel(25, 10).0[0], 0);
        assert_eq!(result.get_pixel(25, 5).0[0], 255);
    }

    #[test]
    fn test_binary_level_is_exclusive() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[224u8, 225, 226][x as usize]]));
        let result = binary(&img, GRADIENT_LEVEL);
        assert_eq!(result.as_raw(), &vec![0, 0, 255]);
    }
}
