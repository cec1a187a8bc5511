use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Upscale factor
const SCALE: u32 = 2;
/// Long-side limit; only inputs beyond 8192 px are scaled by less than 2x
const MAX_DIMENSION: u32 = 16384;

/// Upscale 2x with cubic interpolation, capped at MAX_DIMENSION on the long side
pub fn apply(image: &DynamicImage) -> DynamicImage {
    let (width, height) = target_dimensions(image.dimensions());

    if (width, height) == image.dimensions() {
        return image.clone();
    }

    image.resize_exact(width, height, FilterType::CatmullRom)
}

fn target_dimensions((width, height): (u32, u32)) -> (u32, u32) {
    let mut new_width = width.saturating_mul(SCALE);
    let mut new_height = height.saturating_mul(SCALE);

    let max_dim = new_width.max(new_height);
    if max_dim > MAX_DIMENSION {
        new_width = ((new_width as u64 * MAX_DIMENSION as u64 / max_dim as u64) as u32).max(1);
        new_height = ((new_height as u64 * MAX_DIMENSION as u64 / max_dim as u64) as u32).max(1);
    }

    // Never shrink below the source
    (new_width.max(width), new_height.max(height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    #[test]
    fn test_upscale_doubles_small_image() {
        let img = GrayImage::new(120, 80);
        let result = apply(&DynamicImage::ImageLuma8(img));
        assert_eq!(result.dimensions(), (240, 160));
    }

    #[test]
    fn test_upscale_doubles_photo_sized_image() {
        let img = GrayImage::new(2400, 1800);
        let result = apply(&DynamicImage::ImageLuma8(img));
        assert_eq!(result.dimensions(), (4800, 3600));
    }

    #[test]
    fn test_upscale_doubles_phone_photo() {
        assert_eq!(target_dimensions((4032, 3024)), (8064, 6048));
    }

    #[test]
    fn test_upscale_respects_max_dimension() {
        assert_eq!(target_dimensions((10000, 5000)), (16384, 8192));
    }

    #[test]
    fn test_upscale_never_shrinks_large_image() {
        assert_eq!(target_dimensions((20000, 100)), (20000, 100));
    }
}
