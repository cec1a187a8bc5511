use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_scharr, vertical_scharr};

/// Difference of horizontal and vertical Scharr responses, |gx - gy| saturated to u8
///
/// Emphasises regions dense in vertical strokes such as digit rows, which is where
/// embossed or dot-matrix dates end up being the only high-energy area.
pub fn apply(image: &GrayImage) -> GrayImage {
    let gx = horizontal_scharr(image);
    let gy = vertical_scharr(image);

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let diff = gx.get_pixel(x, y).0[0] as i32 - gy.get_pixel(x, y).0[0] as i32;
        Luma([diff.unsigned_abs().min(255) as u8])
    })
}
