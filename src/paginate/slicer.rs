use image::{Rgb as Pixel, RgbImage};

use crate::model::{RenderedBitmap, Rgb};

use super::background::over_background;

/// Cut rows `[start, end)` out of the bitmap into an opaque page image.
/// The buffer starts as solid background, so transparent source pixels
/// end up background-coloured rather than black.
pub fn slice(bitmap: &RenderedBitmap, start: u32, end: u32, background: Rgb) -> RgbImage {
    let width = bitmap.width();
    let mut page = RgbImage::from_pixel(width, end - start, Pixel(background));

    let src = bitmap.rows(start, end);
    for (dst, px) in page.pixels_mut().zip(src.chunks_exact(4)) {
        *dst = Pixel(over_background(px, background));
    }
    page
}
