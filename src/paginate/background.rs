use crate::model::{RenderedBitmap, Rgb};

/// Composite one RGBA sample over the page background.
pub(crate) fn over_background(px: &[u8], background: Rgb) -> Rgb {
    let a = px[3] as u32;
    if a == 255 {
        return [px[0], px[1], px[2]];
    }
    let blend = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
    [
        blend(px[0], background[0]),
        blend(px[1], background[1]),
        blend(px[2], background[2]),
    ]
}

/// True when every channel is within `tolerance` of the background.
/// Translucent samples are judged as they will appear on the page.
pub fn is_background_pixel(px: &[u8], background: Rgb, tolerance: u8) -> bool {
    let seen = over_background(px, background);
    seen.iter()
        .zip(background.iter())
        .all(|(&c, &bg)| c.abs_diff(bg) <= tolerance)
}

/// A row is safe to cut through when none of its pixels carry content.
pub fn is_background_row(bitmap: &RenderedBitmap, y: u32, background: Rgb, tolerance: u8) -> bool {
    bitmap
        .row(y)
        .chunks_exact(4)
        .all(|px| is_background_pixel(px, background, tolerance))
}
