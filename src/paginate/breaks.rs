use crate::model::{RenderedBitmap, Rgb};

use super::background::is_background_row;

/// Pick where the page starting at `range_start` should end.
///
/// Scans upward from just above `hard_cut`, at most `scan_window` rows,
/// and returns the first blank row found: the break closest to the hard
/// cut. `range_start` itself is never returned, so every page keeps at
/// least one row. Falls back to `hard_cut` when the window holds content
/// all the way up, and returns it untouched on the final page.
pub fn find_break(
    bitmap: &RenderedBitmap,
    range_start: u32,
    hard_cut: u32,
    scan_window: u32,
    background: Rgb,
    tolerance: u8,
) -> u32 {
    if hard_cut >= bitmap.height() {
        return hard_cut;
    }

    let lowest = hard_cut
        .saturating_sub(scan_window)
        .max(range_start + 1);

    for y in (lowest..hard_cut).rev() {
        if is_background_row(bitmap, y, background, tolerance) {
            log::debug!("Break at row {y} ({} above hard cut {hard_cut})", hard_cut - y);
            return y;
        }
    }

    log::warn!(
        "No blank row within {scan_window}px above row {hard_cut}; cutting through content"
    );
    hard_cut
}
