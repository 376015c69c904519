#![allow(dead_code)]

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use slicepdf::PaginationOptions;
use slicepdf::model::{
    HeaderMark, LinkRegion, PageBoundary, PageGeometry, RenderedBitmap, RenderedDocument, Rgb,
};

pub const WHITE: Rgb = [255, 255, 255];
pub const INK: Rgb = [30, 30, 30];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rgba(c: Rgb) -> Rgba<u8> {
    Rgba([c[0], c[1], c[2], 255])
}

/// Image filled entirely with `bg`.
pub fn blank(width: u32, height: u32, bg: Rgb) -> RgbaImage {
    RgbaImage::from_pixel(width, height, rgba(bg))
}

/// Image where every row carries ink in its middle column.
pub fn solid_text(width: u32, height: u32, bg: Rgb) -> RgbaImage {
    let mut img = blank(width, height, bg);
    for y in 0..height {
        img.put_pixel(width / 2, y, rgba(INK));
    }
    img
}

/// Paint rows `[start, end)` back to plain background.
pub fn clear_rows(img: &mut RgbaImage, start: u32, end: u32, bg: Rgb) {
    for y in start..end {
        for x in 0..img.width() {
            img.put_pixel(x, y, rgba(bg));
        }
    }
}

/// Text lines `line_h` rows tall separated by `gap` blank rows.
pub fn text_lines(width: u32, height: u32, line_h: u32, gap: u32, bg: Rgb) -> RgbaImage {
    let mut img = blank(width, height, bg);
    for y in 0..height {
        if y % (line_h + gap) < line_h {
            for x in (0..width).step_by(3) {
                img.put_pixel(x, y, rgba(INK));
            }
        }
    }
    img
}

pub fn document(pixels: RgbaImage, scale: f32, bg: Rgb) -> RenderedDocument {
    RenderedDocument {
        bitmap: RenderedBitmap::new(pixels, scale),
        background: bg,
        headers: Vec::new(),
        links: Vec::new(),
    }
}

/// Options for a bitmap `width` px wide where one bitmap pixel is one
/// millimetre, so a page holds exactly `capacity_px` rows between 20 mm
/// margins and the scan window is `window_px` rows.
pub fn options_for(width: u32, capacity_px: u32, window_px: f32, scale: f32) -> PaginationOptions {
    PaginationOptions {
        geometry: PageGeometry {
            page_width_mm: width as f32,
            page_height_mm: capacity_px as f32 + 40.0,
            margin_top_mm: 20.0,
            margin_bottom_mm: 20.0,
            layout_content_width_px: width as f32 / scale,
        },
        scan_window_layout_px: window_px / scale,
        ..PaginationOptions::default()
    }
}

pub fn header(level: u8, text: &str, offset_top: f32) -> HeaderMark {
    HeaderMark {
        level,
        text: text.to_string(),
        offset_top,
    }
}

pub fn link(x: f32, y: f32, width: f32, height: f32, url: &str) -> LinkRegion {
    LinkRegion {
        x,
        y,
        width,
        height,
        url: url.to_string(),
    }
}

pub fn spans(boundaries: &[PageBoundary]) -> Vec<(u32, u32)> {
    boundaries.iter().map(|b| (b.start_px, b.end_px)).collect()
}

/// Partition invariant: contiguous, non-empty, covering `[0, height)`.
pub fn assert_partition(boundaries: &[PageBoundary], height: u32) {
    assert!(!boundaries.is_empty(), "no pages for height {height}");
    assert_eq!(boundaries[0].start_px, 0);
    assert_eq!(boundaries[boundaries.len() - 1].end_px, height);
    for b in boundaries {
        assert!(b.start_px < b.end_px, "empty page {b:?}");
    }
    for pair in boundaries.windows(2) {
        assert_eq!(pair[0].end_px, pair[1].start_px, "gap between {pair:?}");
    }
}

/// Output directory: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(case);
    std::fs::create_dir_all(&dir).expect("create output dir");
    dir
}

pub fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}
