use image::{RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub type Rgb = [u8; 3];

/// Parse `#RRGGBB` or `RRGGBB`. Anything else falls back to white.
pub fn parse_hex_color(hex: &str) -> Rgb {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return [255, 255, 255];
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => [r, g, b],
        _ => [255, 255, 255],
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn background(self) -> Rgb {
        match self {
            Theme::Light => parse_hex_color("#FFFFFF"),
            Theme::Dark => parse_hex_color("#050A15"),
        }
    }
}

/// Full-height rasterization of the document, plus its pixel density
/// relative to layout space.
pub struct RenderedBitmap {
    pixels: RgbaImage,
    device_pixel_scale: f32,
}

impl RenderedBitmap {
    pub fn new(pixels: RgbaImage, device_pixel_scale: f32) -> Self {
        Self {
            pixels,
            device_pixel_scale,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn device_pixel_scale(&self) -> f32 {
        self.device_pixel_scale
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// RGBA samples of one row, row-major, 4 bytes per pixel.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width() as usize * 4;
        let start = y as usize * stride;
        &self.pixels.as_raw()[start..start + stride]
    }

    /// Contiguous RGBA samples of rows `[start, end)`.
    pub fn rows(&self, start: u32, end: u32) -> &[u8] {
        let stride = self.width() as usize * 4;
        &self.pixels.as_raw()[start as usize * stride..end as usize * stride]
    }
}

/// Half-open vertical range `[start_px, end_px)` in bitmap space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageBoundary {
    pub start_px: u32,
    pub end_px: u32,
}

impl PageBoundary {
    pub fn height(&self) -> u32 {
        self.end_px - self.start_px
    }

    pub fn contains(&self, y: f32) -> bool {
        y >= self.start_px as f32 && y < self.end_px as f32
    }
}

/// Hyperlink hit-region in layout space.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LinkRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HeaderMark {
    pub level: u8, // 1..=6
    pub text: String,
    pub offset_top: f32, // layout px
}

/// A link rectangle in output space: millimetres from the page's top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLink {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub url: String,
}

pub struct OutputPage {
    pub index: usize,
    pub image: RgbImage,
    pub image_height_mm: f32,
    pub links: Vec<PlacedLink>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutlineEntry {
    pub text: String,
    pub level: u8,
    pub page_number: usize, // 1-indexed
    pub top_mm: f32,        // header position on its page
}

/// Everything the rasterization step hands over to pagination.
pub struct RenderedDocument {
    pub bitmap: RenderedBitmap,
    pub background: Rgb,
    pub headers: Vec<HeaderMark>,
    pub links: Vec<LinkRegion>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_top_mm: f32,
    pub margin_bottom_mm: f32,
    pub layout_content_width_px: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 portrait, content laid out at 794 CSS px (A4 width at 96 DPI)
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_top_mm: 20.0,
            margin_bottom_mm: 20.0,
            layout_content_width_px: 794.0,
        }
    }
}

impl PageGeometry {
    pub fn content_height_mm(&self) -> f32 {
        self.page_height_mm - self.margin_top_mm - self.margin_bottom_mm
    }

    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("page width", self.page_width_mm),
            ("page height", self.page_height_mm),
            ("layout content width", self.layout_content_width_px),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::InvalidInput(format!("{name} must be positive, got {v}")));
            }
        }
        for (name, v) in [
            ("top margin", self.margin_top_mm),
            ("bottom margin", self.margin_bottom_mm),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidInput(format!("{name} must be non-negative, got {v}")));
            }
        }
        if self.content_height_mm() <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "margins ({} + {} mm) leave no room on a {} mm page",
                self.margin_top_mm, self.margin_bottom_mm, self.page_height_mm
            )));
        }
        Ok(())
    }
}

/// Which factor converts layout-space link rectangles to millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkScale {
    /// `px_to_mm * device_pixel_scale`: same scale as the page images.
    #[default]
    Bitmap,
    /// `page_width_mm / layout_content_width_px`, independent of the bitmap.
    LayoutWidth,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    pub geometry: PageGeometry,
    pub tolerance: u8, // per channel
    pub scan_window_layout_px: f32,
    pub link_scale: LinkScale,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            tolerance: 5,
            scan_window_layout_px: 100.0,
            link_scale: LinkScale::Bitmap,
        }
    }
}

impl PaginationOptions {
    pub fn validate(&self) -> Result<(), Error> {
        self.geometry.validate()?;
        if !self.scan_window_layout_px.is_finite() || self.scan_window_layout_px < 0.0 {
            return Err(Error::InvalidInput(format!(
                "scan window must be non-negative, got {}",
                self.scan_window_layout_px
            )));
        }
        Ok(())
    }
}
