use crate::model::{LinkRegion, LinkScale, PageGeometry, PaginationOptions, PlacedLink};

/// Conversions between layout px, bitmap px and output millimetres,
/// derived once per pagination run.
#[derive(Clone, Copy, Debug)]
pub struct GeometryMapper {
    geometry: PageGeometry,
    bitmap_width: u32,
    device_pixel_scale: f32,
    px_to_mm: f32,
    link_mm_per_layout_px: f32,
    scan_window_layout_px: f32,
}

impl GeometryMapper {
    /// `bitmap_width` must be non-zero.
    pub fn new(bitmap_width: u32, device_pixel_scale: f32, options: &PaginationOptions) -> Self {
        let geometry = options.geometry;
        let px_to_mm = geometry.page_width_mm / bitmap_width as f32;
        let canonical = px_to_mm * device_pixel_scale;
        let layout_width = geometry.page_width_mm / geometry.layout_content_width_px;

        let drift = (canonical - layout_width).abs() / canonical;
        if drift > 0.01 {
            log::warn!(
                "Bitmap width {bitmap_width}px at scale {device_pixel_scale} does not match layout width {}px ({:.1}% drift); link positions follow the {:?} scale",
                geometry.layout_content_width_px,
                drift * 100.0,
                options.link_scale,
            );
        }

        let link_mm_per_layout_px = match options.link_scale {
            LinkScale::Bitmap => canonical,
            LinkScale::LayoutWidth => layout_width,
        };

        Self {
            geometry,
            bitmap_width,
            device_pixel_scale,
            px_to_mm,
            link_mm_per_layout_px,
            scan_window_layout_px: options.scan_window_layout_px,
        }
    }

    pub fn px_to_mm(&self) -> f32 {
        self.px_to_mm
    }

    pub fn link_mm_per_layout_px(&self) -> f32 {
        self.link_mm_per_layout_px
    }

    pub fn layout_to_bitmap(&self, v: f32) -> f32 {
        v * self.device_pixel_scale
    }

    pub fn bitmap_to_mm(&self, px: f32) -> f32 {
        px * self.px_to_mm
    }

    /// Rows of bitmap that fit between the top and bottom margins.
    pub fn page_capacity_px(&self) -> u32 {
        let rows = self.geometry.content_height_mm() as f64 * self.bitmap_width as f64
            / self.geometry.page_width_mm as f64;
        (rows.floor() as u32).max(1)
    }

    pub fn scan_window_px(&self) -> u32 {
        self.layout_to_bitmap(self.scan_window_layout_px).round() as u32
    }

    /// Vertical output position of a bitmap row on the page starting at `page_start`.
    pub fn page_y_mm(&self, bitmap_y: f32, page_start: u32) -> f32 {
        self.geometry.margin_top_mm + self.bitmap_to_mm(bitmap_y - page_start as f32)
    }

    /// Vertical centre of a link rectangle, in bitmap space.
    pub fn link_center_px(&self, link: &LinkRegion) -> f32 {
        self.layout_to_bitmap(link.y + link.height / 2.0)
    }

    pub fn place_link(&self, link: &LinkRegion, page_start: u32) -> PlacedLink {
        self.place_link_at(link, self.layout_to_bitmap(link.y), page_start)
    }

    /// Like `place_link`, with the top edge given in bitmap rows.
    pub fn place_link_at(&self, link: &LinkRegion, top_px: f32, page_start: u32) -> PlacedLink {
        PlacedLink {
            x_mm: link.x * self.link_mm_per_layout_px,
            y_mm: self.page_y_mm(top_px, page_start),
            width_mm: link.width * self.link_mm_per_layout_px,
            height_mm: link.height * self.link_mm_per_layout_px,
            url: link.url.clone(),
        }
    }
}
