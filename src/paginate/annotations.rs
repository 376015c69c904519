use crate::model::{HeaderMark, LinkRegion, OutlineEntry, PageBoundary, PlacedLink};

use super::geometry::GeometryMapper;

/// Links whose vertical centre falls on this page, projected to output space.
/// Centres above the first page or past the last one are kept on those
/// pages, moved inside the page's rows so they stay clickable.
pub fn place_links(
    links: &[LinkRegion],
    mapper: &GeometryMapper,
    page: PageBoundary,
    is_first: bool,
    is_last: bool,
) -> Vec<PlacedLink> {
    links
        .iter()
        .filter_map(|link| {
            let center = mapper.link_center_px(link);
            if page.contains(center) {
                return Some(mapper.place_link(link, page.start_px));
            }
            let clamped = (is_first && center < page.start_px as f32)
                || (is_last && center >= page.end_px as f32);
            if !clamped {
                return None;
            }

            let height_px = mapper.layout_to_bitmap(link.height);
            let lowest_top = (page.end_px as f32 - height_px).max(page.start_px as f32);
            let top = mapper
                .layout_to_bitmap(link.y)
                .clamp(page.start_px as f32, lowest_top);
            log::warn!(
                "Link to {} at {center:.1}px lies outside the document; moving it to row {top:.1}",
                link.url
            );
            Some(mapper.place_link_at(link, top, page.start_px))
        })
        .collect()
}

/// Assign each header to the page whose range holds its top edge.
/// Headers past the last boundary land on the last page.
pub fn assign_headers(
    headers: &[HeaderMark],
    boundaries: &[PageBoundary],
    mapper: &GeometryMapper,
) -> Vec<OutlineEntry> {
    let Some(last) = boundaries.len().checked_sub(1) else {
        return Vec::new();
    };

    headers
        .iter()
        .map(|header| {
            let y = mapper.layout_to_bitmap(header.offset_top);
            let mut index = boundaries.partition_point(|b| b.end_px as f32 <= y);
            if index > last {
                log::warn!(
                    "Header {:?} at {y:.1}px is past the end of the document; placing it on page {}",
                    header.text,
                    last + 1
                );
                index = last;
            }
            let page = boundaries[index];
            let on_page = y.clamp(page.start_px as f32, page.end_px as f32);
            OutlineEntry {
                text: header.text.clone(),
                level: header.level,
                page_number: index + 1,
                top_mm: mapper.page_y_mm(on_page, page.start_px),
            }
        })
        .collect()
}
