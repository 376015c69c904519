mod annotations;
mod background;
mod breaks;
mod geometry;
mod slicer;

use image::RgbImage;

use crate::error::Error;
use crate::model::{OutlineEntry, OutputPage, PageBoundary, PaginationOptions, RenderedDocument};

pub use annotations::{assign_headers, place_links};
pub use background::{is_background_pixel, is_background_row};
pub use breaks::find_break;
pub use geometry::GeometryMapper;
pub use slicer::slice;

/// Receives each page as soon as it is cut. Pages are not kept afterwards.
pub trait PageSink {
    fn commit(&mut self, page: OutputPage) -> Result<(), Error>;
}

impl PageSink for Vec<OutputPage> {
    fn commit(&mut self, page: OutputPage) -> Result<(), Error> {
        self.push(page);
        Ok(())
    }
}

/// Result of a full pass: where every page starts and ends, and the
/// bookmarks that point into them.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub boundaries: Vec<PageBoundary>,
    pub outline: Vec<OutlineEntry>,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.boundaries.len()
    }
}

enum State {
    Scanning,
    Slicing { split: u32 },
    Placing { split: u32, image: RgbImage },
    Done,
}

/// Walks the bitmap top to bottom, yielding one page per iteration.
pub struct Paginator<'a> {
    doc: &'a RenderedDocument,
    tolerance: u8,
    mapper: Option<GeometryMapper>,
    y_offset: u32,
    boundaries: Vec<PageBoundary>,
    state: State,
}

impl<'a> Paginator<'a> {
    pub fn new(doc: &'a RenderedDocument, options: &PaginationOptions) -> Result<Self, Error> {
        options.validate()?;
        validate_document(doc)?;

        let bitmap = &doc.bitmap;
        let (mapper, state) = if bitmap.is_empty() {
            log::warn!(
                "Bitmap is {}x{}px; nothing to paginate",
                bitmap.width(),
                bitmap.height()
            );
            (None, State::Done)
        } else {
            let mapper = GeometryMapper::new(bitmap.width(), bitmap.device_pixel_scale(), options);
            (Some(mapper), State::Scanning)
        };

        Ok(Self {
            doc,
            tolerance: options.tolerance,
            mapper,
            y_offset: 0,
            boundaries: Vec::new(),
            state,
        })
    }

    pub fn boundaries(&self) -> &[PageBoundary] {
        &self.boundaries
    }

    /// Drains any remaining pages (discarding them) and assigns headers.
    pub fn finish(mut self) -> Pagination {
        for _ in self.by_ref() {}
        let outline = match &self.mapper {
            Some(mapper) => assign_headers(&self.doc.headers, &self.boundaries, mapper),
            None => Vec::new(),
        };
        Pagination {
            boundaries: self.boundaries,
            outline,
        }
    }
}

impl Iterator for Paginator<'_> {
    type Item = OutputPage;

    fn next(&mut self) -> Option<OutputPage> {
        let doc = self.doc;
        let bitmap = &doc.bitmap;
        let background = doc.background;
        let mapper = self.mapper?;

        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Scanning => {
                    if self.y_offset >= bitmap.height() {
                        continue;
                    }
                    let hard_cut = self
                        .y_offset
                        .saturating_add(mapper.page_capacity_px())
                        .min(bitmap.height());
                    let split = find_break(
                        bitmap,
                        self.y_offset,
                        hard_cut,
                        mapper.scan_window_px(),
                        background,
                        self.tolerance,
                    );
                    self.state = State::Slicing { split };
                }
                State::Slicing { split } => {
                    let image = slice(bitmap, self.y_offset, split, background);
                    self.state = State::Placing { split, image };
                }
                State::Placing { split, image } => {
                    let boundary = PageBoundary {
                        start_px: self.y_offset,
                        end_px: split,
                    };
                    let index = self.boundaries.len();
                    let links = place_links(
                        &doc.links,
                        &mapper,
                        boundary,
                        index == 0,
                        split >= bitmap.height(),
                    );

                    self.boundaries.push(boundary);
                    self.y_offset = split;
                    self.state = State::Scanning;

                    return Some(OutputPage {
                        index,
                        image,
                        image_height_mm: mapper.bitmap_to_mm(boundary.height() as f32),
                        links,
                    });
                }
                State::Done => return None,
            }
        }
    }
}

/// Run the whole pass, handing each page to `sink` as it is produced.
pub fn paginate(
    doc: &RenderedDocument,
    options: &PaginationOptions,
    sink: &mut dyn PageSink,
) -> Result<Pagination, Error> {
    let mut pages = Paginator::new(doc, options)?;
    for page in pages.by_ref() {
        sink.commit(page)?;
    }
    let pagination = pages.finish();
    log::info!(
        "Paginated {}x{}px bitmap into {} pages ({} bookmarks)",
        doc.bitmap.width(),
        doc.bitmap.height(),
        pagination.page_count(),
        pagination.outline.len(),
    );
    Ok(pagination)
}

fn validate_document(doc: &RenderedDocument) -> Result<(), Error> {
    let scale = doc.bitmap.device_pixel_scale();
    if !doc.bitmap.is_empty() && (!scale.is_finite() || scale <= 0.0) {
        return Err(Error::InvalidInput(format!(
            "device pixel scale must be positive, got {scale}"
        )));
    }
    for header in &doc.headers {
        if !(1..=6).contains(&header.level) {
            return Err(Error::InvalidInput(format!(
                "header {:?} has level {}, expected 1..=6",
                header.text, header.level
            )));
        }
        if !header.offset_top.is_finite() {
            return Err(Error::InvalidInput(format!(
                "header {:?} has a non-finite offset",
                header.text
            )));
        }
    }
    for link in &doc.links {
        let dims = [link.x, link.y, link.width, link.height];
        if dims.iter().any(|v| !v.is_finite()) || link.width < 0.0 || link.height < 0.0 {
            return Err(Error::InvalidInput(format!(
                "link to {} has an invalid rectangle",
                link.url
            )));
        }
    }
    Ok(())
}
