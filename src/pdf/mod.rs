mod outline;

use pdf_writer::types::{ActionType, AnnotationType, PageMode};
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::model::{OutlineEntry, OutputPage, PageGeometry, PlacedLink, Rgb};
use crate::paginate::PageSink;

const PT_PER_MM: f32 = 72.0 / 25.4;
const IMAGE_NAME: &[u8] = b"Im1";

// Only object references survive between committed pages.
pub struct PdfWriter {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    page_ids: Vec<Ref>,
    geometry: PageGeometry,
    background: Rgb,
}

impl PdfWriter {
    pub fn new(geometry: PageGeometry, background: Rgb) -> Self {
        Self {
            pdf: Pdf::new(),
            next_id: 3,
            catalog_id: Ref::new(1),
            pages_id: Ref::new(2),
            page_ids: Vec::new(),
            geometry,
            background,
        }
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    fn page_width_pt(&self) -> f32 {
        self.geometry.page_width_mm * PT_PER_MM
    }

    fn page_height_pt(&self) -> f32 {
        self.geometry.page_height_mm * PT_PER_MM
    }

    fn link_rect(&self, link: &PlacedLink) -> Rect {
        let top = self.page_height_pt() - link.y_mm * PT_PER_MM;
        let bottom = self.page_height_pt() - (link.y_mm + link.height_mm) * PT_PER_MM;
        Rect::new(
            link.x_mm * PT_PER_MM,
            bottom,
            (link.x_mm + link.width_mm) * PT_PER_MM,
            top,
        )
    }

    pub fn finish(mut self, outline: &[OutlineEntry], title: Option<&str>) -> Vec<u8> {
        let outline_id = self.write_outline(outline);

        let info_id = self.alloc();
        {
            let mut info = self.pdf.document_info(info_id);
            if let Some(title) = title {
                info.title(TextStr(title));
            }
            info.producer(TextStr(concat!("slicepdf ", env!("CARGO_PKG_VERSION"))));
        }

        {
            let mut catalog = self.pdf.catalog(self.catalog_id);
            catalog.pages(self.pages_id);
            if let Some(outline_id) = outline_id {
                catalog.outlines(outline_id);
                catalog.page_mode(PageMode::UseOutlines);
            }
        }
        self.pdf
            .pages(self.pages_id)
            .kids(self.page_ids.iter().copied())
            .count(self.page_ids.len() as i32);

        self.pdf.finish()
    }
}

impl PageSink for PdfWriter {
    fn commit(&mut self, page: OutputPage) -> Result<(), Error> {
        let (w, h) = page.image.dimensions();
        if w == 0 || h == 0 || w > i32::MAX as u32 || h > i32::MAX as u32 {
            return Err(Error::Pdf(format!(
                "page {} has unusable image size {w}x{h}",
                page.index + 1
            )));
        }

        let image_id = self.alloc();
        let content_id = self.alloc();
        let page_id = self.alloc();
        let annot_ids: Vec<Ref> = page.links.iter().map(|_| self.alloc()).collect();

        let page_w = self.page_width_pt();
        let page_h = self.page_height_pt();
        let image_h = page.image_height_mm * PT_PER_MM;
        let image_top = page_h - self.geometry.margin_top_mm * PT_PER_MM;

        let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(page.image.as_raw(), 6);
        {
            let mut xobj = self.pdf.image_xobject(image_id, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
        }

        let [r, g, b] = self.background;
        let mut content = Content::new();
        content
            .set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
            .rect(0.0, 0.0, page_w, page_h)
            .fill_nonzero();
        content
            .save_state()
            .transform([page_w, 0.0, 0.0, image_h, 0.0, image_top - image_h])
            .x_object(Name(IMAGE_NAME))
            .restore_state();
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        self.pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        for (link, &annot_id) in page.links.iter().zip(&annot_ids) {
            let rect = self.link_rect(link);
            let mut annot = self.pdf.annotation(annot_id);
            annot
                .subtype(AnnotationType::Link)
                .rect(rect)
                .border(0.0, 0.0, 0.0, None);
            annot
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(link.url.as_bytes()));
        }

        {
            let mut pdf_page = self.pdf.page(page_id);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, page_w, page_h))
                .parent(self.pages_id)
                .contents(content_id);
            if !annot_ids.is_empty() {
                pdf_page.annotations(annot_ids.iter().copied());
            }
            let mut resources = pdf_page.resources();
            resources.x_objects().pair(Name(IMAGE_NAME), image_id);
        }

        log::debug!(
            "Page {}: {w}x{h}px image, {} links, {} bytes compressed",
            page.index + 1,
            annot_ids.len(),
            compressed_rgb.len(),
        );
        self.page_ids.push(page_id);
        Ok(())
    }
}
