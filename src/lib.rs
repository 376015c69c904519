mod error;
pub mod model;
pub mod paginate;
pub mod pdf;
pub mod source;

pub use error::Error;
pub use model::{PaginationOptions, RenderedDocument};
pub use paginate::Pagination;
pub use source::{DocumentSource, ManifestSource};

use std::path::Path;
use std::time::Instant;

use pdf::PdfWriter;

/// Paginate a rendered document and build the PDF in memory.
pub fn render(
    doc: &RenderedDocument,
    options: &PaginationOptions,
    title: Option<&str>,
) -> Result<(Vec<u8>, Pagination), Error> {
    let mut writer = PdfWriter::new(options.geometry, doc.background);
    let pagination = paginate::paginate(doc, options, &mut writer)?;
    let bytes = writer.finish(&pagination.outline, title);
    Ok((bytes, pagination))
}

pub fn convert_source_to_pdf(
    source: &dyn DocumentSource,
    options: &PaginationOptions,
    title: Option<&str>,
    output: &Path,
) -> Result<Pagination, Error> {
    let t0 = Instant::now();

    let doc = source.produce()?;
    if doc.bitmap.is_empty() {
        return Err(Error::InvalidInput(format!(
            "rendered document is empty ({}x{}px)",
            doc.bitmap.width(),
            doc.bitmap.height()
        )));
    }
    let t_load = t0.elapsed();

    let (bytes, pagination) = render(&doc, options, title)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: load={:.1}ms, paginate={:.1}ms, write={:.1}ms, total={:.1}ms ({} pages, output {} bytes)",
        t_load.as_secs_f64() * 1000.0,
        (t_render - t_load).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pagination.page_count(),
        bytes.len(),
    );

    Ok(pagination)
}

/// Convert using the options embedded in the manifest.
pub fn convert_manifest_to_pdf(manifest: &Path, output: &Path) -> Result<Pagination, Error> {
    let source = ManifestSource::open(manifest)?;
    let options = source.manifest().options;
    convert_source_to_pdf(&source, &options, None, output)
}
