use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;
use crate::model::{
    HeaderMark, LinkRegion, PaginationOptions, RenderedBitmap, RenderedDocument, Theme,
    parse_hex_color,
};

/// Anything that can rasterize a document and report where its headings
/// and links ended up.
pub trait DocumentSource {
    fn produce(&self) -> Result<RenderedDocument, Error>;
}

/// JSON sidecar written next to a full-height render.
///
/// ```json
/// {
///   "image": "render.png",
///   "device_pixel_scale": 2.0,
///   "theme": "dark",
///   "headers": [{ "level": 1, "text": "Intro", "offset_top": 0 }],
///   "links": [{ "x": 64, "y": 120, "width": 80, "height": 18, "url": "https://example.com" }],
///   "options": { "geometry": { "margin_top_mm": 15 } }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub image: PathBuf,
    /// Bitmap px per layout px. When absent it is inferred from the image
    /// width and `layout_content_width_px`.
    pub device_pixel_scale: Option<f32>,
    /// `#RRGGBB`; overrides `theme`.
    pub background: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub headers: Vec<HeaderMark>,
    #[serde(default)]
    pub links: Vec<LinkRegion>,
    #[serde(default)]
    pub options: PaginationOptions,
}

pub struct ManifestSource {
    manifest: Manifest,
    base_dir: PathBuf,
}

impl ManifestSource {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
                std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
            ),
            _ => Error::Io(e),
        })?;
        let manifest: Manifest = serde_json::from_str(&text)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        Ok(Self { manifest, base_dir })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_mut(&mut self) -> &mut Manifest {
        &mut self.manifest
    }

    pub fn image_path(&self) -> PathBuf {
        if self.manifest.image.is_absolute() {
            self.manifest.image.clone()
        } else {
            self.base_dir.join(&self.manifest.image)
        }
    }
}

impl DocumentSource for ManifestSource {
    fn produce(&self) -> Result<RenderedDocument, Error> {
        let path = self.image_path();
        let pixels = image::ImageReader::open(&path)
            .map_err(|e| Error::Source(format!("{}: {e}", path.display())))?
            .with_guessed_format()
            .map_err(|e| Error::Source(format!("{}: {e}", path.display())))?
            .decode()?
            .to_rgba8();

        let m = &self.manifest;
        let scale = m.device_pixel_scale.unwrap_or_else(|| {
            let inferred = pixels.width() as f32 / m.options.geometry.layout_content_width_px;
            log::info!("No device pixel scale given; inferred {inferred:.3} from image width");
            inferred
        });
        let background = match &m.background {
            Some(hex) => parse_hex_color(hex),
            None => m.theme.background(),
        };

        log::debug!(
            "Loaded {} ({}x{}px), {} headers, {} links",
            path.display(),
            pixels.width(),
            pixels.height(),
            m.headers.len(),
            m.links.len(),
        );

        Ok(RenderedDocument {
            bitmap: RenderedBitmap::new(pixels, scale),
            background,
            headers: m.headers.clone(),
            links: m.links.clone(),
        })
    }
}
