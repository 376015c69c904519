use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use slicepdf::model::{LinkScale, OutlineEntry, PageBoundary, Theme};
use slicepdf::{DocumentSource, ManifestSource};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LinkScaleArg {
    Bitmap,
    LayoutWidth,
}

/// Paginate a tall rendered document image into a PDF with links and bookmarks.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON manifest describing the render, its headings and links
    manifest: PathBuf,

    /// Output file (default: <manifest stem>-YYYYMMDD.pdf next to the manifest)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,

    /// Page background as #RRGGBB, overrides --theme
    #[arg(long)]
    background: Option<String>,

    /// Bitmap pixels per layout pixel
    #[arg(long)]
    scale: Option<f32>,

    #[arg(long, value_name = "MM")]
    page_width: Option<f32>,

    #[arg(long, value_name = "MM")]
    page_height: Option<f32>,

    #[arg(long, value_name = "MM")]
    margin_top: Option<f32>,

    #[arg(long, value_name = "MM")]
    margin_bottom: Option<f32>,

    #[arg(long, value_enum)]
    link_scale: Option<LinkScaleArg>,

    /// Document title stored in the PDF metadata
    #[arg(long)]
    title: Option<String>,

    /// Print page boundaries and bookmarks as JSON
    #[arg(long)]
    dump_pages: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct PageDump<'a> {
    boundaries: &'a [PageBoundary],
    outline: &'a [OutlineEntry],
}

fn default_output(manifest: &Path) -> PathBuf {
    let stem = manifest
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let date = chrono::Local::now().format("%Y%m%d");
    manifest.with_file_name(format!("{stem}-{date}.pdf"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut source = match ManifestSource::open(&cli.manifest) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let manifest = source.manifest_mut();
    if let Some(theme) = cli.theme {
        manifest.theme = match theme {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        };
        manifest.background = None;
    }
    if cli.background.is_some() {
        manifest.background = cli.background.clone();
    }
    if cli.scale.is_some() {
        manifest.device_pixel_scale = cli.scale;
    }

    let options = &mut manifest.options;
    if let Some(v) = cli.page_width {
        options.geometry.page_width_mm = v;
    }
    if let Some(v) = cli.page_height {
        options.geometry.page_height_mm = v;
    }
    if let Some(v) = cli.margin_top {
        options.geometry.margin_top_mm = v;
    }
    if let Some(v) = cli.margin_bottom {
        options.geometry.margin_bottom_mm = v;
    }
    if let Some(v) = cli.link_scale {
        options.link_scale = match v {
            LinkScaleArg::Bitmap => LinkScale::Bitmap,
            LinkScaleArg::LayoutWidth => LinkScale::LayoutWidth,
        };
    }
    let options = *options;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.manifest));

    let source: &dyn DocumentSource = &source;
    match slicepdf::convert_source_to_pdf(source, &options, cli.title.as_deref(), &output) {
        Ok(pagination) => {
            if cli.dump_pages {
                let dump = PageDump {
                    boundaries: &pagination.boundaries,
                    outline: &pagination.outline,
                };
                match serde_json::to_string_pretty(&dump) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            }
            eprintln!(
                "Wrote {} ({} pages, {} bookmarks)",
                output.display(),
                pagination.page_count(),
                pagination.outline.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
