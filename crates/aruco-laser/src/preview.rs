//! PNG thumbnails of the first page of generated sheets.
//!
//! Rasterizing is delegated to poppler's `pdftoppm`; scaling and encoding use
//! the `image` crate.

use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Thumbnail settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewOptions {
    pub dpi: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            dpi: 150,
            max_width: 800,
            max_height: 600,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PreviewError {
    #[error("rasterizer `{0}` is not available")]
    RasterizerUnavailable(String),
    #[error("rasterizer failed on {document}: {message}")]
    RasterizerFailed { document: PathBuf, message: String },
    #[error("rasterizer produced no image for {0}")]
    MissingOutput(PathBuf),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Renders the first page of a document to a PNG file.
pub trait Rasterizer {
    fn is_available(&self) -> bool;

    /// Rasterize page 1 of `document` into `out_dir`; returns the PNG path.
    fn rasterize_first_page(
        &self,
        document: &Path,
        dpi: u32,
        out_dir: &Path,
    ) -> Result<PathBuf, PreviewError>;
}

/// poppler `pdftoppm` on the `PATH` (or at an explicit location).
#[derive(Clone, Debug)]
pub struct Pdftoppm {
    program: PathBuf,
}

impl Default for Pdftoppm {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl Pdftoppm {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

const PAGE_STEM: &str = "page";

impl Rasterizer for Pdftoppm {
    fn is_available(&self) -> bool {
        Command::new(&self.program).arg("-v").output().is_ok()
    }

    fn rasterize_first_page(
        &self,
        document: &Path,
        dpi: u32,
        out_dir: &Path,
    ) -> Result<PathBuf, PreviewError> {
        let output = Command::new(&self.program)
            .args(["-png", "-r", &dpi.to_string(), "-f", "1", "-l", "1", "-singlefile"])
            .arg(document)
            .arg(out_dir.join(PAGE_STEM))
            .output()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => {
                    PreviewError::RasterizerUnavailable(self.program.display().to_string())
                }
                _ => PreviewError::Io(err),
            })?;

        if !output.status.success() {
            return Err(PreviewError::RasterizerFailed {
                document: document.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let png = out_dir.join(format!("{PAGE_STEM}.png"));
        if png.is_file() {
            Ok(png)
        } else {
            Err(PreviewError::MissingOutput(document.to_path_buf()))
        }
    }
}

/// Size that fits `(width, height)` into the bounds, keeping the aspect ratio.
///
/// Images already inside the bounds are left alone; no side drops below 1.
pub fn thumbnail_size(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));
    (w, h)
}

/// `<output_dir>/<stem>_preview.png`.
pub fn preview_path(document: &Path, output_dir: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}_preview.png"))
}

/// `*.pdf` files directly inside `dir`, sorted by path.
pub fn collect_documents(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut docs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            docs.push(path);
        }
    }
    docs.sort();
    Ok(docs)
}

fn try_thumbnail<R>(
    rasterizer: &R,
    document: &Path,
    output_dir: &Path,
    options: &PreviewOptions,
) -> Result<PathBuf, PreviewError>
where
    R: Rasterizer + ?Sized,
{
    let scratch = tempfile::tempdir()?;
    let png = rasterizer.rasterize_first_page(document, options.dpi, scratch.path())?;
    let mut img = image::open(&png)?;

    let (width, height) = img.dimensions();
    let (w, h) = thumbnail_size(width, height, options.max_width, options.max_height);
    if (w, h) != (width, height) {
        img = img.resize_exact(w, h, FilterType::Lanczos3);
    }

    fs::create_dir_all(output_dir)?;
    let target = preview_path(document, output_dir);
    img.save_with_format(&target, ImageFormat::Png)?;
    log::debug!(
        "{}: {width}x{height} -> {w}x{h}",
        document.display()
    );
    Ok(target)
}

/// Rasterize, shrink and save the first page of `document`.
///
/// Failures are logged and reported as `None`.
pub fn render_first_page_thumbnail<R>(
    rasterizer: &R,
    document: &Path,
    output_dir: &Path,
    options: &PreviewOptions,
) -> Option<PathBuf>
where
    R: Rasterizer + ?Sized,
{
    match try_thumbnail(rasterizer, document, output_dir, options) {
        Ok(path) => Some(path),
        Err(err) => {
            log::error!("preview of {} failed: {err}", document.display());
            None
        }
    }
}

/// Outcome of a preview run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewSummary {
    pub created: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Thumbnail every document in order.
pub fn generate_previews<R>(
    rasterizer: &R,
    documents: &[PathBuf],
    output_dir: &Path,
    options: &PreviewOptions,
) -> PreviewSummary
where
    R: Rasterizer + ?Sized,
{
    let mut summary = PreviewSummary::default();
    for (idx, document) in documents.iter().enumerate() {
        log::info!(
            "[{}/{}] Processing {}...",
            idx + 1,
            documents.len(),
            document.display()
        );
        match render_first_page_thumbnail(rasterizer, document, output_dir, options) {
            Some(path) => {
                log::info!("  ✓ Created {}", path.display());
                summary.created.push(path);
            }
            None => summary.failed.push(document.clone()),
        }
    }
    summary
}
