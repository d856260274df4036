//! PDF output for marker sheets.
//!
//! [`PdfSink`] implements [`DrawCommandSink`] on top of `pdf-writer`. Pages
//! are buffered in memory as finished content streams; nothing touches the
//! filesystem until [`PdfSink::save`] is called, so a sink dropped on an error
//! path leaves no partial file behind.

use aruco_laser_core::font_metrics::LABEL_FONT;
use aruco_laser_core::{DrawCommand, DrawCommandSink, PageSize, Rect, Rgb};
use pdf_writer::{Content, Finish, Name, Pdf, Rect as PdfRect, Ref, Str, TextStr};
use std::path::Path;

const FONT_RESOURCE: Name<'static> = Name(b"F1");
const PRODUCER: &str = concat!("aruco-laser ", env!("CARGO_PKG_VERSION"));

/// Errors produced by the PDF backend.
#[derive(thiserror::Error, Debug)]
pub enum PdfError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("draw command has non-finite geometry: {0:?}")]
    NonFiniteGeometry(DrawCommand),
}

/// Current stroke/fill state of the open page, to avoid repeating operators.
#[derive(Clone, Copy, Default)]
struct GraphicsState {
    fill: Option<Rgb>,
    stroke: Option<Rgb>,
    line_width: Option<f64>,
}

/// Paginated PDF document under construction.
pub struct PdfSink {
    width: f64,
    height: f64,
    title: Option<String>,
    finished: Vec<Vec<u8>>,
    current: Content,
    state: GraphicsState,
    commands: usize,
}

impl PdfSink {
    /// Start a document whose pages are `width × height` points.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            title: None,
            finished: Vec::new(),
            current: Content::new(),
            state: GraphicsState::default(),
            commands: 0,
        }
    }

    pub fn for_page(page: PageSize) -> Self {
        Self::new(page.width(), page.height())
    }

    /// Set the document title stored in the info dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Pages so far, including the open one.
    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    /// Draw commands accepted so far.
    pub fn command_count(&self) -> usize {
        self.commands
    }

    /// Serialize the document.
    pub fn finish(mut self) -> Vec<u8> {
        let last = std::mem::replace(&mut self.current, Content::new());
        self.finished.push(last.finish().to_vec());

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let font_id = alloc.bump();
        let info_id = alloc.bump();
        let page_ids: Vec<(Ref, Ref)> = self
            .finished
            .iter()
            .map(|_| (alloc.bump(), alloc.bump()))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);

        let media_box = PdfRect::new(0.0, 0.0, self.width as f32, self.height as f32);
        for ((page_id, content_id), stream) in page_ids.iter().zip(&self.finished) {
            let mut page = pdf.page(*page_id);
            page.media_box(media_box);
            page.parent(tree_id);
            page.contents(*content_id);
            page.resources().fonts().pair(FONT_RESOURCE, font_id);
            page.finish();
            pdf.stream(*content_id, stream);
        }

        pdf.type1_font(font_id)
            .base_font(Name(LABEL_FONT.as_bytes()));

        let mut info = pdf.document_info(info_id);
        info.producer(TextStr(PRODUCER));
        if let Some(title) = &self.title {
            info.title(TextStr(title));
        }
        info.finish();

        log::debug!(
            "serialized PDF: {} pages, {} draw commands",
            self.finished.len(),
            self.commands
        );
        pdf.finish()
    }

    /// Serialize the document and write it to `path`.
    pub fn save(self, path: impl AsRef<Path>) -> Result<(), PdfError> {
        let path = path.as_ref();
        let bytes = self.finish();
        std::fs::write(path, &bytes)?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn set_fill(&mut self, color: Rgb) {
        if self.state.fill != Some(color) {
            self.current.set_fill_rgb(color.r, color.g, color.b);
            self.state.fill = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Rgb, line_width: f64) {
        if self.state.stroke != Some(color) {
            self.current.set_stroke_rgb(color.r, color.g, color.b);
            self.state.stroke = Some(color);
        }
        if self.state.line_width != Some(line_width) {
            self.current.set_line_width(line_width as f32);
            self.state.line_width = Some(line_width);
        }
    }

    fn rect(&mut self, rect: &Rect) {
        self.current.rect(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        );
    }
}

fn is_finite(command: &DrawCommand) -> bool {
    match command {
        DrawCommand::FilledRect {
            rect, line_width, ..
        }
        | DrawCommand::StrokedRect {
            rect, line_width, ..
        } => [rect.x, rect.y, rect.width, rect.height, *line_width]
            .iter()
            .all(|v| v.is_finite()),
        DrawCommand::Text {
            x, y, font_size, ..
        } => [*x, *y, *font_size].iter().all(|v| v.is_finite()),
    }
}

impl DrawCommandSink for PdfSink {
    type Error = PdfError;

    fn draw(&mut self, command: &DrawCommand) -> Result<(), PdfError> {
        if !is_finite(command) {
            return Err(PdfError::NonFiniteGeometry(command.clone()));
        }

        match command {
            DrawCommand::FilledRect {
                rect,
                color,
                line_width,
            } => {
                self.set_fill(*color);
                self.set_stroke(*color, *line_width);
                self.rect(rect);
                self.current.fill_nonzero_and_stroke();
            }
            DrawCommand::StrokedRect {
                rect,
                color,
                line_width,
            } => {
                self.set_stroke(*color, *line_width);
                self.rect(rect);
                self.current.stroke();
            }
            DrawCommand::Text {
                x,
                y,
                text,
                font_size,
                color,
            } => {
                self.set_fill(*color);
                self.current
                    .begin_text()
                    .set_font(FONT_RESOURCE, *font_size as f32)
                    .next_line(*x as f32, *y as f32)
                    .show(Str(text.as_bytes()))
                    .end_text();
            }
        }
        self.commands += 1;
        Ok(())
    }

    fn page_break(&mut self) -> Result<(), PdfError> {
        let page = std::mem::replace(&mut self.current, Content::new());
        self.finished.push(page.finish().to_vec());
        self.state = GraphicsState::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle)
            .count()
    }

    #[test]
    fn empty_document_has_one_page() {
        let bytes = PdfSink::for_page(PageSize::Letter).finish();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Type /Page\n"), 1);
        assert_eq!(count(&bytes, b"/Count 1"), 1);
        assert_eq!(count(&bytes, b"/MediaBox"), 1);
    }

    #[test]
    fn page_breaks_add_pages() {
        let mut sink = PdfSink::for_page(PageSize::A4).with_title("sheet");
        sink.page_break().unwrap();
        sink.page_break().unwrap();
        assert_eq!(sink.page_count(), 3);
        let bytes = sink.finish();
        assert_eq!(count(&bytes, b"/Count 3"), 1);
        assert_eq!(count(&bytes, b"/BaseFont /Helvetica"), 1);
        assert_eq!(count(&bytes, b"(sheet)"), 1);
    }

    #[test]
    fn colors_are_emitted_once_per_state_change() {
        let mut sink = PdfSink::for_page(PageSize::A4);
        let cell = DrawCommand::FilledRect {
            rect: Rect::square(10.0, 10.0, 2.0),
            color: Rgb::ENGRAVE,
            line_width: 0.1,
        };
        sink.draw(&cell).unwrap();
        sink.draw(&cell).unwrap();
        sink.draw(&DrawCommand::StrokedRect {
            rect: Rect::square(0.0, 0.0, 20.0),
            color: Rgb::CUT,
            line_width: 0.1,
        })
        .unwrap();
        assert_eq!(sink.command_count(), 3);

        let bytes = sink.finish();
        assert_eq!(count(&bytes, b"0 0 1 rg"), 1);
        assert_eq!(count(&bytes, b"0 0 1 RG"), 1);
        assert_eq!(count(&bytes, b"1 0 0 RG"), 1);
        assert_eq!(count(&bytes, b" re\nB\n"), 2);
        assert_eq!(count(&bytes, b" re\nS\n"), 1);
    }

    #[test]
    fn rejects_non_finite_geometry() {
        let mut sink = PdfSink::for_page(PageSize::A4);
        let err = sink
            .draw(&DrawCommand::Text {
                x: f64::NAN,
                y: 0.0,
                text: "0".into(),
                font_size: 6.0,
                color: Rgb::LABEL,
            })
            .unwrap_err();
        assert!(matches!(err, PdfError::NonFiniteGeometry(_)));
        assert_eq!(sink.command_count(), 0);
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        PdfSink::for_page(PageSize::A4).save(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.ends_with(b"%%EOF") || bytes.ends_with(b"%%EOF\n"));
    }
}
