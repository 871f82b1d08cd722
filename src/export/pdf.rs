//! Quiz PDF export — a two-column question/answer table.
//!
//! [`QuizExporter`] is the collaborator interface the state controller hands
//! a finished quiz to; [`PdfExporter`] is the production implementation,
//! rendering with `printpdf` and saving `<title>_quiz.pdf` into the output
//! directory.
//!
//! Layout follows the original export styling: a localized document title,
//! a filled header row (white on blue), 80 mm / 100 mm columns, 10 pt body
//! text in a light grid.  Malayalam quizzes embed the fetched Noto Sans
//! Malayalam face; any font problem degrades to the built-in Helvetica
//! (glyphs suffer, the table survives) and is only logged.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};
use thiserror::Error;

use crate::export::font::FontSource;
use crate::locale::Language;
use crate::quiz::QuizItem;

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// The export could not be completed.
///
/// Font problems are deliberately absent here — they degrade, they do not
/// fail the export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

// ---------------------------------------------------------------------------
// QuizExporter trait
// ---------------------------------------------------------------------------

/// Collaborator that turns a finished quiz into a downloadable document.
///
/// Implementors must be `Send + Sync` so the exporter can be shared like
/// the other service collaborators.
#[async_trait]
pub trait QuizExporter: Send + Sync {
    /// Export `items` under `title`, localized for `language`.
    ///
    /// Returns the path of the written document.
    async fn export(
        &self,
        items: &[QuizItem],
        title: &str,
        language: Language,
    ) -> Result<PathBuf, ExportError>;
}

// Compile-time assertion: Box<dyn QuizExporter> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn QuizExporter>) {}
};

// ---------------------------------------------------------------------------
// Layout constants (A4 portrait, millimetres)
// ---------------------------------------------------------------------------

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_LEFT: f32 = 14.0;
const TITLE_Y: f32 = PAGE_H - 15.0;
const TABLE_TOP: f32 = PAGE_H - 25.0;
const COL_QUESTION_W: f32 = 80.0;
const COL_ANSWER_W: f32 = 100.0;
const HEADER_H: f32 = 9.0;
const LINE_HEIGHT: f32 = 5.0;
const CELL_PAD: f32 = 2.5;
const BOTTOM_MARGIN: f32 = 15.0;

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;

/// Rough glyphs-per-line at 10 pt for each column.  `printpdf` has no text
/// measurement, so wrapping is by character count — the same compromise for
/// Latin and Malayalam.
const QUESTION_WRAP: usize = 42;
const ANSWER_WRAP: usize = 54;

// ---------------------------------------------------------------------------
// PdfExporter
// ---------------------------------------------------------------------------

/// Renders the quiz as `<title>_quiz.pdf` in the output directory.
pub struct PdfExporter {
    output_dir: PathBuf,
    fonts: FontSource,
}

impl PdfExporter {
    pub fn new(output_dir: PathBuf, fonts: FontSource) -> Self {
        Self { output_dir, fonts }
    }
}

#[async_trait]
impl QuizExporter for PdfExporter {
    async fn export(
        &self,
        items: &[QuizItem],
        title: &str,
        language: Language,
    ) -> Result<PathBuf, ExportError> {
        // Malayalam needs the supplementary face; a load failure degrades to
        // the built-in font and is not surfaced.
        let font_bytes = if language == Language::Ml {
            match self.fonts.load().await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::warn!("could not load Malayalam font ({e}); using the built-in font");
                    None
                }
            }
        } else {
            None
        };

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{title}_quiz.pdf"));
        render_pdf(items, language, font_bytes, &path)?;

        log::info!("quiz PDF written: {}", path.display());
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn builtin_font(doc: &PdfDocumentReference) -> Result<IndirectFontRef, ExportError> {
    doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

fn render_pdf(
    items: &[QuizItem],
    language: Language,
    font_bytes: Option<Vec<u8>>,
    path: &Path,
) -> Result<(), ExportError> {
    let strings = language.strings();
    let (doc, page, layer) =
        PdfDocument::new(strings.quiz_title, Mm(PAGE_W), Mm(PAGE_H), "table");

    let font = match font_bytes {
        Some(bytes) => match doc.add_external_font(bytes.as_slice()) {
            Ok(font) => font,
            Err(e) => {
                log::warn!("could not embed Malayalam font ({e}); using the built-in font");
                builtin_font(&doc)?
            }
        },
        None => builtin_font(&doc)?,
    };

    let mut layer_ref = doc.get_page(page).get_layer(layer);

    set_fill(&layer_ref, 0.0, 0.0, 0.0);
    layer_ref.use_text(strings.quiz_title, TITLE_SIZE, Mm(MARGIN_LEFT), Mm(TITLE_Y), &font);

    let mut y = TABLE_TOP;
    draw_header_row(&layer_ref, &font, strings.question, strings.answer, y);
    y -= HEADER_H;

    for item in items {
        let q_lines = wrap_text(&item.question, QUESTION_WRAP);
        let a_lines = wrap_text(&item.answer, ANSWER_WRAP);
        let row_h = q_lines.len().max(a_lines.len()) as f32 * LINE_HEIGHT + 2.0 * CELL_PAD;

        if y - row_h < BOTTOM_MARGIN {
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "table");
            layer_ref = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_H - BOTTOM_MARGIN;
            draw_header_row(&layer_ref, &font, strings.question, strings.answer, y);
            y -= HEADER_H;
        }

        draw_row(&layer_ref, &font, &q_lines, &a_lines, y, row_h);
        y -= row_h;
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

fn set_fill(layer: &PdfLayerReference, r: f32, g: f32, b: f32) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn draw_header_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    question: &str,
    answer: &str,
    top: f32,
) {
    // Filled band, white header text (RGB 41/128/185 from the original theme).
    set_fill(layer, 41.0 / 255.0, 128.0 / 255.0, 185.0 / 255.0);
    let band = Rect::new(
        Mm(MARGIN_LEFT),
        Mm(top - HEADER_H),
        Mm(MARGIN_LEFT + COL_QUESTION_W + COL_ANSWER_W),
        Mm(top),
    )
    .with_mode(PaintMode::Fill);
    layer.add_rect(band);

    set_fill(layer, 1.0, 1.0, 1.0);
    let baseline = top - HEADER_H + 3.0;
    layer.use_text(question, HEADER_SIZE, Mm(MARGIN_LEFT + CELL_PAD), Mm(baseline), font);
    layer.use_text(
        answer,
        HEADER_SIZE,
        Mm(MARGIN_LEFT + COL_QUESTION_W + CELL_PAD),
        Mm(baseline),
        font,
    );

    // Back to body text colour.
    set_fill(layer, 0.0, 0.0, 0.0);
}

fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    q_lines: &[String],
    a_lines: &[String],
    top: f32,
    row_h: f32,
) {
    let mut baseline = top - CELL_PAD - 3.5;
    for line in q_lines {
        layer.use_text(line.as_str(), BODY_SIZE, Mm(MARGIN_LEFT + CELL_PAD), Mm(baseline), font);
        baseline -= LINE_HEIGHT;
    }

    baseline = top - CELL_PAD - 3.5;
    for line in a_lines {
        layer.use_text(
            line.as_str(),
            BODY_SIZE,
            Mm(MARGIN_LEFT + COL_QUESTION_W + CELL_PAD),
            Mm(baseline),
            font,
        );
        baseline -= LINE_HEIGHT;
    }

    // Light grid: verticals on the three column edges, horizontal rule
    // under the row.
    layer.set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
    layer.set_outline_thickness(0.2);

    let bottom = top - row_h;
    let right = MARGIN_LEFT + COL_QUESTION_W + COL_ANSWER_W;
    stroke_line(layer, MARGIN_LEFT, top, MARGIN_LEFT, bottom);
    stroke_line(layer, MARGIN_LEFT + COL_QUESTION_W, top, MARGIN_LEFT + COL_QUESTION_W, bottom);
    stroke_line(layer, right, top, right, bottom);
    stroke_line(layer, MARGIN_LEFT, bottom, right, bottom);
}

fn stroke_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y1)), false),
            (Point::new(Mm(x2), Mm(y2)), false),
        ],
        is_closed: false,
    });
}

// ---------------------------------------------------------------------------
// Text wrapping
// ---------------------------------------------------------------------------

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// Words longer than a line are hard-split.  Always returns at least one
/// (possibly empty) line so every table row has height.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if word_len > max_chars {
            // Hard-split an over-long word across lines.
            for ch in word.chars() {
                if current_len == max_chars {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(ch);
                current_len += 1;
            }
        } else {
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;

    fn sample_quiz(n: usize) -> Vec<QuizItem> {
        (0..n)
            .map(|i| QuizItem {
                question: format!("Question number {i} about the water cycle and its stages?"),
                answer: format!("Answer number {i}: evaporation, condensation, precipitation."),
            })
            .collect()
    }

    fn exporter(dir: &Path) -> PdfExporter {
        PdfExporter::new(dir.to_path_buf(), FontSource::from_config(&ExportConfig::default()))
    }

    // ---- wrap_text ---

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text("short", 42), vec!["short"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn hard_splits_over_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn empty_text_still_yields_a_line() {
        assert_eq!(wrap_text("", 42), vec![""]);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        // Multi-byte Malayalam text must wrap by glyph count.
        let lines = wrap_text("ചോദ്യം ഉത്തരം", 6);
        assert!(lines.len() >= 2);
    }

    // ---- PdfExporter ---

    #[tokio::test]
    async fn writes_title_quiz_pdf_into_the_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = exporter(dir.path())
            .export(&sample_quiz(5), "Quiz", Language::En)
            .await
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "Quiz_quiz.pdf");
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[tokio::test]
    async fn long_quizzes_paginate_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = exporter(dir.path())
            .export(&sample_quiz(60), "Quiz", Language::En)
            .await
            .unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn malayalam_export_survives_a_broken_font_source() {
        let dir = tempfile::tempdir().unwrap();
        let font_file = dir.path().join("broken.ttf");
        std::fs::write(&font_file, b"definitely not a ttf").unwrap();

        let mut config = ExportConfig::default();
        config.malayalam_font_file = Some(font_file);
        let exporter = PdfExporter::new(dir.path().to_path_buf(), FontSource::from_config(&config));

        // Embedding fails, fallback kicks in, export still succeeds.
        let quiz = vec![QuizItem {
            question: "ജലചക്രം എന്താണ്?".into(),
            answer: "നീരാവിയും മഴയും ചേർന്ന ചക്രം.".into(),
        }];
        let path = exporter.export(&quiz, "Quiz", Language::Ml).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn creates_the_output_directory_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports/pdfs");
        let path = exporter(&nested)
            .export(&sample_quiz(1), "Quiz", Language::En)
            .await
            .unwrap();
        assert!(path.starts_with(&nested));
    }
}
