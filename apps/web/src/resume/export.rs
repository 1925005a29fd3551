//! PDF export of a composed resume.
//!
//! The composed strip is drawn onto A4 pages at the offsets produced by
//! `layout::paginate`, using the built-in Helvetica faces so no font files
//! are needed. `printpdf` documents are not `Send`; build them inside
//! `spawn_blocking` and hand back only the bytes.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use thiserror::Error;

use crate::layout::compose::{ComposedResume, Ink, PageConfig};
use crate::layout::font_metrics::FontFace;
use crate::layout::paginate::{page_offsets, position_on_page};
use crate::resume::document::ResumeDocument;

const LAYER_NAME: &str = "Resume";
const RULE_GRAY: f32 = 0.61;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF composition failed: {0}")]
    Pdf(String),
}

fn pdf_error<E: std::fmt::Debug>(e: E) -> ExportError {
    ExportError::Pdf(format!("{e:?}"))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Oblique => &self.oblique,
        }
    }
}

/// Renders the strip to PDF bytes, one page per pagination offset.
pub fn export_pdf(
    composed: &ComposedResume,
    config: &PageConfig,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    let width = Mm(config.page_width_mm);
    let height = Mm(config.page_height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
        oblique: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_error)?,
    };

    for (index, offset) in page_offsets(composed.height_mm, config.page_height_mm)
        .into_iter()
        .enumerate()
    {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page).get_layer(layer)
        };
        draw_page(&layer, composed, config, &fonts, offset);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn draw_page(
    layer: &PdfLayerReference,
    composed: &ComposedResume,
    config: &PageConfig,
    fonts: &Fonts,
    offset_mm: f32,
) {
    let page_height = config.page_height_mm;

    layer.set_outline_color(gray(RULE_GRAY));
    layer.set_outline_thickness(0.5);
    for rule in &composed.rules {
        if let Some(y) = position_on_page(rule.y_mm, offset_mm, page_height) {
            // PDF y grows upwards from the bottom edge
            let y = Mm(page_height - y);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(rule.x_start_mm), y), false),
                    (Point::new(Mm(rule.x_end_mm), y), false),
                ],
                is_closed: false,
            });
        }
    }

    for text in &composed.texts {
        // a line belongs to the page its baseline falls on
        let Some(y) = position_on_page(text.baseline_mm, offset_mm, page_height) else {
            continue;
        };
        layer.set_fill_color(ink_color(text.ink));
        layer.use_text(
            pdf_safe_text(&text.text),
            text.size_pt,
            Mm(text.x_mm),
            Mm(page_height - y),
            fonts.get(text.face),
        );
    }
}

fn ink_color(ink: Ink) -> Color {
    let (r, g, b) = ink.rgb();
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn gray(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

/// Maps text onto the ASCII range the built-in fonts are drawn with.
pub fn pdf_safe_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c,
            '\u{2022}' | '\u{00b7}' => '|',
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            c if c.is_whitespace() => ' ',
            _ => '?',
        })
        .collect()
}

/// `{name}_resume.pdf`, with characters that are unsafe in a filename or an
/// HTTP header replaced.
pub fn download_filename(document: &ResumeDocument) -> String {
    match document.subject_name() {
        Some(name) => {
            let safe: String = name
                .chars()
                .map(|c| match c {
                    '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                    c if c.is_ascii_graphic() || c == ' ' => c,
                    _ => '_',
                })
                .collect();
            format!("{safe}_resume.pdf")
        }
        None => "resume.pdf".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compose::{compose, default_page_config};
    use crate::resume::document::DocumentPersonalInfo;
    use crate::resume::render::render;
    use crate::state::test_helpers::sample_document;

    #[test]
    fn test_export_produces_pdf_bytes() {
        let config = default_page_config();
        let composed = compose(&render(&sample_document()), &config);
        let bytes = export_pdf(&composed, &config, "John Doe").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_spans_multiple_pages() {
        let config = default_page_config();
        let mut document = sample_document();
        document.professional_summary = Some("Shipped reliable systems. ".repeat(600));
        let composed = compose(&render(&document), &config);
        assert!(page_offsets(composed.height_mm, config.page_height_mm).len() > 1);

        let bytes = export_pdf(&composed, &config, "John Doe").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_safe_text_replaces_non_ascii() {
        assert_eq!(
            pdf_safe_text("john@example.com • +1 — “ok”"),
            "john@example.com | +1 - \"ok\""
        );
        assert_eq!(pdf_safe_text("José"), "Jos?");
    }

    #[test]
    fn test_download_filename_uses_subject_name() {
        assert_eq!(
            download_filename(&sample_document()),
            "John Doe_resume.pdf"
        );
    }

    #[test]
    fn test_download_filename_sanitizes_and_falls_back() {
        let mut document = ResumeDocument::default();
        assert_eq!(download_filename(&document), "resume.pdf");

        document.personal_info = Some(DocumentPersonalInfo {
            name: Some("A/B \"C\"".to_string()),
            ..Default::default()
        });
        assert_eq!(download_filename(&document), "A_B _C__resume.pdf");
    }
}
