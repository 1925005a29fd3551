//! Places a rendered resume onto one continuous content strip the width of
//! the page, at a fixed scale.
//!
//! Coordinates are millimetres measured down from the top of the strip. The
//! strip is later cut into pages by `paginate`, which knows nothing about the
//! content, so lines are never reflowed across a page break.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::resume::render::{RenderedItem, RenderedResume, RenderedSection};

pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Page geometry and type scale for the exported document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub name_size_pt: f32,
    pub heading_size_pt: f32,
    pub item_size_pt: f32,
    pub body_size_pt: f32,
    /// Line box height as a multiple of the font size.
    pub line_height: f32,
}

/// A4 portrait, 15 mm margins, 1.6 line height.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_mm: 15.0,
        name_size_pt: 22.0,
        heading_size_pt: 13.0,
        item_size_pt: 11.0,
        body_size_pt: 10.0,
        line_height: 1.6,
    }
}

impl PageConfig {
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ink {
    /// Names and item headings.
    Strong,
    /// Section headings.
    Heading,
    Body,
    /// Dates and secondary lines.
    Muted,
}

impl Ink {
    /// RGB components in 0.0..=1.0.
    pub fn rgb(self) -> (f32, f32, f32) {
        match self {
            Ink::Strong => (0.067, 0.094, 0.153),
            Ink::Heading => (0.122, 0.161, 0.216),
            Ink::Body => (0.216, 0.255, 0.318),
            Ink::Muted => (0.294, 0.333, 0.388),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    pub text: String,
    pub face: FontFace,
    pub size_pt: f32,
    pub ink: Ink,
    pub x_mm: f32,
    pub baseline_mm: f32,
}

/// Horizontal rule under the header and section headings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRule {
    pub x_start_mm: f32,
    pub x_end_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedResume {
    pub texts: Vec<PlacedText>,
    pub rules: Vec<PlacedRule>,
    pub height_mm: f32,
}

pub fn compose(resume: &RenderedResume, config: &PageConfig) -> ComposedResume {
    let mut composer = Composer::new(config);

    if !resume.header.name.is_empty() {
        composer.centered(&resume.header.name, FontFace::Bold, config.name_size_pt, Ink::Strong);
    }
    if let Some(contact) = &resume.header.contact {
        composer.centered(contact, FontFace::Regular, config.body_size_pt, Ink::Body);
    }
    composer.rule();
    composer.gap(4.0);

    for section in &resume.sections {
        composer.section(section);
    }

    composer.finish()
}

struct Composer<'a> {
    config: &'a PageConfig,
    texts: Vec<PlacedText>,
    rules: Vec<PlacedRule>,
    cursor_mm: f32,
}

impl<'a> Composer<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            texts: Vec::new(),
            rules: Vec::new(),
            cursor_mm: config.margin_mm,
        }
    }

    fn finish(self) -> ComposedResume {
        ComposedResume {
            texts: self.texts,
            rules: self.rules,
            height_mm: self.cursor_mm + self.config.margin_mm,
        }
    }

    fn gap(&mut self, mm: f32) {
        self.cursor_mm += mm;
    }

    /// Advances one line box and returns its baseline.
    fn next_baseline(&mut self, size_pt: f32) -> f32 {
        let size_mm = size_pt * PT_TO_MM;
        let line_mm = size_mm * self.config.line_height;
        // baseline sits roughly where the browser puts it for a 1.6 line box
        let baseline = self.cursor_mm + (line_mm + size_mm * 0.7) / 2.0;
        self.cursor_mm += line_mm;
        baseline
    }

    fn width_em(&self, size_pt: f32, indent_mm: f32) -> f32 {
        (self.config.content_width_mm() - indent_mm) / (size_pt * PT_TO_MM)
    }

    fn centered(&mut self, text: &str, face: FontFace, size_pt: f32, ink: Ink) {
        let metrics = get_metrics(face);
        for line in metrics.wrap(text, self.width_em(size_pt, 0.0)) {
            let width_mm = metrics.measure_str(&line) * size_pt * PT_TO_MM;
            let x_mm = self.config.margin_mm + (self.config.content_width_mm() - width_mm) / 2.0;
            let baseline_mm = self.next_baseline(size_pt);
            self.texts.push(PlacedText {
                text: line,
                face,
                size_pt,
                ink,
                x_mm,
                baseline_mm,
            });
        }
    }

    fn wrapped(&mut self, text: &str, face: FontFace, size_pt: f32, ink: Ink, indent_mm: f32) {
        let metrics = get_metrics(face);
        for line in metrics.wrap(text, self.width_em(size_pt, indent_mm)) {
            let baseline_mm = self.next_baseline(size_pt);
            self.texts.push(PlacedText {
                text: line,
                face,
                size_pt,
                ink,
                x_mm: self.config.margin_mm + indent_mm,
                baseline_mm,
            });
        }
    }

    fn rule(&mut self) {
        self.gap(1.0);
        self.rules.push(PlacedRule {
            x_start_mm: self.config.margin_mm,
            x_end_mm: self.config.page_width_mm - self.config.margin_mm,
            y_mm: self.cursor_mm,
        });
        self.gap(1.5);
    }

    fn section(&mut self, section: &RenderedSection) {
        let size = self.config.heading_size_pt;
        self.wrapped(
            &section.kind.heading().to_uppercase(),
            FontFace::Bold,
            size,
            Ink::Heading,
            0.0,
        );
        self.rule();

        if let Some(paragraph) = &section.paragraph {
            self.wrapped(paragraph, FontFace::Regular, self.config.body_size_pt, Ink::Body, 0.0);
        }
        for item in &section.items {
            self.item(item);
            self.gap(1.5);
        }
        self.gap(4.0);
    }

    fn item(&mut self, item: &RenderedItem) {
        let size = self.config.item_size_pt;
        let body = self.config.body_size_pt;

        self.item_heading(item, size);
        if let Some(detail) = &item.detail {
            self.wrapped(detail, FontFace::Regular, body, Ink::Muted, 0.0);
        }
        if let Some(text) = &item.body {
            self.wrapped(text, FontFace::Regular, body, Ink::Body, 0.0);
        }
        for bullet in &item.bullets {
            let bullet_indent = 4.0;
            let before = self.texts.len();
            self.wrapped(bullet, FontFace::Regular, body, Ink::Body, bullet_indent);
            if let Some(first) = self.texts.get(before).cloned() {
                self.texts.push(PlacedText {
                    text: "-".to_string(),
                    x_mm: self.config.margin_mm + 1.0,
                    ..first
                });
            }
        }
    }

    /// "Heading - aside" on one line when it fits, otherwise heading and
    /// aside wrapped on their own lines.
    fn item_heading(&mut self, item: &RenderedItem, size_pt: f32) {
        let bold = get_metrics(FontFace::Bold);
        let Some(aside) = &item.aside else {
            self.wrapped(&item.heading, FontFace::Bold, size_pt, Ink::Strong, 0.0);
            return;
        };

        let aside_face = if aside.italic {
            FontFace::Oblique
        } else {
            FontFace::Bold
        };
        let lead = if item.heading.is_empty() {
            String::new()
        } else {
            format!("{} - ", item.heading)
        };
        let lead_em = bold.measure_str(&lead);
        let aside_em = get_metrics(aside_face).measure_str(&aside.text);

        if lead_em + aside_em <= self.width_em(size_pt, 0.0) {
            let baseline_mm = self.next_baseline(size_pt);
            if !lead.is_empty() {
                self.texts.push(PlacedText {
                    text: lead,
                    face: FontFace::Bold,
                    size_pt,
                    ink: Ink::Strong,
                    x_mm: self.config.margin_mm,
                    baseline_mm,
                });
            }
            self.texts.push(PlacedText {
                text: aside.text.clone(),
                face: aside_face,
                size_pt,
                ink: Ink::Strong,
                x_mm: self.config.margin_mm + lead_em * size_pt * PT_TO_MM,
                baseline_mm,
            });
        } else {
            self.wrapped(&item.heading, FontFace::Bold, size_pt, Ink::Strong, 0.0);
            self.wrapped(&aside.text, aside_face, size_pt, Ink::Strong, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::render::render;
    use crate::state::test_helpers::sample_document;

    fn composed() -> ComposedResume {
        compose(&render(&sample_document()), &default_page_config())
    }

    #[test]
    fn test_default_page_is_a4_portrait() {
        let config = default_page_config();
        assert_eq!(config.page_width_mm, 210.0);
        assert_eq!(config.page_height_mm, 297.0);
        assert!(config.content_width_mm() > 150.0);
    }

    #[test]
    fn test_baselines_increase_down_the_strip() {
        let composed = composed();
        let baselines: Vec<f32> = composed
            .texts
            .iter()
            .filter(|t| t.x_mm >= 15.0 && t.text != "-")
            .map(|t| t.baseline_mm)
            .collect();
        assert!(baselines.windows(2).all(|w| w[0] <= w[1]));
        assert!(composed.height_mm > *baselines.last().unwrap());
    }

    #[test]
    fn test_name_is_centered() {
        let composed = composed();
        let name = &composed.texts[0];
        assert_eq!(name.text, "John Doe");
        assert_eq!(name.face, FontFace::Bold);
        let width = get_metrics(FontFace::Bold).measure_str("John Doe") * name.size_pt * PT_TO_MM;
        let left = name.x_mm;
        let right = 210.0 - (name.x_mm + width);
        assert!((left - right).abs() < 0.01);
    }

    #[test]
    fn test_section_headings_are_uppercase_with_rules() {
        let composed = composed();
        assert!(composed.texts.iter().any(|t| t.text == "PROFESSIONAL SUMMARY"));
        assert!(composed.texts.iter().any(|t| t.text == "SKILLS"));
        // header rule plus one per section
        assert_eq!(composed.rules.len(), 6);
    }

    #[test]
    fn test_project_aside_uses_oblique_face() {
        let composed = composed();
        let aside = composed
            .texts
            .iter()
            .find(|t| t.text == "Python, TensorFlow, NLP")
            .unwrap();
        assert_eq!(aside.face, FontFace::Oblique);
    }

    #[test]
    fn test_text_stays_inside_margins() {
        let config = default_page_config();
        for text in &composed().texts {
            let width = get_metrics(text.face).measure_str(&text.text) * text.size_pt * PT_TO_MM;
            assert!(text.x_mm >= config.margin_mm - 1e-3);
            assert!(text.x_mm + width <= config.page_width_mm - config.margin_mm + 0.5);
        }
    }

    #[test]
    fn test_unbroken_url_stays_inside_margins() {
        let config = default_page_config();
        let mut document = sample_document();
        document.professional_summary = Some(format!(
            "Portfolio: https://example.com/{}",
            "portfolio-section-".repeat(30)
        ));
        let composed = compose(&render(&document), &config);
        for text in &composed.texts {
            let width = get_metrics(text.face).measure_str(&text.text) * text.size_pt * PT_TO_MM;
            assert!(
                text.x_mm + width <= config.page_width_mm - config.margin_mm + 0.5,
                "overflows the right margin: {}",
                text.text
            );
        }
    }

    #[test]
    fn test_longer_document_is_taller() {
        let short = composed().height_mm;
        let mut document = sample_document();
        document.professional_summary = Some("Experienced engineer. ".repeat(200));
        let long = compose(&render(&document), &default_page_config()).height_mm;
        assert!(long > short + 100.0);
    }
}
