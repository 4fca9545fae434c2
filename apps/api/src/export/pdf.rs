//! PDF backend.
//!
//! Two phases: `layout_pdf` places every line on a page (pure geometry, all in
//! millimetres measured from the top-left corner), then `encode_pdf` writes the
//! pages with lopdf. Text uses the standard Helvetica fonts with WinAnsi
//! encoding, so nothing is embedded and the output is byte-for-byte
//! reproducible for the same input and layout.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use serde::{Deserialize, Serialize};

use super::font_metrics::{get_metrics, win_ansi_byte, PdfFont};
use super::structure::{classify_lines, LineKind};
use super::ExportError;

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Page geometry and text styles. Lengths are millimetres, font sizes points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// Extra space kept free above the bottom margin.
    pub bottom_reserve_mm: f32,
    pub line_height_mm: f32,
    pub blank_line_mm: f32,
    /// Leading added before a header unless it is the first thing on the page.
    pub header_gap_mm: f32,
    pub body_font_size: f32,
    pub header_font_size: f32,
    pub body_color: [u8; 3],
    pub header_color: [u8; 3],
}

impl Default for PdfLayout {
    /// A4 portrait, 20mm margins, 11pt black body, 14pt dark-blue headers.
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
            bottom_reserve_mm: 10.0,
            line_height_mm: 7.0,
            blank_line_mm: 5.0,
            header_gap_mm: 8.0,
            body_font_size: 11.0,
            header_font_size: 14.0,
            body_color: [0, 0, 0],
            header_color: [0, 51, 102],
        }
    }
}

impl PdfLayout {
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    /// A line whose top position exceeds this starts a new page.
    fn page_break_at_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm - self.bottom_reserve_mm
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Body,
    Header,
}

impl TextStyle {
    pub fn font(self) -> PdfFont {
        match self {
            TextStyle::Body => PdfFont::Helvetica,
            TextStyle::Header => PdfFont::HelveticaBold,
        }
    }

    pub fn font_size(self, layout: &PdfLayout) -> f32 {
        match self {
            TextStyle::Body => layout.body_font_size,
            TextStyle::Header => layout.header_font_size,
        }
    }

    pub fn color(self, layout: &PdfLayout) -> [u8; 3] {
        match self {
            TextStyle::Body => layout.body_color,
            TextStyle::Header => layout.header_color,
        }
    }
}

/// One wrapped line at its final position. `y_mm` is the baseline, from the page top.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub lines: Vec<PlacedLine>,
}

/// Wraps and paginates `text`. Always returns at least one page.
///
/// List items are drawn as body text with their marker kept.
pub fn layout_pdf(text: &str, layout: &PdfLayout) -> Vec<PdfPage> {
    let mut pages = Vec::new();
    let mut page = PdfPage::default();
    let mut y = layout.margin_mm;
    let content_width_pt = layout.content_width_mm() * PT_PER_MM;

    for line in classify_lines(text) {
        let style = match line.kind {
            LineKind::Blank => {
                y += layout.blank_line_mm;
                continue;
            }
            LineKind::Header => {
                if y > layout.margin_mm {
                    y += layout.header_gap_mm;
                }
                TextStyle::Header
            }
            LineKind::ListItem | LineKind::Text => TextStyle::Body,
        };

        let metrics = get_metrics(style.font());
        let max_width_em = content_width_pt / style.font_size(layout);

        for piece in metrics.wrap(line.text, max_width_em) {
            if y > layout.page_break_at_mm() {
                pages.push(std::mem::take(&mut page));
                y = layout.margin_mm;
            }
            page.lines.push(PlacedLine {
                text: piece,
                x_mm: layout.margin_mm,
                y_mm: y,
                style,
            });
            y += layout.line_height_mm;
        }
    }

    pages.push(page);
    pages
}

// ────────────────────────────────────────────────────────────────────────────
// Encoding
// ────────────────────────────────────────────────────────────────────────────

/// Maps text to WinAnsiEncoding bytes. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

fn color_component(value: u8) -> Object {
    (f32::from(value) / 255.0).into()
}

fn page_operations(page: &PdfPage, layout: &PdfLayout) -> Vec<Operation> {
    let page_height_pt = mm_to_pt(layout.page_height_mm);
    let mut operations = Vec::with_capacity(page.lines.len() * 6);

    for line in &page.lines {
        let [r, g, b] = line.style.color(layout);
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                line.style.font().resource_name().into(),
                line.style.font_size(layout).into(),
            ],
        ));
        operations.push(Operation::new(
            "rg",
            vec![color_component(r), color_component(g), color_component(b)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![
                mm_to_pt(line.x_mm).into(),
                (page_height_pt - mm_to_pt(line.y_mm)).into(),
            ],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    operations
}

fn font_object(doc: &mut Document, font: PdfFont) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Serializes laid-out pages into a PDF document.
pub fn encode_pdf(pages: &[PdfPage], layout: &PdfLayout) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let body_font = font_object(&mut doc, PdfFont::Helvetica);
    let header_font = font_object(&mut doc, PdfFont::HelveticaBold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            PdfFont::Helvetica.resource_name() => body_font,
            PdfFont::HelveticaBold.resource_name() => header_font,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page, layout),
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        mm_to_pt(layout.page_width_mm).into(),
        mm_to_pt(layout.page_height_mm).into(),
    ];
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

/// Lays out and encodes `text` as a PDF.
pub fn to_pdf(text: &str, layout: &PdfLayout) -> Result<Vec<u8>, ExportError> {
    let pages = layout_pdf(text, layout);
    tracing::debug!(pages = pages.len(), "PDF layout complete");
    encode_pdf(&pages, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_lines(count: usize) -> String {
        (1..=count)
            .map(|i| format!("shipped feature number {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty_text_is_one_blank_page() {
        let pages = layout_pdf("", &PdfLayout::default());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn test_header_at_top_has_no_gap() {
        let layout = PdfLayout::default();
        let pages = layout_pdf("EXPERIENCE\nshipped things", &layout);
        let lines = &pages[0].lines;
        assert_eq!(lines[0].style, TextStyle::Header);
        assert_eq!(lines[0].y_mm, 20.0);
        assert_eq!(lines[1].style, TextStyle::Body);
        assert_eq!(lines[1].y_mm, 27.0);
    }

    #[test]
    fn test_header_after_content_gets_gap() {
        let pages = layout_pdf("jane doe, engineer\nEDUCATION", &PdfLayout::default());
        let lines = &pages[0].lines;
        assert_eq!(lines[1].style, TextStyle::Header);
        assert_eq!(lines[1].y_mm, 20.0 + 7.0 + 8.0);
    }

    #[test]
    fn test_blank_lines_add_spacing() {
        let pages = layout_pdf("first line here\n\n\nsecond line here", &PdfLayout::default());
        let lines = &pages[0].lines;
        assert_eq!(lines[1].y_mm, 20.0 + 7.0 + 5.0 + 5.0);
    }

    #[test]
    fn test_list_item_keeps_marker_in_body_style() {
        let pages = layout_pdf("- Led 5 engineers", &PdfLayout::default());
        let line = &pages[0].lines[0];
        assert_eq!(line.text, "- Led 5 engineers");
        assert_eq!(line.style, TextStyle::Body);
    }

    #[test]
    fn test_long_line_wraps_within_content_width() {
        let layout = PdfLayout::default();
        let text = "designed and operated a multi-region event ingestion platform ".repeat(6);
        let pages = layout_pdf(&text, &layout);
        let lines = &pages[0].lines;
        assert!(lines.len() > 1);

        let metrics = get_metrics(PdfFont::Helvetica);
        let max_em = layout.content_width_mm() * PT_PER_MM / layout.body_font_size;
        for line in lines {
            assert!(metrics.measure_str(&line.text) <= max_em);
            assert_eq!(line.x_mm, layout.margin_mm);
        }
    }

    #[test]
    fn test_pagination() {
        // Lines land at 20, 27, ... while y <= 267: 36 per page.
        let pages = layout_pdf(&body_lines(100), &PdfLayout::default());
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines.len(), 36);
        assert_eq!(pages[1].lines.len(), 36);
        assert_eq!(pages[2].lines.len(), 28);
        assert_eq!(pages[1].lines[0].y_mm, 20.0);
        assert_eq!(pages[1].lines[0].text, "shipped feature number 37");
    }

    #[test]
    fn test_layout_is_deterministic() {
        let layout = PdfLayout::default();
        let text = format!("SUMMARY\n{}", body_lines(50));
        assert_eq!(layout_pdf(&text, &layout), layout_pdf(&text, &layout));
        assert_eq!(
            to_pdf(&text, &layout).unwrap(),
            to_pdf(&text, &layout).unwrap()
        );
    }

    #[test]
    fn test_encoded_pdf_loads_with_page_count() {
        let layout = PdfLayout::default();
        let bytes = to_pdf(&body_lines(100), &layout).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_custom_page_size_changes_pagination() {
        let layout = PdfLayout {
            page_height_mm: 100.0,
            ..PdfLayout::default()
        };
        // Break threshold 70mm: lines at 20..=69 fit, 8 per page.
        let pages = layout_pdf(&body_lines(16), &layout);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), 8);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Rust"), b"Rust".to_vec());
        assert_eq!(
            encode_win_ansi("• é – “x”"),
            vec![0x95, b' ', 0xE9, b' ', 0x96, b' ', 0x93, b'x', 0x94]
        );
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
