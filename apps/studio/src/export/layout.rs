//! Page layout for the PDF export: paragraph classification, greedy word-wrap
//! and pagination. Pure and CPU-bound; the caller runs it on a blocking thread.
//!
//! Coordinates are PDF points with the origin at the bottom-left of the page.

use serde::{Deserialize, Serialize};

use crate::export::font_metrics::{get_metrics, BaseFont};

/// US letter.
pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
pub const MARGIN_LEFT_PT: f32 = 72.0;
pub const MARGIN_RIGHT_PT: f32 = 72.0;
pub const MARGIN_TOP_PT: f32 = 72.0;
pub const MARGIN_BOTTOM_PT: f32 = 18.0;

pub const HEADING_SIZE_PT: f32 = 13.0;
pub const HEADING_LEADING_PT: f32 = 18.0;
pub const BODY_SIZE_PT: f32 = 10.0;
pub const BODY_LEADING_PT: f32 = 14.0;
/// Vertical space a rule line (`====` / `----`) turns into.
pub const RULE_SPACING_PT: f32 = 6.0;

/// Paragraphs shorter than this always render as headings.
pub const HEADING_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParagraphKind {
    Heading,
    Body,
    /// A line made only of `=` or only of `-`.
    Rule,
}

/// One line of text at a fixed position on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub text: String,
    pub font: BaseFont,
    pub size_pt: f32,
    pub x_pt: f32,
    /// Baseline, measured from the bottom edge.
    pub y_pt: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

pub fn text_width_pt() -> f32 {
    PAGE_WIDTH_PT - MARGIN_LEFT_PT - MARGIN_RIGHT_PT
}

/// At least one cased character and no lower-case characters.
pub fn is_upper(text: &str) -> bool {
    text.chars().any(|c| c.is_uppercase() || c.is_lowercase())
        && !text.chars().any(char::is_lowercase)
}

pub fn is_rule(text: &str) -> bool {
    !text.is_empty() && (text.chars().all(|c| c == '=') || text.chars().all(|c| c == '-'))
}

pub fn is_heading(text: &str) -> bool {
    is_upper(text) || text.chars().count() < HEADING_MAX_CHARS
}

/// `None` for blank lines, which are skipped. Heading length counts the line as
/// written, leading and trailing whitespace included.
pub fn classify_paragraph(line: &str) -> Option<ParagraphKind> {
    let text = line.trim();
    if text.is_empty() {
        None
    } else if is_rule(text) {
        Some(ParagraphKind::Rule)
    } else if is_heading(line) {
        Some(ParagraphKind::Heading)
    } else {
        Some(ParagraphKind::Body)
    }
}

/// Maps text onto the base-font repertoire (printable ASCII).
pub fn transliterate(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c,
            '•' | '–' | '—' | '‐' => '-',
            '‘' | '’' => '\'',
            '“' | '”' => '"',
            '\t' => ' ',
            _ => '?',
        })
        .collect()
}

/// Greedy word-wrap. A single word wider than the line gets a line of its own.
pub fn wrap_words(text: &str, font: BaseFont, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let metrics = get_metrics(font);
    let space = metrics.space_width * size_pt;

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = metrics.width_pt(word, size_pt);
        if !current.is_empty() && width + space + word_w > max_width_pt {
            lines.push(std::mem::take(&mut current));
            width = 0.0;
        }
        if !current.is_empty() {
            current.push(' ');
            width += space;
        }
        current.push_str(word);
        width += word_w;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct Cursor {
    pages: Vec<PageLayout>,
    /// Top of the free area on the current page.
    y_pt: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y_pt: PAGE_HEIGHT_PT - MARGIN_TOP_PT,
        }
    }

    fn place(&mut self, text: String, font: BaseFont, size_pt: f32, leading_pt: f32, x_pt: f32) {
        if self.y_pt - leading_pt < MARGIN_BOTTOM_PT {
            self.pages.push(PageLayout::default());
            self.y_pt = PAGE_HEIGHT_PT - MARGIN_TOP_PT;
        }
        let baseline = self.y_pt - size_pt;
        self.y_pt -= leading_pt;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                text,
                font,
                size_pt,
                x_pt,
                y_pt: baseline,
            });
        }
    }

    fn skip(&mut self, space_pt: f32) {
        self.y_pt = (self.y_pt - space_pt).max(MARGIN_BOTTOM_PT);
    }
}

/// Lays out a whole resume. Always returns at least one page.
pub fn layout_document(text: &str) -> Vec<PageLayout> {
    let mut cursor = Cursor::new();

    for raw in text.lines() {
        let Some(kind) = classify_paragraph(raw) else {
            continue;
        };
        let line = transliterate(raw);

        let (font, size, leading) = match kind {
            ParagraphKind::Rule => {
                cursor.skip(RULE_SPACING_PT);
                continue;
            }
            ParagraphKind::Heading => (BaseFont::HelveticaBold, HEADING_SIZE_PT, HEADING_LEADING_PT),
            ParagraphKind::Body => (BaseFont::Helvetica, BODY_SIZE_PT, BODY_LEADING_PT),
        };

        // Leading spaces indent every wrapped line of the paragraph.
        let indent_chars = line.len() - line.trim_start().len();
        let indent = get_metrics(font).space_width * size * indent_chars as f32;
        let x = MARGIN_LEFT_PT + indent;

        for wrapped in wrap_words(&line, font, size, text_width_pt() - indent) {
            cursor.place(wrapped, font, size, leading, x);
        }
    }

    cursor.pages
}
