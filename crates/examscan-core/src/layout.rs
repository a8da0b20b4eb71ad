//! Span-level page layout as supplied by a [`LayoutBackend`](crate::LayoutBackend).
//!
//! The outline pipeline reads this structure and never mutates it. A
//! backend materializes the whole document in one call, so the caller
//! holds no open handle while parsing runs.

/// Fully materialized layout of one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    /// Identifier carried into the resulting outline.
    pub paper_id: String,
    /// Pages in reading order.
    pub pages: Vec<PageLayout>,
}

/// One rendering surface.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// 1-based ordinal.
    pub number: u32,
    /// Page height in points; zone thresholds are relative to this.
    pub height: f32,
    pub blocks: Vec<BlockLayout>,
}

#[derive(Debug, Clone, Default)]
pub struct BlockLayout {
    pub lines: Vec<LineLayout>,
}

#[derive(Debug, Clone, Default)]
pub struct LineLayout {
    pub spans: Vec<SpanLayout>,
}

/// One style-uniform run of text.
#[derive(Debug, Clone)]
pub struct SpanLayout {
    pub text: String,
    /// Font name as reported by the rendering backend,
    /// e.g. `"TimesNewRomanPS-BoldMT"`.
    pub font_name: String,
    /// Whether the backend flagged the font weight as bold.
    pub bold: bool,
    /// Top edge of the span's bounding box, in page coordinates
    /// (y grows downward).
    pub y0: f32,
}

impl SpanLayout {
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, bold: bool, y0: f32) -> Self {
        Self {
            text: text.into(),
            font_name: font_name.into(),
            bold,
            y0,
        }
    }
}

impl PageLayout {
    pub fn new(number: u32, height: f32) -> Self {
        Self {
            number,
            height,
            blocks: Vec::new(),
        }
    }
}
