//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{TextBlock, TextLine, TextSpan, Word};
use crate::geometry::Rect;

/// A single page: its text layout and its markup annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text blocks in reading order
    pub blocks: Vec<TextBlock>,

    /// Annotations attached to the page
    pub annotations: Vec<Annotation>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a text block to the page.
    pub fn add_block(&mut self, block: TextBlock) {
        self.blocks.push(block);
    }

    /// Add an annotation to the page.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// All lines of the page, block by block.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// All spans of the page.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.lines().flat_map(|l| l.spans.iter())
    }

    /// Every word on the page.
    pub fn words(&self) -> Vec<Word> {
        self.spans().flat_map(|s| s.words()).collect()
    }

    /// Words whose box overlaps any of the given regions.
    pub fn words_in(&self, regions: &[Rect]) -> Vec<Word> {
        self.spans()
            .filter(|s| regions.iter().any(|r| s.bbox.intersects(r)))
            .flat_map(|s| s.words())
            .filter(|w| regions.iter().any(|r| w.bbox.intersects(r)))
            .collect()
    }

    /// Highlight annotations on the page.
    pub fn highlights(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(|a| a.is_highlight())
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page has no text.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_empty())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}

/// Annotation subtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Highlight,
    Underline,
    StrikeOut,
    Squiggly,
    /// Any other subtype, by name
    Other(String),
}

impl AnnotationKind {
    /// Map a PDF `/Subtype` name to a kind.
    pub fn from_subtype(name: &str) -> Self {
        match name {
            "Highlight" => AnnotationKind::Highlight,
            "Underline" => AnnotationKind::Underline,
            "StrikeOut" => AnnotationKind::StrikeOut,
            "Squiggly" => AnnotationKind::Squiggly,
            other => AnnotationKind::Other(other.to_string()),
        }
    }
}

/// A page annotation with its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,

    /// Annotation rectangle; `None` when the source carried no usable `/Rect`
    pub rect: Option<Rect>,

    /// One rectangle per highlighted quad, top to bottom
    pub quads: Vec<Rect>,

    /// Popup note text, if any
    pub contents: Option<String>,
}

impl Annotation {
    /// Create an annotation covering a single rectangle.
    pub fn new(kind: AnnotationKind, rect: Rect) -> Self {
        Self {
            kind,
            rect: Some(rect),
            quads: Vec::new(),
            contents: None,
        }
    }

    /// Create a highlight annotation covering a single rectangle.
    pub fn highlight(rect: Rect) -> Self {
        Self::new(AnnotationKind::Highlight, rect)
    }

    /// Attach quad rectangles.
    pub fn with_quads(mut self, quads: Vec<Rect>) -> Self {
        self.quads = quads;
        self
    }

    pub fn is_highlight(&self) -> bool {
        self.kind == AnnotationKind::Highlight
    }

    /// Regions the annotation marks on the page.
    ///
    /// With `prefer_quads`, the quads are returned when present; otherwise
    /// the rectangle, falling back to the quads' bounding box when the
    /// rectangle is missing. Empty when the annotation has no geometry.
    pub fn regions(&self, prefer_quads: bool) -> Vec<Rect> {
        if prefer_quads && !self.quads.is_empty() {
            return self.quads.clone();
        }
        match self.rect {
            Some(rect) if !rect.is_empty() => vec![rect],
            _ => self
                .quads
                .iter()
                .copied()
                .reduce(|acc, r| acc.union(&r))
                .into_iter()
                .collect(),
        }
    }
}

/// A loaded document: its pages in ascending page order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// PDF version string (e.g., "1.7"), empty for synthetic documents
    pub version: String,

    /// Total number of pages in the source, including unselected ones
    pub page_count: u32,

    /// Loaded pages
    pub pages: Vec<Page>,

    /// Pages outside the page selection, loaded with text only. They count
    /// towards document-wide typography but are never scanned for highlights.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unselected_pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.page_count = self.page_count.max(page.number);
        self.pages.push(page);
    }

    /// Get a loaded page by number (1-indexed).
    pub fn get_page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Record a text-only page that lies outside the page selection.
    pub fn add_unselected_page(&mut self, page: Page) {
        self.page_count = self.page_count.max(page.number);
        self.unselected_pages.push(page);
    }

    /// Every page with text, selected or not.
    pub fn all_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().chain(self.unselected_pages.iter())
    }

    /// Number of highlight annotations across loaded pages.
    pub fn highlight_count(&self) -> usize {
        self.pages.iter().map(|p| p.highlights().count()).sum()
    }
}
