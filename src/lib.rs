//! # pdfnotes
//!
//! Turn the highlights of a PDF into categorized study notes.
//!
//! Every highlight annotation is narrowed to the words under it, split into
//! visual lines, and each line is labelled as a heading, code, math, list
//! item, question, definition, emphasis, or plain point. The labels come
//! from lexical patterns, the local font style, neighboring lines, and a
//! typography profile of the whole document. The result is an ordered
//! sequence of highlights ready for rendering.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfnotes::{extract_highlights, render};
//!
//! fn main() -> pdfnotes::Result<()> {
//!     let highlights = extract_highlights("lecture.pdf")?;
//!
//!     for h in &highlights {
//!         println!("[{}] p.{} {}", h.category, h.page, h.text);
//!     }
//!
//!     let notes = render::to_markdown(&highlights, &render::RenderOptions::default());
//!     println!("{}", notes);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Whole-document typography profile**: heading sizes are judged against
//!   the entire document, not a single highlight
//! - **Ordered rule sets**: a contextual rule set and a text-only one
//! - **Quad-point selection**: partial-line highlights stay partial
//! - **Parallel processing**: pages are categorized with Rayon
//! - **Multiple output formats**: Markdown, plain text, JSON

pub mod analysis;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analysis::{
    CategorizeOptions, Categorizer, ContextOptions, DocumentStructureProfile, RuleSetKind,
    StructureOptions,
};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, ExtractionStats, HighlightExtractor};
pub use geometry::Rect;
pub use model::{Annotation, Category, Document, Highlight, Page};
pub use parser::{ErrorMode, LoadOptions, PageSelection, PdfParser};
pub use render::{JsonFormat, RenderOptions};

use std::io::Read;
use std::path::Path;

/// Load a PDF file: page text layout and annotations.
///
/// # Example
///
/// ```no_run
/// use pdfnotes::load_file;
///
/// let doc = load_file("lecture.pdf").unwrap();
/// println!("Highlights: {}", doc.highlight_count());
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    PdfParser::open(path)?.parse()
}

/// Load a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfnotes::{load_file_with_options, LoadOptions, PageSelection};
///
/// let options = LoadOptions::new()
///     .strict()
///     .with_pages(PageSelection::Range(1..=10));
/// let doc = load_file_with_options("lecture.pdf", options).unwrap();
/// ```
pub fn load_file_with_options<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Document> {
    PdfParser::open_with_options(path, options)?.parse()
}

/// Load a PDF from bytes.
pub fn load_bytes(data: &[u8]) -> Result<Document> {
    PdfParser::from_bytes(data)?.parse()
}

/// Load a PDF from bytes with custom options.
pub fn load_bytes_with_options(data: &[u8], options: LoadOptions) -> Result<Document> {
    PdfParser::from_bytes_with_options(data, options)?.parse()
}

/// Load a PDF from a reader.
pub fn load_reader<R: Read>(reader: R) -> Result<Document> {
    PdfParser::from_reader(reader)?.parse()
}

/// Categorized highlights of a loaded document, in reading order.
///
/// Never fails: a document without highlights yields an empty sequence.
pub fn extract_from_document(doc: &Document) -> Vec<Highlight> {
    HighlightExtractor::default().extract(doc)
}

/// Categorized highlights of a PDF file, in reading order.
///
/// # Example
///
/// ```no_run
/// use pdfnotes::{extract_highlights, Category};
///
/// let highlights = extract_highlights("lecture.pdf").unwrap();
/// let headings = highlights.iter().filter(|h| h.category == Category::Heading).count();
/// println!("{} headings", headings);
/// ```
pub fn extract_highlights<P: AsRef<Path>>(path: P) -> Result<Vec<Highlight>> {
    let doc = load_file(path)?;
    Ok(extract_from_document(&doc))
}

/// Categorized highlights of a PDF held in memory.
pub fn extract_highlights_from_bytes(data: &[u8]) -> Result<Vec<Highlight>> {
    let doc = load_bytes(data)?;
    Ok(extract_from_document(&doc))
}

/// Convert the highlights of a PDF to Markdown notes.
///
/// # Example
///
/// ```no_run
/// use pdfnotes::to_markdown;
///
/// let markdown = to_markdown("lecture.pdf").unwrap();
/// std::fs::write("notes.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let highlights = extract_highlights(path)?;
    Ok(render::to_markdown(&highlights, &RenderOptions::default()))
}

/// Convert the highlights of a PDF to plain text notes.
pub fn to_text<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let highlights = extract_highlights(path)?;
    Ok(render::to_text(&highlights, options))
}

/// Convert the highlights of a PDF to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let highlights = extract_highlights(path)?;
    render::to_json(&highlights, format)
}

/// Builder for loading a PDF and turning its highlights into notes.
///
/// # Example
///
/// ```no_run
/// use pdfnotes::{Pdfnotes, PageSelection};
///
/// let markdown = Pdfnotes::new()
///     .with_pages(PageSelection::Range(3..=12))
///     .with_quad_points()
///     .with_title("Operating Systems")
///     .extract("lecture.pdf")?
///     .to_markdown();
/// # Ok::<(), pdfnotes::Error>(())
/// ```
pub struct Pdfnotes {
    load_options: LoadOptions,
    extract_options: ExtractOptions,
    render_options: RenderOptions,
}

impl Pdfnotes {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            load_options: LoadOptions::default(),
            extract_options: ExtractOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Fail on pages whose content cannot be decoded.
    pub fn strict(mut self) -> Self {
        self.load_options = self.load_options.strict();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.load_options = self.load_options.with_pages(pages);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.extract_options = self.extract_options.sequential();
        self
    }

    /// Use the text-only rule set.
    pub fn lexical(mut self) -> Self {
        self.extract_options = self.extract_options.lexical();
        self
    }

    /// Select words per highlight quad.
    pub fn with_quad_points(mut self) -> Self {
        self.extract_options = self.extract_options.with_quad_points(true);
        self
    }

    /// Set the highlight inset margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.extract_options = self.extract_options.with_margin(margin);
        self
    }

    /// Replace the extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Set the notes title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_title(title);
        self
    }

    /// Append page numbers to notes.
    pub fn with_page_refs(mut self) -> Self {
        self.render_options = self.render_options.with_page_refs(true);
        self
    }

    /// Load a PDF file and extract its highlights.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<NotesResult> {
        let parser = PdfParser::open_with_options(path, self.load_options.clone())?;
        self.finish(parser)
    }

    /// Load a PDF from bytes and extract its highlights.
    pub fn extract_bytes(self, data: &[u8]) -> Result<NotesResult> {
        let parser = PdfParser::from_bytes_with_options(data, self.load_options.clone())?;
        self.finish(parser)
    }

    fn finish(self, parser: PdfParser) -> Result<NotesResult> {
        let document = parser.parse()?;
        let (highlights, stats) =
            HighlightExtractor::new(self.extract_options).extract_with_stats(&document);
        Ok(NotesResult {
            document,
            highlights,
            stats,
            render_options: self.render_options,
        })
    }
}

impl Default for Pdfnotes {
    fn default() -> Self {
        Self::new()
    }
}

/// Highlights extracted from one document.
pub struct NotesResult {
    /// The loaded document
    pub document: Document,
    /// Highlights in reading order
    pub highlights: Vec<Highlight>,
    /// Extraction counts
    pub stats: ExtractionStats,
    render_options: RenderOptions,
}

impl NotesResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown(&self.highlights, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.highlights, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.highlights, format)
    }

    /// The `(label, text)` pairs in reading order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        self.highlights.iter().map(Highlight::as_pair).collect()
    }
}
