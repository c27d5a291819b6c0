//! PDF document parser using lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Document, Page, TextBlock};

use super::annots::page_annotations;
use super::content::{ContentInterpreter, PageBox};
use super::fonts::load_page_fonts;
use super::layout::LayoutAnalyzer;
use super::object::{inherited, numbers};
use super::options::{ErrorMode, LoadOptions};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Check the PDF header and return the version it declares.
pub fn detect_version(data: &[u8]) -> Result<String> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    let version: String = rest
        .iter()
        .take_while(|b| b.is_ascii_digit() || **b == b'.')
        .map(|&b| b as char)
        .collect();

    let valid = matches!(version.split_once('.'), Some((major, minor))
        if !major.is_empty() && !minor.is_empty() && !minor.contains('.'));
    if !valid {
        return Err(Error::UnknownFormat);
    }
    Ok(version)
}

/// Whether the bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_version(data).is_ok()
}

/// PDF document parser.
pub struct PdfParser {
    doc: LopdfDocument,
    options: LoadOptions,
    layout: LayoutAnalyzer,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, LoadOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, LoadOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: LoadOptions) -> Result<Self> {
        detect_version(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }

        Ok(Self {
            doc,
            options,
            layout: LayoutAnalyzer::default(),
        })
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, LoadOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: LoadOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Use a custom layout analyzer for grouping text.
    pub fn with_layout(mut self, layout: LayoutAnalyzer) -> Self {
        self.layout = layout;
        self
    }

    /// Load the selected pages: their text layout and annotations.
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();
        document.version = self.version();

        let page_ids = self.doc.get_pages();
        let total_pages = page_ids.len() as u32;

        for (&page_num, &page_id) in page_ids.iter() {
            if self.options.pages.includes(page_num) {
                document.add_page(self.parse_page(page_num, page_id)?);
            } else {
                // Heading sizes are a whole-document statistic.
                document.add_unselected_page(self.parse_page_text(page_num, page_id));
            }
        }
        document.page_count = total_pages;

        log::info!(
            "Loaded {} of {} pages, {} highlight annotations",
            document.pages.len(),
            total_pages,
            document.highlight_count()
        );

        Ok(document)
    }

    /// Load a single page by number (1-indexed).
    pub fn parse_page_number(&self, page_num: u32) -> Result<Page> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.parse_page(page_num, page_id)
    }

    fn parse_page(&self, page_num: u32, page_id: ObjectId) -> Result<Page> {
        let page_box = self.page_box(page_id);
        let mut page = Page::new(page_num, page_box.width(), page_box.height());

        match self.extract_blocks(page_id, page_box) {
            Ok(blocks) => page.blocks = blocks,
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
            }
        }

        page.annotations = page_annotations(&self.doc, page_id, page_box);
        log::debug!(
            "Page {}: {} blocks, {} annotations",
            page_num,
            page.blocks.len(),
            page.annotations.len()
        );

        Ok(page)
    }

    /// Text layout only, for a page outside the selection. Decoding failures
    /// leave the page empty in either error mode.
    fn parse_page_text(&self, page_num: u32, page_id: ObjectId) -> Page {
        let page_box = self.page_box(page_id);
        let mut page = Page::new(page_num, page_box.width(), page_box.height());
        match self.extract_blocks(page_id, page_box) {
            Ok(blocks) => page.blocks = blocks,
            Err(e) => log::debug!("Skipping text of unselected page {}: {}", page_num, e),
        }
        page
    }

    fn extract_blocks(
        &self,
        page_id: ObjectId,
        page_box: PageBox,
    ) -> Result<Vec<TextBlock>> {
        let content = self.get_page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let fonts = load_page_fonts(&self.doc, page_id)?;
        let spans = ContentInterpreter::new(&self.doc, &fonts, page_box).run(&content)?;
        Ok(self.layout.analyze(spans))
    }

    /// Page media box, falling back to US Letter.
    fn page_box(&self, page_id: ObjectId) -> PageBox {
        inherited(&self.doc, page_id, b"MediaBox")
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| numbers(&self.doc, arr))
            .and_then(|n| match n.as_slice() {
                [x0, y0, x1, y1] => Some(PageBox {
                    x0: x0.min(*x1),
                    y0: y0.min(*y1),
                    x1: x0.max(*x1),
                    y1: y0.max(*y1),
                }),
                _ => None,
            })
            .filter(|b| b.width() > 0.0 && b.height() > 0.0)
            .unwrap_or_default()
    }

    /// Concatenated, decompressed page content. Empty when the page has none.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let streams: Vec<&Object> = match contents {
            Object::Array(arr) => arr.iter().collect(),
            other => vec![other],
        };

        let mut content = Vec::new();
        for obj in streams {
            let target = match obj {
                Object::Reference(r) => self
                    .doc
                    .get_object(*r)
                    .map_err(|e| Error::PdfParse(e.to_string()))?,
                other => other,
            };
            match target {
                Object::Stream(s) => {
                    let data = s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone());
                    content.extend_from_slice(&data);
                    content.push(b'\n');
                }
                _ => return Err(Error::PdfParse("Invalid content stream".to_string())),
            }
        }

        Ok(content)
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}
