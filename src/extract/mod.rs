//! Highlight extraction: from a loaded document to an ordered, categorized
//! highlight sequence.
//!
//! The document profile is built once from every page. Each highlight
//! annotation is then narrowed to the words under it, split into visual
//! lines, and every line is categorized with its own style and context.
//! The output is sorted by page, then by vertical position.

mod options;

pub use options::ExtractOptions;

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{
    group_words_into_lines, Categorizer, DocumentStructureProfile, PageLines, StyleInfo,
};
use crate::model::{Category, Document, Highlight, Page};

/// Counts gathered during one extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages visited
    pub pages_scanned: usize,
    /// Highlight annotations seen
    pub highlight_annotations: usize,
    /// Highlight annotations that covered no words
    pub empty_highlights: usize,
    /// Highlights emitted per category
    pub categories: BTreeMap<Category, usize>,
}

impl ExtractionStats {
    /// Total highlights emitted.
    pub fn highlight_count(&self) -> usize {
        self.categories.values().sum()
    }

    /// Highlights emitted for one category.
    pub fn count(&self, category: Category) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    fn merge(&mut self, other: PageStats) {
        self.pages_scanned += 1;
        self.highlight_annotations += other.annotations;
        self.empty_highlights += other.empty;
    }
}

#[derive(Debug, Default)]
struct PageStats {
    annotations: usize,
    empty: usize,
}

/// Extracts and categorizes the highlights of a document.
#[derive(Debug, Clone)]
pub struct HighlightExtractor {
    options: ExtractOptions,
    categorizer: Categorizer,
}

impl HighlightExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        let categorizer = Categorizer::new(options.rules).with_options(options.categorize.clone());
        Self {
            options,
            categorizer,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Typography profile of the whole document, including pages outside
    /// the page selection.
    pub fn profile(&self, doc: &Document) -> DocumentStructureProfile {
        DocumentStructureProfile::build(doc.all_pages(), &self.options.structure)
    }

    /// Highlights of the document in reading order.
    pub fn extract(&self, doc: &Document) -> Vec<Highlight> {
        self.extract_with_stats(doc).0
    }

    /// Highlights of the document in reading order, with counts.
    pub fn extract_with_stats(&self, doc: &Document) -> (Vec<Highlight>, ExtractionStats) {
        let profile = self.profile(doc);

        let per_page: Vec<(Vec<Highlight>, PageStats)> = if self.options.parallel {
            doc.pages
                .par_iter()
                .map(|page| self.extract_page(page, &profile))
                .collect()
        } else {
            doc.pages
                .iter()
                .map(|page| self.extract_page(page, &profile))
                .collect()
        };

        let mut stats = ExtractionStats::default();
        let mut highlights = Vec::new();
        for (page_highlights, page_stats) in per_page {
            stats.merge(page_stats);
            highlights.extend(page_highlights);
        }

        // Stable: fragments at the same position keep annotation order.
        highlights.sort_by(Highlight::reading_order);

        for h in &highlights {
            *stats.categories.entry(h.category).or_insert(0) += 1;
        }

        log::info!(
            "Extracted {} highlights from {} annotations on {} pages",
            highlights.len(),
            stats.highlight_annotations,
            stats.pages_scanned
        );

        (highlights, stats)
    }

    fn extract_page(
        &self,
        page: &Page,
        profile: &DocumentStructureProfile,
    ) -> (Vec<Highlight>, PageStats) {
        let mut stats = PageStats::default();
        let mut highlights = Vec::new();

        let annotations: Vec<_> = page.highlights().collect();
        if annotations.is_empty() {
            return (highlights, stats);
        }

        // Built once and shared by every highlight on this page.
        let page_lines = PageLines::from_page(page, self.options.context.paragraph_gap);

        for annotation in annotations {
            stats.annotations += 1;

            let regions: Vec<_> = annotation
                .regions(self.options.use_quad_points)
                .iter()
                .map(|r| r.inset(self.options.margin))
                .collect();
            if regions.is_empty() {
                stats.empty += 1;
                continue;
            }

            let words = page.words_in(&regions);
            let lines = group_words_into_lines(words, self.options.line_tolerance);
            if lines.is_empty() {
                log::debug!("Page {}: highlight covers no words", page.number);
                stats.empty += 1;
                continue;
            }

            for line in lines {
                let text = line.text.trim();
                if text.is_empty() {
                    continue;
                }

                let style = StyleInfo::under(page, &line.bbox, &self.options.monospace_markers);
                let context = page_lines.window(line.bbox.mid_y(), &self.options.context);
                let (rule, category) = self.categorizer.decide(text, &style, &context, profile);
                log::debug!(
                    "Page {}: {:?} -> {} ({:?})",
                    page.number,
                    text,
                    category,
                    rule
                );

                highlights.push(Highlight::new(category, text, page.number, line.y));
            }
        }

        (highlights, stats)
    }
}

impl Default for HighlightExtractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}
