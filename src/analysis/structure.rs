//! Document-wide font statistics for heading detection.
//!
//! The profile is computed once per document from every span on every page,
//! so a size test gives the same answer for a fragment on page 1 and on
//! page 200.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Page;

/// A font size quantised to 0.1pt, usable as an exact map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SizeKey(i32);

impl SizeKey {
    /// Quantise a size in points.
    pub fn from_points(size: f32) -> Self {
        SizeKey((size * 10.0).round() as i32)
    }

    /// The size in points.
    pub fn points(self) -> f32 {
        self.0 as f32 / 10.0
    }
}

/// Options for building a [`DocumentStructureProfile`].
#[derive(Debug, Clone, PartialEq)]
pub struct StructureOptions {
    /// A size is a heading candidate when it exceeds this multiple of the
    /// document's average span size
    pub candidate_ratio: f32,

    /// Number of candidate sizes kept, largest first
    pub candidate_limit: usize,
}

impl StructureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidate_ratio(mut self, ratio: f32) -> Self {
        self.candidate_ratio = ratio;
        self
    }

    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = limit;
        self
    }
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self {
            candidate_ratio: 1.2,
            candidate_limit: 6,
        }
    }
}

/// Per-font-name usage counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontUsage {
    /// Span count per size
    pub sizes: BTreeMap<SizeKey, usize>,
    /// Spans set in a bold face of this font
    pub bold_count: usize,
    /// Total spans set in this font
    pub total: usize,
}

/// Immutable statistical profile of a document's typography.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructureProfile {
    size_histogram: BTreeMap<SizeKey, usize>,
    fonts: BTreeMap<String, FontUsage>,
    heading_sizes: Vec<SizeKey>,
    average_size: f32,
    span_count: usize,
}

impl DocumentStructureProfile {
    /// Build the profile from every non-empty span of the given pages.
    pub fn build<'a, I>(pages: I, options: &StructureOptions) -> Self
    where
        I: IntoIterator<Item = &'a Page>,
    {
        let mut size_histogram: BTreeMap<SizeKey, usize> = BTreeMap::new();
        let mut fonts: BTreeMap<String, FontUsage> = BTreeMap::new();

        for page in pages {
            for span in page.spans() {
                if span.text.trim().is_empty() || !span.size.is_finite() || span.size <= 0.0 {
                    continue;
                }
                let key = SizeKey::from_points(span.size);
                *size_histogram.entry(key).or_insert(0) += 1;

                let usage = fonts.entry(span.font_name.clone()).or_default();
                *usage.sizes.entry(key).or_insert(0) += 1;
                usage.total += 1;
                if span.is_bold {
                    usage.bold_count += 1;
                }
            }
        }

        let span_count: usize = size_histogram.values().sum();
        if span_count == 0 {
            return Self::default();
        }

        let average_size = size_histogram
            .iter()
            .map(|(size, count)| size.points() * *count as f32)
            .sum::<f32>()
            / span_count as f32;

        let threshold = average_size * options.candidate_ratio;
        // BTreeMap keys ascend, so reversing yields the largest sizes first.
        let heading_sizes: Vec<SizeKey> = size_histogram
            .keys()
            .rev()
            .filter(|size| size.points() > threshold)
            .take(options.candidate_limit)
            .copied()
            .collect();

        log::debug!(
            "Structure profile: {} spans, average size {:.1}pt, heading sizes {:?}",
            span_count,
            average_size,
            heading_sizes.iter().map(|s| s.points()).collect::<Vec<_>>()
        );

        Self {
            size_histogram,
            fonts,
            heading_sizes,
            average_size,
            span_count,
        }
    }

    /// Heading-candidate sizes in points, largest first.
    pub fn heading_sizes(&self) -> Vec<f32> {
        self.heading_sizes.iter().map(|s| s.points()).collect()
    }

    /// Heading level for a size: 1 for the largest candidate size, 2 for the
    /// next, and so on. `None` when the size is not a candidate.
    pub fn heading_level(&self, size: f32) -> Option<usize> {
        if size <= 0.0 || !size.is_finite() {
            return None;
        }
        let key = SizeKey::from_points(size);
        self.heading_sizes
            .iter()
            .position(|s| *s == key)
            .map(|i| i + 1)
    }

    /// Whether `size` is among the `rank_limit` largest candidate sizes.
    pub fn is_heading_size(&self, size: f32, rank_limit: usize) -> bool {
        self.heading_level(size)
            .is_some_and(|level| level <= rank_limit)
    }

    /// Span count per size across the document.
    pub fn size_histogram(&self) -> &BTreeMap<SizeKey, usize> {
        &self.size_histogram
    }

    /// Usage counts per font name.
    pub fn fonts(&self) -> &BTreeMap<String, FontUsage> {
        &self.fonts
    }

    /// Mean span size, weighted by occurrence.
    pub fn average_size(&self) -> f32 {
        self.average_size
    }

    /// Most common span size (the body text size), if any text was seen.
    pub fn body_size(&self) -> Option<f32> {
        self.size_histogram
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(size, _)| size.points())
    }

    /// Number of spans the profile was built from.
    pub fn span_count(&self) -> usize {
        self.span_count
    }

    pub fn is_empty(&self) -> bool {
        self.span_count == 0
    }
}
