//! Neighboring lines around a highlighted line.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::model::Page;

/// Options for gathering context lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextOptions {
    /// Lines collected on each side of the target
    pub lines: usize,

    /// A vertical gap larger than this between consecutive lines starts a
    /// new paragraph
    pub paragraph_gap: f32,

    /// Maximum distance between the target midpoint and a page line's
    /// midpoint for the line to count as the target
    pub match_tolerance: f32,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_paragraph_gap(mut self, gap: f32) -> Self {
        self.paragraph_gap = gap;
        self
    }

    pub fn with_match_tolerance(mut self, tolerance: f32) -> Self {
        self.match_tolerance = tolerance;
        self
    }
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            lines: 2,
            paragraph_gap: 20.0,
            match_tolerance: 10.0,
        }
    }
}

/// Text immediately around a target line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextWindow {
    /// Up to N lines above the target, top to bottom
    pub before: Vec<String>,
    /// Up to N lines below the target, top to bottom
    pub after: Vec<String>,
    /// Lines on either side belonging to the target's paragraph
    pub same_paragraph: Vec<String>,
}

impl ContextWindow {
    /// Lines before, then lines after.
    pub fn neighbors(&self) -> impl Iterator<Item = &str> {
        self.before
            .iter()
            .chain(self.after.iter())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.same_paragraph.is_empty()
    }
}

#[derive(Debug, Clone)]
struct LineEntry {
    mid_y: f32,
    text: String,
    paragraph: usize,
}

/// The non-blank lines of one page, top to bottom, grouped into paragraphs.
///
/// Built once per page and queried for every highlighted line on it.
#[derive(Debug, Clone, Default)]
pub struct PageLines {
    entries: Vec<LineEntry>,
}

impl PageLines {
    /// Collect and order the lines of a page.
    pub fn from_page(page: &Page, paragraph_gap: f32) -> Self {
        let mut lines: Vec<(f32, String)> = page
            .lines()
            .map(|line| (line.mid_y(), line.text().trim().to_string()))
            .filter(|(_, text)| !text.is_empty())
            .collect();
        lines.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut entries = Vec::with_capacity(lines.len());
        let mut paragraph = 0;
        let mut last_y: Option<f32> = None;
        for (mid_y, text) in lines {
            if last_y.is_some_and(|y| (mid_y - y).abs() > paragraph_gap) {
                paragraph += 1;
            }
            last_y = Some(mid_y);
            entries.push(LineEntry {
                mid_y,
                text,
                paragraph,
            });
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of paragraphs on the page.
    pub fn paragraph_count(&self) -> usize {
        self.entries.last().map(|e| e.paragraph + 1).unwrap_or(0)
    }

    /// Index of the line closest to `mid_y`, if one lies within `tolerance`.
    fn locate(&self, mid_y: f32, tolerance: f32) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, (e.mid_y - mid_y).abs()))
            .filter(|(_, distance)| *distance < tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Context around the page line whose midpoint matches `mid_y`.
    ///
    /// Returns an empty window when no line is close enough.
    pub fn window(&self, mid_y: f32, options: &ContextOptions) -> ContextWindow {
        let Some(idx) = self.locate(mid_y, options.match_tolerance) else {
            return ContextWindow::default();
        };

        let start = idx.saturating_sub(options.lines);
        let end = (idx + 1 + options.lines).min(self.entries.len());
        let paragraph = self.entries[idx].paragraph;

        let before = &self.entries[start..idx];
        let after = &self.entries[idx + 1..end];

        let same_paragraph = before
            .iter()
            .chain(after.iter())
            .filter(|e| e.paragraph == paragraph)
            .map(|e| e.text.clone())
            .collect();

        ContextWindow {
            before: before.iter().map(|e| e.text.clone()).collect(),
            after: after.iter().map(|e| e.text.clone()).collect(),
            same_paragraph,
        }
    }
}

/// Context around `rect` on `page`, computed from scratch.
pub fn context_window(page: &Page, rect: &Rect, options: &ContextOptions) -> ContextWindow {
    PageLines::from_page(page, options.paragraph_gap).window(rect.mid_y(), options)
}
