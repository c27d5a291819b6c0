//! Positioned text: spans, lines, blocks and words.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A run of text sharing one font and size within a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font name (e.g., "Helvetica-Bold"), subset tag removed
    pub font_name: String,
    /// Font size in points
    pub size: f32,
    /// Bounding box in top-down page coordinates
    pub bbox: Rect,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Whether the font appears to be italic
    pub is_italic: bool,
}

impl TextSpan {
    /// Create a new text span. Weight and slant are inferred from the font name.
    pub fn new(
        text: impl Into<String>,
        font_name: impl Into<String>,
        size: f32,
        bbox: Rect,
    ) -> Self {
        let font_name = font_name.into();
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let is_italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text: text.into(),
            font_name,
            size,
            bbox,
            is_bold,
            is_italic,
        }
    }

    /// Split the span into whitespace-separated words.
    ///
    /// The span width is apportioned to each word by character count, which
    /// is exact for monospace text and close enough for proportional fonts
    /// at the granularity highlight rectangles are drawn with.
    pub fn words(&self) -> Vec<Word> {
        let chars: Vec<char> = self.text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        let char_width = self.bbox.width() / chars.len() as f32;

        let mut words = Vec::new();
        let mut start: Option<usize> = None;
        for (i, c) in chars.iter().enumerate() {
            match (c.is_whitespace(), start) {
                (false, None) => start = Some(i),
                (true, Some(s)) => {
                    words.push(self.word_at(&chars, s, i, char_width));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            words.push(self.word_at(&chars, s, chars.len(), char_width));
        }
        words
    }

    fn word_at(&self, chars: &[char], start: usize, end: usize, char_width: f32) -> Word {
        let x0 = self.bbox.x0 + start as f32 * char_width;
        let x1 = self.bbox.x0 + end as f32 * char_width;
        Word {
            text: chars[start..end].iter().collect(),
            bbox: Rect::new(x0, self.bbox.y0, x1, self.bbox.y1),
        }
    }
}

/// A text line composed of spans sharing a baseline band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Union of the span boxes
    pub bbox: Rect,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
        let bbox = spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or_default();
        Self { spans, bbox }
    }

    /// Vertical midpoint of the line.
    pub fn mid_y(&self) -> f32 {
        self.bbox.mid_y()
    }

    /// Left edge of the line (its indentation).
    pub fn indentation(&self) -> f32 {
        self.bbox.x0
    }

    /// Get the combined text of all spans with appropriate spacing.
    ///
    /// A space is inserted between spans whose horizontal gap exceeds a fifth
    /// of the average character width, unless either side already carries
    /// whitespace or both sides are spaceless-script characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev = &self.spans[i - 1];
            let gap = span.bbox.x0 - prev.bbox.x1;

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.bbox.width() > 0.0 {
                span.bbox.width() / char_count as f32
            } else {
                span.size * 0.5
            };

            let should_insert_space = gap > avg_char_width * 0.2
                && !(prev.text.chars().last().is_some_and(is_spaceless_script_char)
                    && span.text.chars().next().is_some_and(is_spaceless_script_char));

            let prev_ends_with_space = prev.text.ends_with(char::is_whitespace);
            let curr_starts_with_space = span.text.starts_with(char::is_whitespace);

            if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
                result.push(' ');
            }
            result.push_str(&span.text);
        }

        result
    }

    /// Dominant font size, weighted by text length.
    pub fn font_size(&self) -> f32 {
        let total_chars: usize = self.spans.iter().map(|s| s.text.len()).sum();
        if total_chars == 0 {
            return self.spans.first().map(|s| s.size).unwrap_or(0.0);
        }
        let weighted: f32 = self
            .spans
            .iter()
            .map(|s| s.size * s.text.len() as f32)
            .sum();
        weighted / total_chars as f32
    }
}

/// A block of consecutive lines (a paragraph-like unit of the page layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// The lines in this block, top to bottom
    pub lines: Vec<TextLine>,
    /// Union of the line boxes
    pub bbox: Rect,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(lines: Vec<TextLine>) -> Self {
        let bbox = lines
            .iter()
            .map(|l| l.bbox)
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or_default();
        Self { lines, bbox }
    }

    /// Get the combined text of all lines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the block is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || self.text().trim().is_empty()
    }
}

/// A single word with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bbox: Rect,
}

impl Word {
    pub fn new(text: impl Into<String>, bbox: Rect) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
