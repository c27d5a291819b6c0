//! Layout analysis: spans into lines, lines into blocks.

use crate::model::{TextBlock, TextLine, TextSpan};

/// Groups positioned spans into lines and lines into paragraph-like blocks.
#[derive(Debug, Clone)]
pub struct LayoutAnalyzer {
    /// Spans whose bottoms differ by at most this fraction of their font size
    /// share a line
    pub line_tolerance_ratio: f32,

    /// Line spacing above this multiple of the page average starts a block
    pub block_spacing_ratio: f32,

    /// Font-size change (points) that starts a block
    pub size_change: f32,

    /// Left-edge change (points) that starts a block
    pub indent_change: f32,
}

impl LayoutAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines and blocks of a page, top to bottom.
    pub fn analyze(&self, spans: Vec<TextSpan>) -> Vec<TextBlock> {
        let lines = self.group_spans_into_lines(spans);
        self.group_lines_into_blocks(lines)
    }

    /// Y-based line grouping.
    pub fn group_spans_into_lines(&self, mut spans: Vec<TextSpan>) -> Vec<TextLine> {
        spans.retain(|s| !s.text.trim().is_empty());
        if spans.is_empty() {
            return vec![];
        }

        // Top-down coordinates: ascending bottom edge is reading order.
        spans.sort_by(|a, b| {
            a.bbox
                .y1
                .total_cmp(&b.bbox.y1)
                .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        let mut lines: Vec<TextLine> = Vec::new();
        let mut current_line_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let y_tolerance = span.size * self.line_tolerance_ratio;

            match current_y {
                Some(y) if (span.bbox.y1 - y).abs() <= y_tolerance => {
                    current_line_spans.push(span);
                }
                _ => {
                    if !current_line_spans.is_empty() {
                        lines.push(TextLine::from_spans(std::mem::take(
                            &mut current_line_spans,
                        )));
                    }
                    current_y = Some(span.bbox.y1);
                    current_line_spans.push(span);
                }
            }
        }

        if !current_line_spans.is_empty() {
            lines.push(TextLine::from_spans(current_line_spans));
        }

        lines
    }

    /// Group lines into blocks based on spacing, size and indentation.
    pub fn group_lines_into_blocks(&self, lines: Vec<TextLine>) -> Vec<TextBlock> {
        if lines.is_empty() {
            return vec![];
        }

        let avg_spacing = calculate_avg_line_spacing(&lines);
        let mut blocks: Vec<TextBlock> = Vec::new();
        let mut current_block_lines: Vec<TextLine> = Vec::new();

        for line in lines {
            let should_break = current_block_lines
                .last()
                .is_some_and(|prev| self.should_break_block(prev, &line, avg_spacing));

            if should_break {
                blocks.push(TextBlock::new(std::mem::take(&mut current_block_lines)));
            }
            current_block_lines.push(line);
        }

        if !current_block_lines.is_empty() {
            blocks.push(TextBlock::new(current_block_lines));
        }

        blocks
    }

    fn should_break_block(&self, prev_line: &TextLine, curr_line: &TextLine, avg_spacing: f32) -> bool {
        // Large spacing indicates new paragraph
        let spacing = (curr_line.bbox.y1 - prev_line.bbox.y1).abs();
        if spacing > avg_spacing * self.block_spacing_ratio {
            return true;
        }

        if (prev_line.font_size() - curr_line.font_size()).abs() > self.size_change {
            return true;
        }

        (prev_line.indentation() - curr_line.indentation()).abs() > self.indent_change
    }
}

impl Default for LayoutAnalyzer {
    fn default() -> Self {
        Self {
            line_tolerance_ratio: 0.3,
            block_spacing_ratio: 1.5,
            size_change: 1.0,
            indent_change: 20.0,
        }
    }
}

fn calculate_avg_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[1].bbox.y1 - w[0].bbox.y1).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}
