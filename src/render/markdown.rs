//! Markdown rendering of study notes.

use crate::analysis::Patterns;
use crate::model::{Category, Highlight};

use super::blocks::{note_blocks, split_definition, NoteBlock};
use super::RenderOptions;

/// Convert highlights to Markdown notes.
pub fn to_markdown(highlights: &[Highlight], options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(highlights)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    patterns: Patterns,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            patterns: Patterns::new(),
        }
    }

    /// Render highlights, already in reading order, to Markdown.
    pub fn render(&self, highlights: &[Highlight]) -> String {
        let mut output = String::new();
        output.push_str(&format!("# {}\n\n", self.options.title));

        let mut in_list = false;
        for block in note_blocks(highlights, self.options.merge_code_blocks) {
            // A list ends with a blank line before any other block.
            if in_list && !block.is_item() {
                output.push('\n');
            }
            in_list = block.is_item();

            match block {
                NoteBlock::Heading(h) => {
                    output.push_str(&format!("## {}{}\n\n", h.text, self.options.page_ref(h.page)));
                }
                NoteBlock::Code(run) => {
                    output.push_str("```\n");
                    for h in run {
                        output.push_str(&h.text);
                        output.push('\n');
                    }
                    output.push_str("```\n\n");
                }
                NoteBlock::Math(h) => {
                    output.push_str(&format!("$$\n{}\n$$\n\n", h.text));
                }
                NoteBlock::Item(h) => self.render_item(&mut output, h),
            }
        }

        let trimmed_len = output.trim_end().len();
        output.truncate(trimmed_len);
        output.push('\n');
        output
    }

    fn render_item(&self, output: &mut String, h: &Highlight) {
        let body = match h.category {
            Category::Definition => match split_definition(&h.text) {
                (term, "") => format!("**{}**:", term),
                (term, rest) => format!("**{}**: {}", term, rest),
            },
            Category::Question => format!("Q: {}", h.text),
            Category::Emphasis => format!("**{}**", h.text),
            Category::ListItem => self.patterns.strip_list_marker(&h.text).to_string(),
            _ => h.text.clone(),
        };

        output.push_str("- ");
        output.push_str(&body);
        output.push_str(&self.options.page_ref(h.page));
        output.push('\n');
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
