//! Plain text rendering of study notes.

use crate::analysis::Patterns;
use crate::model::{Category, Highlight};

use super::blocks::{note_blocks, split_definition, NoteBlock};
use super::RenderOptions;

/// Convert highlights to plain text notes: the Markdown layout without markup.
pub fn to_text(highlights: &[Highlight], options: &RenderOptions) -> String {
    let patterns = Patterns::new();
    let mut output = String::new();
    push_underlined(&mut output, &options.title, '=');

    let mut in_list = false;
    for block in note_blocks(highlights, options.merge_code_blocks) {
        if in_list && !block.is_item() {
            output.push('\n');
        }
        in_list = block.is_item();

        match block {
            NoteBlock::Heading(h) => {
                let heading = format!("{}{}", h.text, options.page_ref(h.page));
                push_underlined(&mut output, &heading, '-');
            }
            NoteBlock::Code(run) => {
                for h in run {
                    output.push_str("    ");
                    output.push_str(&h.text);
                    output.push('\n');
                }
                output.push('\n');
            }
            NoteBlock::Math(h) => {
                output.push_str("    ");
                output.push_str(&h.text);
                output.push_str("\n\n");
            }
            NoteBlock::Item(h) => {
                let body = match h.category {
                    Category::Definition => match split_definition(&h.text) {
                        (term, "") => format!("{}:", term),
                        (term, rest) => format!("{}: {}", term, rest),
                    },
                    Category::Question => format!("Q: {}", h.text),
                    Category::ListItem => patterns.strip_list_marker(&h.text).to_string(),
                    _ => h.text.clone(),
                };
                output.push_str(&format!("- {}{}\n", body, options.page_ref(h.page)));
            }
        }
    }

    format!("{}\n", output.trim_end())
}

fn push_underlined(output: &mut String, text: &str, underline: char) {
    output.push_str(text);
    output.push('\n');
    output.extend(std::iter::repeat(underline).take(text.chars().count()));
    output.push_str("\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        let highlights = vec![
            Highlight::new(Category::Heading, "Paging", 1, 0.0),
            Highlight::new(Category::Definition, "Frame: a physical page", 1, 10.0),
            Highlight::new(Category::Emphasis, "Never share frames", 1, 20.0),
            Highlight::new(Category::Code, "mov eax, cr3", 1, 30.0),
        ];

        let text = to_text(&highlights, &RenderOptions::default());
        let expected = "Study Notes\n===========\n\n\
            Paging\n------\n\n\
            - Frame: a physical page\n\
            - Never share frames\n\n    \
            mov eax, cr3\n";
        assert_eq!(text, expected);
        assert!(!text.contains("**"));
    }

    #[test]
    fn test_to_text_empty() {
        assert_eq!(
            to_text(&[], &RenderOptions::default()),
            "Study Notes\n===========\n"
        );
    }
}
