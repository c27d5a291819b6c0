//! Grouping of highlights into note blocks shared by the renderers.

use crate::model::{Category, Highlight};

/// A unit of rendered notes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NoteBlock<'a> {
    Heading(&'a Highlight),
    /// One or more consecutive code highlights
    Code(Vec<&'a Highlight>),
    Math(&'a Highlight),
    /// A bulleted note: point, emphasis, question, definition or list item
    Item(&'a Highlight),
}

impl NoteBlock<'_> {
    pub(crate) fn is_item(&self) -> bool {
        matches!(self, NoteBlock::Item(_))
    }
}

/// Group highlights, in order, into blocks.
pub(crate) fn note_blocks(highlights: &[Highlight], merge_code: bool) -> Vec<NoteBlock<'_>> {
    let mut blocks: Vec<NoteBlock<'_>> = Vec::new();

    for h in highlights {
        match h.category {
            Category::Code => match blocks.last_mut() {
                Some(NoteBlock::Code(run)) if merge_code => run.push(h),
                _ => blocks.push(NoteBlock::Code(vec![h])),
            },
            Category::Heading => blocks.push(NoteBlock::Heading(h)),
            Category::Math => blocks.push(NoteBlock::Math(h)),
            _ => blocks.push(NoteBlock::Item(h)),
        }
    }

    blocks
}

/// Split a definition into term and explanation at the first colon.
pub(crate) fn split_definition(text: &str) -> (&str, &str) {
    match text.split_once(':') {
        Some((term, rest)) => (term.trim(), rest.trim()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(category: Category, text: &str, y: f32) -> Highlight {
        Highlight::new(category, text, 1, y)
    }

    #[test]
    fn test_code_runs_merged() {
        let highlights = vec![
            h(Category::Code, "a = 1", 10.0),
            h(Category::Code, "b = 2", 20.0),
            h(Category::Point, "note", 30.0),
            h(Category::Code, "c = 3", 40.0),
        ];

        let blocks = note_blocks(&highlights, true);
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], NoteBlock::Code(run) if run.len() == 2));
        assert!(blocks[1].is_item());
        assert!(matches!(&blocks[2], NoteBlock::Code(run) if run.len() == 1));

        assert_eq!(note_blocks(&highlights, false).len(), 4);
    }

    #[test]
    fn test_split_definition() {
        assert_eq!(split_definition("Latency: time to first byte"), ("Latency", "time to first byte"));
        assert_eq!(split_definition("Term:"), ("Term", ""));
        assert_eq!(split_definition("no colon"), ("no colon", ""));
    }
}
