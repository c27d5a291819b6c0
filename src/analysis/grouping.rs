//! Grouping highlighted words into visual lines.

use crate::geometry::Rect;
use crate::model::Word;

/// Words of one visual line, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedLine {
    /// Words joined by single spaces
    pub text: String,
    /// Bottom edge of the line's first word, used as the line's vertical key
    pub y: f32,
    /// Union of the word boxes
    pub bbox: Rect,
}

/// Group words into lines by their bottom edge.
///
/// Words are ordered by bottom edge (rounded to 0.1pt) then left edge. A word
/// whose bottom differs from the current line's key by more than `tolerance`
/// opens a new line. Within a line, words are re-ordered left to right.
pub fn group_words_into_lines(mut words: Vec<Word>, tolerance: f32) -> Vec<GroupedLine> {
    words.retain(|w| !w.text.trim().is_empty());
    words.sort_by(|a, b| {
        round_tenth(a.bbox.y1)
            .total_cmp(&round_tenth(b.bbox.y1))
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut groups: Vec<(f32, Vec<Word>)> = Vec::new();
    for word in words {
        match groups.last_mut() {
            Some((y, line)) if (word.bbox.y1 - *y).abs() <= tolerance => line.push(word),
            _ => groups.push((word.bbox.y1, vec![word])),
        }
    }

    groups
        .into_iter()
        .filter_map(|(y, mut line)| {
            line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            let bbox = line.iter().map(|w| w.bbox).reduce(|acc, r| acc.union(&r))?;
            let text = line
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Some(GroupedLine { text, y, bbox })
        })
        .collect()
}

fn round_tenth(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}
