//! Highlight categorization.
//!
//! A rule set is an ordered list of `(Rule, Category)` pairs. Rules are
//! evaluated top to bottom and the first rule that applies decides the
//! category, so the order is the tie-break policy. Every rule set ends with
//! [`Rule::Always`], which makes `point` the guaranteed fallback.

use std::fmt;
use std::str::FromStr;

use super::context::ContextWindow;
use super::patterns::{is_title_case, starts_with_interrogative, Patterns};
use super::structure::DocumentStructureProfile;
use super::style::StyleInfo;
use crate::model::Category;

/// Characters that disqualify a fragment from reading as a title.
const TITLE_STOP_CHARS: &[char] = &['.', '!', '?', ';', ':', ','];

/// Which fixed rule list to categorize with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSetKind {
    /// Style-, context- and document-aware rules
    #[default]
    Contextual,
    /// Text-only rules, no corroboration
    Lexical,
}

impl fmt::Display for RuleSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSetKind::Contextual => write!(f, "contextual"),
            RuleSetKind::Lexical => write!(f, "lexical"),
        }
    }
}

impl FromStr for RuleSetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contextual" => Ok(RuleSetKind::Contextual),
            "lexical" => Ok(RuleSetKind::Lexical),
            other => Err(format!("unknown rule set: {}", other)),
        }
    }
}

/// Thresholds used by the rules.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizeOptions {
    /// Only the N largest heading-candidate sizes mark a heading
    pub heading_rank_limit: usize,

    /// Title-like fragments must be shorter than this many characters
    pub title_max_len: usize,

    /// An interrogative opener only marks a question above this length
    pub question_min_len: usize,

    /// Definition terms must be shorter than this many characters
    pub term_max_len: usize,

    /// Distinct math signals required by the contextual rule set
    pub math_min_signals: usize,
}

impl CategorizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heading_rank_limit(mut self, limit: usize) -> Self {
        self.heading_rank_limit = limit;
        self
    }

    pub fn with_title_max_len(mut self, len: usize) -> Self {
        self.title_max_len = len;
        self
    }

    pub fn with_question_min_len(mut self, len: usize) -> Self {
        self.question_min_len = len;
        self
    }

    pub fn with_term_max_len(mut self, len: usize) -> Self {
        self.term_max_len = len;
        self
    }

    pub fn with_math_min_signals(mut self, signals: usize) -> Self {
        self.math_min_signals = signals;
        self
    }
}

impl Default for CategorizeOptions {
    fn default() -> Self {
        Self {
            heading_rank_limit: 3,
            title_max_len: 80,
            question_min_len: 50,
            term_max_len: 30,
            math_min_signals: 2,
        }
    }
}

/// A single predicate over a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Font size is one of the document's top heading-candidate sizes
    HeadingSize,
    /// Bold, short, title-cased, unpunctuated, and not surrounded by other
    /// title-cased lines
    BoldTitle,
    /// "Chapter 3", "AIM: ..." and similar prefixes
    StructuralHeading,
    /// Short, title-cased and unpunctuated, regardless of style
    ShortTitle,
    /// Set in a monospace font
    MonospaceFont,
    /// Code keyword, with another code keyword in the same paragraph
    CorroboratedCodeKeyword,
    /// Code keyword from the broader lexical list
    CodeKeyword,
    /// Programming punctuation
    CodePunctuation,
    /// At least `math_min_signals` distinct math signals
    MathSignals,
    /// At least one math signal from the broader lexical list
    AnyMathSignal,
    /// List marker, with a neighbor carrying a marker of the same family
    CorroboratedListMarker,
    /// List marker
    ListMarker,
    /// Ends with a question mark
    QuestionMark,
    /// Opens with an interrogative, is not bold and is long
    LongInterrogative,
    /// Opens with an interrogative
    Interrogative,
    /// "term: explanation" with a short, clean term that is not a clock time
    Definition,
    /// Colon after a short prefix
    ColonPrefix,
    /// Bold text
    Bold,
    /// Always applies
    Always,
}

const CONTEXTUAL_RULES: &[(Rule, Category)] = &[
    (Rule::HeadingSize, Category::Heading),
    (Rule::BoldTitle, Category::Heading),
    (Rule::StructuralHeading, Category::Heading),
    (Rule::MonospaceFont, Category::Code),
    (Rule::CorroboratedCodeKeyword, Category::Code),
    (Rule::MathSignals, Category::Math),
    (Rule::CorroboratedListMarker, Category::ListItem),
    (Rule::QuestionMark, Category::Question),
    (Rule::LongInterrogative, Category::Question),
    (Rule::Definition, Category::Definition),
    (Rule::Bold, Category::Emphasis),
    (Rule::Always, Category::Point),
];

const LEXICAL_RULES: &[(Rule, Category)] = &[
    (Rule::StructuralHeading, Category::Heading),
    (Rule::ShortTitle, Category::Heading),
    (Rule::CodeKeyword, Category::Code),
    (Rule::CodePunctuation, Category::Code),
    (Rule::AnyMathSignal, Category::Math),
    (Rule::ListMarker, Category::ListItem),
    (Rule::QuestionMark, Category::Question),
    (Rule::Interrogative, Category::Question),
    (Rule::ColonPrefix, Category::Definition),
    (Rule::Always, Category::Point),
];

impl RuleSetKind {
    /// The ordered rules of this set.
    pub fn rules(self) -> &'static [(Rule, Category)] {
        match self {
            RuleSetKind::Contextual => CONTEXTUAL_RULES,
            RuleSetKind::Lexical => LEXICAL_RULES,
        }
    }
}

/// Everything a rule may look at.
struct Fragment<'a> {
    text: &'a str,
    style: &'a StyleInfo,
    context: &'a ContextWindow,
    profile: &'a DocumentStructureProfile,
}

/// Assigns one [`Category`] to each highlighted fragment.
#[derive(Debug, Clone)]
pub struct Categorizer {
    kind: RuleSetKind,
    options: CategorizeOptions,
    patterns: Patterns,
}

impl Categorizer {
    pub fn new(kind: RuleSetKind) -> Self {
        Self {
            kind,
            options: CategorizeOptions::default(),
            patterns: Patterns::new(),
        }
    }

    pub fn with_options(mut self, options: CategorizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> RuleSetKind {
        self.kind
    }

    pub fn options(&self) -> &CategorizeOptions {
        &self.options
    }

    /// Categorize a fragment. Leading and trailing whitespace is ignored.
    pub fn categorize(
        &self,
        text: &str,
        style: &StyleInfo,
        context: &ContextWindow,
        profile: &DocumentStructureProfile,
    ) -> Category {
        self.decide(text, style, context, profile).1
    }

    /// Categorize text with no style, context or document information.
    pub fn categorize_text(&self, text: &str) -> Category {
        self.categorize(
            text,
            &StyleInfo::default(),
            &ContextWindow::default(),
            &DocumentStructureProfile::default(),
        )
    }

    /// The first applicable rule and the category it assigns.
    pub fn decide(
        &self,
        text: &str,
        style: &StyleInfo,
        context: &ContextWindow,
        profile: &DocumentStructureProfile,
    ) -> (Rule, Category) {
        let fragment = Fragment {
            text: text.trim(),
            style,
            context,
            profile,
        };

        self.kind
            .rules()
            .iter()
            .copied()
            .find(|(rule, _)| self.applies(*rule, &fragment))
            .unwrap_or((Rule::Always, Category::Point))
    }

    fn applies(&self, rule: Rule, f: &Fragment<'_>) -> bool {
        let p = &self.patterns;
        let o = &self.options;
        let text = f.text;

        match rule {
            Rule::HeadingSize => {
                f.style.font_size > 0.0
                    && f.profile.is_heading_size(f.style.font_size, o.heading_rank_limit)
            }
            Rule::BoldTitle => {
                f.style.is_bold
                    && self.is_title_like(text)
                    && !f.context.neighbors().any(is_title_case)
            }
            Rule::StructuralHeading => p.is_structural_heading(text),
            Rule::ShortTitle => self.is_title_like(text),
            Rule::MonospaceFont => f.style.is_code_style,
            Rule::CorroboratedCodeKeyword => {
                p.has_code_keyword(text)
                    && f
                        .context
                        .same_paragraph
                        .iter()
                        .any(|line| p.has_code_keyword(line))
            }
            Rule::CodeKeyword => p.has_lexical_code_keyword(text),
            Rule::CodePunctuation => p.has_code_punctuation(text),
            Rule::MathSignals => p.math_signal_count(text) >= o.math_min_signals,
            Rule::AnyMathSignal => p.lexical_math_signal_count(text) >= 1,
            Rule::CorroboratedListMarker => p.list_marker(text).is_some_and(|marker| {
                f.context
                    .neighbors()
                    .any(|line| p.list_marker(line) == Some(marker))
            }),
            Rule::ListMarker => p.list_marker(text).is_some(),
            Rule::QuestionMark => text.ends_with('?'),
            Rule::LongInterrogative => {
                starts_with_interrogative(text)
                    && !f.style.is_bold
                    && text.chars().count() > o.question_min_len
            }
            Rule::Interrogative => starts_with_interrogative(text),
            Rule::Definition => p.definition_term(text, o.term_max_len).is_some(),
            Rule::ColonPrefix => p.has_short_colon_prefix(text, o.term_max_len),
            Rule::Bold => f.style.is_bold,
            Rule::Always => true,
        }
    }

    fn is_title_like(&self, text: &str) -> bool {
        text.chars().count() < self.options.title_max_len
            && is_title_case(text)
            && !text.contains(TITLE_STOP_CHARS)
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(RuleSetKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{Page, TextBlock, TextLine, TextSpan};
    use crate::analysis::structure::StructureOptions;

    fn categorize(text: &str) -> Category {
        Categorizer::default().categorize_text(text)
    }

    fn bold() -> StyleInfo {
        StyleInfo {
            font_size: 11.0,
            is_bold: true,
            ..StyleInfo::default()
        }
    }

    fn with_neighbors(before: &[&str], after: &[&str]) -> ContextWindow {
        ContextWindow {
            before: before.iter().map(|s| s.to_string()).collect(),
            after: after.iter().map(|s| s.to_string()).collect(),
            same_paragraph: before.iter().chain(after).map(|s| s.to_string()).collect(),
        }
    }

    fn profile_with_headings() -> DocumentStructureProfile {
        let mut page = Page::letter(1);
        let mut y = 40.0;
        for (size, count) in [(10.0, 60), (24.0, 1), (18.0, 2), (14.0, 3), (13.0, 3)] {
            for _ in 0..count {
                let span = TextSpan::new("x", "Times", size, Rect::new(72.0, y, 90.0, y + size));
                page.add_block(TextBlock::new(vec![TextLine::from_spans(vec![span])]));
                y += 2.0;
            }
        }
        DocumentStructureProfile::build([&page], &StructureOptions::default())
    }

    #[test]
    fn test_rule_sets_end_with_point() {
        for kind in [RuleSetKind::Contextual, RuleSetKind::Lexical] {
            let last = kind.rules().last().copied();
            assert_eq!(last, Some((Rule::Always, Category::Point)));
        }
    }

    #[test]
    fn test_structural_prefix_is_heading() {
        assert_eq!(categorize("AIM: Build a process scheduler"), Category::Heading);
        let c = Categorizer::default();
        let small_plain = StyleInfo {
            font_size: 6.0,
            ..StyleInfo::default()
        };
        assert_eq!(
            c.categorize(
                "AIM: Build a process scheduler",
                &small_plain,
                &ContextWindow::default(),
                &profile_with_headings()
            ),
            Category::Heading
        );
        assert_eq!(categorize("Chapter 4 Deadlocks"), Category::Heading);
    }

    #[test]
    fn test_heading_size_rank() {
        let c = Categorizer::default();
        let profile = profile_with_headings();
        let style = |size| StyleInfo {
            font_size: size,
            ..StyleInfo::default()
        };
        let ctx = ContextWindow::default();

        assert_eq!(c.categorize("memory layout", &style(24.0), &ctx, &profile), Category::Heading);
        assert_eq!(c.categorize("memory layout", &style(14.0), &ctx, &profile), Category::Heading);
        // Fourth-largest candidate is outside the default rank limit.
        assert_eq!(c.categorize("memory layout", &style(13.0), &ctx, &profile), Category::Point);
        assert_eq!(c.categorize("memory layout", &style(10.0), &ctx, &profile), Category::Point);

        let wide = Categorizer::default()
            .with_options(CategorizeOptions::new().with_heading_rank_limit(4));
        assert_eq!(wide.categorize("memory layout", &style(13.0), &ctx, &profile), Category::Heading);
    }

    #[test]
    fn test_bold_title_needs_quiet_neighbors() {
        let c = Categorizer::default();
        let profile = DocumentStructureProfile::default();
        assert_eq!(
            c.categorize("Process Scheduling", &bold(), &ContextWindow::default(), &profile),
            Category::Heading
        );

        let listy = with_neighbors(&["Round Robin"], &["Shortest Job First"]);
        assert_eq!(
            c.categorize("Process Scheduling", &bold(), &listy, &profile),
            Category::Emphasis
        );
        // Not bold: no heading from title case alone.
        assert_eq!(categorize("Process Scheduling"), Category::Point);
    }

    #[test]
    fn test_code_needs_corroboration() {
        let c = Categorizer::default();
        let profile = DocumentStructureProfile::default();

        assert_eq!(categorize("delta is a common variable name"), Category::Point);
        assert_eq!(categorize("public class Scheduler {"), Category::Point);

        let ctx = with_neighbors(&[], &["private int quantum = 10;"]);
        assert_eq!(
            c.categorize("public class Scheduler {", &StyleInfo::default(), &ctx, &profile),
            Category::Code
        );
    }

    #[test]
    fn test_monospace_font_is_code() {
        let c = Categorizer::default();
        let mono = StyleInfo {
            font_size: 10.0,
            is_code_style: true,
            ..StyleInfo::default()
        };
        assert_eq!(
            c.categorize("make all", &mono, &ContextWindow::default(), &DocumentStructureProfile::default()),
            Category::Code
        );
    }

    #[test]
    fn test_math_needs_two_signals() {
        assert_eq!(categorize("The year is 2024"), Category::Point);
        assert_eq!(categorize("∫ f(x) dx = sin(x) + C"), Category::Math);
        assert_eq!(categorize("2 + 2 = 4"), Category::Math);
    }

    #[test]
    fn test_list_item_needs_same_family_neighbor() {
        let c = Categorizer::default();
        let profile = DocumentStructureProfile::default();
        let text = "- Remember to save your work";

        assert_eq!(categorize(text), Category::Point);

        let bullets = with_neighbors(&[], &["- Also check your backups"]);
        assert_eq!(
            c.categorize(text, &StyleInfo::default(), &bullets, &profile),
            Category::ListItem
        );

        let numbered = with_neighbors(&["1. First step"], &[]);
        assert_eq!(
            c.categorize(text, &StyleInfo::default(), &numbered, &profile),
            Category::Point
        );
    }

    #[test]
    fn test_questions() {
        assert_eq!(categorize("Is paging worth it?"), Category::Question);
        assert_eq!(
            categorize("Why does the scheduler prefer short jobs when the queue is long"),
            Category::Question
        );
        // Short interrogative openers are not questions.
        assert_eq!(categorize("Why paging"), Category::Point);

        let c = Categorizer::default();
        assert_eq!(
            c.categorize(
                "Why does the scheduler prefer short jobs when the queue is long",
                &bold(),
                &ContextWindow::default(),
                &DocumentStructureProfile::default()
            ),
            Category::Emphasis
        );
    }

    #[test]
    fn test_definitions() {
        assert_eq!(categorize("Latency: time until the first byte"), Category::Definition);
        assert_eq!(categorize("3:15 PM is the deadline"), Category::Point);
        assert_eq!(
            categorize("This sentence is far too long to be a term: really"),
            Category::Point
        );
    }

    #[test]
    fn test_bold_fallback_is_emphasis() {
        let c = Categorizer::default();
        assert_eq!(
            c.categorize(
                "remember this for the exam",
                &bold(),
                &ContextWindow::default(),
                &DocumentStructureProfile::default()
            ),
            Category::Emphasis
        );
    }

    #[test]
    fn test_first_rule_wins() {
        let c = Categorizer::default();
        let (rule, category) = c.decide(
            "Section 2: x = 1",
            &StyleInfo::default(),
            &ContextWindow::default(),
            &DocumentStructureProfile::default(),
        );
        assert_eq!(rule, Rule::StructuralHeading);
        assert_eq!(category, Category::Heading);

        let (rule, _) = c.decide(
            "",
            &StyleInfo::default(),
            &ContextWindow::default(),
            &DocumentStructureProfile::default(),
        );
        assert_eq!(rule, Rule::Always);
    }

    #[test]
    fn test_lexical_rule_set() {
        let c = Categorizer::new(RuleSetKind::Lexical);
        assert_eq!(c.categorize_text("Process Scheduling"), Category::Heading);
        assert_eq!(c.categorize_text("x = y;"), Category::Code);
        assert_eq!(c.categorize_text("return the value"), Category::Code);
        assert_eq!(c.categorize_text("about 1/2 of all"), Category::Math);
        assert_eq!(c.categorize_text("• isolated bullet"), Category::ListItem);
        assert_eq!(c.categorize_text("Why paging"), Category::Question);
        assert_eq!(c.categorize_text("Latency: time to first byte"), Category::Definition);
        assert_eq!(c.categorize_text("plain sentence here"), Category::Point);
    }

    #[test]
    fn test_deterministic() {
        let c = Categorizer::default();
        let ctx = with_neighbors(&["- a"], &["- b"]);
        let first = c.categorize("- c", &StyleInfo::default(), &ctx, &DocumentStructureProfile::default());
        for _ in 0..10 {
            assert_eq!(
                c.categorize("- c", &StyleInfo::default(), &ctx, &DocumentStructureProfile::default()),
                first
            );
        }
    }

    #[test]
    fn test_rule_set_kind_parse() {
        assert_eq!("Lexical".parse::<RuleSetKind>(), Ok(RuleSetKind::Lexical));
        assert_eq!(RuleSetKind::Contextual.to_string(), "contextual");
        assert!("fuzzy".parse::<RuleSetKind>().is_err());
    }
}
