//! Lexical signals used by the categorizer.

use regex::Regex;

/// Control-flow and declaration keywords, checked case-insensitively.
/// Only trusted when a neighboring line corroborates them.
const CODE_KEYWORDS: &[&str] = &[
    // Python
    r"(?i)\b(def|class|import|from|if|elif|else|for|while|try|except)\b",
    // JavaScript
    r"(?i)\b(function|var|let|const|class|interface)\b",
    // Java
    r"(?i)\b(public|private|protected|static|void|class)\b",
    // SQL
    r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|CREATE|DROP|ALTER|FROM|WHERE)\b",
    // Console output
    r"(?i)\b(print|console\.log|System\.out\.println)\b",
];

/// Broader keyword list of the lexical rule set, trusted without context.
const LEXICAL_CODE_KEYWORDS: &[&str] = &[
    r"(?i)\b(def|class|import|from|if|elif|else|for|while|try|except|with|as|lambda|return|yield)\b",
    r"(?i)\b(public|private|protected|static|void|int|String|function|var|let|const|class|interface)\b",
    r"(?i)\b(int|char|float|double|void|struct|class|public|private|protected|static)\b",
    r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|CREATE|DROP|ALTER|FROM|WHERE|JOIN|GROUP BY|ORDER BY)\b",
    r"(?i)\b(print|console\.log|System\.out\.println)\b",
];

/// Programming punctuation; a broad, low-precision signal.
const CODE_PUNCTUATION: &[&str] = &[
    r"[{}();=<>]",
    r"\[.*\]",
    r"\(.*\)\s*\{",
    r"import\s+.*",
    r"#include",
];

const MATH_SYMBOLS: &str = r"[+\-×÷=≠≈≤≥∞∑∫√∛∜∂∇∆∅∈∉⊂⊃∪∩∧∨¬⇒⇔∀∃∄]";
const MATH_ARITHMETIC: &str = r"\d+\s*[+\-×÷=]\s*\d+";
const MATH_PAREN_NUMBER: &str = r"\(\d+\)";

/// Compiled pattern set shared by both rule sets.
#[derive(Debug, Clone)]
pub struct Patterns {
    structural_heading: Regex,
    objective_heading: Regex,
    code_keywords: Vec<Regex>,
    lexical_code_keywords: Vec<Regex>,
    code_punctuation: Vec<Regex>,
    math_signals: Vec<Regex>,
    lexical_math_signals: Vec<Regex>,
    bullet: Regex,
    numbered: Regex,
    clock: Regex,
    sentence_end: Regex,
}

/// Family of a list marker at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// `-`, `•` or `*` followed by whitespace
    Bullet,
    /// Digits followed by `.` or `)` and whitespace
    Numbered,
}

impl Patterns {
    pub fn new() -> Self {
        Self {
            structural_heading: compile(
                r"(?i)^(Chapter|Section|Part|Unit|Topic|Lesson|Module)\s+\d+",
            ),
            objective_heading: compile(
                r"(?i)^(AIM:|Objective:|Goal:|Learning Objective:|Key Concept:)",
            ),
            code_keywords: compile_all(CODE_KEYWORDS),
            lexical_code_keywords: compile_all(LEXICAL_CODE_KEYWORDS),
            code_punctuation: compile_all(CODE_PUNCTUATION),
            math_signals: compile_all(&[
                MATH_SYMBOLS,
                r"\b(sin|cos|tan|log|ln|exp|sqrt|pi|alpha|beta|gamma|delta)\b",
                MATH_ARITHMETIC,
                MATH_PAREN_NUMBER,
            ]),
            lexical_math_signals: compile_all(&[
                MATH_SYMBOLS,
                r"\b(sin|cos|tan|log|ln|exp|sqrt|pi|e|alpha|beta|gamma|delta)\b",
                MATH_ARITHMETIC,
                r"\b\d+\^\d+\b",
                r"\b\d+/\d+\b",
                MATH_PAREN_NUMBER,
            ]),
            bullet: compile(r"^[-•*]\s"),
            numbered: compile(r"^\d+[.)]\s"),
            clock: compile(r"^\d+:\d+"),
            sentence_end: compile(r"[.!?]"),
        }
    }

    /// "Chapter 3", "Module 2", "AIM: ...", "Key Concept: ..." and the like.
    pub fn is_structural_heading(&self, text: &str) -> bool {
        self.structural_heading.is_match(text) || self.objective_heading.is_match(text)
    }

    pub fn has_code_keyword(&self, text: &str) -> bool {
        self.code_keywords.iter().any(|re| re.is_match(text))
    }

    pub fn has_lexical_code_keyword(&self, text: &str) -> bool {
        self.lexical_code_keywords.iter().any(|re| re.is_match(text))
    }

    pub fn has_code_punctuation(&self, text: &str) -> bool {
        self.code_punctuation.iter().any(|re| re.is_match(text))
    }

    /// Number of distinct math indicators present.
    pub fn math_signal_count(&self, text: &str) -> usize {
        self.math_signals.iter().filter(|re| re.is_match(text)).count()
    }

    pub fn lexical_math_signal_count(&self, text: &str) -> usize {
        self.lexical_math_signals
            .iter()
            .filter(|re| re.is_match(text))
            .count()
    }

    pub fn list_marker(&self, text: &str) -> Option<ListMarker> {
        if self.bullet.is_match(text) {
            Some(ListMarker::Bullet)
        } else if self.numbered.is_match(text) {
            Some(ListMarker::Numbered)
        } else {
            None
        }
    }

    /// The text after a leading list marker, or the whole text without one.
    pub fn strip_list_marker<'t>(&self, text: &'t str) -> &'t str {
        self.bullet
            .find(text)
            .or_else(|| self.numbered.find(text))
            .map_or(text, |m| text[m.end()..].trim_start())
    }

    /// The term before the first colon, when the fragment reads as
    /// "term: explanation". Clock times and ratios ("3:15") are rejected.
    pub fn definition_term<'t>(&self, text: &'t str, max_term_len: usize) -> Option<&'t str> {
        let (term, _) = text.split_once(':')?;
        let term = term.trim();
        if term.chars().count() >= max_term_len
            || self.sentence_end.is_match(term)
            || self.clock.is_match(text)
        {
            return None;
        }
        Some(term)
    }

    /// Looser definition check of the lexical rule set: any short colon prefix.
    pub fn has_short_colon_prefix(&self, text: &str, max_term_len: usize) -> bool {
        text.split_once(':')
            .is_some_and(|(term, _)| term.trim().chars().count() < max_term_len)
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

const INTERROGATIVES: &[&str] = &["What", "How", "Why", "When", "Where", "Who"];

/// Whether the text opens with an interrogative word (case-sensitive).
pub fn starts_with_interrogative(text: &str) -> bool {
    INTERROGATIVES.iter().any(|w| text.starts_with(w))
}

/// Title-case test: every cased run starts with an uppercase letter followed
/// only by lowercase letters, and at least one cased letter exists.
///
/// Uncased characters (digits, punctuation, spaces) reset the run, so
/// "Chapter 1 Overview" is title case while "HTTP Basics" and "Don't" are not.
pub fn is_title_case(text: &str) -> bool {
    let mut cased = false;
    let mut previous_is_cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            if previous_is_cased {
                return false;
            }
            previous_is_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_is_cased {
                return false;
            }
            previous_is_cased = true;
            cased = true;
        } else {
            previous_is_cased = false;
        }
    }

    cased
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| compile(p)).collect()
}
