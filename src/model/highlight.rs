//! Categorized highlight fragments, the unit handed to note renderers.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of labels a highlighted fragment can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Heading,
    Code,
    Math,
    ListItem,
    Question,
    Definition,
    Emphasis,
    /// Default label; absorbs everything no other rule claims
    Point,
}

impl Category {
    /// Every label, in categorizer precedence order.
    pub const ALL: [Category; 8] = [
        Category::Heading,
        Category::Code,
        Category::Math,
        Category::ListItem,
        Category::Question,
        Category::Definition,
        Category::Emphasis,
        Category::Point,
    ];

    /// The wire label (`heading`, `list_item`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Heading => "heading",
            Category::Code => "code",
            Category::Math => "math",
            Category::ListItem => "list_item",
            Category::Question => "question",
            Category::Definition => "definition",
            Category::Emphasis => "emphasis",
            Category::Point => "point",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// One categorized line of highlighted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub category: Category,

    /// Fragment text, trimmed and never empty
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Vertical position on the page (top-down), used for intra-page order
    pub y: f32,
}

impl Highlight {
    pub fn new(category: Category, text: impl Into<String>, page: u32, y: f32) -> Self {
        Self {
            category,
            text: text.into(),
            page,
            y,
        }
    }

    /// Reading order: page ascending, then vertical position ascending.
    pub fn reading_order(&self, other: &Highlight) -> Ordering {
        self.page
            .cmp(&other.page)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    /// The `(label, text)` pair consumed by document builders.
    pub fn as_pair(&self) -> (&'static str, &str) {
        (self.category.as_str(), &self.text)
    }
}
