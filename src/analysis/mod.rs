//! Highlight analysis: document structure, local style and context, and
//! categorization of highlighted fragments.
//!
//! Everything here is infallible. Missing signals resolve to empty or default
//! values and ambiguous fragments resolve to [`Category::Point`].
//!
//! [`Category::Point`]: crate::model::Category::Point

mod categorize;
mod context;
mod grouping;
mod patterns;
mod structure;
mod style;

pub use categorize::{CategorizeOptions, Categorizer, Rule, RuleSetKind};
pub use context::{context_window, ContextOptions, ContextWindow, PageLines};
pub use grouping::{group_words_into_lines, GroupedLine};
pub use patterns::{is_title_case, starts_with_interrogative, ListMarker, Patterns};
pub use structure::{DocumentStructureProfile, FontUsage, SizeKey, StructureOptions};
pub use style::{default_monospace_markers, StyleInfo, DEFAULT_MONOSPACE_MARKERS};
