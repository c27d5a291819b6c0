//! Document model types.
//!
//! The page model (spans, lines, blocks, words, annotations) is what the PDF
//! backend produces and what highlight analysis reads. [`Highlight`] is what
//! analysis hands on to note renderers.

mod highlight;
mod layout;
mod page;

pub use highlight::{Category, Highlight};
pub use layout::{TextBlock, TextLine, TextSpan, Word};
pub use page::{Annotation, AnnotationKind, Document, Page};

pub(crate) use layout::is_spaceless_script_char;
