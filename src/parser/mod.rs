//! PDF loading: text layout and annotations per page.

mod annots;
mod content;
mod fonts;
mod layout;
mod object;
mod options;
mod pdf_parser;

pub use layout::LayoutAnalyzer;
pub use options::{ErrorMode, LoadOptions, PageSelection};
pub use pdf_parser::{detect_version, is_pdf_bytes, PdfParser};
