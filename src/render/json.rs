//! JSON rendering of the highlight sequence.

use crate::error::{Error, Result};
use crate::model::Highlight;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert highlights to a JSON array, in the given order.
pub fn to_json(highlights: &[Highlight], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(highlights),
        JsonFormat::Compact => serde_json::to_string(highlights),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
