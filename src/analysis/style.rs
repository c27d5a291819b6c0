//! Local text style under a highlighted region.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::model::Page;

/// Font-name fragments that mark a monospace face.
pub const DEFAULT_MONOSPACE_MARKERS: &[&str] = &["mono", "code", "console"];

/// Style snapshot of the text under a region.
///
/// All fields stay at their zero value when no span intersects the region;
/// that is a valid "unknown style" and categorization works with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    /// Font size in points, 0 if unknown
    pub font_size: f32,
    pub is_bold: bool,
    pub is_italic: bool,
    /// Font name matched a monospace marker
    pub is_code_style: bool,
    /// Left edge of the intersecting line
    pub indentation: f32,
}

impl StyleInfo {
    /// Style of the text under `rect`.
    ///
    /// Every line intersecting the rectangle sets the indentation, and every
    /// intersecting span in it sets the font attributes. When several spans
    /// qualify, the last one in reading order wins; highlights are expected
    /// to cover visually uniform text.
    pub fn under(page: &Page, rect: &Rect, monospace_markers: &[String]) -> Self {
        let mut style = StyleInfo::default();

        for line in page.lines() {
            if !line.bbox.intersects(rect) {
                continue;
            }
            style.indentation = line.indentation();

            for span in line.spans.iter().filter(|s| s.bbox.intersects(rect)) {
                let font_name = span.font_name.to_lowercase();
                style.font_size = span.size;
                style.is_bold = span.is_bold;
                style.is_italic = span.is_italic;
                style.is_code_style = monospace_markers
                    .iter()
                    .any(|marker| font_name.contains(marker.as_str()));
            }
        }

        style
    }
}

/// The default monospace markers as owned strings.
pub fn default_monospace_markers() -> Vec<String> {
    DEFAULT_MONOSPACE_MARKERS
        .iter()
        .map(|m| m.to_string())
        .collect()
}
