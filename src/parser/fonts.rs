//! Page fonts: names, glyph widths and text decoding.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::object::{decode_text_simple, get, get_array, number, resolve};
use crate::error::{Error, Result};

/// Advance used when a font carries no width for a glyph: half an em.
const FALLBACK_WIDTH: f32 = 500.0;

/// Default width of composite (Type0) fonts without a `/DW` entry.
const CID_DEFAULT_WIDTH: f32 = 1000.0;

/// Largest character code of a composite font (two-byte codes).
const MAX_CID: u32 = 0xFFFF;

/// A `/W` start or end code, if it is a whole number in the CID range.
fn cid(value: f32) -> Option<u32> {
    (value.is_finite() && (0.0..=MAX_CID as f32).contains(&value)).then_some(value as u32)
}

/// A font resource of one page, ready for measuring and decoding strings.
pub(crate) struct PageFont<'a> {
    dict: &'a Dictionary,
    /// Base font name with any subset tag removed
    pub base_font: String,
    two_byte: bool,
    first_char: u32,
    widths: Vec<f32>,
    cid_widths: HashMap<u32, f32>,
    default_width: f32,
}

impl<'a> PageFont<'a> {
    pub(crate) fn load(doc: &'a LopdfDocument, dict: &'a Dictionary) -> Self {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| strip_subset_tag(&String::from_utf8_lossy(n)).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let two_byte = dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0");

        let mut font = Self {
            dict,
            base_font,
            two_byte,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            default_width: FALLBACK_WIDTH,
        };

        if two_byte {
            font.load_cid_widths(doc);
        } else {
            font.first_char = get(doc, dict, b"FirstChar")
                .and_then(number)
                .map(|n| n.max(0.0) as u32)
                .unwrap_or(0);
            font.widths = get_array(doc, dict, b"Widths")
                .map(|arr| {
                    arr.iter()
                        .map(|o| resolve(doc, o).and_then(number).unwrap_or(FALLBACK_WIDTH))
                        .collect()
                })
                .unwrap_or_default();
        }

        font
    }

    /// Read `/DW` and `/W` from the descendant CIDFont.
    fn load_cid_widths(&mut self, doc: &'a LopdfDocument) {
        self.default_width = CID_DEFAULT_WIDTH;

        let Some(descendant) = get_array(doc, self.dict, b"DescendantFonts")
            .and_then(|arr| arr.first())
            .and_then(|o| resolve(doc, o))
            .and_then(|o| o.as_dict().ok())
        else {
            return;
        };

        if let Some(dw) = get(doc, descendant, b"DW").and_then(number) {
            self.default_width = dw;
        }

        let Some(w) = get_array(doc, descendant, b"W") else {
            return;
        };

        // Entries are either `c [w1 w2 ...]` or `c_first c_last w`. A code
        // outside the CID range ends the table.
        let mut i = 0;
        while i < w.len() {
            let Some(first) = resolve(doc, &w[i]).and_then(number).and_then(cid) else {
                log::debug!("Stopping at malformed /W entry in {}", self.base_font);
                break;
            };
            match w.get(i + 1).and_then(|o| resolve(doc, o)) {
                Some(Object::Array(list)) => {
                    for (offset, width) in list.iter().enumerate() {
                        let Some(code) = u32::try_from(offset)
                            .ok()
                            .and_then(|offset| first.checked_add(offset))
                            .filter(|code| *code <= MAX_CID)
                        else {
                            break;
                        };
                        if let Some(width) = resolve(doc, width).and_then(number) {
                            self.cid_widths.insert(code, width);
                        }
                    }
                    i += 2;
                }
                Some(last) => {
                    let Some(last) = number(last).and_then(cid) else {
                        break;
                    };
                    let width = w.get(i + 2).and_then(|o| resolve(doc, o)).and_then(number);
                    if let Some(width) = width {
                        for code in first..=last {
                            self.cid_widths.insert(code, width);
                        }
                    }
                    i += 3;
                }
                None => break,
            }
        }
    }

    /// Split a shown string into character codes.
    pub(crate) fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|c| match c {
                    [hi, lo] => u32::from(*hi) << 8 | u32::from(*lo),
                    [b] => u32::from(*b),
                    _ => 0,
                })
                .collect()
        } else {
            bytes.iter().map(|&b| u32::from(b)).collect()
        }
    }

    /// Whether code 32 is a single-byte space (word spacing applies).
    pub(crate) fn is_single_byte(&self) -> bool {
        !self.two_byte
    }

    /// Glyph advance in thousandths of an em.
    pub(crate) fn width(&self, code: u32) -> f32 {
        if self.two_byte {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .unwrap_or(self.default_width);
        }
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(self.default_width)
    }

    /// Decode a shown string with the font's encoding.
    pub(crate) fn decode(&self, doc: &LopdfDocument, bytes: &[u8]) -> String {
        match self.dict.get_font_encoding(doc) {
            Ok(encoding) => LopdfDocument::decode_text(&encoding, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            Err(_) => decode_text_simple(bytes),
        }
    }
}

/// Load every font resource of a page, keyed by resource name.
pub(crate) fn load_page_fonts(
    doc: &LopdfDocument,
    page_id: ObjectId,
) -> Result<BTreeMap<Vec<u8>, PageFont<'_>>> {
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    Ok(fonts
        .into_iter()
        .map(|(name, dict)| (name, PageFont::load(doc, dict)))
        .collect())
}

/// Remove a subset tag ("ABCDEF+Helvetica" becomes "Helvetica").
pub(crate) fn strip_subset_tag(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}
