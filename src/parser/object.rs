//! Small helpers for reading lopdf objects.

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

/// Follow a reference to its target; other objects are returned as-is.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up `key` in `dict` and follow a reference if there is one.
pub(crate) fn get<'a>(doc: &'a LopdfDocument, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|obj| resolve(doc, obj))
}

/// Look up an array value, following references.
pub(crate) fn get_array<'a>(
    doc: &'a LopdfDocument,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Vec<Object>> {
    get(doc, dict, key)?.as_array().ok()
}

/// Look up a page attribute, walking up the page tree for inherited keys.
pub(crate) fn inherited<'a>(
    doc: &'a LopdfDocument,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    // Page trees are shallow; the bound guards against parent cycles.
    for _ in 0..32 {
        if let Some(obj) = get(doc, dict, key) {
            return Some(obj);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Numeric value of an integer or real object.
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// All numbers of an array, following references; `None` if any entry is
/// not numeric.
pub(crate) fn numbers(doc: &LopdfDocument, array: &[Object]) -> Option<Vec<f32>> {
    array
        .iter()
        .map(|o| resolve(doc, o).and_then(number))
        .collect()
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8, or Latin-1).
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        let bytes = vec![0x43, 0x61, 0x66, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Café");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_number() {
        assert_eq!(number(&Object::Integer(3)), Some(3.0));
        assert_eq!(number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(number(&Object::Null), None);
    }

    #[test]
    fn test_inherited_media_box() {
        use lopdf::dictionary;

        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let media_box = inherited(&doc, page_id, b"MediaBox")
            .and_then(|o| o.as_array().ok())
            .and_then(|a| numbers(&doc, a));
        assert_eq!(media_box, Some(vec![0.0, 0.0, 595.0, 842.0]));
        assert!(inherited(&doc, page_id, b"Rotate").is_none());
    }
}
