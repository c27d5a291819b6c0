//! Page annotations with their geometry.

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::content::PageBox;
use super::object::{decode_text_simple, get, get_array, numbers, resolve};
use crate::geometry::Rect;
use crate::model::{Annotation, AnnotationKind};

/// Read the `/Annots` of a page.
///
/// Entries that are not dictionaries, or that have neither a usable `/Rect`
/// nor usable `/QuadPoints`, are skipped.
pub(crate) fn page_annotations(
    doc: &LopdfDocument,
    page_id: ObjectId,
    page_box: PageBox,
) -> Vec<Annotation> {
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let Some(annots) = get_array(doc, page_dict, b"Annots") else {
        return Vec::new();
    };

    annots
        .iter()
        .filter_map(|entry| match resolve(doc, entry) {
            Some(Object::Dictionary(dict)) => read_annotation(doc, dict, page_box),
            _ => {
                log::debug!("Skipping non-dictionary annotation entry");
                None
            }
        })
        .collect()
}

fn read_annotation(doc: &LopdfDocument, dict: &Dictionary, page_box: PageBox) -> Option<Annotation> {
    let subtype = get(doc, dict, b"Subtype")
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).to_string())
        .unwrap_or_default();
    let kind = AnnotationKind::from_subtype(&subtype);

    let rect = get_array(doc, dict, b"Rect")
        .and_then(|arr| numbers(doc, arr))
        .and_then(|n| match n.as_slice() {
            [x0, y0, x1, y1] => Some(page_box.rect_to_page(*x0, *y0, *x1, *y1)),
            _ => None,
        })
        .filter(|r| !r.is_empty());

    let quads = get_array(doc, dict, b"QuadPoints")
        .and_then(|arr| numbers(doc, arr))
        .map(|n| quad_rects(&n, page_box))
        .unwrap_or_default();

    if rect.is_none() && quads.is_empty() {
        log::warn!("Skipping {} annotation without geometry", subtype);
        return None;
    }

    let contents = match get(doc, dict, b"Contents") {
        Some(Object::String(bytes, _)) => Some(decode_text_simple(bytes)),
        _ => None,
    }
    .filter(|c| !c.trim().is_empty());

    Some(Annotation {
        kind,
        rect,
        quads,
        contents,
    })
}

/// One page-space rectangle per quad of eight numbers.
fn quad_rects(values: &[f32], page_box: PageBox) -> Vec<Rect> {
    let mut quads: Vec<Rect> = values
        .chunks_exact(8)
        .filter_map(|q| {
            let points: Vec<(f32, f32)> = q
                .chunks_exact(2)
                .map(|p| page_box.to_page(p[0], p[1]))
                .collect();
            Rect::bounding(&points)
        })
        .filter(|r| !r.is_empty())
        .collect();
    quads.sort_by(|a, b| a.y0.total_cmp(&b.y0).then_with(|| a.x0.total_cmp(&b.x0)));
    quads
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn reals(values: &[f32]) -> Object {
        Object::Array(values.iter().map(|v| Object::Real(*v)).collect())
    }

    fn doc_with_annots(annots: Vec<Object>) -> (LopdfDocument, ObjectId) {
        let mut doc = LopdfDocument::with_version("1.5");
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Annots" => annots,
        });
        (doc, page_id)
    }

    #[test]
    fn test_highlight_rect_and_quads() {
        let (doc, page_id) = doc_with_annots(vec![Object::Dictionary(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Highlight",
            "Rect" => reals(&[72.0, 680.0, 300.0, 712.0]),
            "QuadPoints" => reals(&[
                72.0, 712.0, 300.0, 712.0, 72.0, 698.0, 300.0, 698.0,
                72.0, 694.0, 150.0, 694.0, 72.0, 680.0, 150.0, 680.0,
            ]),
            "Contents" => Object::string_literal("remember"),
        })]);

        let annots = page_annotations(&doc, page_id, PageBox::default());
        assert_eq!(annots.len(), 1);
        let annot = &annots[0];
        assert!(annot.is_highlight());
        assert_eq!(annot.rect, Some(Rect::new(72.0, 80.0, 300.0, 112.0)));
        assert_eq!(
            annot.quads,
            vec![
                Rect::new(72.0, 80.0, 300.0, 94.0),
                Rect::new(72.0, 98.0, 150.0, 112.0),
            ]
        );
        assert_eq!(annot.contents.as_deref(), Some("remember"));
    }

    #[test]
    fn test_annotation_without_geometry_skipped() {
        let (doc, page_id) = doc_with_annots(vec![
            Object::Dictionary(dictionary! { "Subtype" => "Highlight" }),
            Object::Dictionary(dictionary! {
                "Subtype" => "Highlight",
                "Rect" => reals(&[1.0, 2.0]),
            }),
            Object::Integer(7),
            Object::Dictionary(dictionary! {
                "Subtype" => "Link",
                "Rect" => reals(&[0.0, 0.0, 10.0, 10.0]),
            }),
        ]);

        let annots = page_annotations(&doc, page_id, PageBox::default());
        assert_eq!(annots.len(), 1);
        assert_eq!(annots[0].kind, AnnotationKind::Other("Link".to_string()));
    }

    #[test]
    fn test_page_without_annots() {
        let mut doc = LopdfDocument::with_version("1.5");
        let page_id = doc.add_object(dictionary! { "Type" => "Page" });
        assert!(page_annotations(&doc, page_id, PageBox::default()).is_empty());
    }
}
