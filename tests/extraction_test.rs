//! End-to-end extraction over synthetic PDFs.

mod common;

use common::{build_pdf, lecture_pdf, rect_over, Annot, Run, TestPage, REGULAR};
use pdfnotes::{
    extract_highlights_from_bytes, load_bytes, load_bytes_with_options, Category, ExtractOptions,
    HighlightExtractor, LoadOptions, PageSelection, Pdfnotes,
};

fn pairs(highlights: &[pdfnotes::Highlight]) -> Vec<(&'static str, &str)> {
    highlights.iter().map(|h| h.as_pair()).collect()
}

#[test]
fn test_lecture_categories_in_reading_order() {
    let highlights = extract_highlights_from_bytes(&lecture_pdf()).unwrap();

    assert_eq!(
        pairs(&highlights),
        vec![
            ("heading", "Chapter 1 Processes"),
            ("definition", "Context switch: saving and restoring CPU state"),
            ("point", "- Remember to save your work"),
            ("code", "public class Scheduler {"),
            ("code", "private int quantum = 10;"),
            ("math", "x = sin(t) + cos(t)"),
            (
                "question",
                "What is the difference between a process and a thread?"
            ),
            ("emphasis", "Never busy wait"),
            ("list_item", "- First come first served"),
            ("list_item", "- Round robin with a quantum"),
        ]
    );

    let pages: Vec<u32> = highlights.iter().map(|h| h.page).collect();
    assert_eq!(pages, vec![1, 1, 1, 2, 2, 2, 2, 2, 2, 2]);
}

#[test]
fn test_ordering_and_non_empty_text() {
    let highlights = extract_highlights_from_bytes(&lecture_pdf()).unwrap();

    for pair in highlights.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.page < b.page || (a.page == b.page && a.y <= b.y));
    }
    for h in &highlights {
        assert!(!h.text.trim().is_empty());
        assert!(Category::ALL.contains(&h.category));
    }
}

#[test]
fn test_extraction_is_idempotent() {
    let doc = load_bytes(&lecture_pdf()).unwrap();
    let extractor = HighlightExtractor::default();
    assert_eq!(extractor.extract(&doc), extractor.extract(&doc));

    let sequential = HighlightExtractor::new(ExtractOptions::new().sequential());
    assert_eq!(extractor.extract(&doc), sequential.extract(&doc));
}

#[test]
fn test_document_without_highlights() {
    let data = build_pdf(vec![TestPage::new(vec![
        Run::regular(700.0, "Nothing is highlighted here."),
        Run::regular(686.0, "Nor here."),
    ])]);

    let (highlights, stats) =
        HighlightExtractor::default().extract_with_stats(&load_bytes(&data).unwrap());
    assert!(highlights.is_empty());
    assert_eq!(stats.pages_scanned, 1);
    assert_eq!(stats.highlight_annotations, 0);
}

#[test]
fn test_highlight_over_blank_area_is_skipped() {
    let text = Run::regular(700.0, "Only this line has text.");
    let data = build_pdf(vec![TestPage::new(vec![text.clone()])
        .annotate(Annot::highlight([300.0, 100.0, 400.0, 120.0]))
        .annotate(Annot::highlight(text.highlight_rect()))]);

    let (highlights, stats) =
        HighlightExtractor::default().extract_with_stats(&load_bytes(&data).unwrap());
    assert_eq!(pairs(&highlights), vec![("point", "Only this line has text.")]);
    assert_eq!(stats.highlight_annotations, 2);
    assert_eq!(stats.empty_highlights, 1);
}

#[test]
fn test_stats_count_categories() {
    let result = Pdfnotes::new().extract_bytes(&lecture_pdf()).unwrap();

    assert_eq!(result.stats.pages_scanned, 3);
    assert_eq!(result.stats.highlight_annotations, 8);
    assert_eq!(result.stats.empty_highlights, 0);
    assert_eq!(result.stats.count(Category::Code), 2);
    assert_eq!(result.stats.count(Category::ListItem), 2);
    assert_eq!(result.stats.highlight_count(), result.highlights.len());
}

#[test]
fn test_page_selection_limits_extraction() {
    let options = LoadOptions::new().with_pages(PageSelection::Pages(vec![2]));
    let doc = load_bytes_with_options(&lecture_pdf(), options).unwrap();
    assert_eq!(doc.pages.len(), 1);
    assert_eq!(doc.page_count, 3);

    let highlights = HighlightExtractor::default().extract(&doc);
    assert_eq!(highlights.len(), 7);
    assert!(highlights.iter().all(|h| h.page == 2));
}

#[test]
fn test_quad_points_select_partial_lines() {
    // Words: alpha 72-97, beta 102-122, gamma 127-152 on the first line;
    // delta 72-97, epsilon 102-137, zeta 142-162 on the second.
    let first = Run::regular(500.0, "alpha beta gamma");
    let second = Run::regular(486.0, "delta epsilon zeta");
    let annot = Annot::highlight(rect_over(&[&first, &second])).with_quads(vec![
        [125.0, 497.0, 153.0, 509.0],
        [71.0, 483.0, 98.0, 495.0],
    ]);
    let data = build_pdf(vec![TestPage::new(vec![first, second]).annotate(annot)]);
    let doc = load_bytes(&data).unwrap();

    let by_rect = HighlightExtractor::default().extract(&doc);
    let texts: Vec<&str> = by_rect.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["alpha beta gamma", "delta epsilon zeta"]);

    let by_quads = HighlightExtractor::new(ExtractOptions::new().with_quad_points(true)).extract(&doc);
    let texts: Vec<&str> = by_quads.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["gamma", "delta"]);
}

#[test]
fn test_lexical_rule_set() {
    let line = Run::regular(700.0, "Why use threads");
    let code = Run::regular(660.0, "total = count;");
    let data = build_pdf(vec![TestPage::new(vec![line.clone(), code.clone()])
        .annotate(Annot::highlight(line.highlight_rect()))
        .annotate(Annot::highlight(code.highlight_rect()))]);
    let doc = load_bytes(&data).unwrap();

    // Contextual: a short interrogative without '?' is a plain point, and
    // punctuation alone does not make code.
    let contextual = HighlightExtractor::default().extract(&doc);
    assert_eq!(
        pairs(&contextual),
        vec![("point", "Why use threads"), ("point", "total = count;")]
    );

    let lexical = HighlightExtractor::new(ExtractOptions::new().lexical()).extract(&doc);
    assert_eq!(
        pairs(&lexical),
        vec![("question", "Why use threads"), ("code", "total = count;")]
    );
}

#[test]
fn test_strict_and_lenient_error_modes() {
    let text = Run::regular(700.0, "Readable page.");
    let data = build_pdf(vec![
        TestPage::new(vec![text.clone()]).annotate(Annot::highlight(text.highlight_rect())),
        TestPage::new(vec![]).broken(),
    ]);

    let lenient = load_bytes(&data).unwrap();
    assert_eq!(lenient.pages.len(), 2);
    assert!(lenient.pages[1].is_empty());
    assert_eq!(
        pairs(&HighlightExtractor::default().extract(&lenient)),
        vec![("point", "Readable page.")]
    );

    let strict = load_bytes_with_options(&data, LoadOptions::new().strict());
    assert!(strict.is_err());
}

#[test]
fn test_page_selection_keeps_document_heading_sizes() {
    let filler: Vec<Run> = (0..20)
        .map(|i| Run::new(REGULAR, 20.0, 72.0, 760.0 - 30.0 * i as f32, "Large print filler"))
        .collect();

    let subheading = Run::new(REGULAR, 14.0, 72.0, 700.0, "memory layout basics");
    let mut runs = vec![subheading.clone()];
    runs.extend((0..6).map(|i| Run::regular(680.0 - 14.0 * i as f32, "the stack grows down")));

    let data = build_pdf(vec![
        TestPage::new(filler),
        TestPage::new(runs).annotate(Annot::highlight(subheading.highlight_rect())),
    ]);

    // 14pt is below 1.2x the document average once the 20pt page counts.
    let full = HighlightExtractor::default().extract(&load_bytes(&data).unwrap());
    assert_eq!(pairs(&full), vec![("point", "memory layout basics")]);

    let options = LoadOptions::new().with_pages(PageSelection::Pages(vec![2]));
    let doc = load_bytes_with_options(&data, options).unwrap();
    assert_eq!(doc.pages.len(), 1);
    assert_eq!(doc.unselected_pages.len(), 1);
    assert!(doc.unselected_pages[0].highlights().next().is_none());

    let extractor = HighlightExtractor::default();
    assert_eq!(
        extractor.profile(&doc),
        extractor.profile(&load_bytes(&data).unwrap())
    );
    assert_eq!(extractor.extract(&doc), full);
}

#[test]
fn test_code_keyword_corroborated_by_next_line() {
    let class_line = Run::regular(700.0, "public class Scheduler {");
    let field_line = Run::regular(686.0, "private int quantum = 10;");
    let data = build_pdf(vec![TestPage::new(vec![class_line.clone(), field_line])
        .annotate(Annot::highlight(class_line.highlight_rect()))]);

    let highlights = HighlightExtractor::default().extract(&load_bytes(&data).unwrap());
    assert_eq!(pairs(&highlights), vec![("code", "public class Scheduler {")]);
}

#[test]
fn test_code_keyword_without_corroboration_is_point() {
    let line = Run::regular(700.0, "public transport is cheaper");
    let data = build_pdf(vec![TestPage::new(vec![
        line.clone(),
        Run::regular(686.0, "Buses run every ten minutes."),
    ])
    .annotate(Annot::highlight(line.highlight_rect()))]);

    let highlights = HighlightExtractor::default().extract(&load_bytes(&data).unwrap());
    assert_eq!(pairs(&highlights), vec![("point", "public transport is cheaper")]);
}
