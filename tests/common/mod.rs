//! Synthetic PDFs for integration tests, built in memory with lopdf.
//!
//! Fonts carry no `/Widths`, so every glyph advances half an em: a run of
//! `n` characters at size `s` is `n * s / 2` points wide. Coordinates given
//! here are PDF user space (origin bottom-left, page 612 x 792).

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

pub const PAGE_HEIGHT: f32 = 792.0;

/// Font resource names available on every page.
pub const REGULAR: &str = "F1";
pub const BOLD: &str = "F2";
pub const MONO: &str = "F3";

/// One `Tj` of text at a baseline position.
#[derive(Debug, Clone)]
pub struct Run {
    pub font: &'static str,
    pub size: f32,
    pub x: f32,
    pub baseline: f32,
    pub text: String,
}

impl Run {
    pub fn new(font: &'static str, size: f32, x: f32, baseline: f32, text: &str) -> Self {
        Self {
            font,
            size,
            x,
            baseline,
            text: text.to_string(),
        }
    }

    pub fn regular(baseline: f32, text: &str) -> Self {
        Self::new(REGULAR, 10.0, 72.0, baseline, text)
    }

    pub fn width(&self) -> f32 {
        self.text.chars().count() as f32 * self.size / 2.0
    }

    /// PDF-space rectangle around the run, one point of padding on each side.
    pub fn highlight_rect(&self) -> [f32; 4] {
        [
            self.x - 1.0,
            self.baseline - 0.2 * self.size - 1.0,
            self.x + self.width() + 1.0,
            self.baseline + 0.8 * self.size + 1.0,
        ]
    }
}

/// Smallest rectangle covering several runs.
pub fn rect_over(runs: &[&Run]) -> [f32; 4] {
    runs.iter()
        .map(|r| r.highlight_rect())
        .reduce(|a, b| [a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])])
        .unwrap_or([0.0; 4])
}

/// An annotation to place on a page.
#[derive(Debug, Clone)]
pub struct Annot {
    pub subtype: &'static str,
    pub rect: Option<[f32; 4]>,
    pub quads: Vec<[f32; 4]>,
}

impl Annot {
    pub fn highlight(rect: [f32; 4]) -> Self {
        Self {
            subtype: "Highlight",
            rect: Some(rect),
            quads: Vec::new(),
        }
    }

    /// Quads given as PDF-space rectangles.
    pub fn with_quads(mut self, quads: Vec<[f32; 4]>) -> Self {
        self.quads = quads;
        self
    }

    fn to_dictionary(&self) -> Dictionary {
        let mut dict = dictionary! {
            "Type" => "Annot",
            "Subtype" => self.subtype,
        };
        if let Some(rect) = self.rect {
            dict.set("Rect", reals(&rect));
        }
        if !self.quads.is_empty() {
            // Upper-left, upper-right, lower-left, lower-right.
            let points: Vec<f32> = self
                .quads
                .iter()
                .flat_map(|[x0, y0, x1, y1]| [*x0, *y1, *x1, *y1, *x0, *y0, *x1, *y0])
                .collect();
            dict.set("QuadPoints", reals(&points));
        }
        dict
    }
}

/// A page: its text runs and annotations.
#[derive(Debug, Clone, Default)]
pub struct TestPage {
    pub runs: Vec<Run>,
    pub annots: Vec<Annot>,
    /// Replace `/Contents` with a non-stream object
    pub broken_content: bool,
}

impl TestPage {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Self::default()
        }
    }

    pub fn annotate(mut self, annot: Annot) -> Self {
        self.annots.push(annot);
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken_content = true;
        self
    }
}

fn reals(values: &[f32]) -> Object {
    Object::Array(values.iter().map(|v| Object::Real(*v)).collect())
}

fn content_for(runs: &[Run]) -> Vec<u8> {
    let mut operations = Vec::new();
    for run in runs {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(run.font.as_bytes().to_vec()),
                Object::Real(run.size),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(run.x), Object::Real(run.baseline)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(run.text.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
        .encode()
        .expect("content encodes")
}

fn font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
    })
}

/// Serialize a document with the given pages.
pub fn build_pdf(pages: Vec<TestPage>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = font(&mut doc, "Helvetica");
    let bold = font(&mut doc, "Helvetica-Bold");
    let mono = font(&mut doc, "DejaVuSansMono");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular,
            BOLD => bold,
            MONO => mono,
        },
    });

    let mut kids = Vec::new();
    for page in &pages {
        let contents = if page.broken_content {
            Object::Integer(5)
        } else {
            let stream = Stream::new(dictionary! {}, content_for(&page.runs));
            Object::Reference(doc.add_object(stream))
        };

        let annots: Vec<Object> = page
            .annots
            .iter()
            .map(|a| Object::Reference(doc.add_object(a.to_dictionary())))
            .collect();

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "Contents" => contents,
            "Annots" => annots,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).expect("document saves");
    data
}

/// A three-page lecture: highlights of every category on pages 1 and 2,
/// none on page 3.
pub fn lecture_pdf() -> Vec<u8> {
    let title = Run::new(BOLD, 20.0, 72.0, 720.0, "Chapter 1 Processes");
    let intro = Run::regular(690.0, "A process is a program in execution.");
    let definition = Run::regular(676.0, "Context switch: saving and restoring CPU state");
    let lone_bullet = Run::regular(640.0, "- Remember to save your work");
    let after = Run::regular(626.0, "The scheduler picks the next process.");

    let page1 = TestPage::new(vec![
        title.clone(),
        intro,
        definition.clone(),
        lone_bullet.clone(),
        after,
    ])
    .annotate(Annot::highlight(title.highlight_rect()))
    .annotate(Annot::highlight(definition.highlight_rect()))
    .annotate(Annot::highlight(lone_bullet.highlight_rect()));

    let class_line = Run::new(MONO, 10.0, 72.0, 720.0, "public class Scheduler {");
    let field_line = Run::new(MONO, 10.0, 72.0, 706.0, "private int quantum = 10;");
    let math = Run::regular(670.0, "x = sin(t) + cos(t)");
    let question = Run::regular(640.0, "What is the difference between a process and a thread?");
    let emphasis = Run::new(BOLD, 10.0, 72.0, 610.0, "Never busy wait");
    let first = Run::regular(580.0, "- First come first served");
    let second = Run::regular(566.0, "- Round robin with a quantum");

    let page2 = TestPage::new(vec![
        class_line.clone(),
        field_line.clone(),
        math.clone(),
        question.clone(),
        emphasis.clone(),
        first.clone(),
        second.clone(),
    ])
    .annotate(Annot::highlight(rect_over(&[&class_line, &field_line])))
    .annotate(Annot::highlight(math.highlight_rect()))
    .annotate(Annot::highlight(question.highlight_rect()))
    .annotate(Annot::highlight(emphasis.highlight_rect()))
    .annotate(Annot::highlight(rect_over(&[&first, &second])));

    let page3 = TestPage::new(vec![Run::regular(700.0, "Summary of the chapter.")]);

    build_pdf(vec![page1, page2, page3])
}
