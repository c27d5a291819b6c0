//! Content stream interpretation: positioned text spans.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Document as LopdfDocument, Object};
use unicode_normalization::UnicodeNormalization;

use super::fonts::PageFont;
use super::object::number;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::model::{is_spaceless_script_char, TextSpan};

/// TJ adjustments (thousandths of an em) larger than this read as a word
/// break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Ascent and descent as fractions of the font size, for span boxes.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// An affine transform `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    pub(crate) const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub(crate) const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let n: Vec<f32> = operands.iter().map(number).collect::<Option<_>>()?;
        match n.as_slice() {
            [a, b, c, d, e, f, ..] => Some(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// `self` applied first, then `other`.
    pub(crate) fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub(crate) fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length of the transformed unit y-vector.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Graphics and text state parameters saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<Vec<u8>>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: None,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Page geometry used to convert PDF space to top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageBox {
    pub(crate) fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub(crate) fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Convert a PDF-space point to top-down page coordinates.
    pub(crate) fn to_page(self, x: f32, y: f32) -> (f32, f32) {
        (x - self.x0, self.y1 - y)
    }

    /// Convert a PDF-space rectangle given by two corners.
    pub(crate) fn rect_to_page(self, x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
        let (ax, ay) = self.to_page(x0, y0);
        let (bx, by) = self.to_page(x1, y1);
        Rect::new(ax, ay, bx, by)
    }
}

impl Default for PageBox {
    fn default() -> Self {
        // US Letter
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: 612.0,
            y1: 792.0,
        }
    }
}

/// Walks the operators of a page content stream and records the text shown.
pub(crate) struct ContentInterpreter<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, PageFont<'a>>,
    page_box: PageBox,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    spans: Vec<TextSpan>,
}

impl<'a> ContentInterpreter<'a> {
    pub(crate) fn new(
        doc: &'a LopdfDocument,
        fonts: &'a BTreeMap<Vec<u8>, PageFont<'a>>,
        page_box: PageBox,
    ) -> Self {
        Self {
            doc,
            fonts,
            page_box,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            spans: Vec::new(),
        }
    }

    /// Decode the stream and return its spans in content order.
    pub(crate) fn run(mut self, content: &[u8]) -> Result<Vec<TextSpan>> {
        let content = Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;
        for op in &content.operations {
            self.execute(op);
        }
        Ok(self.spans)
    }

    fn execute(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        let num = |i: usize| operands.get(i).and_then(number);

        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.state.font = Some(name.clone());
                }
                if let Some(size) = num(1) {
                    self.state.font_size = size;
                }
            }
            "Tc" => self.state.char_spacing = num(0).unwrap_or(0.0),
            "Tw" => self.state.word_spacing = num(0).unwrap_or(0.0),
            "Tz" => self.state.horizontal_scaling = num(0).unwrap_or(100.0) / 100.0,
            "TL" => self.state.leading = num(0).unwrap_or(0.0),
            "Ts" => self.state.rise = num(0).unwrap_or(0.0),
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.state.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(s @ Object::String(..)) = operands.first() {
                    self.show(std::slice::from_ref(s));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(s @ Object::String(..)) = operands.first() {
                    self.show(std::slice::from_ref(s));
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (num(0), num(1)) {
                    self.state.word_spacing = aw;
                    self.state.char_spacing = ac;
                }
                self.next_line();
                if let Some(s @ Object::String(..)) = operands.get(2) {
                    self.show(std::slice::from_ref(s));
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    /// Show strings and TJ adjustments as one span.
    fn show(&mut self, items: &[Object]) {
        let fonts = self.fonts;
        let Some(font) = self.state.font.as_ref().and_then(|name| fonts.get(name)) else {
            return;
        };

        let size = self.state.font_size;
        let h_scale = self.state.horizontal_scaling;
        let start = self.text_matrix;
        let mut text = String::new();
        let mut advance = 0.0f32;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    text.push_str(&font.decode(self.doc, bytes));
                    for code in font.codes(bytes) {
                        let mut tx = font.width(code) / 1000.0 * size + self.state.char_spacing;
                        if code == 32 && font.is_single_byte() {
                            tx += self.state.word_spacing;
                        }
                        advance += tx * h_scale;
                    }
                }
                other => {
                    let Some(adjustment) = number(other) else {
                        continue;
                    };
                    advance -= adjustment / 1000.0 * size * h_scale;
                    if -adjustment > TJ_SPACE_THRESHOLD
                        && !text.is_empty()
                        && !text.ends_with(char::is_whitespace)
                        && !text.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        text.push(' ');
                    }
                }
            }
        }

        self.text_matrix = Matrix::translation(advance, 0.0).then(&self.text_matrix);

        let text: String = text.nfkc().collect();
        if text.trim().is_empty() {
            return;
        }

        let device = start.then(&self.state.ctm);
        let end = self.text_matrix.then(&self.state.ctm);
        let rise = self.state.rise;
        let (x_start, baseline) = device.apply(0.0, rise);
        let (x_end, _) = end.apply(0.0, rise);
        let effective_size = size * device.vertical_scale();

        let bbox = self.page_box.rect_to_page(
            x_start,
            baseline - effective_size * DESCENT,
            x_end,
            baseline + effective_size * ASCENT,
        );

        self.spans.push(TextSpan::new(
            text,
            font.base_font.clone(),
            effective_size,
            bbox,
        ));
    }
}
