//! Page geometry.
//!
//! All rectangles use top-down page coordinates: `y0` is the top edge and
//! `y1` the bottom edge, so larger `y` means further down the page. The PDF
//! backend flips the bottom-up PDF user space into this convention once, at
//! extraction time.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from two corners, normalising the edge order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Smallest rectangle covering all the given points.
    ///
    /// Returns `None` for an empty point set.
    pub fn bounding(points: &[(f32, f32)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Rect::new(first.0, first.1, first.0, first.1);
        for &(x, y) in rest {
            rect.x0 = rect.x0.min(x);
            rect.y0 = rect.y0.min(y);
            rect.x1 = rect.x1.max(x);
            rect.y1 = rect.y1.max(y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Vertical midpoint.
    pub fn mid_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Whether the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Intersection of two rectangles, if they overlap with a positive area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let rect = Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if rect.is_empty() {
            None
        } else {
            Some(rect)
        }
    }

    /// Whether the two rectangles overlap with a positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Shrink every edge by `margin`.
    ///
    /// A rectangle too small to shrink collapses onto its centre line instead
    /// of turning inside out, so it still intersects the text it sits on.
    pub fn inset(&self, margin: f32) -> Rect {
        let margin_x = margin.min(self.width() / 2.0).max(0.0);
        let margin_y = margin.min(self.height() / 2.0).max(0.0);
        let mut rect = Rect {
            x0: self.x0 + margin_x,
            y0: self.y0 + margin_y,
            x1: self.x1 - margin_x,
            y1: self.y1 - margin_y,
        };
        // Keep a sliver of height so a collapsed rectangle can still overlap.
        if rect.y1 <= rect.y0 {
            let mid = rect.mid_y();
            rect.y0 = mid - 0.05;
            rect.y1 = mid + 0.05;
        }
        if rect.x1 <= rect.x0 {
            let mid = (rect.x0 + rect.x1) / 2.0;
            rect.x0 = mid - 0.05;
            rect.x1 = mid + 0.05;
        }
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalises_corners() {
        let rect = Rect::new(100.0, 50.0, 10.0, 5.0);
        assert_eq!(rect, Rect::new(10.0, 5.0, 100.0, 50.0));
        assert_eq!(rect.width(), 90.0);
        assert_eq!(rect.height(), 45.0);
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 20.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));

        // Touching edges do not count as overlap
        let c = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_inset() {
        let rect = Rect::new(10.0, 10.0, 110.0, 30.0).inset(2.0);
        assert_eq!(rect, Rect::new(12.0, 12.0, 108.0, 28.0));
    }

    #[test]
    fn test_inset_collapses_small_rect() {
        let rect = Rect::new(10.0, 10.0, 110.0, 12.0).inset(2.0);
        assert!(!rect.is_empty());
        assert!((rect.mid_y() - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_bounding() {
        let rect = Rect::bounding(&[(5.0, 9.0), (1.0, 3.0), (7.0, 4.0)]).unwrap();
        assert_eq!(rect, Rect::new(1.0, 3.0, 7.0, 9.0));
        assert!(Rect::bounding(&[]).is_none());
    }
}
