//! Geometric primitives for layout analysis.
//!
//! All coordinates are in page points with the origin at the top-left corner
//! and y increasing downward, which is the convention the extraction side
//! guarantees for every fragment.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box `(x0, y0, x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a box from its corner coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use relayout::model::BBox;
    ///
    /// let b = BBox::new(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(b.width(), 100.0);
    /// assert_eq!(b.height(), 50.0);
    /// ```
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a box from an origin and a size.
    pub fn from_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Vertical center.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f32, f32) {
        (self.center_x(), self.center_y())
    }

    /// Area of the box (zero for degenerate boxes).
    pub fn area(&self) -> f32 {
        if self.is_degenerate() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// Whether the box has no usable extent.
    ///
    /// Zero or negative width/height and non-finite coordinates all count as
    /// degenerate. Such boxes are dropped from clustering input.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.x0.is_finite()
            && self.y0.is_finite()
            && self.x1.is_finite()
            && self.y1.is_finite();
        !finite || self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union of an iterator of boxes, or `None` when empty.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a BBox>) -> Option<BBox> {
        boxes.into_iter().fold(None, |acc, b| match acc {
            None => Some(*b),
            Some(a) => Some(a.union(b)),
        })
    }

    /// Intersection of two boxes, or `None` if they don't overlap.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let b = BBox {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if b.width() > 0.0 && b.height() > 0.0 {
            Some(b)
        } else {
            None
        }
    }

    /// Check if this box overlaps another with positive area.
    ///
    /// ```
    /// use relayout::model::BBox;
    ///
    /// let a = BBox::new(0.0, 0.0, 100.0, 100.0);
    /// let b = BBox::new(50.0, 50.0, 150.0, 150.0);
    /// let c = BBox::new(200.0, 200.0, 300.0, 300.0);
    /// assert!(a.intersects(&b));
    /// assert!(!a.intersects(&c));
    /// ```
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0 && self.y0 < other.y1 && self.y1 > other.y0
    }

    /// Length of the horizontal overlap (0 if disjoint).
    pub fn horizontal_overlap(&self, other: &BBox) -> f32 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Length of the vertical overlap (0 if disjoint).
    pub fn vertical_overlap(&self, other: &BBox) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    /// Check if this box fully contains another.
    pub fn contains(&self, other: &BBox) -> bool {
        other.x0 >= self.x0 && other.x1 <= self.x1 && other.y0 >= self.y0 && other.y1 <= self.y1
    }

    /// Check if a point lies inside the box (edges inclusive).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Check if the box's horizontal span strictly crosses `x`.
    pub fn spans_x(&self, x: f32) -> bool {
        self.x0 < x && self.x1 > x
    }

    /// Signed vertical gap from the bottom of `self` to the top of `other`.
    ///
    /// Negative when the boxes overlap vertically.
    pub fn vertical_gap_to(&self, other: &BBox) -> f32 {
        other.y0 - self.y1
    }

    /// Signed horizontal gap from the right of `self` to the left of `other`.
    pub fn horizontal_gap_to(&self, other: &BBox) -> f32 {
        other.x0 - self.x1
    }

    /// Euclidean distance between the closest points of two boxes.
    ///
    /// Zero when the boxes touch or overlap.
    pub fn distance(&self, other: &BBox) -> f32 {
        let dx = (other.x0 - self.x1).max(self.x0 - other.x1).max(0.0);
        let dy = (other.y0 - self.y1).max(self.y0 - other.y1).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}
