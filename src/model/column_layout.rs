//! Column geometry of a page.

use serde::{Deserialize, Serialize};

use super::BBox;

/// Classification of a page's column structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// One reading column
    #[default]
    SingleColumn,
    /// Two columns
    TwoColumn,
    /// Three columns
    ThreeColumn,
    /// Four or more columns
    MultiColumn,
    /// Columns interrupted by wide content spanning them
    Mixed,
}

impl LayoutKind {
    /// Layout kind for a plain column count.
    pub fn for_columns(count: usize) -> Self {
        match count {
            0 | 1 => LayoutKind::SingleColumn,
            2 => LayoutKind::TwoColumn,
            3 => LayoutKind::ThreeColumn,
            _ => LayoutKind::MultiColumn,
        }
    }

    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::SingleColumn => "single_column",
            LayoutKind::TwoColumn => "two_column",
            LayoutKind::ThreeColumn => "three_column",
            LayoutKind::MultiColumn => "multi_column",
            LayoutKind::Mixed => "mixed",
        }
    }
}

/// Horizontal extent of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnBoundary {
    /// Left edge
    pub x_start: f32,
    /// Right edge
    pub x_end: f32,
}

impl ColumnBoundary {
    /// Create a boundary.
    pub fn new(x_start: f32, x_end: f32) -> Self {
        Self { x_start, x_end }
    }

    /// Width of the column.
    pub fn width(&self) -> f32 {
        self.x_end - self.x_start
    }

    /// Check if an x coordinate falls within this column (edges inclusive).
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x_start && x <= self.x_end
    }
}

/// Detected columns of a page.
///
/// Boundaries are sorted left-to-right, share their inner edges (the gutter
/// centers) and together cover the content width exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Structural classification
    pub kind: LayoutKind,
    /// Column extents, left to right
    pub boundaries: Vec<ColumnBoundary>,
}

impl ColumnLayout {
    /// A single column spanning `[left, right]`.
    pub fn single(left: f32, right: f32) -> Self {
        Self {
            kind: LayoutKind::SingleColumn,
            boundaries: vec![ColumnBoundary::new(left, right)],
        }
    }

    /// Partition `[left, right]` at the given gutter centers.
    ///
    /// Gutters must be sorted and lie strictly inside the content range.
    pub fn from_gutters(left: f32, right: f32, gutters: &[f32]) -> Self {
        let mut edges = Vec::with_capacity(gutters.len() + 2);
        edges.push(left);
        edges.extend_from_slice(gutters);
        edges.push(right);

        let boundaries: Vec<ColumnBoundary> = edges
            .windows(2)
            .map(|w| ColumnBoundary::new(w[0], w[1]))
            .collect();

        Self {
            kind: LayoutKind::for_columns(boundaries.len()),
            boundaries,
        }
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.boundaries.len()
    }

    /// Check if the page has more than one column.
    pub fn is_multi_column(&self) -> bool {
        self.num_columns() > 1
    }

    /// Left edge of the content area.
    pub fn content_left(&self) -> f32 {
        self.boundaries.first().map(|b| b.x_start).unwrap_or(0.0)
    }

    /// Right edge of the content area.
    pub fn content_right(&self) -> f32 {
        self.boundaries.last().map(|b| b.x_end).unwrap_or(0.0)
    }

    /// Width of the content area.
    pub fn content_width(&self) -> f32 {
        self.content_right() - self.content_left()
    }

    /// Gutter centers (inner boundary edges).
    pub fn gutters(&self) -> Vec<f32> {
        self.boundaries.iter().skip(1).map(|b| b.x_start).collect()
    }

    /// 1-based column containing `x`, or `None` if outside all columns.
    pub fn column_at(&self, x: f32) -> Option<usize> {
        self.boundaries
            .iter()
            .position(|b| b.contains(x))
            .map(|i| i + 1)
    }

    /// Boundary of a 1-based column index.
    pub fn boundary(&self, column: usize) -> Option<&ColumnBoundary> {
        column.checked_sub(1).and_then(|i| self.boundaries.get(i))
    }

    /// Width of a 1-based column, or the content width for column 0.
    pub fn column_width(&self, column: usize) -> f32 {
        self.boundary(column)
            .map(|b| b.width())
            .unwrap_or_else(|| self.content_width())
    }

    /// Column for a box: 0 when it crosses a gutter by more than
    /// `tolerance` on both sides, otherwise the column holding its center.
    pub fn column_for(&self, bbox: &BBox, tolerance: f32) -> usize {
        if !self.is_multi_column() {
            return 1;
        }
        let straddles = self
            .gutters()
            .iter()
            .any(|&g| bbox.x0 < g - tolerance && bbox.x1 > g + tolerance);
        if straddles {
            return 0;
        }
        self.column_at(bbox.center_x()).unwrap_or(0)
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::single(0.0, 0.0)
    }
}
