//! Grid containers: column layouts and bordered tables on the output side.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// An image sized for the output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    /// Encoded image bytes
    #[serde(skip)]
    pub data: Vec<u8>,

    /// Encoding extension ("png", "jpeg", ...)
    pub format: String,

    /// Display width in points
    pub width: f32,

    /// Display height in points (aspect ratio preserved)
    pub height: f32,

    /// Space before the image in points
    pub space_before: Option<f32>,
}

/// A grid of cells.
///
/// Borderless containers reproduce source columns side by side; bordered
/// containers reproduce tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Draw cell borders
    pub bordered: bool,

    /// Column widths in points
    pub column_widths: Vec<f32>,

    /// Rows of the grid
    pub rows: Vec<ContainerRow>,

    /// Space before the container in points
    pub space_before: Option<f32>,
}

impl Container {
    /// Create an empty borderless container.
    pub fn borderless(column_widths: Vec<f32>) -> Self {
        Self {
            bordered: false,
            column_widths,
            rows: Vec::new(),
            space_before: None,
        }
    }

    /// Create an empty bordered container.
    pub fn bordered(column_widths: Vec<f32>) -> Self {
        Self {
            bordered: true,
            ..Self::borderless(column_widths)
        }
    }

    /// Add a row to the container.
    pub fn add_row(&mut self, row: ContainerRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    /// Total width in points.
    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    /// Check if the container has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All paragraphs in row-major, cell order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .flat_map(|c| &c.content)
            .filter_map(|item| match item {
                CellItem::Paragraph(p) => Some(p),
                CellItem::Image(_) => None,
            })
    }

    /// Get plain text representation of the container.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A container row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRow {
    /// Cells in the row
    pub cells: Vec<Cell>,

    /// Whether this is a header row
    pub is_header: bool,
}

impl ContainerRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// Content of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellItem {
    /// A paragraph
    Paragraph(Paragraph),
    /// An image
    Image(ImagePlacement),
}

/// A container cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell content in order
    pub content: Vec<CellItem>,

    /// Vertical alignment
    pub vertical_alignment: VerticalAlignment,
}

impl Cell {
    /// Create an empty top-aligned cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a cell holding one paragraph.
    pub fn with_paragraph(paragraph: Paragraph) -> Self {
        Self {
            content: vec![CellItem::Paragraph(paragraph)],
            vertical_alignment: VerticalAlignment::Top,
        }
    }

    /// Append an item.
    pub fn push(&mut self, item: CellItem) {
        self.content.push(item);
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|item| match item {
                CellItem::Paragraph(p) => Some(p.plain_text()),
                CellItem::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Vertical alignment for cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Top alignment
    #[default]
    Top,
    /// Middle/center alignment
    Middle,
    /// Bottom alignment
    Bottom,
}
