//! Page-level types.

use super::{BBox, Block, ColumnLayout, ImageFragment, TableFragment};
use serde::{Deserialize, Serialize};

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Left margin
    pub left: f32,
    /// Right margin
    pub right: f32,
    /// Top margin
    pub top: f32,
    /// Bottom margin
    pub bottom: f32,
}

impl Margins {
    /// Same margin on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(72.0)
    }
}

/// Content of a sequenced page element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementContent {
    /// A text block
    Text(Block),
    /// An image
    Image(ImageFragment),
    /// A resolved table
    Table(TableFragment),
}

/// One entry of a page's reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageElement {
    /// Position in the reading order
    pub index: usize,
    /// The element itself
    pub content: ElementContent,
    /// Bounding box on the source page
    pub bbox: BBox,
    /// Column assignment (0 = full width)
    pub column: usize,
}

impl PageElement {
    /// Create an element, taking its box from the content.
    pub fn new(content: ElementContent, column: usize) -> Self {
        let bbox = match &content {
            ElementContent::Text(b) => b.bbox,
            ElementContent::Image(i) => i.bbox,
            ElementContent::Table(t) => t.bbox,
        };
        Self {
            index: 0,
            content,
            bbox,
            column,
        }
    }

    /// Vertical position (top edge).
    pub fn y(&self) -> f32 {
        self.bbox.y0
    }

    /// Horizontal position (left edge).
    pub fn x(&self) -> f32 {
        self.bbox.x0
    }

    /// Check if the element spans the full width.
    pub fn is_full_width(&self) -> bool {
        self.column == 0
    }

    /// The text block, if this is one.
    pub fn as_block(&self) -> Option<&Block> {
        match &self.content {
            ElementContent::Text(b) => Some(b),
            _ => None,
        }
    }

    /// Check if this element is page furniture.
    pub fn is_furniture(&self) -> bool {
        self.as_block().map(|b| b.is_furniture()).unwrap_or(false)
    }

    /// Representative font size, used to scale spacing.
    pub fn font_size(&self) -> Option<f32> {
        match &self.content {
            ElementContent::Text(b) => Some(b.font_size()),
            ElementContent::Table(t) => Some(t.font_size),
            ElementContent::Image(_) => None,
        }
    }
}

/// A fully analyzed page, ready for synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Observed text margins
    pub margins: Margins,

    /// Detected column structure
    pub layout: ColumnLayout,

    /// Elements in reading order
    pub elements: Vec<PageElement>,
}

impl Page {
    /// Create a new empty single-column page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            margins: Margins::default(),
            layout: ColumnLayout::single(0.0, width),
            elements: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Text blocks in reading order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.elements.iter().filter_map(|e| e.as_block())
    }

    /// Plain text of the page in reading order.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| match &e.content {
                ElementContent::Text(b) => Some(b.text()),
                ElementContent::Table(t) => Some(t.plain_text()),
                ElementContent::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Page dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}
