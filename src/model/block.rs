//! Logical text blocks (paragraphs, headings, list items).

use serde::{Deserialize, Serialize};

use super::{BBox, Line, ListMarker};

/// Stable index of a block within its page, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub usize);

/// Type of text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A regular paragraph
    #[default]
    Paragraph,
    /// A heading with its level (1-6)
    Heading(u8),
    /// A list item
    ListItem(ListMarker),
}

/// An ordered run of lines judged to belong together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Stable identifier
    pub id: BlockId,
    /// Lines, top-to-bottom then left-to-right
    pub lines: Vec<Line>,
    /// Union of the lines' boxes
    pub bbox: BBox,
    /// Column index (0 = full width, 1..N = column number)
    pub column: usize,
    /// Block kind
    pub kind: BlockKind,
    /// Page header furniture
    pub is_header: bool,
    /// Page footer furniture
    pub is_footer: bool,
}

impl Block {
    /// Create a block from its lines.
    ///
    /// Returns `None` when `lines` is empty.
    pub fn new(id: BlockId, lines: Vec<Line>, column: usize) -> Option<Self> {
        let bbox = BBox::union_all(lines.iter().map(|l| &l.bbox))?;
        let kind = lines
            .first()
            .and_then(|l| l.list_marker())
            .map(BlockKind::ListItem)
            .unwrap_or_default();

        Some(Self {
            id,
            lines,
            bbox,
            column,
            kind,
            is_header: false,
            is_footer: false,
        })
    }

    /// Combined text of all lines, one line per row.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.text().trim().is_empty())
    }

    /// Character-weighted font size across all lines.
    pub fn font_size(&self) -> f32 {
        let mut chars = 0usize;
        let mut weighted = 0.0f32;
        for line in &self.lines {
            let n = line.text().chars().count().max(1);
            chars += n;
            weighted += line.font_size * n as f32;
        }
        if chars == 0 {
            11.0
        } else {
            weighted / chars as f32
        }
    }

    /// Widest line width.
    pub fn max_line_width(&self) -> f32 {
        self.lines.iter().map(|l| l.width()).fold(0.0, f32::max)
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading(_))
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        matches!(self.kind, BlockKind::ListItem(_))
    }

    /// Check if this block is page furniture (header or footer).
    pub fn is_furniture(&self) -> bool {
        self.is_header || self.is_footer
    }
}
