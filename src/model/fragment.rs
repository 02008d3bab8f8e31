//! Positioned input fragments as delivered by the extraction side.

use super::BBox;
use serde::{Deserialize, Serialize};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Create a color from its channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` integer.
    pub fn from_packed(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Check if this is black.
    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }

    /// Hex representation, e.g. `"#1F2E3D"`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Font properties of a text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Font family as reported by the source (e.g. "ABCDEF+Arial-BoldMT")
    pub family: String,
    /// Font size in points
    pub size: f32,
    /// Bold weight
    pub bold: bool,
    /// Italic or oblique
    pub italic: bool,
    /// Text color
    pub color: Rgb,
}

impl FontDescriptor {
    /// Create a descriptor, inferring weight and slant from the font name.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        let family = family.into();
        let lower = family.to_lowercase();
        let bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            family,
            size,
            bold,
            italic,
            color: Rgb::BLACK,
        }
    }

    /// Set bold and return self.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic and return self.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set the color and return self.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("Helvetica", 11.0)
    }
}

/// A run of text with a single font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,
    /// Font of the run
    pub font: FontDescriptor,
    /// Bounding box on the page
    pub bbox: BBox,
}

impl TextFragment {
    /// Create a new text fragment.
    pub fn new(text: impl Into<String>, font: FontDescriptor, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            font,
            bbox,
        }
    }
}

/// An image placed on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFragment {
    /// Encoded image bytes
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Encoding extension ("png", "jpeg", ...)
    pub format: String,
    /// Bounding box on the page
    pub bbox: BBox,
}

impl ImageFragment {
    /// Create a new image fragment.
    pub fn new(data: Vec<u8>, format: impl Into<String>, bbox: BBox) -> Self {
        Self {
            data,
            format: format.into(),
            bbox,
        }
    }

    /// Width over height, or 1.0 for degenerate boxes.
    pub fn aspect_ratio(&self) -> f32 {
        if self.bbox.height() > 0.0 && self.bbox.width() > 0.0 {
            self.bbox.width() / self.bbox.height()
        } else {
            1.0
        }
    }
}

/// A table already resolved into a grid of cell texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFragment {
    /// Cell texts, row-major
    pub rows: Vec<Vec<String>>,
    /// Number of leading header rows
    pub header_rows: usize,
    /// Font size of the cell text
    pub font_size: f32,
    /// Bounding box on the page
    pub bbox: BBox,
}

impl TableFragment {
    /// Create a new table fragment without header rows.
    pub fn new(rows: Vec<Vec<String>>, bbox: BBox) -> Self {
        Self {
            rows,
            header_rows: 0,
            font_size: 10.0,
            bbox,
        }
    }

    /// Set the number of header rows and return self.
    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Check if the table has no cells.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.column_count() == 0
    }

    /// Plain text of all cells, tab-separated per row.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|r| r.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The smallest extracted unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fragment {
    /// A text run
    Text(TextFragment),
    /// An image payload
    Image(ImageFragment),
    /// A resolved table
    Table(TableFragment),
}

/// All raw fragments of one source page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Fragments in extraction order
    pub fragments: Vec<Fragment>,
}

impl PageContent {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            fragments: Vec::new(),
        }
    }

    /// Add a fragment.
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Add a text fragment.
    pub fn add_text(&mut self, text: impl Into<String>, font: FontDescriptor, bbox: BBox) {
        self.fragments
            .push(Fragment::Text(TextFragment::new(text, font, bbox)));
    }

    /// Split the fragments by kind: `(text, images, tables)`.
    pub fn split(self) -> (Vec<TextFragment>, Vec<ImageFragment>, Vec<TableFragment>) {
        let mut texts = Vec::new();
        let mut images = Vec::new();
        let mut tables = Vec::new();
        for fragment in self.fragments {
            match fragment {
                Fragment::Text(t) => texts.push(t),
                Fragment::Image(i) => images.push(i),
                Fragment::Table(t) => tables.push(t),
            }
        }
        (texts, images, tables)
    }

    /// Concatenated text of all text and table fragments.
    pub fn plain_text(&self) -> String {
        self.fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Text(t) => Some(t.text.clone()),
                Fragment::Table(t) => Some(t.plain_text()),
                Fragment::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_style_detection() {
        let font = FontDescriptor::new("Helvetica-Bold", 12.0);
        assert!(font.bold);
        assert!(!font.italic);

        let font = FontDescriptor::new("Helvetica-Oblique", 12.0);
        assert!(!font.bold);
        assert!(font.italic);
    }

    #[test]
    fn test_rgb() {
        let c = Rgb::from_packed(0x1F2E3D);
        assert_eq!(c, Rgb::new(0x1F, 0x2E, 0x3D));
        assert_eq!(c.to_hex(), "#1F2E3D");
        assert!(Rgb::default().is_black());
    }

    #[test]
    fn test_table_dimensions() {
        let table = TableFragment::new(
            vec![
                vec!["a".into(), "b".into()],
                vec!["c".into(), "d".into(), "e".into()],
            ],
            BBox::new(0.0, 0.0, 100.0, 40.0),
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.plain_text(), "a\tb\nc\td\te");
    }

    #[test]
    fn test_page_split() {
        let mut page = PageContent::new(1, 612.0, 792.0);
        page.add_text("Hello", FontDescriptor::default(), BBox::new(0.0, 0.0, 30.0, 12.0));
        page.push(Fragment::Image(ImageFragment::new(
            vec![1, 2, 3],
            "png",
            BBox::new(0.0, 20.0, 50.0, 70.0),
        )));
        let (texts, images, tables) = page.split();
        assert_eq!(texts.len(), 1);
        assert_eq!(images.len(), 1);
        assert!(tables.is_empty());
    }
}
