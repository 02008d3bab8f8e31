//! Document model types for layout reconstruction.
//!
//! The model has two halves. The input side ([`BBox`], [`Fragment`],
//! [`Line`], [`Block`], [`ColumnLayout`], [`Page`]) describes what was found
//! on a source page. The output side ([`Paragraph`], [`Container`],
//! [`DocumentSetup`]) describes what is handed to an output writer.

mod block;
mod column_layout;
mod container;
mod document;
mod fragment;
mod geometry;
mod line;
mod page;
mod paragraph;

pub use block::{Block, BlockId, BlockKind};
pub use column_layout::{ColumnBoundary, ColumnLayout, LayoutKind};
pub use container::{
    Cell, CellItem, Container, ContainerRow, ImagePlacement, VerticalAlignment,
};
pub use document::{DocumentSetup, Metadata};
pub use fragment::{
    FontDescriptor, Fragment, ImageFragment, PageContent, Rgb, TableFragment, TextFragment,
};
pub use geometry::BBox;
pub use line::{detect_list_marker, Line, ListMarker};
pub(crate) use line::is_spaceless_script_char;
pub use page::{ElementContent, Margins, Page, PageElement};
pub use paragraph::{
    Alignment, InlineContent, ListInfo, ListStyle, Paragraph, ParagraphStyle, TextRun, TextStyle,
};
