//! # relayout
//!
//! Reading-order reconstruction and column-preserving re-layout for
//! positioned page content.
//!
//! Given the text runs, images and tables of a page with their coordinates,
//! this library finds the page's column structure, groups lines into
//! paragraphs, headings and list items, separates running headers and
//! footers, orders everything for reading, and re-synthesizes the page
//! into an editable document through an [`OutputWriter`] while keeping
//! multi-column sections side by side.
//!
//! ## Quick Start
//!
//! ```
//! use relayout::model::{BBox, FontDescriptor, PageContent};
//! use relayout::Relayout;
//!
//! let mut page = PageContent::new(1, 650.0, 800.0);
//! let font = FontDescriptor::new("Times-Roman", 10.0);
//! for i in 0..3 {
//!     let y = 100.0 + i as f32 * 40.0;
//!     page.add_text("left column text", font.clone(), BBox::new(50.0, y, 250.0, y + 12.0));
//!     page.add_text("right column text", font.clone(), BBox::new(400.0, y, 600.0, y + 12.0));
//! }
//!
//! let pages = Relayout::new().analyze(&vec![page])?;
//! assert_eq!(pages[0].layout.num_columns(), 2);
//! # Ok::<(), relayout::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Column detection**: projection-profile gutters with a crossing check
//! - **Block segmentation**: paragraphs, headings and list items per column
//! - **Page furniture**: running headers and footers kept out of the flow
//! - **Reading order**: column-major between full-width breaks
//! - **Re-layout**: borderless column containers, reflowed prose, styled runs
//! - **Parallel processing**: pages analyzed with Rayon
//! - **Layout hints**: optional advisory column counts from an outside service

pub mod convert;
pub mod error;
pub mod hint;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConvertResult, Converter, TextComparison};
pub use error::{Error, Result};
pub use hint::{FixedHint, HintError, HintProvider, LayoutHint};
pub use layout::{LayoutAnalyzer, LayoutConfig};
pub use model::{
    BBox, Block, BlockKind, ColumnLayout, Fragment, LayoutKind, Page, PageContent, PageElement,
    Paragraph, TextFragment,
};
pub use render::{
    ConversionStats, LayoutSynthesizer, OutputWriter, PageSelection, RecordingWriter,
    RenderOptions, WriterCall,
};
pub use source::PageSource;

use std::path::Path;

/// Analyze one page with the default configuration.
///
/// # Example
///
/// ```
/// use relayout::{analyze_page, PageContent};
///
/// let page = analyze_page(PageContent::new(1, 612.0, 792.0));
/// assert!(page.is_empty());
/// ```
pub fn analyze_page(content: PageContent) -> Page {
    LayoutAnalyzer::new(LayoutConfig::default()).analyze(content)
}

/// Convert pages with default options and return the writer calls made.
///
/// # Example
///
/// ```
/// use relayout::{to_writer_calls, BBox, PageContent, WriterCall};
/// use relayout::model::FontDescriptor;
///
/// let mut page = PageContent::new(1, 612.0, 792.0);
/// page.add_text("Hello", FontDescriptor::default(), BBox::new(72.0, 100.0, 110.0, 112.0));
///
/// let calls = to_writer_calls(&vec![page])?;
/// assert!(matches!(calls[0], WriterCall::CreateDocument(_)));
/// # Ok::<(), relayout::Error>(())
/// ```
pub fn to_writer_calls(source: &dyn PageSource) -> Result<Vec<WriterCall>> {
    Relayout::new().to_calls(source)
}

/// Builder for analyzing and converting documents.
///
/// # Example
///
/// ```no_run
/// use relayout::{Relayout, RecordingWriter, PageContent};
///
/// let pages: Vec<PageContent> = Vec::new();
/// let mut writer = RecordingWriter::new();
/// let result = Relayout::new()
///     .sequential()
///     .with_validation()
///     .with_source_margins()
///     .convert_to_file(&pages, &mut writer, "output.json")?;
/// println!("{} pages", result.page_count());
/// # Ok::<(), relayout::Error>(())
/// ```
pub struct Relayout {
    options: ConvertOptions,
}

impl Relayout {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
        }
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set the layout configuration.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.options = self.options.with_render_options(render);
        self
    }

    /// Keep every source line break instead of reflowing prose.
    pub fn preserve_line_breaks(mut self) -> Self {
        self.options.render = self.options.render.with_line_breaks(true);
        self
    }

    /// Use the first page's observed margins for the output.
    pub fn with_source_margins(mut self) -> Self {
        self.options.render = self.options.render.with_source_margins(true);
        self
    }

    /// Skip pages without content.
    pub fn skip_blank_pages(mut self) -> Self {
        self.options.render = self.options.render.with_skip_blank_pages(true);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Compare source and output words after conversion.
    pub fn with_validation(mut self) -> Self {
        self.options = self.options.with_validation(true);
        self
    }

    /// Use a layout-hint service.
    pub fn with_hint_provider(mut self, provider: impl HintProvider + 'static) -> Self {
        self.options = self.options.with_hint_provider(provider);
        self
    }

    /// Set a progress callback receiving `(current_page, total_pages)`.
    pub fn with_progress(mut self, progress: impl Fn(u32, u32) + Send + Sync + 'static) -> Self {
        self.options = self.options.with_progress(progress);
        self
    }

    /// Get the accumulated options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Analyze the selected pages without emitting anything.
    pub fn analyze(self, source: &dyn PageSource) -> Result<Vec<Page>> {
        Ok(Converter::new(self.options)?.analyze(source))
    }

    /// Convert the selected pages into `writer`.
    pub fn convert(
        self,
        source: &dyn PageSource,
        writer: &mut dyn OutputWriter,
    ) -> Result<ConvertResult> {
        Converter::new(self.options)?.convert(source, writer)
    }

    /// Convert the selected pages and save the writer's document.
    pub fn convert_to_file<P: AsRef<Path>>(
        self,
        source: &dyn PageSource,
        writer: &mut dyn OutputWriter,
        path: P,
    ) -> Result<ConvertResult> {
        Converter::new(self.options)?.convert_to_file(source, writer, path.as_ref())
    }

    /// Convert into a [`RecordingWriter`] and return the recorded calls.
    pub fn to_calls(self, source: &dyn PageSource) -> Result<Vec<WriterCall>> {
        let mut writer = RecordingWriter::new();
        self.convert(source, &mut writer)?;
        Ok(writer.into_calls())
    }
}

impl Default for Relayout {
    fn default() -> Self {
        Self::new()
    }
}
