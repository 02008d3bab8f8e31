//! Whole-document conversion.
//!
//! A [`Converter`] pulls pages from a [`PageSource`], analyzes them (in
//! parallel by default), and then synthesizes and emits them in page order
//! to an [`OutputWriter`].
//!
//! # Example
//!
//! ```
//! use relayout::convert::{ConvertOptions, Converter};
//! use relayout::model::{BBox, FontDescriptor, PageContent};
//! use relayout::render::RecordingWriter;
//!
//! let mut page = PageContent::new(1, 612.0, 792.0);
//! page.add_text("Hello", FontDescriptor::default(), BBox::new(72.0, 72.0, 110.0, 84.0));
//!
//! let converter = Converter::new(ConvertOptions::default())?;
//! let mut writer = RecordingWriter::new();
//! let result = converter.convert(&vec![page], &mut writer)?;
//! assert_eq!(result.stats.pages_processed, 1);
//! # Ok::<(), relayout::Error>(())
//! ```

mod validate;

pub use validate::{normalize_words, PageComparison, TextComparison};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::Result;
use crate::hint::{self, HintProvider};
use crate::layout::{LayoutAnalyzer, LayoutConfig};
use crate::model::{DocumentSetup, Metadata, Page};
use crate::render::{
    emit, ConversionStats, LayoutSynthesizer, OutputWriter, PageReport, PageSelection,
    PageWarning, RenderOptions, WarningKind, WriterCall,
};
use crate::source::PageSource;

/// Callback receiving `(current_page, total_pages)` as pages are emitted.
pub type ProgressFn = dyn Fn(u32, u32) + Send + Sync;

/// Options for document conversion.
#[derive(Clone)]
pub struct ConvertOptions {
    /// Layout analysis configuration
    pub layout: LayoutConfig,

    /// Rendering options
    pub render: RenderOptions,

    /// Analyze pages in parallel
    pub parallel: bool,

    /// Compare source and output words after conversion
    pub validate: bool,

    /// Metadata for the output document
    pub metadata: Metadata,

    /// Optional layout-hint service
    pub hint_provider: Option<Arc<dyn HintProvider>>,

    /// Optional progress callback
    pub progress: Option<Arc<ProgressFn>>,
}

impl ConvertOptions {
    /// Create new conversion options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Enable or disable parallel analysis.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel analysis.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable word-level validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Set output metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.render = self.render.with_pages(pages);
        self
    }

    /// Use a layout-hint service.
    pub fn with_hint_provider(mut self, provider: impl HintProvider + 'static) -> Self {
        self.hint_provider = Some(Arc::new(provider));
        self
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, progress: impl Fn(u32, u32) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            render: RenderOptions::default(),
            parallel: true,
            validate: false,
            metadata: Metadata::default(),
            hint_provider: None,
            progress: None,
        }
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("layout", &self.layout)
            .field("render", &self.render)
            .field("parallel", &self.parallel)
            .field("validate", &self.validate)
            .field("metadata", &self.metadata)
            .field("hint_provider", &self.hint_provider.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Setup the output document was created with
    pub setup: DocumentSetup,

    /// Aggregated statistics
    pub stats: ConversionStats,

    /// One report per selected page, in page order
    pub reports: Vec<PageReport>,

    /// Word comparison (when validation is enabled)
    pub validation: Option<TextComparison>,
}

impl ConvertResult {
    /// Number of pages emitted.
    pub fn page_count(&self) -> u32 {
        self.stats.pages_processed
    }

    /// Check if any page produced a warning.
    pub fn has_warnings(&self) -> bool {
        self.stats.warning_count() > 0
    }
}

/// An analyzed page with what the conversion needs to know about it.
struct AnalyzedPage {
    page: Page,
    source_text: Option<String>,
    warning: Option<PageWarning>,
}

/// Converts positioned page content into a re-laid-out document.
pub struct Converter {
    options: ConvertOptions,
    analyzer: LayoutAnalyzer,
}

impl Converter {
    /// Create a converter, validating the layout and render options.
    pub fn new(options: ConvertOptions) -> Result<Self> {
        options.layout.validate()?;
        options.render.validate()?;
        let analyzer = LayoutAnalyzer::new(options.layout.clone());
        Ok(Self { options, analyzer })
    }

    /// Get the conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Analyze the selected pages of a source without emitting anything.
    ///
    /// Pages that fail to extract come back empty.
    pub fn analyze(&self, source: &dyn PageSource) -> Vec<Page> {
        self.analyze_pages(source)
            .into_iter()
            .map(|a| a.page)
            .collect()
    }

    /// Convert a source, emitting the result to `writer`.
    ///
    /// Extraction failures are recorded as page warnings; only writer
    /// failures abort the conversion.
    pub fn convert(
        &self,
        source: &dyn PageSource,
        writer: &mut dyn OutputWriter,
    ) -> Result<ConvertResult> {
        let analyzed = self.analyze_pages(source);
        let render = &self.options.render;

        let setup = self.document_setup(&analyzed, source.page_count());
        writer.create_document(&setup)?;
        let synthesizer = LayoutSynthesizer::for_setup(render.clone(), &setup);

        let total = analyzed.len() as u32;
        let mut stats = ConversionStats::new();
        let mut reports = Vec::with_capacity(analyzed.len());
        let mut output_text = Vec::new();
        let mut emitted_any = false;

        for (i, item) in analyzed.iter().enumerate() {
            let page = &item.page;
            let mut report = if page.is_empty() && render.skip_blank_pages {
                log::debug!("Page {}: blank, skipped", page.number);
                PageReport::skipped(page).with_warning(PageWarning::new(
                    page.number,
                    WarningKind::BlankPage,
                    "no content, skipped",
                ))
            } else {
                if emitted_any && render.page_breaks {
                    writer.add_page_break()?;
                }
                let calls = synthesizer.synthesize(page);
                emit(&calls, writer)?;
                emitted_any = true;

                if self.options.validate {
                    output_text.extend(calls.iter().map(WriterCall::plain_text));
                }
                PageReport::from_page(page, &calls)
            };

            if let Some(warning) = &item.warning {
                report.warnings.push(warning.clone());
            }
            stats.add_page(&report);
            reports.push(report);

            if let Some(progress) = &self.options.progress {
                progress(i as u32 + 1, total);
            }
        }

        let validation = self.options.validate.then(|| {
            TextComparison::compare(
                analyzed
                    .iter()
                    .map(|a| (a.page.number, a.source_text.as_deref().unwrap_or_default())),
                &output_text.join("\n"),
            )
        });

        log::debug!(
            "Converted {} pages ({} skipped, {} warnings)",
            stats.pages_processed,
            stats.pages_skipped,
            stats.warning_count()
        );

        Ok(ConvertResult {
            setup,
            stats,
            reports,
            validation,
        })
    }

    /// Convert a source and save the writer's document to `path`.
    pub fn convert_to_file(
        &self,
        source: &dyn PageSource,
        writer: &mut dyn OutputWriter,
        path: &Path,
    ) -> Result<ConvertResult> {
        let result = self.convert(source, writer)?;
        writer.save(path)?;
        Ok(result)
    }

    /// Extract and analyze the selected pages, in page order.
    fn analyze_pages(&self, source: &dyn PageSource) -> Vec<AnalyzedPage> {
        let selection = &self.options.render.page_selection;
        let indices: Vec<u32> = (0..source.page_count())
            .filter(|i| selection.includes(i + 1))
            .collect();

        if self.options.parallel {
            indices
                .par_iter()
                .map(|&i| self.analyze_page(source, i))
                .collect()
        } else {
            indices
                .iter()
                .map(|&i| self.analyze_page(source, i))
                .collect()
        }
    }

    fn analyze_page(&self, source: &dyn PageSource, index: u32) -> AnalyzedPage {
        let number = index + 1;
        match source.extract_page(index) {
            Ok(content) => {
                let hint = hint::resolve(self.options.hint_provider.as_deref(), &content);
                let source_text = self.options.validate.then(|| content.plain_text());
                AnalyzedPage {
                    page: self.analyzer.analyze_with_hint(content, hint.as_ref()),
                    source_text,
                    warning: None,
                }
            }
            Err(e) => {
                log::warn!("Page {}: extraction failed: {}", number, e);
                AnalyzedPage {
                    page: Page::letter(number),
                    source_text: None,
                    warning: Some(PageWarning::new(number, WarningKind::Extraction, e.to_string())),
                }
            }
        }
    }

    /// Output page size and margins.
    ///
    /// Without an explicit page size the first analyzed page's size is used.
    fn document_setup(&self, analyzed: &[AnalyzedPage], page_count: u32) -> DocumentSetup {
        let render = &self.options.render;
        let first = analyzed.iter().find(|a| a.warning.is_none()).map(|a| &a.page);

        let (width, height) = render
            .page_size
            .or_else(|| first.map(|p| p.dimensions()))
            .unwrap_or((612.0, 792.0));
        let margins = match first {
            Some(page) if render.use_source_margins => page.margins,
            _ => render.margins,
        };

        let mut setup = DocumentSetup::new(width, height, margins);
        setup.metadata = self.options.metadata.clone();
        setup.metadata.page_count = page_count;
        setup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::hint::{FixedHint, LayoutHint};
    use crate::model::{BBox, FontDescriptor, PageContent};
    use crate::render::RecordingWriter;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn text_page(number: u32, text: &str) -> PageContent {
        let mut page = PageContent::new(number, 612.0, 792.0);
        page.add_text(text, FontDescriptor::default(), BBox::new(72.0, 200.0, 400.0, 212.0));
        page
    }

    struct FlakySource(Vec<PageContent>);

    impl PageSource for FlakySource {
        fn page_count(&self) -> u32 {
            self.0.len() as u32 + 1
        }

        fn extract_page(&self, index: u32) -> Result<PageContent> {
            if index == 1 {
                return Err(Error::extraction(2, "corrupt content stream"));
            }
            let i = if index > 1 { index - 1 } else { index };
            Ok(self.0[i as usize].clone())
        }
    }

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .sequential()
            .with_validation(true)
            .with_pages(PageSelection::Pages(vec![2]))
            .with_hint_provider(FixedHint(LayoutHint::new(2, 0.9)));

        assert!(!options.parallel);
        assert!(options.validate);
        assert!(options.hint_provider.is_some());
        assert!(!options.render.page_selection.includes(1));
        assert!(format!("{:?}", options).contains("hint_provider: true"));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let mut layout = LayoutConfig::default();
        layout.columns.max_columns = 0;
        let result = Converter::new(ConvertOptions::new().with_layout(layout));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_inverted_render_range_rejected() {
        let mut render = RenderOptions::default();
        render.min_spacing = 30.0;
        render.max_spacing = 10.0;
        let result = Converter::new(ConvertOptions::new().with_render_options(render));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let mut render = RenderOptions::default();
        render.min_font_size = 40.0;
        let result = Converter::new(ConvertOptions::new().with_render_options(render));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_pages_separated_by_breaks() {
        let pages = vec![text_page(1, "First page"), text_page(2, "Second page")];
        let converter = Converter::new(ConvertOptions::default()).unwrap();
        let mut writer = RecordingWriter::new();
        let result = converter.convert(&pages, &mut writer).unwrap();

        let breaks = writer
            .calls()
            .iter()
            .filter(|c| matches!(c, WriterCall::PageBreak))
            .count();
        assert_eq!(breaks, 1);
        assert_eq!(result.stats.pages_processed, 2);
        assert_eq!(result.setup.metadata.page_count, 2);
        assert_eq!(result.reports.len(), 2);
    }

    #[test]
    fn test_extraction_failure_becomes_warning() {
        let source = FlakySource(vec![text_page(1, "one"), text_page(3, "three")]);
        let converter = Converter::new(ConvertOptions::default().sequential()).unwrap();
        let mut writer = RecordingWriter::new();
        let result = converter.convert(&source, &mut writer).unwrap();

        assert_eq!(result.stats.pages_processed, 3);
        assert_eq!(result.stats.warning_count(), 1);
        assert_eq!(result.stats.warnings[0].page, 2);
        assert_eq!(result.stats.warnings[0].kind, WarningKind::Extraction);
        assert!(result.has_warnings());
    }

    #[test]
    fn test_skip_blank_pages() {
        let pages = vec![
            text_page(1, "First"),
            PageContent::new(2, 612.0, 792.0),
            text_page(3, "Third"),
        ];
        let options = ConvertOptions::default()
            .with_render_options(RenderOptions::default().with_skip_blank_pages(true));
        let converter = Converter::new(options).unwrap();
        let mut writer = RecordingWriter::new();
        let result = converter.convert(&pages, &mut writer).unwrap();

        assert_eq!(result.stats.pages_processed, 2);
        assert_eq!(result.stats.pages_skipped, 1);
        let breaks = writer
            .calls()
            .iter()
            .filter(|c| matches!(c, WriterCall::PageBreak))
            .count();
        assert_eq!(breaks, 1);
    }

    #[test]
    fn test_page_selection_and_progress() {
        let pages: Vec<PageContent> = (1..=4).map(|n| text_page(n, "page text")).collect();
        let seen = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&seen);
        let options = ConvertOptions::default()
            .with_pages(PageSelection::Range(2..=3))
            .with_progress(move |current, total| {
                assert_eq!(total, 2);
                counter.store(current, Ordering::SeqCst);
            });

        let converter = Converter::new(options).unwrap();
        let mut writer = RecordingWriter::new();
        let result = converter.convert(&pages, &mut writer).unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 2);
        let numbers: Vec<u32> = result.reports.iter().map(|r| r.page).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn test_validation_report() {
        let pages = vec![text_page(1, "Columns preserved faithfully")];
        let converter =
            Converter::new(ConvertOptions::default().with_validation(true)).unwrap();
        let mut writer = RecordingWriter::new();
        let result = converter.convert(&pages, &mut writer).unwrap();

        let validation = result.validation.unwrap();
        assert_eq!(validation.match_ratio, 1.0);
        assert!(validation.is_valid());
    }

    #[test]
    fn test_convert_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let pages = vec![text_page(1, "Saved text")];

        let converter = Converter::new(ConvertOptions::default()).unwrap();
        let mut writer = RecordingWriter::new();
        converter.convert_to_file(&pages, &mut writer, &path).unwrap();

        let calls = RecordingWriter::load(&path).unwrap();
        assert!(matches!(calls[0], WriterCall::CreateDocument(_)));
        assert!(calls.iter().any(|c| c.plain_text().contains("Saved text")));
    }
}
