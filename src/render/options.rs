//! Rendering options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::layout::options::{check_non_negative, check_positive, check_ratio, invalid};
use crate::model::Margins;

/// Options for synthesizing the output document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output page margins
    pub margins: Margins,

    /// Output page size `(width, height)`; `None` uses the first source page
    pub page_size: Option<(f32, f32)>,

    /// Use the first page's observed text margins instead of `margins`
    pub use_source_margins: bool,

    /// Smallest emitted font size in points
    pub min_font_size: f32,

    /// Largest emitted font size in points
    pub max_font_size: f32,

    /// Points of spacing per em of source gap
    pub spacing_per_em: f32,

    /// Gaps below this many ems get no extra spacing
    pub continuation_gap_em: f32,

    /// Lower spacing clamp in points
    pub min_spacing: f32,

    /// Upper spacing clamp in points
    pub max_spacing: f32,

    /// Fraction of non-final lines that must be long for a block to reflow
    pub flow_line_ratio: f32,

    /// A line is long when it reaches this fraction of the widest line
    pub flow_width_ratio: f32,

    /// Never reflow; keep every source line break
    pub preserve_line_breaks: bool,

    /// Smallest standalone image width in points
    pub min_image_width: f32,

    /// Largest standalone image width in points (`None` = content width)
    pub max_image_width: Option<f32>,

    /// Smallest image width inside a column cell in points
    pub min_cell_image_width: f32,

    /// Emit nothing for pages without elements
    pub skip_blank_pages: bool,

    /// Separate source pages with page breaks
    pub page_breaks: bool,

    /// Page selection
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the output page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_size = Some((width, height));
        self
    }

    /// Use the source document's observed margins.
    pub fn with_source_margins(mut self, enable: bool) -> Self {
        self.use_source_margins = enable;
        self
    }

    /// Set the font size clamp.
    pub fn with_font_range(mut self, min: f32, max: f32) -> Self {
        self.min_font_size = min.min(max);
        self.max_font_size = max.max(min);
        self
    }

    /// Set the spacing clamp.
    pub fn with_spacing_range(mut self, min: f32, max: f32) -> Self {
        self.min_spacing = min.min(max);
        self.max_spacing = max.max(min);
        self
    }

    /// Enable or disable line break preservation.
    pub fn with_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Set the largest standalone image width.
    pub fn with_max_image_width(mut self, width: f32) -> Self {
        self.max_image_width = Some(width);
        self
    }

    /// Enable or disable blank page skipping.
    pub fn with_skip_blank_pages(mut self, skip: bool) -> Self {
        self.skip_blank_pages = skip;
        self
    }

    /// Enable or disable page breaks between source pages.
    pub fn with_page_breaks(mut self, enable: bool) -> Self {
        self.page_breaks = enable;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Set specific pages.
    pub fn with_page_list(mut self, pages: Vec<u32>) -> Self {
        self.page_selection = PageSelection::Pages(pages);
        self
    }

    /// Clamp a font size to the configured range.
    pub fn clamp_font_size(&self, size: f32) -> f32 {
        size.max(self.min_font_size).min(self.max_font_size)
    }

    /// Check every setting for a usable range.
    ///
    /// Fields are public, so a caller can bypass the ordering kept by
    /// [`with_font_range`](Self::with_font_range) and
    /// [`with_spacing_range`](Self::with_spacing_range).
    pub fn validate(&self) -> Result<()> {
        let m = &self.margins;
        check_non_negative("margins.top", m.top)?;
        check_non_negative("margins.right", m.right)?;
        check_non_negative("margins.bottom", m.bottom)?;
        check_non_negative("margins.left", m.left)?;
        if let Some((width, height)) = self.page_size {
            check_positive("page_size.width", width)?;
            check_positive("page_size.height", height)?;
        }

        check_positive("min_font_size", self.min_font_size)?;
        check_positive("max_font_size", self.max_font_size)?;
        check_ordered("font size", self.min_font_size, self.max_font_size)?;

        check_non_negative("spacing_per_em", self.spacing_per_em)?;
        check_non_negative("continuation_gap_em", self.continuation_gap_em)?;
        check_non_negative("min_spacing", self.min_spacing)?;
        check_non_negative("max_spacing", self.max_spacing)?;
        check_ordered("spacing", self.min_spacing, self.max_spacing)?;

        check_ratio("flow_line_ratio", self.flow_line_ratio)?;
        check_ratio("flow_width_ratio", self.flow_width_ratio)?;

        check_non_negative("min_image_width", self.min_image_width)?;
        check_non_negative("min_cell_image_width", self.min_cell_image_width)?;
        if let Some(width) = self.max_image_width {
            check_positive("max_image_width", width)?;
        }
        Ok(())
    }
}

fn check_ordered(name: &str, min: f32, max: f32) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(invalid(format!("{name} range is inverted: {min} > {max}")))
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margins: Margins::uniform(36.0),
            page_size: None,
            use_source_margins: false,
            min_font_size: 8.0,
            max_font_size: 36.0,
            spacing_per_em: 6.0,
            continuation_gap_em: 0.3,
            min_spacing: 0.0,
            max_spacing: 24.0,
            flow_line_ratio: 0.6,
            flow_width_ratio: 0.85,
            preserve_line_breaks: false,
            min_image_width: 72.0,
            max_image_width: None,
            min_cell_image_width: 36.0,
            skip_blank_pages: false,
            page_breaks: true,
            page_selection: PageSelection::All,
        }
    }
}

/// Page selection for conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page(start)?;
                let end = parse_page(end)?;
                if start > end {
                    return Err(Error::InvalidPageRange(format!("{start} > {end}")));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page(start)?;
                let end = parse_page(end)?;
                if start > end {
                    return Err(Error::InvalidPageRange(format!("{start} > {end}")));
                }
                pages.extend(start..=end);
            } else {
                pages.push(parse_page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    let s = s.trim();
    match s.parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!("invalid page number '{s}'"))),
        Ok(n) => Ok(n),
    }
}
