//! Per-page reports and document-wide conversion statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::writer::WriterCall;
use crate::model::{ElementContent, LayoutKind, Page};

/// A layout is consistent when the dominant kind covers more than this share
/// of pages.
const CONSISTENCY_THRESHOLD: f32 = 0.7;

/// Kind of non-fatal problem recorded for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The page could not be extracted; it was emitted empty
    Extraction,
    /// The page had no content and was skipped
    BlankPage,
}

/// A recovered, page-level problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageWarning {
    /// Page number (1-indexed)
    pub page: u32,
    /// Warning kind
    pub kind: WarningKind,
    /// Human-readable description
    pub message: String,
}

impl PageWarning {
    /// Create a new warning.
    pub fn new(page: u32, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            page,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}: {}", self.page, self.message)
    }
}

/// What one page contributed to the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    /// Page number (1-indexed)
    pub page: u32,
    /// Detected layout
    pub layout: LayoutKind,
    /// Text blocks emitted
    pub text_blocks: u32,
    /// Images emitted
    pub images: u32,
    /// Tables emitted
    pub tables: u32,
    /// Borderless column containers emitted
    pub column_groups: u32,
    /// Headings emitted
    pub headings: u32,
    /// List items emitted
    pub list_items: u32,
    /// Whether the page was skipped as blank
    pub skipped: bool,
    /// Recovered problems
    pub warnings: Vec<PageWarning>,
}

impl PageReport {
    /// Build a report from an analyzed page and the calls made for it.
    pub fn from_page(page: &Page, calls: &[WriterCall]) -> Self {
        let mut report = Self {
            page: page.number,
            layout: page.layout.kind,
            text_blocks: 0,
            images: 0,
            tables: 0,
            column_groups: 0,
            headings: 0,
            list_items: 0,
            skipped: false,
            warnings: Vec::new(),
        };

        for element in &page.elements {
            match &element.content {
                ElementContent::Text(block) => {
                    report.text_blocks += 1;
                    if block.is_heading() {
                        report.headings += 1;
                    }
                    if block.is_list_item() {
                        report.list_items += 1;
                    }
                }
                ElementContent::Image(_) => report.images += 1,
                ElementContent::Table(_) => report.tables += 1,
            }
        }

        report.column_groups = calls
            .iter()
            .filter(|c| matches!(c, WriterCall::Container(container) if !container.bordered))
            .count() as u32;

        report
    }

    /// A report for a page that produced no output.
    pub fn skipped(page: &Page) -> Self {
        let mut report = Self::from_page(page, &[]);
        report.skipped = true;
        report
    }

    /// Attach a warning and return self.
    pub fn with_warning(mut self, warning: PageWarning) -> Self {
        self.warnings.push(warning);
        self
    }
}

/// Statistics collected over a whole conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages emitted
    pub pages_processed: u32,

    /// Pages skipped as blank
    pub pages_skipped: u32,

    /// Text blocks emitted
    pub text_blocks: u32,

    /// Images emitted
    pub images: u32,

    /// Tables emitted
    pub tables: u32,

    /// Column groups preserved as borderless containers
    pub columns_preserved: u32,

    /// Headings emitted
    pub headings: u32,

    /// List items emitted
    pub list_items: u32,

    /// Layout of every page, in page order
    pub page_layouts: Vec<(u32, LayoutKind)>,

    /// All recovered problems
    pub warnings: Vec<PageWarning>,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one page's report.
    pub fn add_page(&mut self, report: &PageReport) {
        if report.skipped {
            self.pages_skipped += 1;
        } else {
            self.pages_processed += 1;
        }
        self.text_blocks += report.text_blocks;
        self.images += report.images;
        self.tables += report.tables;
        self.columns_preserved += report.column_groups;
        self.headings += report.headings;
        self.list_items += report.list_items;
        self.page_layouts.push((report.page, report.layout));
        self.warnings.extend(report.warnings.iter().cloned());
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.pages_processed += other.pages_processed;
        self.pages_skipped += other.pages_skipped;
        self.text_blocks += other.text_blocks;
        self.images += other.images;
        self.tables += other.tables;
        self.columns_preserved += other.columns_preserved;
        self.headings += other.headings;
        self.list_items += other.list_items;
        self.page_layouts.extend(other.page_layouts.iter().copied());
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// Number of recorded warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Most frequent page layout and its page count.
    ///
    /// Ties go to the kind seen first.
    fn dominant(&self) -> Option<(LayoutKind, usize)> {
        let mut counts: Vec<(LayoutKind, usize)> = Vec::new();
        for (_, kind) in &self.page_layouts {
            match counts.iter_mut().find(|(k, _)| k == kind) {
                Some(entry) => entry.1 += 1,
                None => counts.push((*kind, 1)),
            }
        }
        counts.into_iter().fold(None, |best, (kind, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((kind, count)),
        })
    }

    /// Most frequent page layout, or `None` when no pages were seen.
    pub fn dominant_layout(&self) -> Option<LayoutKind> {
        self.dominant().map(|(kind, _)| kind)
    }

    /// Share of pages using the dominant layout (0.0 with no pages).
    pub fn layout_consistency(&self) -> f32 {
        match self.dominant() {
            Some((_, count)) => count as f32 / self.page_layouts.len() as f32,
            None => 0.0,
        }
    }

    /// Check if the dominant layout covers more than 70% of pages.
    pub fn is_layout_consistent(&self) -> bool {
        self.layout_consistency() > CONSISTENCY_THRESHOLD
    }
}
