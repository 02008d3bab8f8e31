//! Layout analysis: from positioned fragments to an ordered page.
//!
//! The stages run strictly one after another:
//!
//! 1. [`group_into_lines`] bands text fragments into lines
//! 2. [`ColumnDetector`] infers the column geometry
//! 3. [`BlockSegmenter`] groups lines into blocks
//! 4. [`RegionClassifier`] marks headers and footers
//! 5. [`ElementSequencer`] merges blocks, images and tables into reading order
//!
//! [`LayoutAnalyzer`] runs the whole chain for one page.

mod columns;
mod font_stats;
mod lines;
pub(crate) mod options;
mod regions;
mod segmenter;
mod sequencer;

pub use columns::ColumnDetector;
pub use font_stats::FontStatistics;
pub use lines::group_into_lines;
pub use options::{
    ColumnConfig, LayoutConfig, LineConfig, RegionConfig, SegmentConfig, SequenceConfig,
    MAX_BIN_COUNT, MIN_BIN_COUNT,
};
pub use regions::{detect_margins, RegionClassifier};
pub use segmenter::BlockSegmenter;
pub use sequencer::ElementSequencer;

use crate::hint::LayoutHint;
use crate::model::{BBox, Page, PageContent};

/// Runs the full layout chain for a page.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    config: LayoutConfig,
    detector: ColumnDetector,
    segmenter: BlockSegmenter,
    classifier: RegionClassifier,
    sequencer: ElementSequencer,
}

impl LayoutAnalyzer {
    /// Create an analyzer from a configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            detector: ColumnDetector::new(config.columns.clone()),
            segmenter: BlockSegmenter::new(config.segments.clone()),
            classifier: RegionClassifier::new(config.regions.clone()),
            sequencer: ElementSequencer::new(config.sequence.clone()),
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Analyze a page from geometry alone.
    pub fn analyze(&self, content: PageContent) -> Page {
        self.analyze_with_hint(content, None)
    }

    /// Analyze a page, letting `hint` break column-detection ties.
    pub fn analyze_with_hint(&self, content: PageContent, hint: Option<&LayoutHint>) -> Page {
        let number = content.number;
        let (width, height) = (content.width, content.height);
        let (texts, mut images, mut tables) = content.split();

        images.retain(|i| keep_box(number, "image", &i.bbox));
        tables.retain(|t| !t.is_empty() && keep_box(number, "table", &t.bbox));

        let lines = group_into_lines(texts, &self.config.lines);
        let margins = detect_margins(&lines, width, height);

        // Running heads and page numbers would otherwise bridge the gutters
        let body_boxes: Vec<BBox> = lines
            .iter()
            .filter(|l| !self.classifier.is_furniture_line(l, height))
            .map(|l| l.bbox)
            .collect();
        let layout = self.detector.detect_boxes(&body_boxes, width, hint);

        let blocks = self.segmenter.segment(lines, &layout);
        let blocks = self.classifier.classify(blocks, height);
        let elements = self
            .sequencer
            .sequence(blocks, images, tables, &layout, width);

        log::debug!(
            "Page {}: {} columns ({}), {} elements",
            number,
            layout.num_columns(),
            layout.kind.as_str(),
            elements.len()
        );

        Page {
            number,
            width,
            height,
            margins,
            layout,
            elements,
        }
    }
}

fn keep_box(page: u32, kind: &str, bbox: &BBox) -> bool {
    if bbox.is_degenerate() {
        log::trace!("Page {}: dropping {} with degenerate box {:?}", page, kind, bbox);
        false
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementContent, FontDescriptor, ImageFragment, LayoutKind, Fragment};

    fn font() -> FontDescriptor {
        FontDescriptor::new("Times-Roman", 10.0)
    }

    #[test]
    fn test_two_column_page() {
        let mut page = PageContent::new(1, 650.0, 800.0);
        for i in 0..3 {
            let y = 100.0 + i as f32 * 12.0;
            page.add_text(format!("left line {i}"), font(), BBox::new(50.0, y, 250.0, y + 11.0));
            page.add_text(format!("right line {i}"), font(), BBox::new(400.0, y, 600.0, y + 11.0));
        }
        page.add_text("7", font(), BBox::new(320.0, 770.0, 330.0, 781.0));

        let result = LayoutAnalyzer::default().analyze(page);
        assert_eq!(result.layout.num_columns(), 2);
        assert_eq!(result.elements.len(), 3);

        let left = result.elements[0].as_block().unwrap();
        assert_eq!(left.column, 1);
        assert_eq!(left.lines.len(), 3);
        let footer = result.elements[2].as_block().unwrap();
        assert!(footer.is_footer);
        assert_eq!(footer.text(), "7");
    }

    #[test]
    fn test_degenerate_input_dropped() {
        let mut page = PageContent::new(2, 612.0, 792.0);
        page.add_text("ok", font(), BBox::new(72.0, 100.0, 100.0, 112.0));
        page.add_text("bad", font(), BBox::new(72.0, 200.0, 72.0, 212.0));
        page.push(Fragment::Image(ImageFragment::new(
            Vec::new(),
            "png",
            BBox::new(10.0, 10.0, 10.0, 10.0),
        )));

        let result = LayoutAnalyzer::default().analyze(page);
        assert_eq!(result.elements.len(), 1);
        assert!(matches!(result.elements[0].content, ElementContent::Text(_)));
        assert_eq!(result.layout.kind, LayoutKind::SingleColumn);
    }

    #[test]
    fn test_empty_page() {
        let result = LayoutAnalyzer::default().analyze(PageContent::new(1, 612.0, 792.0));
        assert!(result.is_empty());
        assert_eq!(result.layout.content_width(), 612.0);
    }
}
