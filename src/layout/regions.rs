//! Header/footer classification and margin detection.

use super::options::RegionConfig;
use crate::model::{Block, Line, Margins};

/// Region classifier.
#[derive(Debug, Clone, Default)]
pub struct RegionClassifier {
    config: RegionConfig,
}

impl RegionClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: RegionConfig) -> Self {
        Self { config }
    }

    /// Y coordinate above which a box bottom marks a header.
    pub fn header_limit(&self, page_height: f32) -> f32 {
        page_height * self.config.header_ratio
    }

    /// Y coordinate below which a box top marks a footer.
    pub fn footer_limit(&self, page_height: f32) -> f32 {
        page_height * (1.0 - self.config.footer_ratio)
    }

    /// Check if a line lies in the header or footer band.
    pub fn is_furniture_line(&self, line: &Line, page_height: f32) -> bool {
        line.bbox.y1 <= self.header_limit(page_height)
            || line.bbox.y0 >= self.footer_limit(page_height)
    }

    /// Mark header and footer blocks. Both always span the full width.
    pub fn classify(&self, mut blocks: Vec<Block>, page_height: f32) -> Vec<Block> {
        let header_limit = self.header_limit(page_height);
        let footer_limit = self.footer_limit(page_height);

        for block in &mut blocks {
            block.is_header = block.bbox.y1 <= header_limit;
            block.is_footer = !block.is_header && block.bbox.y0 >= footer_limit;
            if block.is_furniture() {
                block.column = 0;
            }
        }

        let headers = blocks.iter().filter(|b| b.is_header).count();
        let footers = blocks.iter().filter(|b| b.is_footer).count();
        if headers + footers > 0 {
            log::debug!("Found {} header and {} footer blocks", headers, footers);
        }
        blocks
    }
}

/// Observed text margins of a page.
///
/// Falls back to 72pt on every side when there are no lines.
pub fn detect_margins(lines: &[Line], page_width: f32, page_height: f32) -> Margins {
    if lines.is_empty() {
        return Margins::default();
    }

    let min_x = lines.iter().map(|l| l.bbox.x0).fold(f32::INFINITY, f32::min);
    let max_x = lines.iter().map(|l| l.bbox.x1).fold(f32::NEG_INFINITY, f32::max);
    let min_y = lines.iter().map(|l| l.bbox.y0).fold(f32::INFINITY, f32::min);
    let max_y = lines.iter().map(|l| l.bbox.y1).fold(f32::NEG_INFINITY, f32::max);

    Margins {
        left: min_x.max(0.0),
        right: (page_width - max_x).max(0.0),
        top: min_y.max(0.0),
        bottom: (page_height - max_y).max(0.0),
    }
}
