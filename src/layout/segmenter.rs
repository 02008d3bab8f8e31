//! Grouping of lines into blocks (paragraphs, headings, list items).

use super::font_stats::FontStatistics;
use super::options::SegmentConfig;
use crate::model::{Block, BlockId, BlockKind, ColumnLayout, Line};

/// Block segmenter.
#[derive(Debug, Clone, Default)]
pub struct BlockSegmenter {
    config: SegmentConfig,
}

impl BlockSegmenter {
    /// Create a segmenter with the given thresholds.
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }

    /// Assign each line to a column and sort by `(column, y, x)`.
    ///
    /// Lines crossing a gutter by more than the tolerance are full width
    /// (column 0). Every line of a single-column page is in column 1.
    pub fn assign_columns(&self, lines: Vec<Line>, layout: &ColumnLayout) -> Vec<(usize, Line)> {
        let mut assigned: Vec<(usize, Line)> = lines
            .into_iter()
            .map(|line| {
                let column = layout.column_for(&line.bbox, self.config.gutter_tolerance);
                (column, line)
            })
            .collect();

        assigned.sort_by(|(ca, a), (cb, b)| {
            ca.cmp(cb)
                .then(a.bbox.y0.total_cmp(&b.bbox.y0))
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });
        assigned
    }

    /// Segment lines into blocks.
    ///
    /// Every line ends up in exactly one block. Block ids follow creation
    /// order, which is column-major.
    pub fn segment(&self, lines: Vec<Line>, layout: &ColumnLayout) -> Vec<Block> {
        let stats = self
            .config
            .detect_headings
            .then(|| FontStatistics::from_lines(&lines));

        let mut blocks: Vec<Block> = Vec::new();
        let mut current: Vec<Line> = Vec::new();
        let mut current_column = 0usize;

        for (column, line) in self.assign_columns(lines, layout) {
            let starts_block = match current.last() {
                None => false,
                Some(prev) => {
                    column != current_column
                        || self.should_break(prev, &line, layout.column_width(column))
                }
            };

            if starts_block {
                push_block(&mut blocks, std::mem::take(&mut current), current_column);
            }
            current_column = column;
            current.push(line);
        }
        push_block(&mut blocks, current, current_column);

        if let Some(stats) = stats {
            for block in &mut blocks {
                if block.kind == BlockKind::Paragraph {
                    let level = stats.heading_level(block.font_size());
                    if level > 0 {
                        block.kind = BlockKind::Heading(level);
                    }
                }
            }
        }

        log::debug!(
            "Segmented {} blocks across {} columns",
            blocks.len(),
            layout.num_columns()
        );
        blocks
    }

    /// Determine if `curr` starts a new block after `prev` in the same column.
    fn should_break(&self, prev: &Line, curr: &Line, column_width: f32) -> bool {
        let avg_size = (prev.font_size + curr.font_size) / 2.0;
        let pitch = curr.bbox.y0 - prev.bbox.y0;
        if pitch > self.config.line_gap_factor * avg_size {
            return true;
        }

        let growth = 1.0 + self.config.font_growth_ratio;
        if curr.font_size > prev.font_size * growth || prev.font_size > curr.font_size * growth {
            return true;
        }

        let shift = (curr.bbox.x0 - prev.bbox.x0).abs();
        let edge_gap = curr.bbox.y0 - prev.bbox.y1;
        if shift > self.config.indent_shift_ratio * column_width && edge_gap > 0.0 {
            return true;
        }

        curr.starts_list_item()
    }
}

fn push_block(blocks: &mut Vec<Block>, lines: Vec<Line>, column: usize) {
    if let Some(block) = Block::new(BlockId(blocks.len()), lines, column) {
        blocks.push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, FontDescriptor, TextFragment};

    fn line_at(text: &str, x0: f32, x1: f32, y: f32, size: f32) -> Line {
        Line::from_fragments(vec![TextFragment::new(
            text,
            FontDescriptor::new("Times-Roman", size),
            BBox::new(x0, y, x1, y + size * 1.2),
        )])
        .unwrap()
    }

    fn body(text: &str, y: f32) -> Line {
        line_at(text, 72.0, 540.0, y, 10.0)
    }

    fn single() -> ColumnLayout {
        ColumnLayout::single(72.0, 540.0)
    }

    #[test]
    fn test_vertical_gap_splits_paragraphs() {
        let lines = vec![
            body("First paragraph line one", 100.0),
            body("first paragraph line two", 112.0),
            body("Second paragraph", 140.0),
        ];
        let blocks = BlockSegmenter::default().segment(lines, &single());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines.len(), 2);
        assert_eq!(blocks[0].id, BlockId(0));
        assert_eq!(blocks[1].id, BlockId(1));
        assert_eq!(blocks[0].column, 1);
    }

    #[test]
    fn test_font_growth_starts_heading() {
        let mut lines = vec![line_at("Introduction", 72.0, 300.0, 100.0, 16.0)];
        for i in 0..6 {
            lines.push(body("Body text of the section", 122.0 + i as f32 * 12.0));
        }
        let blocks = BlockSegmenter::default().segment(lines, &single());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Heading(1));
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_list_marker_starts_block() {
        let lines = vec![
            body("Items follow:", 100.0),
            body("• apples", 112.0),
            body("• pears", 124.0),
            body("1. numbered", 136.0),
        ];
        let blocks = BlockSegmenter::default().segment(lines, &single());
        assert_eq!(blocks.len(), 4);
        assert!(blocks[1].is_list_item());
        assert!(blocks[3].is_list_item());
    }

    #[test]
    fn test_indent_shift_with_gap_breaks() {
        let lines = vec![
            body("Regular text", 100.0),
            line_at("Quoted text far in", 250.0, 540.0, 113.0, 10.0),
        ];
        let blocks = BlockSegmenter::default().segment(lines, &single());
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_columns_never_share_block() {
        let layout = ColumnLayout::from_gutters(50.0, 600.0, &[325.0]);
        let lines = vec![
            line_at("left one", 50.0, 250.0, 100.0, 10.0),
            line_at("right one", 400.0, 600.0, 100.0, 10.0),
            line_at("left two", 50.0, 250.0, 112.0, 10.0),
            line_at("right two", 400.0, 600.0, 112.0, 10.0),
            line_at("spanning title", 50.0, 600.0, 60.0, 10.0),
        ];
        let blocks = BlockSegmenter::default().segment(lines, &layout);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].column, 0);
        assert_eq!(blocks[1].column, 1);
        assert_eq!(blocks[1].text(), "left one\nleft two");
        assert_eq!(blocks[2].column, 2);
    }

    #[test]
    fn test_segmentation_is_idempotent() {
        let lines = vec![
            line_at("Title", 72.0, 200.0, 80.0, 18.0),
            body("para one a", 110.0),
            body("para one b", 122.0),
            body("• item", 134.0),
            body("para two", 170.0),
        ];
        let segmenter = BlockSegmenter::default();
        let first = segmenter.segment(lines, &single());
        let again: Vec<Line> = first.iter().flat_map(|b| b.lines.clone()).collect();
        let second = segmenter.segment(again, &single());
        assert_eq!(first, second);

        let total: usize = first.iter().map(|b| b.lines.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_empty_input() {
        assert!(BlockSegmenter::default().segment(Vec::new(), &single()).is_empty());
    }
}
