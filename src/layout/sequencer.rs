//! Reading order across columns, full-width elements and page furniture.

use std::cmp::Ordering;

use super::options::SequenceConfig;
use crate::model::{Block, ColumnLayout, ElementContent, ImageFragment, PageElement, TableFragment};

/// Element sequencer.
#[derive(Debug, Clone, Default)]
pub struct ElementSequencer {
    config: SequenceConfig,
}

impl ElementSequencer {
    /// Create a sequencer with the given thresholds.
    pub fn new(config: SequenceConfig) -> Self {
        Self { config }
    }

    /// Merge blocks, images and tables into one reading order.
    ///
    /// Headers come first and footers last. On multi-column pages,
    /// full-width elements act as horizontal breaks: the column content
    /// above a break is emitted column by column before it.
    pub fn sequence(
        &self,
        blocks: Vec<Block>,
        images: Vec<ImageFragment>,
        tables: Vec<TableFragment>,
        layout: &ColumnLayout,
        page_width: f32,
    ) -> Vec<PageElement> {
        let mut headers = Vec::new();
        let mut footers = Vec::new();
        let mut body = Vec::new();

        for block in blocks {
            let column = block.column;
            let is_header = block.is_header;
            let is_footer = block.is_footer;
            let element = PageElement::new(ElementContent::Text(block), column);
            if is_header {
                headers.push(element);
            } else if is_footer {
                footers.push(element);
            } else {
                body.push(element);
            }
        }
        headers.sort_by(by_position);
        footers.sort_by(by_position);

        let multi = layout.is_multi_column();
        for image in images {
            let column = if multi { self.image_column(&image, layout, page_width) } else { 1 };
            body.push(PageElement::new(ElementContent::Image(image), column));
        }
        for table in tables {
            let column = if multi { 0 } else { 1 };
            body.push(PageElement::new(ElementContent::Table(table), column));
        }

        let body = if multi {
            order_columns(body, layout.num_columns())
        } else {
            for element in &mut body {
                element.column = 1;
            }
            body.sort_by(by_position);
            body
        };

        let mut elements: Vec<PageElement> = headers
            .into_iter()
            .chain(body)
            .chain(footers)
            .collect();
        for (i, element) in elements.iter_mut().enumerate() {
            element.index = i;
        }
        elements
    }

    fn image_column(&self, image: &ImageFragment, layout: &ColumnLayout, page_width: f32) -> usize {
        if image.bbox.width() > self.config.full_width_ratio * page_width {
            return 0;
        }
        layout.column_at(image.bbox.center_x()).unwrap_or(0)
    }
}

fn by_position(a: &PageElement, b: &PageElement) -> Ordering {
    a.y().total_cmp(&b.y()).then(a.x().total_cmp(&b.x()))
}

/// Interleave column content with full-width breaks.
fn order_columns(body: Vec<PageElement>, num_columns: usize) -> Vec<PageElement> {
    let (mut breaks, placed): (Vec<PageElement>, Vec<PageElement>) =
        body.into_iter().partition(|e| e.column == 0);
    breaks.sort_by(by_position);

    let mut columns: Vec<Vec<PageElement>> = vec![Vec::new(); num_columns];
    for element in placed {
        let slot = element.column.clamp(1, num_columns) - 1;
        columns[slot].push(element);
    }
    for column in &mut columns {
        column.sort_by(by_position);
        // Drained from the back
        column.reverse();
    }

    let mut ordered = Vec::new();
    for full_width in breaks {
        drain_above(&mut columns, Some(full_width.y()), &mut ordered);
        ordered.push(full_width);
    }
    drain_above(&mut columns, None, &mut ordered);
    ordered
}

/// Move column content above `limit` (all of it for `None`) into `out`,
/// column by column.
fn drain_above(columns: &mut [Vec<PageElement>], limit: Option<f32>, out: &mut Vec<PageElement>) {
    for column in columns.iter_mut() {
        while let Some(next) = column.last() {
            if limit.is_some_and(|y| next.y() >= y) {
                break;
            }
            if let Some(element) = column.pop() {
                out.push(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, BlockId, FontDescriptor, Line, TextFragment};

    fn block(text: &str, x0: f32, x1: f32, y: f32, column: usize) -> Block {
        let line = Line::from_fragments(vec![TextFragment::new(
            text,
            FontDescriptor::new("Times", 10.0),
            BBox::new(x0, y, x1, y + 12.0),
        )])
        .unwrap();
        Block::new(BlockId(0), vec![line], column).unwrap()
    }

    fn texts(elements: &[PageElement]) -> Vec<String> {
        elements
            .iter()
            .map(|e| match &e.content {
                ElementContent::Text(b) => b.text(),
                ElementContent::Table(_) => "TABLE".to_string(),
                ElementContent::Image(_) => "IMAGE".to_string(),
            })
            .collect()
    }

    fn two_columns() -> ColumnLayout {
        ColumnLayout::from_gutters(50.0, 600.0, &[325.0])
    }

    #[test]
    fn test_table_splits_column_groups() {
        let blocks = vec![
            block("L1", 50.0, 300.0, 100.0, 1),
            block("R1", 350.0, 600.0, 100.0, 2),
            block("L2", 50.0, 300.0, 150.0, 1),
            block("R2", 350.0, 600.0, 150.0, 2),
            block("L3", 50.0, 300.0, 400.0, 1),
            block("R3", 350.0, 600.0, 400.0, 2),
        ];
        let table = TableFragment::new(
            vec![vec!["a".into(), "b".into()]],
            BBox::new(50.0, 300.0, 600.0, 360.0),
        );

        let elements = ElementSequencer::default().sequence(
            blocks,
            Vec::new(),
            vec![table],
            &two_columns(),
            650.0,
        );
        assert_eq!(texts(&elements), vec!["L1", "L2", "R1", "R2", "TABLE", "L3", "R3"]);
        assert_eq!(elements[4].column, 0);
        assert!(elements.iter().enumerate().all(|(i, e)| e.index == i));
    }

    #[test]
    fn test_full_width_block_is_a_break() {
        let blocks = vec![
            block("Title", 50.0, 600.0, 60.0, 0),
            block("L1", 50.0, 300.0, 100.0, 1),
            block("R1", 350.0, 600.0, 100.0, 2),
        ];
        let elements =
            ElementSequencer::default().sequence(blocks, Vec::new(), Vec::new(), &two_columns(), 650.0);
        assert_eq!(texts(&elements), vec!["Title", "L1", "R1"]);
    }

    #[test]
    fn test_image_column_assignment() {
        let narrow = ImageFragment::new(Vec::new(), "png", BBox::new(360.0, 200.0, 560.0, 300.0));
        let wide = ImageFragment::new(Vec::new(), "png", BBox::new(50.0, 500.0, 600.0, 600.0));
        let elements = ElementSequencer::default().sequence(
            vec![block("R1", 350.0, 600.0, 100.0, 2)],
            vec![narrow, wide],
            Vec::new(),
            &two_columns(),
            650.0,
        );
        assert_eq!(texts(&elements), vec!["R1", "IMAGE", "IMAGE"]);
        assert_eq!(elements[1].column, 2);
        assert_eq!(elements[2].column, 0);
    }

    #[test]
    fn test_single_column_sorted_by_position() {
        let single = ColumnLayout::single(72.0, 540.0);
        let table = TableFragment::new(vec![vec!["x".into()]], BBox::new(72.0, 150.0, 540.0, 200.0));
        let image = ImageFragment::new(Vec::new(), "png", BBox::new(72.0, 50.0, 200.0, 90.0));
        let elements = ElementSequencer::default().sequence(
            vec![block("B", 72.0, 540.0, 300.0, 1), block("A", 72.0, 540.0, 100.0, 1)],
            vec![image],
            vec![table],
            &single,
            612.0,
        );
        assert_eq!(texts(&elements), vec!["IMAGE", "A", "TABLE", "B"]);
        assert!(elements.iter().all(|e| e.column == 1));
    }

    #[test]
    fn test_headers_first_footers_last() {
        let mut header = block("Header", 300.0, 400.0, 20.0, 0);
        header.is_header = true;
        let mut footer = block("3", 300.0, 310.0, 760.0, 0);
        footer.is_footer = true;
        let elements = ElementSequencer::default().sequence(
            vec![footer, block("L1", 50.0, 300.0, 100.0, 1), header],
            Vec::new(),
            Vec::new(),
            &two_columns(),
            650.0,
        );
        assert_eq!(texts(&elements), vec!["Header", "L1", "3"]);
    }
}
