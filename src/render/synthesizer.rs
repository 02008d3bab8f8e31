//! Re-synthesis of analyzed pages into writer calls.
//!
//! Single-column pages become a plain flow of paragraphs, images and
//! tables. On multi-column pages every run of column content between two
//! full-width elements becomes one borderless container with a cell per
//! column, so the output keeps the source's side-by-side layout.

use unicode_normalization::UnicodeNormalization;

use super::text::{clean_font_name, is_hyphenated_break, joins_without_space, should_flow};
use super::writer::WriterCall;
use super::RenderOptions;
use crate::model::{
    Block, BlockKind, Cell, CellItem, Container, ContainerRow, DocumentSetup, ElementContent,
    FontDescriptor, ImageFragment, ImagePlacement, InlineContent, ListInfo, Page, PageElement,
    Paragraph, TableFragment, TextRun, TextStyle,
};

/// Font size assumed when neither neighbour of a gap carries text.
const DEFAULT_FONT_SIZE: f32 = 11.0;

/// Bottom edge of the last emitted element in a flow.
#[derive(Debug, Clone, Copy)]
struct FlowPoint {
    bottom: f32,
    font_size: Option<f32>,
}

impl FlowPoint {
    fn after(element: &PageElement) -> Self {
        Self {
            bottom: element.bbox.y1,
            font_size: element.font_size(),
        }
    }
}

/// Converts analyzed pages into output writer calls.
#[derive(Debug, Clone)]
pub struct LayoutSynthesizer {
    options: RenderOptions,
    content_width: f32,
}

impl LayoutSynthesizer {
    /// Create a synthesizer for an output content width in points.
    pub fn new(options: RenderOptions, content_width: f32) -> Self {
        Self {
            options,
            content_width: content_width.max(1.0),
        }
    }

    /// Create a synthesizer for an output document.
    pub fn for_setup(options: RenderOptions, setup: &DocumentSetup) -> Self {
        Self::new(options, setup.content_width())
    }

    /// Rendering options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Output content width in points.
    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    /// Produce the writer calls for one page.
    pub fn synthesize(&self, page: &Page) -> Vec<WriterCall> {
        if page.layout.is_multi_column() {
            self.synthesize_columns(page)
        } else {
            self.synthesize_flow(page)
        }
    }

    fn synthesize_flow(&self, page: &Page) -> Vec<WriterCall> {
        let mut calls = Vec::with_capacity(page.elements.len());
        let mut prev: Option<FlowPoint> = None;

        for element in &page.elements {
            let space = self.spacing(prev, element.y(), element.font_size());
            calls.push(self.standalone(element, space, page));
            prev = Some(FlowPoint::after(element));
        }
        calls
    }

    fn synthesize_columns(&self, page: &Page) -> Vec<WriterCall> {
        let mut calls = Vec::new();
        let mut group: Vec<&PageElement> = Vec::new();
        let mut prev: Option<FlowPoint> = None;

        for element in &page.elements {
            let full_width =
                element.is_full_width() || matches!(element.content, ElementContent::Table(_));
            if !full_width {
                group.push(element);
                continue;
            }

            if let Some((call, bottom)) = self.column_group(&group, prev, page) {
                calls.push(call);
                prev = Some(bottom);
            }
            group.clear();

            let space = self.spacing(prev, element.y(), element.font_size());
            calls.push(self.standalone(element, space, page));
            prev = Some(FlowPoint::after(element));
        }

        if let Some((call, _)) = self.column_group(&group, prev, page) {
            calls.push(call);
        }
        calls
    }

    /// Build one borderless container from a run of column content.
    fn column_group(
        &self,
        group: &[&PageElement],
        prev: Option<FlowPoint>,
        page: &Page,
    ) -> Option<(WriterCall, FlowPoint)> {
        let first = *group.first()?;
        let num_columns = page.layout.num_columns().max(1);
        let widths = self.column_widths(page);

        let mut cells = vec![Cell::empty(); num_columns];
        let mut cell_prev: Vec<Option<FlowPoint>> = vec![None; num_columns];

        for element in group {
            let slot = element.column.clamp(1, num_columns) - 1;
            let space = self.spacing(cell_prev[slot], element.y(), element.font_size());
            let item = match &element.content {
                ElementContent::Text(block) => {
                    CellItem::Paragraph(self.block_paragraph(block, space))
                }
                ElementContent::Image(image) => CellItem::Image(self.cell_image(
                    image,
                    space,
                    page.layout.column_width(element.column),
                    widths[slot],
                )),
                // Tables never join a column group
                ElementContent::Table(_) => continue,
            };
            cells[slot].push(item);
            cell_prev[slot] = Some(FlowPoint::after(element));
        }

        for cell in &mut cells {
            if cell.is_empty() {
                cell.push(CellItem::Paragraph(Paragraph::new()));
            }
        }

        let top = group.iter().map(|e| e.y()).fold(f32::INFINITY, f32::min);
        let lowest = group
            .iter()
            .max_by(|a, b| a.bbox.y1.total_cmp(&b.bbox.y1))
            .map_or(first, |e| *e);

        let mut container = Container::borderless(widths);
        container.space_before = self.spacing(prev, top, first.font_size());
        container.add_row(ContainerRow::new(cells));

        Some((WriterCall::Container(container), FlowPoint::after(lowest)))
    }

    /// Output widths of the page's columns, proportional to their source widths.
    fn column_widths(&self, page: &Page) -> Vec<f32> {
        let source_width = page.layout.content_width();
        let n = page.layout.num_columns().max(1);
        page.layout
            .boundaries
            .iter()
            .map(|b| {
                if source_width > 0.0 {
                    b.width() / source_width * self.content_width
                } else {
                    self.content_width / n as f32
                }
            })
            .collect()
    }

    fn standalone(&self, element: &PageElement, space: Option<f32>, page: &Page) -> WriterCall {
        match &element.content {
            ElementContent::Text(block) => WriterCall::Paragraph(self.block_paragraph(block, space)),
            ElementContent::Image(image) => {
                WriterCall::Image(self.page_image(image, space, page.width))
            }
            ElementContent::Table(table) => {
                WriterCall::Container(self.table_container(table, space, page.width))
            }
        }
    }

    /// Spacing before content at `top`, given the previous element in the
    /// same flow.
    fn spacing(&self, prev: Option<FlowPoint>, top: f32, font_size: Option<f32>) -> Option<f32> {
        let prev = prev?;
        let size = font_size
            .or(prev.font_size)
            .unwrap_or(DEFAULT_FONT_SIZE)
            .max(1.0);
        let ems = (top - prev.bottom) / size;
        let points = if ems < self.options.continuation_gap_em {
            0.0
        } else {
            ems * self.options.spacing_per_em
        };
        Some(points.max(self.options.min_spacing).min(self.options.max_spacing))
    }

    /// Convert a text block into one paragraph.
    pub fn block_paragraph(&self, block: &Block, space_before: Option<f32>) -> Paragraph {
        let mut paragraph = Paragraph::new();
        match block.kind {
            BlockKind::Heading(level) => paragraph.style.heading_level = Some(level.clamp(1, 6)),
            BlockKind::ListItem(marker) => paragraph.style.list_info = Some(ListInfo::from(marker)),
            BlockKind::Paragraph => {}
        }
        paragraph.style.space_before = space_before;

        let flow = should_flow(block, &self.options);
        let mut prev_text: Option<String> = None;

        for line in &block.lines {
            let text = line.text();
            if let Some(prev) = &prev_text {
                if !flow {
                    paragraph.add_line_break();
                } else if is_hyphenated_break(prev, &text) {
                    strip_trailing_hyphen(&mut paragraph);
                } else if !joins_without_space(prev, &text) {
                    append_space(&mut paragraph);
                }
            }

            for (space, fragment) in line.spaced_fragments() {
                let mut run_text = String::new();
                if space {
                    run_text.push(' ');
                }
                run_text.extend(fragment.text.nfc());
                push_run(&mut paragraph, run_text, self.text_style(&fragment.font));
            }
            prev_text = Some(text);
        }
        paragraph
    }

    fn text_style(&self, font: &FontDescriptor) -> TextStyle {
        let name = clean_font_name(&font.family);
        TextStyle {
            bold: font.bold,
            italic: font.italic,
            font_name: (!name.is_empty()).then_some(name),
            font_size: Some(self.options.clamp_font_size(font.size)),
            color: (!font.color.is_black()).then_some(font.color),
        }
    }

    /// Size a standalone image by its share of the source page width.
    fn page_image(&self, image: &ImageFragment, space: Option<f32>, page_width: f32) -> ImagePlacement {
        let share = if page_width > 0.0 {
            image.bbox.width() / page_width
        } else {
            1.0
        };
        let max = self
            .options
            .max_image_width
            .unwrap_or(self.content_width)
            .min(self.content_width);
        let min = self.options.min_image_width.min(max);
        place_image(image, (share * self.content_width).clamp(min, max), space)
    }

    /// Size an image inside a column cell by its share of the source column.
    fn cell_image(
        &self,
        image: &ImageFragment,
        space: Option<f32>,
        source_column_width: f32,
        cell_width: f32,
    ) -> ImagePlacement {
        let share = if source_column_width > 0.0 {
            image.bbox.width() / source_column_width
        } else {
            1.0
        };
        let min = self.options.min_cell_image_width.min(cell_width);
        place_image(image, (share * cell_width).clamp(min, cell_width), space)
    }

    /// Convert a table into a bordered container.
    fn table_container(&self, table: &TableFragment, space: Option<f32>, page_width: f32) -> Container {
        let columns = table.column_count();
        let share = if page_width > 0.0 {
            table.bbox.width() / page_width
        } else {
            1.0
        };
        let table_width = (share * self.content_width).min(self.content_width);
        let widths = vec![table_width / columns.max(1) as f32; columns];

        let mut container = Container::bordered(widths);
        container.space_before = space;

        for (r, row) in table.rows.iter().enumerate() {
            let header = r < table.header_rows;
            let cells: Vec<Cell> = (0..columns)
                .map(|c| {
                    let text = row.get(c).map(|t| t.trim()).unwrap_or_default();
                    let mut paragraph = Paragraph::new();
                    if !text.is_empty() {
                        paragraph.add_run(TextRun::styled(
                            text.nfc().collect::<String>(),
                            TextStyle {
                                bold: header,
                                font_size: Some(self.options.clamp_font_size(table.font_size)),
                                ..Default::default()
                            },
                        ));
                    }
                    Cell::with_paragraph(paragraph)
                })
                .collect();

            container.add_row(if header {
                ContainerRow::header(cells)
            } else {
                ContainerRow::new(cells)
            });
        }
        container
    }
}

fn place_image(image: &ImageFragment, width: f32, space: Option<f32>) -> ImagePlacement {
    ImagePlacement {
        data: image.data.clone(),
        format: image.format.clone(),
        width,
        height: width / image.aspect_ratio(),
        space_before: space,
    }
}

/// Append a run, merging it into the previous run when the style matches.
fn push_run(paragraph: &mut Paragraph, text: String, style: TextStyle) {
    if let Some(InlineContent::Text(last)) = paragraph.content.last_mut() {
        if last.style == style {
            last.text.push_str(&text);
            return;
        }
    }
    paragraph.add_run(TextRun::styled(text, style));
}

fn last_run(paragraph: &mut Paragraph) -> Option<&mut TextRun> {
    paragraph.content.iter_mut().rev().find_map(|c| match c {
        InlineContent::Text(run) => Some(run),
        InlineContent::LineBreak => None,
    })
}

fn append_space(paragraph: &mut Paragraph) {
    if let Some(run) = last_run(paragraph) {
        if !run.text.ends_with(char::is_whitespace) {
            run.text.push(' ');
        }
    }
}

fn strip_trailing_hyphen(paragraph: &mut Paragraph) {
    if let Some(run) = last_run(paragraph) {
        let trimmed = run.text.trim_end().len();
        run.text.truncate(trimmed);
        if run.text.ends_with('-') {
            run.text.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BBox, BlockId, ColumnLayout, Line, ListMarker, Rgb, TextFragment,
    };

    fn line(text: &str, x0: f32, x1: f32, y: f32, font: FontDescriptor) -> Line {
        Line::from_fragments(vec![TextFragment::new(text, font, BBox::new(x0, y, x1, y + 11.0))])
            .unwrap()
    }

    fn times() -> FontDescriptor {
        FontDescriptor::new("ABCDEF+Times-Roman", 10.0)
    }

    fn block(texts: &[&str], x0: f32, x1: f32, y: f32, column: usize) -> Block {
        let lines = texts
            .iter()
            .enumerate()
            .map(|(i, t)| line(t, x0, x1, y + i as f32 * 12.0, times()))
            .collect();
        Block::new(BlockId(0), lines, column).unwrap()
    }

    fn text_element(block: Block) -> PageElement {
        let column = block.column;
        PageElement::new(ElementContent::Text(block), column)
    }

    fn page(layout: ColumnLayout, elements: Vec<PageElement>) -> Page {
        let mut page = Page::new(1, 650.0, 800.0);
        page.layout = layout;
        page.elements = elements;
        page
    }

    fn synthesizer() -> LayoutSynthesizer {
        LayoutSynthesizer::new(RenderOptions::default(), 540.0)
    }

    #[test]
    fn test_justified_block_reflows() {
        let b = block(
            &["The infor-", "mation travels across", "lines of text"],
            72.0,
            530.0,
            100.0,
            1,
        );
        let p = synthesizer().block_paragraph(&b, None);
        assert_eq!(p.plain_text(), "The information travels across lines of text");
        assert_eq!(p.line_break_count(), 0);
        // Same style everywhere collapses into one run
        assert_eq!(p.runs().count(), 1);
    }

    #[test]
    fn test_ragged_block_keeps_line_breaks() {
        let mut b = block(&["Jane Doe", "12 Main Street", "Springfield"], 72.0, 200.0, 100.0, 1);
        b.lines[1] = line("12 Main Street", 72.0, 150.0, 112.0, times());
        b.lines[2] = line("Springfield", 72.0, 130.0, 124.0, times());
        let p = synthesizer().block_paragraph(&b, None);
        assert_eq!(p.plain_text(), "Jane Doe\n12 Main Street\nSpringfield");
        assert_eq!(p.line_break_count(), 2);
    }

    #[test]
    fn test_heading_and_list_styles() {
        let mut heading = block(&["Results"], 72.0, 200.0, 100.0, 1);
        heading.kind = BlockKind::Heading(2);
        let p = synthesizer().block_paragraph(&heading, Some(6.0));
        assert_eq!(p.heading_level(), Some(2));
        assert_eq!(p.style.space_before, Some(6.0));

        let item = block(&["• first item"], 72.0, 200.0, 100.0, 1);
        assert!(matches!(item.kind, BlockKind::ListItem(ListMarker::Bullet('•'))));
        assert!(synthesizer().block_paragraph(&item, None).is_list_item());
    }

    #[test]
    fn test_run_styles() {
        let red_bold = FontDescriptor::new("Arial-BoldMT", 48.0).with_color(Rgb::new(200, 0, 0));
        let b = Block::new(
            BlockId(0),
            vec![Line::from_fragments(vec![
                TextFragment::new("Big", red_bold, BBox::new(72.0, 100.0, 150.0, 150.0)),
                TextFragment::new("small", times(), BBox::new(160.0, 130.0, 200.0, 141.0)),
            ])
            .unwrap()],
            1,
        )
        .unwrap();

        let p = synthesizer().block_paragraph(&b, None);
        let runs: Vec<&TextRun> = p.runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].style.font_name.as_deref(), Some("Arial"));
        assert_eq!(runs[0].style.font_size, Some(36.0));
        assert!(runs[0].style.bold);
        assert_eq!(runs[0].style.color, Some(Rgb::new(200, 0, 0)));
        assert_eq!(runs[1].text, " small");
        assert_eq!(runs[1].style.font_name.as_deref(), Some("Times"));
        assert_eq!(runs[1].style.color, None);
    }

    #[test]
    fn test_spacing_from_gaps() {
        let elements = vec![
            text_element(block(&["first"], 72.0, 540.0, 100.0, 1)),
            // 20pt gap at 10pt = 2em -> 12pt
            text_element(block(&["second"], 72.0, 540.0, 131.0, 1)),
            // 2pt gap -> continuation
            text_element(block(&["third"], 72.0, 540.0, 144.0, 1)),
            // huge gap -> clamped
            text_element(block(&["fourth"], 72.0, 540.0, 400.0, 1)),
        ];
        let calls = synthesizer().synthesize(&page(ColumnLayout::single(72.0, 540.0), elements));
        let spaces: Vec<Option<f32>> = calls
            .iter()
            .map(|c| match c {
                WriterCall::Paragraph(p) => p.style.space_before,
                _ => panic!("expected paragraphs"),
            })
            .collect();
        assert_eq!(spaces[0], None);
        assert!((spaces[1].unwrap() - 12.0).abs() < 1e-3);
        assert_eq!(spaces[2], Some(0.0));
        assert_eq!(spaces[3], Some(24.0));
    }

    #[test]
    fn test_column_groups_around_table() {
        let layout = ColumnLayout::from_gutters(50.0, 600.0, &[325.0]);
        let table = TableFragment::new(
            vec![vec!["Name".into(), "Value".into()], vec!["a".into(), "1".into()]],
            BBox::new(0.0, 300.0, 650.0, 340.0),
        )
        .with_header_rows(1);
        let elements = vec![
            text_element(block(&["left top"], 50.0, 300.0, 100.0, 1)),
            text_element(block(&["right top"], 350.0, 600.0, 100.0, 2)),
            PageElement::new(ElementContent::Table(table), 0),
            text_element(block(&["left bottom"], 50.0, 300.0, 400.0, 1)),
        ];
        let calls = synthesizer().synthesize(&page(layout, elements));
        assert_eq!(calls.len(), 3);

        let WriterCall::Container(top) = &calls[0] else { panic!("expected container") };
        assert!(!top.bordered);
        assert_eq!(top.column_widths, vec![270.0, 270.0]);
        assert_eq!(top.rows[0].cells[0].plain_text(), "left top");
        assert_eq!(top.rows[0].cells[1].plain_text(), "right top");

        let WriterCall::Container(table) = &calls[1] else { panic!("expected table") };
        assert!(table.bordered);
        assert!(table.rows[0].is_header);
        let header_run = table.paragraphs().next().and_then(|p| p.runs().next()).unwrap();
        assert!(header_run.style.bold);
        assert!((table.total_width() - 540.0).abs() < 1e-3);

        let WriterCall::Container(bottom) = &calls[2] else { panic!("expected container") };
        assert_eq!(bottom.rows[0].cells[0].plain_text(), "left bottom");
        // Empty right column still gets a paragraph
        assert_eq!(bottom.rows[0].cells[1].content.len(), 1);
    }

    #[test]
    fn test_image_sizing() {
        let image = ImageFragment::new(vec![1, 2, 3], "png", BBox::new(100.0, 100.0, 425.0, 200.0));
        let element = PageElement::new(ElementContent::Image(image), 1);
        let calls = synthesizer().synthesize(&page(ColumnLayout::single(0.0, 650.0), vec![element]));

        let WriterCall::Image(placed) = &calls[0] else { panic!("expected image") };
        // 325 of 650 source points -> half of 540
        assert!((placed.width - 270.0).abs() < 1e-3);
        assert!((placed.height - 270.0 / 3.25).abs() < 1e-3);
        assert_eq!(placed.data, vec![1, 2, 3]);

        let tiny = ImageFragment::new(Vec::new(), "png", BBox::new(0.0, 0.0, 10.0, 10.0));
        let element = PageElement::new(ElementContent::Image(tiny), 1);
        let calls = synthesizer().synthesize(&page(ColumnLayout::single(0.0, 650.0), vec![element]));
        let WriterCall::Image(placed) = &calls[0] else { panic!("expected image") };
        assert_eq!(placed.width, 72.0);
        assert_eq!(placed.height, 72.0);
    }
}
