//! Integration tests for page layout analysis.

use relayout::hint::{HintError, HintProvider, LayoutHint};
use relayout::layout::{group_into_lines, BlockSegmenter, ColumnDetector, LayoutConfig};
use relayout::model::{
    BBox, ElementContent, FontDescriptor, Fragment, Page, PageContent, TableFragment,
};
use relayout::{LayoutAnalyzer, LayoutKind};

fn font() -> FontDescriptor {
    FontDescriptor::new("Times-Roman", 10.0)
}

/// Adds `count` lines of the same text at a 12pt pitch.
fn add_lines(page: &mut PageContent, text: &str, x0: f32, x1: f32, y: f32, count: usize) {
    for i in 0..count {
        let top = y + i as f32 * 12.0;
        page.add_text(text, font(), BBox::new(x0, top, x1, top + 11.0));
    }
}

fn two_column_page() -> PageContent {
    let mut page = PageContent::new(1, 650.0, 800.0);
    add_lines(&mut page, "left column words", 50.0, 250.0, 100.0, 3);
    add_lines(&mut page, "right column words", 400.0, 600.0, 100.0, 3);
    page
}

fn prose_page() -> PageContent {
    let mut page = PageContent::new(1, 612.0, 792.0);
    add_lines(&mut page, "Justified prose fills the whole measure of the page", 72.0, 540.0, 100.0, 8);
    add_lines(&mut page, "A second paragraph follows after a blank gap here", 72.0, 540.0, 220.0, 6);
    page
}

fn analyzer() -> LayoutAnalyzer {
    LayoutAnalyzer::new(LayoutConfig::default())
}

fn assert_boundaries_contiguous(page: &Page) {
    let boundaries = &page.layout.boundaries;
    assert!(!boundaries.is_empty());
    for b in boundaries {
        assert!(b.x_start < b.x_end);
    }
    for pair in boundaries.windows(2) {
        assert!((pair[0].x_end - pair[1].x_start).abs() < 1e-3);
    }
}

#[test]
fn test_two_clusters_yield_two_columns() {
    let page = analyzer().analyze(two_column_page());

    assert_eq!(page.layout.num_columns(), 2);
    assert_eq!(page.layout.kind, LayoutKind::TwoColumn);
    let b = &page.layout.boundaries;
    assert!((b[0].x_start - 50.0).abs() < 1.0);
    assert!((b[0].x_end - 325.0).abs() < 8.0);
    assert!((b[1].x_end - 600.0).abs() < 1.0);
    assert_boundaries_contiguous(&page);
}

#[test]
fn test_justified_prose_is_single_column() {
    let page = analyzer().analyze(prose_page());
    assert_eq!(page.layout.num_columns(), 1);
    assert_boundaries_contiguous(&page);
    assert_eq!(page.blocks().count(), 2);
}

#[test]
fn test_reading_order_is_column_major() {
    let page = analyzer().analyze(two_column_page());
    let columns: Vec<usize> = page.elements.iter().map(|e| e.column).collect();
    assert_eq!(columns, vec![1, 2]);

    let indices: Vec<usize> = page.elements.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn test_table_breaks_column_groups() {
    let mut content = PageContent::new(1, 650.0, 800.0);
    add_lines(&mut content, "upper left text", 50.0, 250.0, 100.0, 3);
    add_lines(&mut content, "upper right text", 400.0, 600.0, 100.0, 3);
    content.push(Fragment::Table(TableFragment::new(
        vec![vec!["Year".into(), "Total".into()], vec!["2024".into(), "12".into()]],
        BBox::new(50.0, 200.0, 600.0, 260.0),
    )));
    add_lines(&mut content, "lower left text", 50.0, 250.0, 300.0, 3);
    add_lines(&mut content, "lower right text", 400.0, 600.0, 300.0, 3);

    let page = analyzer().analyze(content);
    assert_eq!(page.layout.num_columns(), 2);

    let order: Vec<(usize, bool)> = page
        .elements
        .iter()
        .map(|e| (e.column, matches!(e.content, ElementContent::Table(_))))
        .collect();
    assert_eq!(
        order,
        vec![(1, false), (2, false), (0, true), (1, false), (2, false)]
    );
}

#[test]
fn test_full_width_never_after_lower_column_content() {
    let mut content = two_column_page();
    content.add_text(
        "A full width banner line spanning both columns of the page",
        font(),
        BBox::new(50.0, 400.0, 600.0, 411.0),
    );
    add_lines(&mut content, "left after banner", 50.0, 250.0, 450.0, 2);
    add_lines(&mut content, "right after banner", 400.0, 600.0, 450.0, 2);

    let config = LayoutConfig::default();
    let gutter = config.columns.min_gutter_width;
    let page = LayoutAnalyzer::new(config).analyze(content);

    for (i, element) in page.elements.iter().enumerate() {
        if element.column != 0 {
            continue;
        }
        for earlier in &page.elements[..i] {
            if earlier.column != 0 {
                assert!(earlier.y() <= element.y() + gutter);
            }
        }
    }
}

#[test]
fn test_headers_and_footers_are_full_width() {
    let mut content = two_column_page();
    content.add_text("Journal of Layout", font(), BBox::new(280.0, 20.0, 370.0, 31.0));
    content.add_text("7", font(), BBox::new(320.0, 770.0, 326.0, 781.0));

    let page = analyzer().analyze(content);
    assert_eq!(page.layout.num_columns(), 2);

    let first = page.elements.first().and_then(|e| e.as_block()).unwrap();
    let last = page.elements.last().and_then(|e| e.as_block()).unwrap();
    assert!(first.is_header);
    assert!(last.is_footer);

    for block in page.blocks().filter(|b| b.is_furniture()) {
        assert_eq!(block.column, 0);
    }
}

#[test]
fn test_every_line_in_exactly_one_block() {
    let config = LayoutConfig::default();
    let content = prose_page();
    let width = content.width;
    let (texts, _, _) = content.split();
    let lines = group_into_lines(texts, &config.lines);
    let layout = ColumnDetector::new(config.columns.clone()).detect(&lines, width);

    let blocks = BlockSegmenter::new(config.segments.clone()).segment(lines.clone(), &layout);
    let total: usize = blocks.iter().map(|b| b.lines.len()).sum();
    assert_eq!(total, lines.len());
    for line in &lines {
        let owners = blocks.iter().filter(|b| b.lines.contains(line)).count();
        assert_eq!(owners, 1);
    }
}

#[test]
fn test_segmentation_is_idempotent() {
    let config = LayoutConfig::default();
    let content = two_column_page();
    let width = content.width;
    let (texts, _, _) = content.split();
    let lines = group_into_lines(texts, &config.lines);
    let layout = ColumnDetector::new(config.columns.clone()).detect(&lines, width);
    let segmenter = BlockSegmenter::new(config.segments.clone());

    let first = segmenter.segment(lines, &layout);
    let relines = first.iter().flat_map(|b| b.lines.clone()).collect();
    let second = segmenter.segment(relines, &layout);
    assert_eq!(first, second);
}

struct TimeoutHints;

impl HintProvider for TimeoutHints {
    fn hint(&self, _page: &PageContent) -> Result<Option<LayoutHint>, HintError> {
        Err(HintError::Timeout)
    }
}

#[test]
fn test_hint_failure_matches_geometry_only() {
    let plain = relayout::Relayout::new()
        .analyze(&vec![two_column_page()])
        .unwrap();
    let hinted = relayout::Relayout::new()
        .with_hint_provider(TimeoutHints)
        .analyze(&vec![two_column_page()])
        .unwrap();

    assert_eq!(plain[0].layout, hinted[0].layout);
    assert_eq!(plain[0].elements, hinted[0].elements);
}

#[test]
fn test_degenerate_fragments_are_dropped() {
    let mut content = prose_page();
    content.add_text("ghost", font(), BBox::new(100.0, 600.0, 100.0, 611.0));
    content.add_text("nan", font(), BBox::new(f32::NAN, 600.0, 200.0, 611.0));

    let page = analyzer().analyze(content);
    assert!(!page.plain_text().contains("ghost"));
    assert!(!page.plain_text().contains("nan"));
}

#[test]
fn test_config_round_trips_through_json() {
    let json = r#"{ "columns": { "min_gutter_width": 18.0 } }"#;
    let config = LayoutConfig::from_json(json).unwrap();
    assert_eq!(config.columns.min_gutter_width, 18.0);
    assert_eq!(config.columns.max_columns, 4);

    let back = LayoutConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(back.columns.min_gutter_width, 18.0);
}
