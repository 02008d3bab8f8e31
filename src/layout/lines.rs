//! Grouping of positioned text fragments into lines.

use super::options::LineConfig;
use crate::model::{Line, TextFragment};

/// Group text fragments into lines.
///
/// Fragments with empty text or degenerate boxes are dropped. The rest are
/// banded by vertical center, and each band is split wherever the gap
/// between neighbours is wider than `max_word_gap_em`, so that text at the
/// same height in two columns ends up in two lines.
///
/// Lines are returned top-to-bottom, then left-to-right.
pub fn group_into_lines(fragments: Vec<TextFragment>, config: &LineConfig) -> Vec<Line> {
    let mut fragments: Vec<TextFragment> = fragments
        .into_iter()
        .filter(|f| {
            let keep = !f.text.trim().is_empty() && !f.bbox.is_degenerate();
            if !keep {
                log::trace!("Dropping fragment {:?} at {:?}", f.text, f.bbox);
            }
            keep
        })
        .collect();

    if fragments.is_empty() {
        return Vec::new();
    }

    fragments.sort_by(|a, b| {
        a.bbox
            .center_y()
            .total_cmp(&b.bbox.center_y())
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut bands: Vec<Vec<TextFragment>> = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    let mut band_center = 0.0f32;
    let mut band_size = 0.0f32;

    for fragment in fragments {
        if current.is_empty() {
            band_center = fragment.bbox.center_y();
            band_size = fragment.font.size;
            current.push(fragment);
            continue;
        }

        let tolerance = config.line_tolerance * band_size.max(fragment.font.size);
        if (fragment.bbox.center_y() - band_center).abs() <= tolerance {
            band_size = band_size.max(fragment.font.size);
            current.push(fragment);
        } else {
            bands.push(std::mem::take(&mut current));
            band_center = fragment.bbox.center_y();
            band_size = fragment.font.size;
            current.push(fragment);
        }
    }
    if !current.is_empty() {
        bands.push(current);
    }

    let mut lines: Vec<Line> = bands
        .into_iter()
        .flat_map(|band| split_band(band, config.max_word_gap_em))
        .filter_map(Line::from_fragments)
        .collect();

    lines.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    lines
}

/// Split one band at horizontal gaps wider than `max_gap_em` ems.
fn split_band(mut band: Vec<TextFragment>, max_gap_em: f32) -> Vec<Vec<TextFragment>> {
    band.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

    let mut parts: Vec<Vec<TextFragment>> = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    let mut right_edge = f32::NEG_INFINITY;

    for fragment in band {
        if let Some(prev) = current.last() {
            let em = prev.font.size.max(fragment.font.size);
            if fragment.bbox.x0 - right_edge > max_gap_em * em {
                parts.push(std::mem::take(&mut current));
                right_edge = f32::NEG_INFINITY;
            }
        }
        right_edge = right_edge.max(fragment.bbox.x1);
        current.push(fragment);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, FontDescriptor};

    fn frag(text: &str, x0: f32, y0: f32, x1: f32) -> TextFragment {
        TextFragment::new(
            text,
            FontDescriptor::new("Times-Roman", 10.0),
            BBox::new(x0, y0, x1, y0 + 12.0),
        )
    }

    #[test]
    fn test_fragments_on_same_band_join() {
        let lines = group_into_lines(
            vec![
                frag("world", 82.0, 101.0, 110.0),
                frag("Hello", 50.0, 100.0, 80.0),
            ],
            &LineConfig::default(),
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Hello world");
    }

    #[test]
    fn test_column_gap_splits_band() {
        let lines = group_into_lines(
            vec![
                frag("left column", 50.0, 100.0, 250.0),
                frag("right column", 400.0, 100.0, 600.0),
            ],
            &LineConfig::default(),
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "left column");
        assert_eq!(lines[1].text(), "right column");
    }

    #[test]
    fn test_lines_sorted_top_to_bottom() {
        let lines = group_into_lines(
            vec![
                frag("third", 50.0, 140.0, 90.0),
                frag("first", 50.0, 100.0, 90.0),
                frag("second", 50.0, 120.0, 90.0),
            ],
            &LineConfig::default(),
        );
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_degenerate_and_blank_fragments_dropped() {
        let lines = group_into_lines(
            vec![
                frag("   ", 50.0, 100.0, 80.0),
                TextFragment::new(
                    "zero",
                    FontDescriptor::default(),
                    BBox::new(50.0, 100.0, 50.0, 112.0),
                ),
                frag("kept", 50.0, 200.0, 80.0),
            ],
            &LineConfig::default(),
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "kept");
        assert!(group_into_lines(Vec::new(), &LineConfig::default()).is_empty());
    }
}
