//! Column detection from the horizontal distribution of text lines.
//!
//! Line spans are projected onto a row of bins covering the content width.
//! Runs of (nearly) empty bins with text on both sides are gutter
//! candidates. A candidate survives only if no line crosses its center and
//! the whitespace it separates is wide enough; survivors partition the
//! content width into columns.

use super::options::{ColumnConfig, MAX_BIN_COUNT, MIN_BIN_COUNT};
use crate::hint::LayoutHint;
use crate::model::{BBox, ColumnLayout, LayoutKind, Line};

/// A validated gutter.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Gutter {
    /// Midpoint of the observed whitespace
    center: f32,
    /// Width of the observed whitespace
    width: f32,
}

/// Column detector.
#[derive(Debug, Clone, Default)]
pub struct ColumnDetector {
    config: ColumnConfig,
}

impl ColumnDetector {
    /// Create a detector with the given thresholds.
    pub fn new(config: ColumnConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    /// Detect columns from geometry alone.
    pub fn detect(&self, lines: &[Line], page_width: f32) -> ColumnLayout {
        self.detect_with_hint(lines, page_width, None)
    }

    /// Detect columns, using `hint` to admit borderline gutters.
    pub fn detect_with_hint(
        &self,
        lines: &[Line],
        page_width: f32,
        hint: Option<&LayoutHint>,
    ) -> ColumnLayout {
        let boxes: Vec<BBox> = lines
            .iter()
            .map(|l| l.bbox)
            .filter(|b| !b.is_degenerate())
            .collect();
        self.detect_boxes(&boxes, page_width, hint)
    }

    /// Detect columns from raw line boxes.
    pub fn detect_boxes(
        &self,
        boxes: &[BBox],
        page_width: f32,
        hint: Option<&LayoutHint>,
    ) -> ColumnLayout {
        if boxes.is_empty() {
            return ColumnLayout::single(0.0, page_width.max(0.0));
        }

        let left = boxes.iter().map(|b| b.x0).fold(f32::INFINITY, f32::min);
        let right = boxes.iter().map(|b| b.x1).fold(f32::NEG_INFINITY, f32::max);
        let content_width = right - left;
        if content_width <= 0.0 {
            return ColumnLayout::single(left, right);
        }

        let wide_limit = self.config.wide_line_ratio * content_width;
        let (wide, narrow): (Vec<BBox>, Vec<BBox>) =
            boxes.iter().partition(|b| b.width() > wide_limit);

        log::debug!(
            "Column detection: {} lines ({} wide), content x=[{:.1}, {:.1}]",
            boxes.len(),
            wide.len(),
            left,
            right
        );

        let (strong, borderline) = self.find_candidates(&narrow, left, content_width);

        let mut gutters = merge_gutters(strong, self.config.merge_distance);
        if let Some(hint) = hint {
            self.admit_borderline(&mut gutters, borderline, hint);
        }

        gutters = self.cap_gutters(gutters);
        let gutters = self.collapse_narrow_columns(gutters, left, right);

        if gutters.is_empty() {
            log::debug!("Detected 1 column");
            return ColumnLayout::single(left, right);
        }

        let centers: Vec<f32> = gutters.iter().map(|g| g.center).collect();
        let mut layout = ColumnLayout::from_gutters(left, right, &centers);
        if !wide.is_empty() {
            layout.kind = LayoutKind::Mixed;
        }

        log::debug!(
            "Detected {} columns ({}), gutters at {:?}",
            layout.num_columns(),
            layout.kind.as_str(),
            centers
        );
        layout
    }

    /// Find validated gutter candidates.
    ///
    /// Returns `(strong, borderline)`: borderline candidates pass every test
    /// except the flanking-content threshold.
    fn find_candidates(
        &self,
        lines: &[BBox],
        left: f32,
        content_width: f32,
    ) -> (Vec<Gutter>, Vec<Gutter>) {
        let n = lines.len();
        if n < 2 {
            return (Vec::new(), Vec::new());
        }

        let weights = self.project(lines, left, content_width);
        let bin_width = content_width / weights.len() as f32;
        let noise = (self.config.gutter_noise_ratio * n as f32).floor() as usize;
        let min_flank = self
            .config
            .min_flank_lines
            .max((self.config.min_flank_ratio * n as f32).ceil() as usize);

        let mut strong = Vec::new();
        let mut borderline = Vec::new();

        for (start, end) in empty_runs(&weights, noise) {
            let run_x0 = left + start as f32 * bin_width;
            let run_x1 = left + (end + 1) as f32 * bin_width;
            let center = (run_x0 + run_x1) / 2.0;

            if lines.iter().any(|b| b.spans_x(center)) {
                log::debug!("Rejecting gutter at x={:.1}: crossed by a line", center);
                continue;
            }

            let left_side: Vec<&BBox> = lines.iter().filter(|b| b.x1 <= center).collect();
            let right_side: Vec<&BBox> = lines.iter().filter(|b| b.x0 >= center).collect();
            if left_side.is_empty() || right_side.is_empty() {
                continue;
            }

            let gap_left = left_side.iter().map(|b| b.x1).fold(f32::NEG_INFINITY, f32::max);
            let gap_right = right_side.iter().map(|b| b.x0).fold(f32::INFINITY, f32::min);
            let gutter = Gutter {
                center: (gap_left + gap_right) / 2.0,
                width: gap_right - gap_left,
            };

            if gutter.width < self.config.min_gutter_width {
                log::debug!(
                    "Rejecting gutter at x={:.1}: width {:.1}pt below {:.1}pt",
                    gutter.center,
                    gutter.width,
                    self.config.min_gutter_width
                );
                continue;
            }

            if left_side.len() >= min_flank && right_side.len() >= min_flank {
                log::debug!(
                    "Gutter candidate at x={:.1}, width={:.1}pt, lines left={} right={}",
                    gutter.center,
                    gutter.width,
                    left_side.len(),
                    right_side.len()
                );
                strong.push(gutter);
            } else {
                log::debug!(
                    "Borderline gutter at x={:.1}: lines left={} right={}, need {}",
                    gutter.center,
                    left_side.len(),
                    right_side.len(),
                    min_flank
                );
                borderline.push(gutter);
            }
        }

        (strong, borderline)
    }

    /// Count, for every bin, the lines whose span overlaps it.
    fn project(&self, lines: &[BBox], left: f32, content_width: f32) -> Vec<usize> {
        let bins = self.bin_count(content_width);
        let bin_width = content_width / bins as f32;
        let mut weights = vec![0usize; bins];

        for b in lines {
            let start = (((b.x0 - left) / bin_width).floor().max(0.0) as usize).min(bins - 1);
            let end = ((((b.x1 - left) / bin_width).ceil() as usize).saturating_sub(1))
                .clamp(start, bins - 1);
            for slot in weights.iter_mut().take(end + 1).skip(start) {
                *slot += 1;
            }
        }
        weights
    }

    /// Bins are never wider than half the minimum gutter width, so any
    /// qualifying gap contains at least one whole bin. The count is capped at
    /// [`MAX_BIN_COUNT`]; wider content only gets coarser bins.
    fn bin_count(&self, content_width: f32) -> usize {
        let configured = self.config.bin_count.clamp(MIN_BIN_COUNT, MAX_BIN_COUNT);
        if self.config.min_gutter_width > 0.0 && content_width.is_finite() {
            let needed = (content_width / (self.config.min_gutter_width / 2.0)).ceil() as usize;
            configured.max(needed).min(MAX_BIN_COUNT)
        } else {
            configured
        }
    }

    fn admit_borderline(
        &self,
        gutters: &mut Vec<Gutter>,
        mut borderline: Vec<Gutter>,
        hint: &LayoutHint,
    ) {
        if hint.confidence < self.config.min_hint_confidence {
            log::debug!(
                "Ignoring hint: confidence {:.2} below {:.2}",
                hint.confidence,
                self.config.min_hint_confidence
            );
            return;
        }

        borderline.sort_by(|a, b| b.width.total_cmp(&a.width));
        for candidate in borderline {
            if gutters.len() + 1 >= hint.num_columns {
                break;
            }
            let too_close = gutters
                .iter()
                .any(|g| (g.center - candidate.center).abs() < self.config.merge_distance);
            if too_close {
                continue;
            }
            log::debug!(
                "Hint ({} columns) admits gutter at x={:.1}",
                hint.num_columns,
                candidate.center
            );
            gutters.push(candidate);
        }
        gutters.sort_by(|a, b| a.center.total_cmp(&b.center));
    }

    /// Keep the widest gutters when there are too many columns.
    fn cap_gutters(&self, mut gutters: Vec<Gutter>) -> Vec<Gutter> {
        let max_gutters = self.config.max_columns.saturating_sub(1);
        if gutters.len() > max_gutters {
            log::debug!(
                "Capping {} columns at {}",
                gutters.len() + 1,
                self.config.max_columns
            );
            gutters.sort_by(|a, b| b.width.total_cmp(&a.width));
            gutters.truncate(max_gutters);
            gutters.sort_by(|a, b| a.center.total_cmp(&b.center));
        }
        gutters
    }

    /// Drop gutters until every column is at least `min_column_ratio` wide.
    fn collapse_narrow_columns(&self, mut gutters: Vec<Gutter>, left: f32, right: f32) -> Vec<Gutter> {
        let min_width = self.config.min_column_ratio * (right - left);

        while !gutters.is_empty() {
            let mut edges = Vec::with_capacity(gutters.len() + 2);
            edges.push(left);
            edges.extend(gutters.iter().map(|g| g.center));
            edges.push(right);

            let widths: Vec<f32> = edges.windows(2).map(|w| w[1] - w[0]).collect();
            let (narrowest, width) = widths
                .iter()
                .copied()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .unwrap_or((0, f32::INFINITY));

            if width >= min_width {
                break;
            }

            // Column i is bounded by gutters i-1 and i
            let drop = match (narrowest.checked_sub(1), gutters.get(narrowest)) {
                (Some(l), Some(r)) if gutters[l].width <= r.width => l,
                (Some(_), Some(_)) => narrowest,
                (Some(l), None) => l,
                (None, _) => narrowest,
            };
            log::debug!(
                "Column {} too narrow ({:.1}pt < {:.1}pt), dropping gutter at x={:.1}",
                narrowest + 1,
                width,
                min_width,
                gutters[drop].center
            );
            gutters.remove(drop);
        }
        gutters
    }
}

/// Maximal runs `(start, end)` (inclusive) of bins with weight at most `noise`.
fn empty_runs(weights: &[usize], noise: usize) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &w) in weights.iter().enumerate() {
        match (w <= noise, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, weights.len() - 1));
    }
    runs
}

/// Merge gutters closer than `distance`: the wider one wins, equal widths
/// are averaged.
fn merge_gutters(mut gutters: Vec<Gutter>, distance: f32) -> Vec<Gutter> {
    gutters.sort_by(|a, b| a.center.total_cmp(&b.center));

    let mut merged: Vec<Gutter> = Vec::with_capacity(gutters.len());
    for gutter in gutters {
        match merged.last_mut() {
            Some(last) if gutter.center - last.center < distance => {
                if gutter.width > last.width {
                    *last = gutter;
                } else if gutter.width == last.width {
                    last.center = (last.center + gutter.center) / 2.0;
                }
            }
            _ => merged.push(gutter),
        }
    }
    merged
}
