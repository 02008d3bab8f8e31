//! Font size statistics for heading detection.

use std::collections::HashMap;

use crate::model::Line;

/// Font statistics of a page.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Body text font size (most common)
    pub body_size: f32,
    /// Font sizes larger than body (potential headings), largest first
    pub heading_sizes: Vec<f32>,
    /// Observed font sizes (tenths of a point) weighted by character count
    pub size_histogram: HashMap<i32, usize>,
}

impl FontStatistics {
    /// Collect statistics from lines and analyze them.
    pub fn from_lines(lines: &[Line]) -> Self {
        let mut stats = Self::default();
        for line in lines {
            let chars = line.text().chars().filter(|c| !c.is_whitespace()).count();
            stats.add_size_weighted(line.font_size, chars.max(1));
        }
        stats.analyze();
        stats
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        self.add_size_weighted(size, 1);
    }

    /// Add a font size observation with a weight.
    pub fn add_size_weighted(&mut self, size: f32, weight: usize) {
        let key = (size * 10.0).round() as i32;
        *self.size_histogram.entry(key).or_insert(0) += weight;
    }

    /// Calculate body size and heading sizes.
    pub fn analyze(&mut self) {
        // Ties go to the smaller size so the result does not depend on map order
        let body_key = self
            .size_histogram
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .map(|(k, _)| *k);

        let Some(body_key) = body_key else {
            self.body_size = 12.0;
            self.heading_sizes.clear();
            return;
        };
        self.body_size = body_key as f32 / 10.0;

        let mut larger: Vec<f32> = self
            .size_histogram
            .keys()
            .map(|k| *k as f32 / 10.0)
            .filter(|s| *s > self.body_size + 0.5)
            .collect();
        larger.sort_by(|a, b| b.total_cmp(a));
        self.heading_sizes = larger;
    }

    /// Get heading level for a font size (1-6, or 0 for body text).
    pub fn heading_level(&self, font_size: f32) -> u8 {
        // At least 1.5pt above body to avoid false positives
        if font_size < self.body_size + 1.5 {
            return 0;
        }

        for (i, &heading_size) in self.heading_sizes.iter().enumerate() {
            if font_size >= heading_size - 0.5 {
                return (i + 1).min(6) as u8;
            }
        }

        5
    }
}
