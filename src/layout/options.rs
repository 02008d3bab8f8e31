//! Heuristic thresholds for layout analysis.
//!
//! Every threshold has a documented default. A whole [`LayoutConfig`] can be
//! loaded from JSON; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest projection resolution the column detector accepts.
pub const MIN_BIN_COUNT: usize = 40;

/// Largest projection resolution the column detector uses.
pub const MAX_BIN_COUNT: usize = 4096;

/// Complete layout analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Line building
    pub lines: LineConfig,
    /// Column detection
    pub columns: ColumnConfig,
    /// Block segmentation
    pub segments: SegmentConfig,
    /// Header/footer classification
    pub regions: RegionConfig,
    /// Element sequencing
    pub sequence: SequenceConfig,
}

impl LayoutConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON, then validate it.
    ///
    /// ```
    /// use relayout::layout::LayoutConfig;
    ///
    /// let config = LayoutConfig::from_json(r#"{"columns": {"max_columns": 3}}"#).unwrap();
    /// assert_eq!(config.columns.max_columns, 3);
    /// assert_eq!(config.columns.bin_count, 40);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set column configuration.
    pub fn with_columns(mut self, columns: ColumnConfig) -> Self {
        self.columns = columns;
        self
    }

    /// Set segmentation configuration.
    pub fn with_segments(mut self, segments: SegmentConfig) -> Self {
        self.segments = segments;
        self
    }

    /// Set region configuration.
    pub fn with_regions(mut self, regions: RegionConfig) -> Self {
        self.regions = regions;
        self
    }

    /// Check every threshold for a usable range.
    pub fn validate(&self) -> Result<()> {
        let c = &self.columns;
        if c.bin_count < MIN_BIN_COUNT {
            return Err(invalid(format!(
                "columns.bin_count must be at least {MIN_BIN_COUNT}, got {}",
                c.bin_count
            )));
        }
        if c.max_columns == 0 {
            return Err(invalid("columns.max_columns must be at least 1"));
        }
        check_ratio("columns.gutter_noise_ratio", c.gutter_noise_ratio)?;
        check_ratio("columns.min_flank_ratio", c.min_flank_ratio)?;
        check_ratio("columns.min_column_ratio", c.min_column_ratio)?;
        check_ratio("columns.wide_line_ratio", c.wide_line_ratio)?;
        check_ratio("columns.min_hint_confidence", c.min_hint_confidence)?;
        check_non_negative("columns.min_gutter_width", c.min_gutter_width)?;
        check_non_negative("columns.merge_distance", c.merge_distance)?;

        let l = &self.lines;
        check_positive("lines.line_tolerance", l.line_tolerance)?;
        check_positive("lines.max_word_gap_em", l.max_word_gap_em)?;

        let s = &self.segments;
        check_positive("segments.line_gap_factor", s.line_gap_factor)?;
        check_non_negative("segments.font_growth_ratio", s.font_growth_ratio)?;
        check_ratio("segments.indent_shift_ratio", s.indent_shift_ratio)?;
        check_non_negative("segments.gutter_tolerance", s.gutter_tolerance)?;

        let r = &self.regions;
        check_ratio("regions.header_ratio", r.header_ratio)?;
        check_ratio("regions.footer_ratio", r.footer_ratio)?;
        if r.header_ratio + r.footer_ratio >= 1.0 {
            return Err(invalid("regions.header_ratio + regions.footer_ratio must be below 1"));
        }

        check_ratio("sequence.full_width_ratio", self.sequence.full_width_ratio)?;
        Ok(())
    }
}

pub(crate) fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig(message.into())
}

pub(crate) fn check_ratio(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be within [0, 1], got {value}")))
    }
}

pub(crate) fn check_positive(name: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {value}")))
    }
}

pub(crate) fn check_non_negative(name: &str, value: f32) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must not be negative, got {value}")))
    }
}

/// Options for grouping fragments into lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Maximum distance between vertical centers, as a fraction of font size
    pub line_tolerance: f32,

    /// Horizontal gap (in ems) that splits a band into separate lines
    pub max_word_gap_em: f32,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 0.3,
            max_word_gap_em: 2.0,
        }
    }
}

/// Options for column detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Number of projection bins across the content width
    pub bin_count: usize,

    /// Bins holding at most this fraction of lines count as empty
    pub gutter_noise_ratio: f32,

    /// Minimum number of lines on each side of a gutter
    pub min_flank_lines: usize,

    /// Minimum fraction of lines on each side of a gutter
    pub min_flank_ratio: f32,

    /// Minimum whitespace width of a gutter in points
    pub min_gutter_width: f32,

    /// Gutters closer than this (in points) are merged
    pub merge_distance: f32,

    /// Columns narrower than this fraction of content width are collapsed
    pub min_column_ratio: f32,

    /// Maximum number of columns
    pub max_columns: usize,

    /// Lines wider than this fraction of content width span the columns
    pub wide_line_ratio: f32,

    /// Hints below this confidence are ignored
    pub min_hint_confidence: f32,
}

impl ColumnConfig {
    /// Set the minimum gutter width and return self.
    pub fn with_min_gutter_width(mut self, width: f32) -> Self {
        self.min_gutter_width = width;
        self
    }

    /// Set the maximum column count and return self.
    pub fn with_max_columns(mut self, max: usize) -> Self {
        self.max_columns = max;
        self
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            bin_count: MIN_BIN_COUNT,
            gutter_noise_ratio: 0.05,
            min_flank_lines: 2,
            min_flank_ratio: 0.1,
            min_gutter_width: 12.0,
            merge_distance: 20.0,
            min_column_ratio: 0.15,
            max_columns: 4,
            wide_line_ratio: 0.6,
            min_hint_confidence: 0.5,
        }
    }
}

/// Options for block segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Top-to-top distance (in average font sizes) that ends a block
    pub line_gap_factor: f32,

    /// Relative font size change that ends a block
    pub font_growth_ratio: f32,

    /// Left edge shift (fraction of column width) that ends a block
    pub indent_shift_ratio: f32,

    /// How far a line may cross a gutter before it counts as full width
    pub gutter_tolerance: f32,

    /// Classify headings from page font statistics
    pub detect_headings: bool,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            line_gap_factor: 1.5,
            font_growth_ratio: 0.3,
            indent_shift_ratio: 0.2,
            gutter_tolerance: 2.0,
            detect_headings: true,
        }
    }
}

/// Options for header/footer classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Top band of the page (fraction of height) holding headers
    pub header_ratio: f32,

    /// Bottom band of the page (fraction of height) holding footers
    pub footer_ratio: f32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            header_ratio: 0.07,
            footer_ratio: 0.07,
        }
    }
}

/// Options for element sequencing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Images wider than this fraction of the page span all columns
    pub full_width_ratio: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            full_width_ratio: 0.6,
        }
    }
}
