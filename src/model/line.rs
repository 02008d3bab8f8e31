//! Text lines composed of fragments on the same baseline.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::{BBox, FontDescriptor, TextFragment};

/// Glyphs that open a bulleted list item.
const BULLET_GLYPHS: &[char] = &[
    '•', '◦', '▪', '▫', '■', '□', '●', '○', '‣', '⁃', '∙', '▸', '►', '◆', '◇', '➤', '✓', '✗',
    '-', '*', '–',
];

fn list_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d+[.)]|[a-zA-Z][.)]|\(\d+\))\s").expect("list marker pattern is valid")
    })
}

/// Kind of list marker a line starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMarker {
    /// A bullet glyph
    Bullet(char),
    /// A numbered or lettered marker ("1.", "a)", "(3)")
    Numbered,
}

/// Detect a list marker at the start of `text`.
///
/// A bullet must be followed by whitespace (or end the text) so that words
/// such as "-5%" or "*important*" are not taken for list items.
pub fn detect_list_marker(text: &str) -> Option<ListMarker> {
    let trimmed = text.trim_start();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if BULLET_GLYPHS.contains(&first) {
        match chars.next() {
            None => return Some(ListMarker::Bullet(first)),
            Some(c) if c.is_whitespace() => return Some(ListMarker::Bullet(first)),
            _ => {}
        }
    }
    if list_marker_regex().is_match(trimmed) {
        return Some(ListMarker::Numbered);
    }
    None
}

/// A text line: one or more fragments sharing a vertical band.
///
/// Lines are built once by the line builder and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Fragments in this line, sorted by x
    pub fragments: Vec<TextFragment>,
    /// Union of the fragments' boxes
    pub bbox: BBox,
    /// Dominant font (the font covering the most characters)
    pub font: FontDescriptor,
    /// Character-weighted average font size
    pub font_size: f32,
}

impl Line {
    /// Create a line from fragments.
    ///
    /// Returns `None` when `fragments` is empty.
    pub fn from_fragments(mut fragments: Vec<TextFragment>) -> Option<Self> {
        if fragments.is_empty() {
            return None;
        }

        fragments.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let bbox = BBox::union_all(fragments.iter().map(|f| &f.bbox))?;

        // Weight font sizes by text length
        let total_chars: usize = fragments.iter().map(|f| f.text.chars().count()).sum();
        let font_size = if total_chars > 0 {
            let weighted: f32 = fragments
                .iter()
                .map(|f| f.font.size * f.text.chars().count() as f32)
                .sum();
            weighted / total_chars as f32
        } else {
            fragments[0].font.size
        };

        let font = fragments
            .iter()
            .max_by_key(|f| f.text.chars().count())
            .map(|f| f.font.clone())
            .unwrap_or_default();

        Some(Self {
            fragments,
            bbox,
            font,
            font_size,
        })
    }

    /// Combined text of all fragments.
    ///
    /// Inserts a space between fragments when their horizontal gap exceeds
    /// 20% of the average glyph width, except between characters of
    /// scripts written without spaces.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (space, fragment) in self.spaced_fragments() {
            if space {
                result.push(' ');
            }
            result.push_str(&fragment.text);
        }

        result.nfc().collect()
    }

    /// Fragments paired with whether a space separates each from the
    /// previous one.
    pub fn spaced_fragments(&self) -> impl Iterator<Item = (bool, &TextFragment)> + '_ {
        self.fragments.iter().enumerate().map(move |(i, fragment)| {
            let space = i > 0 && needs_space(&self.fragments[i - 1], fragment);
            (space, fragment)
        })
    }

    /// Width of the line.
    pub fn width(&self) -> f32 {
        self.bbox.width()
    }

    /// List marker at the start of the line, if any.
    pub fn list_marker(&self) -> Option<ListMarker> {
        self.fragments
            .first()
            .and_then(|f| detect_list_marker(&f.text))
            .or_else(|| detect_list_marker(&self.text()))
    }

    /// Check if the line starts with a list marker.
    pub fn starts_list_item(&self) -> bool {
        self.list_marker().is_some()
    }

    /// Check if the line is predominantly bold.
    pub fn is_bold(&self) -> bool {
        let total: usize = self.fragments.iter().map(|f| f.text.len()).sum();
        let bold: usize = self
            .fragments
            .iter()
            .filter(|f| f.font.bold)
            .map(|f| f.text.len())
            .sum();
        total > 0 && bold as f32 / total as f32 > 0.5
    }
}

fn needs_space(prev: &TextFragment, curr: &TextFragment) -> bool {
    let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
    let curr_starts_with_space = curr.text.starts_with(' ') || curr.text.starts_with('\u{00A0}');
    if prev_ends_with_space || curr_starts_with_space {
        return false;
    }

    let gap = curr.bbox.x0 - prev.bbox.x1;
    let char_count = curr.text.chars().count();
    let avg_char_width = if char_count > 0 && curr.bbox.width() > 0.0 {
        curr.bbox.width() / char_count as f32
    } else {
        curr.font.size * 0.5
    };

    if gap <= avg_char_width * 0.2 {
        return false;
    }

    let prev_is_cjk = prev
        .text
        .chars()
        .last()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    let curr_is_cjk = curr
        .text
        .chars()
        .next()
        .map(is_spaceless_script_char)
        .unwrap_or(false);

    !(prev_is_cjk && curr_is_cjk)
}

/// Characters of scripts that don't separate words with spaces.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x3040..=0x309F   // Hiragana
        | 0x30A0..=0x30FF // Katakana
        | 0x3400..=0x4DBF // CJK Extension A
        | 0x4E00..=0x9FFF // CJK Unified Ideographs
        | 0xF900..=0xFAFF // CJK Compatibility Ideographs
        | 0x3000..=0x303F // CJK punctuation
        | 0xFF00..=0xFFEF // Fullwidth forms
        | 0x0E00..=0x0E7F // Thai
    )
}
