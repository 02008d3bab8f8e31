//! Word-level comparison of source text against emitted text.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::render::join_lines;

/// Most missing or extra words kept in a comparison.
const MAX_LISTED_WORDS: usize = 50;

/// Match ratio at which a conversion counts as faithful.
const VALID_MATCH_RATIO: f32 = 0.85;

fn punctuation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("punctuation pattern is valid"))
}

/// Normalize text into comparable words.
///
/// Punctuation becomes whitespace, everything is lowercased, and words of
/// two characters or fewer as well as pure numbers are dropped.
///
/// ```
/// use relayout::convert::normalize_words;
///
/// assert_eq!(normalize_words("The 2024 Report, v2!"), vec!["the", "report"]);
/// ```
pub fn normalize_words(text: &str) -> Vec<String> {
    let cleaned = punctuation_regex().replace_all(text, " ").to_lowercase();
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && !w.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

/// Per-page share of source words found in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageComparison {
    /// Page number (1-indexed)
    pub page: u32,
    /// Distinct source words on the page
    pub source_words: usize,
    /// Share of those words present anywhere in the output
    pub match_ratio: f32,
}

/// Comparison of source and output words for a whole conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextComparison {
    /// Normalized source words (with repeats)
    pub source_word_count: usize,
    /// Normalized output words (with repeats)
    pub output_word_count: usize,
    /// Share of distinct source words present in the output
    pub match_ratio: f32,
    /// Source words absent from the output (at most 50, sorted)
    pub missing_words: Vec<String>,
    /// Output words absent from the source (at most 50, sorted)
    pub extra_words: Vec<String>,
    /// Per-page results
    pub pages: Vec<PageComparison>,
}

impl TextComparison {
    /// Compare per-page source texts against the full output text.
    ///
    /// Source lines are rejoined the way reflowed output joins them, so a word
    /// hyphenated across a line break matches its rejoined form.
    pub fn compare<'a>(
        source_pages: impl IntoIterator<Item = (u32, &'a str)>,
        output_text: &str,
    ) -> Self {
        let output_words = normalize_words(output_text);
        let output_set: BTreeSet<&str> = output_words.iter().map(String::as_str).collect();

        let mut source_word_count = 0;
        let mut source_set: BTreeSet<String> = BTreeSet::new();
        let mut pages = Vec::new();

        for (page, text) in source_pages {
            let lines: Vec<&str> = text.lines().collect();
            let words = normalize_words(&join_lines(&lines));
            source_word_count += words.len();

            let distinct: BTreeSet<String> = words.into_iter().collect();
            let found = distinct
                .iter()
                .filter(|w| output_set.contains(w.as_str()))
                .count();
            pages.push(PageComparison {
                page,
                source_words: distinct.len(),
                match_ratio: ratio(found, distinct.len(), true),
            });
            source_set.extend(distinct);
        }

        let common = source_set
            .iter()
            .filter(|w| output_set.contains(w.as_str()))
            .count();
        let missing_words = source_set
            .iter()
            .filter(|w| !output_set.contains(w.as_str()))
            .take(MAX_LISTED_WORDS)
            .cloned()
            .collect();
        let extra_words = output_set
            .iter()
            .filter(|w| !source_set.contains(**w))
            .take(MAX_LISTED_WORDS)
            .map(|w| w.to_string())
            .collect();

        Self {
            source_word_count,
            output_word_count: output_words.len(),
            match_ratio: ratio(common, source_set.len(), output_set.is_empty()),
            missing_words,
            extra_words,
            pages,
        }
    }

    /// Check if enough source words survived the conversion.
    pub fn is_valid(&self) -> bool {
        self.match_ratio >= VALID_MATCH_RATIO
    }
}

/// `found / total`, or the fallback outcome when there is nothing to find.
fn ratio(found: usize, total: usize, empty_is_match: bool) -> f32 {
    if total == 0 {
        if empty_is_match {
            1.0
        } else {
            0.0
        }
    } else {
        found as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_words() {
        assert_eq!(
            normalize_words("Hello, World! It's 2024; the end."),
            vec!["hello", "world", "the", "end"]
        );
        assert!(normalize_words("a an 42 -- ..").is_empty());
    }

    #[test]
    fn test_full_match() {
        let cmp = TextComparison::compare(
            [(1, "Column layouts are preserved"), (2, "Second page text")],
            "Column layouts are preserved\nSecond page text",
        );
        assert_eq!(cmp.match_ratio, 1.0);
        assert!(cmp.is_valid());
        assert!(cmp.missing_words.is_empty());
        assert!(cmp.extra_words.is_empty());
        assert_eq!(cmp.pages.len(), 2);
        assert_eq!(cmp.source_word_count, 7);
    }

    #[test]
    fn test_missing_and_extra() {
        let cmp = TextComparison::compare(
            [(1, "alpha beta gamma delta")],
            "alpha beta epsilon",
        );
        assert!((cmp.match_ratio - 0.5).abs() < 1e-6);
        assert!(!cmp.is_valid());
        assert_eq!(cmp.missing_words, vec!["delta", "gamma"]);
        assert_eq!(cmp.extra_words, vec!["epsilon"]);
        assert!((cmp.pages[0].match_ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hyphenated_source_matches_reflow() {
        let cmp = TextComparison::compare(
            [(1, "Gutters carry infor-\nmation about the\ncolumn structure")],
            "Gutters carry information about the column structure",
        );
        assert_eq!(cmp.match_ratio, 1.0);
        assert!(cmp.missing_words.is_empty());
        assert!(cmp.extra_words.is_empty());
        assert_eq!(cmp.source_word_count, 7);
    }

    #[test]
    fn test_empty_source() {
        let cmp = TextComparison::compare([(1, "")], "");
        assert_eq!(cmp.match_ratio, 1.0);
        assert_eq!(cmp.pages[0].match_ratio, 1.0);

        let cmp = TextComparison::compare([(1, "")], "unexpected output");
        assert_eq!(cmp.match_ratio, 0.0);
    }

    #[test]
    fn test_word_lists_are_capped() {
        let source: String = (0..80).map(|i| format!("word{} ", i)).collect();
        let cmp = TextComparison::compare([(1, source.as_str())], "");
        assert_eq!(cmp.missing_words.len(), 50);
    }
}
