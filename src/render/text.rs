//! Text decisions made while synthesizing output: reflow, hyphen joins and
//! font names.

use super::RenderOptions;
use crate::model::{is_spaceless_script_char, Block};

/// PostScript names that don't reduce to a family by splitting at `-`.
const FONT_NAME_MAP: &[(&str, &str)] = &[
    ("ArialMT", "Arial"),
    ("Arial-BoldMT", "Arial"),
    ("Arial-ItalicMT", "Arial"),
    ("Arial-BoldItalicMT", "Arial"),
    ("TimesNewRomanPSMT", "Times New Roman"),
    ("TimesNewRomanPS-BoldMT", "Times New Roman"),
    ("TimesNewRomanPS-ItalicMT", "Times New Roman"),
    ("TimesNewRomanPS-BoldItalicMT", "Times New Roman"),
    ("CourierNewPSMT", "Courier New"),
    ("CourierNewPS-BoldMT", "Courier New"),
];

/// Decide whether a block's lines are rejoined into flowing text.
///
/// Single-line blocks always flow. Longer blocks flow when enough of their
/// non-final lines reach close to the widest line, which is what justified
/// or ragged-right prose looks like. List items and blocks of short lines
/// (addresses, poetry, code) keep their line breaks.
pub fn should_flow(block: &Block, options: &RenderOptions) -> bool {
    if options.preserve_line_breaks {
        return block.lines.len() <= 1;
    }
    if block.lines.len() <= 1 {
        return true;
    }
    if block.is_list_item() {
        return false;
    }

    let widest = block.max_line_width();
    if widest <= 0.0 {
        return true;
    }

    let body = &block.lines[..block.lines.len() - 1];
    let long = body
        .iter()
        .filter(|l| l.width() >= options.flow_width_ratio * widest)
        .count();
    long as f32 / body.len() as f32 >= options.flow_line_ratio
}

/// Check if a line break between `prev` and `next` splits a hyphenated word.
///
/// ```
/// use relayout::render::is_hyphenated_break;
///
/// assert!(is_hyphenated_break("the infor-", "mation age"));
/// assert!(!is_hyphenated_break("the 2020-", "2024 period"));
/// assert!(!is_hyphenated_break("Jean-", "Paul"));
/// ```
pub fn is_hyphenated_break(prev: &str, next: &str) -> bool {
    let mut tail = prev.trim_end().chars().rev();
    let hyphen = tail.next() == Some('-');
    let letter = tail.next().is_some_and(|c| c.is_alphabetic());
    let lower = next
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_lowercase());
    hyphen && letter && lower
}

/// Check if two lines join without a space (both sides in a spaceless script).
pub fn joins_without_space(prev: &str, next: &str) -> bool {
    let last = prev.trim_end().chars().last();
    let first = next.trim_start().chars().next();
    matches!((last, first), (Some(a), Some(b)) if is_spaceless_script_char(a) && is_spaceless_script_char(b))
}

/// Join lines into flowing text.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut result = String::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if result.is_empty() {
            result.push_str(line);
        } else if is_hyphenated_break(&result, line) {
            let trimmed_len = result.trim_end().len() - '-'.len_utf8();
            result.truncate(trimmed_len);
            result.push_str(line);
        } else if joins_without_space(&result, line) {
            result.push_str(line);
        } else {
            result.push(' ');
            result.push_str(line);
        }
    }
    result
}

/// Reduce a source font name to a family name usable in the output.
///
/// ```
/// use relayout::render::clean_font_name;
///
/// assert_eq!(clean_font_name("ABCDEF+ArialMT"), "Arial");
/// assert_eq!(clean_font_name("Helvetica-Bold"), "Helvetica");
/// assert_eq!(clean_font_name("Garamond"), "Garamond");
/// ```
pub fn clean_font_name(name: &str) -> String {
    let name = name.trim();
    let name = name.rsplit_once('+').map(|(_, n)| n).unwrap_or(name);

    if let Some((_, mapped)) = FONT_NAME_MAP.iter().find(|(from, _)| *from == name) {
        return (*mapped).to_string();
    }

    name.split(['-', ','])
        .next()
        .unwrap_or(name)
        .trim()
        .to_string()
}
