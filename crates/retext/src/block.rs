//! Structural lookup of bracket-delimited blocks, such as a JSX expression
//! container (`{cond && (<div>...</div>)}`), without a regular expression.

use std::ops::Range;

/// Position and value of the first opening bracket in `marker`.
pub fn opening_bracket(marker: &str) -> Option<(usize, char)> {
    marker
        .char_indices()
        .find(|(_, c)| matches!(c, '{' | '(' | '['))
}

fn closing_bracket(open: char) -> char {
    match open {
        '{' => '}',
        '(' => ')',
        _ => ']',
    }
}

/// Finds the first occurrence of `marker` and returns the byte range from the
/// start of the marker to the end of the bracket that closes the marker's
/// first opening bracket.
///
/// Only brackets of the same kind are counted. Returns `None` when the marker
/// is absent, has no opening bracket, or the block never closes.
pub fn find_block(haystack: &str, marker: &str) -> Option<Range<usize>> {
    let (offset, open) = opening_bracket(marker)?;
    let close = closing_bracket(open);
    let start = haystack.find(marker)?;
    let scan_from = start + offset;

    let mut depth = 0usize;
    for (idx, c) in haystack[scan_from..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(start..scan_from + idx + c.len_utf8());
            }
        }
    }
    None
}
