//! Fenced-region awareness and block splitting.
//!
//! Pre-processors and the block splitter work line by line. Lines that
//! belong to a closed ```` ``` ```` fence are opaque to both: no table,
//! quote or list is recognized inside one, and blank lines inside one do
//! not end the block.

use regex::Regex;
use std::sync::LazyLock;

/// Opening fence: ``` followed by an optional info string
static FENCE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[ \t]*([^\s`]*)[ \t]*$").unwrap());

/// Closing fence: bare ```
static FENCE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```[ \t]*$").unwrap());

/// Mark every line that belongs to a closed fence, fence lines included.
///
/// An opening fence without a matching close is not a fence.
pub fn fence_mask(lines: &[&str]) -> Vec<bool> {
    let mut mask = vec![false; lines.len()];
    let mut i = 0;

    while i < lines.len() {
        if FENCE_OPEN_RE.is_match(lines[i]) {
            let close = (i + 1..lines.len()).find(|&j| FENCE_CLOSE_RE.is_match(lines[j]));
            if let Some(close) = close {
                for flag in &mut mask[i..=close] {
                    *flag = true;
                }
                i = close + 1;
                continue;
            }
        }
        i += 1;
    }

    mask
}

/// Whether a line is blank (empty or whitespace only).
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split text into blocks separated by one or more blank lines.
///
/// Blank lines inside a fence stay in their block. Empty blocks are
/// dropped; block order follows the source.
///
/// # Example
///
/// ```
/// use afmdocs_parser::fence::split_blocks;
///
/// let blocks = split_blocks("one\n\n\n\ntwo\nlines");
/// assert_eq!(blocks, vec!["one".to_string(), "two\nlines".to_string()]);
/// ```
pub fn split_blocks(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mask = fence_mask(&lines);
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (line, fenced) in lines.iter().zip(&mask) {
        if !fenced && is_blank(line) {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_mask_closed_fence() {
        let lines = vec!["a", "```rust", "x", "", "```", "b"];
        assert_eq!(
            fence_mask(&lines),
            vec![false, true, true, true, true, false]
        );
    }

    #[test]
    fn test_fence_mask_unclosed_fence_is_text() {
        let lines = vec!["```", "x", "y"];
        assert_eq!(fence_mask(&lines), vec![false, false, false]);
    }

    #[test]
    fn test_fence_mask_info_string_with_spaces_is_not_fence() {
        let lines = vec!["``` a b", "x", "```"];
        assert_eq!(fence_mask(&lines), vec![false, false, false]);
    }

    #[test]
    fn test_split_blocks_on_blank_runs() {
        assert_eq!(
            split_blocks("a\n\nb\n \t\nc"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_split_blocks_keeps_fenced_blank_lines() {
        let text = "```\nfirst\n\nsecond\n```\n\nafter";
        assert_eq!(
            split_blocks(text),
            vec!["```\nfirst\n\nsecond\n```".to_string(), "after".to_string()]
        );
    }

    #[test]
    fn test_split_blocks_empty_input() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("\n\n\n").is_empty());
    }
}
