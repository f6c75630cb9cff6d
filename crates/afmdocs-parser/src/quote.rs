//! Blockquote recognition.
//!
//! A maximal run of `>`-prefixed lines is one blockquote. The prefix is
//! stripped here; rendering the content happens later, one nesting level
//! deeper, so that the depth limit is checked per block.

use crate::segment::{scan_lines, Segment};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for a quoted line: up to three spaces, `>`, optional space
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}> ?(.*)$").unwrap());

/// Replace every run of quoted lines with a [`Segment::Quote`].
pub fn split_quotes(text: &str) -> Vec<Segment> {
    scan_lines(text, |lines, fenced, i| {
        let quoted = |j: usize| !fenced[j] && QUOTE_RE.is_match(lines[j]);
        if !quoted(i) {
            return None;
        }

        let mut end = i;
        while end < lines.len() && quoted(end) {
            end += 1;
        }

        let body: Vec<&str> = lines[i..end]
            .iter()
            .filter_map(|line| QUOTE_RE.captures(line))
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
            .collect();

        Some((
            end,
            Segment::Quote {
                source: lines[i..end].join("\n"),
                body: body.join("\n"),
            },
        ))
    })
}
