//! Pre-processor output.
//!
//! Pre-processors take the document apart into [`Segment`]s: Markdown text
//! still to be split into blocks, and constructs they have already
//! recognized. Only `Markdown` segments are handed to the next
//! pre-processor, so finished output is never re-read as Markdown.

use crate::fence::{fence_mask, is_blank};
use afmdocs_core::Block;

/// A piece of the document after pre-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text not claimed by any pre-processor
    Markdown(String),
    /// A fully rendered construct (table, list)
    Block(Block),
    /// A blockquote whose content is rendered one level deeper
    Quote {
        /// The original `>`-prefixed lines
        source: String,
        /// The content with one `>` stripped from each line
        body: String,
    },
}

/// Run a pre-processor over every `Markdown` segment.
pub fn expand<F>(segments: Vec<Segment>, mut f: F) -> Vec<Segment>
where
    F: FnMut(&str) -> Vec<Segment>,
{
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Markdown(text) => out.extend(f(&text)),
            other => out.push(other),
        }
    }
    out
}

/// Scan `text` line by line for a multi-line construct.
///
/// `recognize(lines, fenced, i)` returns the end (exclusive) of a construct
/// starting at line `i` together with its segment, or `None`. Lines inside
/// fences are marked in `fenced`. Unclaimed lines are passed through as
/// `Markdown` segments.
pub fn scan_lines<F>(text: &str, mut recognize: F) -> Vec<Segment>
where
    F: FnMut(&[&str], &[bool], usize) -> Option<(usize, Segment)>,
{
    let lines: Vec<&str> = text.split('\n').collect();
    let fenced = fence_mask(&lines);
    let mut out = Vec::new();
    let mut pending = 0;
    let mut i = 0;

    while i < lines.len() {
        match recognize(&lines, &fenced, i) {
            Some((end, segment)) if end > i => {
                push_markdown(&mut out, &lines[pending..i]);
                out.push(segment);
                pending = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    push_markdown(&mut out, &lines[pending..]);

    out
}

fn push_markdown(out: &mut Vec<Segment>, lines: &[&str]) {
    if lines.iter().any(|line| !is_blank(line)) {
        out.push(Segment::Markdown(lines.join("\n")));
    }
}
