//! Ordered and unordered list recognition.
//!
//! A list is a run of item lines (`1. ` or `- `, `* `, `+ `). An item's
//! body continues over following non-blank lines that do not start a new
//! item; a blank line or a marker of the other list kind ends the run.
//! Lists are single-level, and source numbers are not rendered: items
//! always come out in source order.

use crate::inline::{apply_inline, RuleOptions};
use crate::fence::is_blank;
use crate::segment::{scan_lines, Segment};
use afmdocs_core::Block;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for ordered list items: `1. text`
static ORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").unwrap());

/// Regex for unordered list items: `- text`, `* text`, `+ text`
static UNORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*+]\s+(.*)$").unwrap());

/// Which list a pre-processor pass recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Numbered items, rendered as `<ol>`
    Ordered,
    /// Bulleted items, rendered as `<ul>`
    Unordered,
}

impl ListKind {
    fn pattern(self) -> &'static Regex {
        match self {
            ListKind::Ordered => &ORDERED_ITEM_RE,
            ListKind::Unordered => &UNORDERED_ITEM_RE,
        }
    }

    fn other(self) -> Self {
        match self {
            ListKind::Ordered => ListKind::Unordered,
            ListKind::Unordered => ListKind::Ordered,
        }
    }

    /// Body text of an item line of this kind.
    fn item_body(self, line: &str) -> Option<String> {
        self.pattern()
            .captures(line)
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()).to_string())
    }

    fn block(self, items: Vec<String>) -> Block {
        match self {
            ListKind::Ordered => Block::OrderedList { items },
            ListKind::Unordered => Block::UnorderedList { items },
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Ordered => write!(f, "ordered"),
            ListKind::Unordered => write!(f, "unordered"),
        }
    }
}

/// Replace every list of `kind` in `text` with a rendered list block.
pub fn split_lists(text: &str, kind: ListKind, options: RuleOptions) -> Vec<Segment> {
    scan_lines(text, |lines, fenced, i| {
        if fenced[i] {
            return None;
        }
        let first = kind.item_body(lines[i])?;

        let mut items = Vec::new();
        let mut current = first;
        let mut end = i + 1;

        while end < lines.len() && !fenced[end] && !is_blank(lines[end]) {
            let line = lines[end];
            if let Some(body) = kind.item_body(line) {
                items.push(std::mem::replace(&mut current, body));
            } else if kind.other().item_body(line).is_some() {
                break;
            } else {
                current.push('\n');
                current.push_str(line.trim());
            }
            end += 1;
        }
        items.push(current);

        let items: Vec<String> = items
            .iter()
            .map(|item| apply_inline(item.trim(), options))
            .collect();
        if items.is_empty() {
            return None;
        }

        Some((end, Segment::Block(kind.block(items))))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(text: &str, kind: ListKind) -> Vec<Segment> {
        split_lists(text, kind, RuleOptions::default())
    }

    fn items(segment: &Segment) -> Vec<String> {
        match segment {
            Segment::Block(Block::OrderedList { items })
            | Segment::Block(Block::UnorderedList { items }) => items.clone(),
            other => panic!("expected a list, got {:?}", other),
        }
    }

    #[test]
    fn test_ordered_list() {
        let segments = lists("1. first\n2. second", ListKind::Ordered);
        assert_eq!(
            segments,
            vec![Segment::Block(Block::OrderedList {
                items: vec!["first".into(), "second".into()],
            })]
        );
    }

    #[test]
    fn test_non_sequential_numbers_keep_source_order() {
        let segments = lists("1. a\n3. b\n2. c", ListKind::Ordered);
        assert_eq!(items(&segments[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unordered_markers() {
        let segments = lists("- a\n* b\n+ c", ListKind::Unordered);
        assert_eq!(items(&segments[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_continuation_lines() {
        let segments = lists("- first\n  continues here\n- second", ListKind::Unordered);
        assert_eq!(items(&segments[0]), vec!["first\ncontinues here", "second"]);
    }

    #[test]
    fn test_blank_line_ends_list() {
        let segments = lists("- a\n\nafter", ListKind::Unordered);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], Segment::Markdown("\nafter".into()));
    }

    #[test]
    fn test_other_marker_ends_run() {
        let segments = lists("1. one\n- bullet", ListKind::Ordered);
        assert_eq!(items(&segments[0]), vec!["one"]);
        assert_eq!(segments[1], Segment::Markdown("- bullet".into()));
    }

    #[test]
    fn test_items_get_inline_rules() {
        let segments = lists("- **bold** and `code`", ListKind::Unordered);
        assert_eq!(
            items(&segments[0]),
            vec!["<strong>bold</strong> and <code>code</code>"]
        );
    }

    #[test]
    fn test_emphasis_line_is_not_item() {
        let text = "*not* a list";
        assert_eq!(
            lists(text, ListKind::Unordered),
            vec![Segment::Markdown(text.into())]
        );
    }

    #[test]
    fn test_horizontal_rule_is_not_item() {
        assert_eq!(
            lists("---", ListKind::Unordered),
            vec![Segment::Markdown("---".into())]
        );
    }

    #[test]
    fn test_list_kind_display() {
        assert_eq!(ListKind::Ordered.to_string(), "ordered");
        assert_eq!(ListKind::Unordered.to_string(), "unordered");
    }
}
