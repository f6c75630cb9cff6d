//! Pipe table recognition.
//!
//! A table is a header row, a separator row (`|---|:--:|`), and one or
//! more body rows, all pipe-delimited. The header's cell count is
//! authoritative: a body row with a different count is dropped.
//! Alignment markers are accepted but not rendered.

use crate::inline::{apply_inline, RuleOptions};
use crate::segment::{scan_lines, Segment};
use afmdocs_core::{Block, Diagnostics};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for table rows
static TABLE_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}\|(.+)\|\s*$").unwrap());

/// Regex for table separator (only contains |, -, :, spaces)
static TABLE_SEP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s|:-]+$").unwrap());

fn is_row(line: &str) -> bool {
    TABLE_ROW_RE.is_match(line)
}

fn is_separator(line: &str) -> bool {
    is_row(line) && TABLE_SEP_RE.is_match(line) && line.contains('-')
}

/// Split a row into trimmed cell texts.
pub fn split_cells(line: &str) -> Vec<String> {
    TABLE_ROW_RE
        .captures(line)
        .map(|caps| caps[1].split('|').map(|c| c.trim().to_string()).collect())
        .unwrap_or_default()
}

/// Replace every table in `text` with a rendered [`Block::Table`].
pub fn split_tables(text: &str, options: RuleOptions, diagnostics: &dyn Diagnostics) -> Vec<Segment> {
    scan_lines(text, |lines, fenced, i| {
        let starts_table = i + 2 < lines.len()
            && !fenced[i..=i + 2].iter().any(|&f| f)
            && is_row(lines[i])
            && !is_separator(lines[i])
            && is_separator(lines[i + 1])
            && is_row(lines[i + 2]);
        if !starts_table {
            return None;
        }

        let mut end = i + 2;
        while end < lines.len() && !fenced[end] && is_row(lines[end]) {
            end += 1;
        }

        let table = build_table(lines[i], &lines[i + 2..end], options, diagnostics);
        Some((end, Segment::Block(table)))
    })
}

fn build_table(
    header: &str,
    body: &[&str],
    options: RuleOptions,
    diagnostics: &dyn Diagnostics,
) -> Block {
    let cell = |text: &str| apply_inline(text, options);
    let header = split_cells(header);
    let width = header.len();

    let rows = body
        .iter()
        .filter_map(|line| {
            let cells = split_cells(line);
            if cells.len() != width {
                diagnostics.debug(&format!(
                    "dropping table row with {} cells, header has {}",
                    cells.len(),
                    width
                ));
                return None;
            }
            Some(cells.iter().map(|c| cell(c.as_str())).collect())
        })
        .collect();

    Block::Table {
        header: header.iter().map(|c| cell(c.as_str())).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afmdocs_core::CollectingDiagnostics;

    fn tables(text: &str) -> Vec<Segment> {
        split_tables(text, RuleOptions::default(), &CollectingDiagnostics::new())
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_cells("  |x|  "), vec!["x"]);
        assert!(split_cells("no pipes").is_empty());
    }

    #[test]
    fn test_separator_detection() {
        assert!(is_separator("|---|---|"));
        assert!(is_separator("| :--- | ---: |"));
        assert!(!is_separator("| a | b |"));
        assert!(!is_separator("| | |"));
    }

    #[test]
    fn test_simple_table() {
        let segments = tables("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            segments,
            vec![Segment::Block(Block::Table {
                header: vec!["A".into(), "B".into()],
                rows: vec![vec!["1".into(), "2".into()]],
            })]
        );
    }

    #[test]
    fn test_mismatched_row_dropped() {
        let diagnostics = CollectingDiagnostics::new();
        let segments = split_tables(
            "| A | B |\n|---|---|\n| 1 | 2 |\n| 1 |\n| 3 | 4 |",
            RuleOptions::default(),
            &diagnostics,
        );
        let Segment::Block(Block::Table { rows, .. }) = &segments[0] else {
            panic!("expected a table, got {:?}", segments);
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["3".to_string(), "4".to_string()]);
        assert_eq!(diagnostics.messages().len(), 1);
    }

    #[test]
    fn test_header_without_body_is_not_table() {
        let segments = tables("| A | B |\n|---|---|");
        assert_eq!(
            segments,
            vec![Segment::Markdown("| A | B |\n|---|---|".into())]
        );
    }

    #[test]
    fn test_surrounding_text_kept() {
        let segments = tables("Intro\n| A |\n|---|\n| 1 |\nOutro");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Markdown("Intro".into()));
        assert_eq!(segments[2], Segment::Markdown("Outro".into()));
    }

    #[test]
    fn test_cells_get_inline_rules_but_not_escaping() {
        let segments = tables("| **A** | <b> |\n|---|---|\n| `x<y` | [l](u) |");
        assert_eq!(
            segments,
            vec![Segment::Block(Block::Table {
                header: vec!["<strong>A</strong>".into(), "<b>".into()],
                rows: vec![vec![
                    "<code>x&lt;y</code>".into(),
                    "<a href=\"u\">l</a>".into()
                ]],
            })]
        );
    }

    #[test]
    fn test_strict_escaping_escapes_cells() {
        let options = RuleOptions {
            escape_text: true,
            escape_link_text: true,
        };
        let segments = split_tables(
            "| <b> |\n|---|\n| a & b |",
            options,
            &CollectingDiagnostics::new(),
        );
        assert_eq!(
            segments,
            vec![Segment::Block(Block::Table {
                header: vec!["&lt;b&gt;".into()],
                rows: vec![vec!["a &amp; b".into()]],
            })]
        );
    }

    #[test]
    fn test_table_inside_fence_ignored() {
        let text = "```\n| A |\n|---|\n| 1 |\n```";
        assert_eq!(tables(text), vec![Segment::Markdown(text.into())]);
    }

    #[test]
    fn test_rows_indented_four_spaces_are_not_a_table() {
        let text = "    | a | b |\n    |---|---|\n    | 1 | 2 |";
        assert_eq!(tables(text), vec![Segment::Markdown(text.into())]);
        assert_eq!(tables("   | a |\n   |---|\n   | 1 |").len(), 1);
        assert!(matches!(
            tables("   | a |\n   |---|\n   | 1 |")[0],
            Segment::Block(Block::Table { .. })
        ));
    }
}
