//! Inline rule engine.
//!
//! A block of text is transformed by an ordered table of rules. Each rule
//! rewrites every match of its pattern before the next rule runs, so the
//! order of [`RULES`] is what resolves overlapping syntax: bold-italic is
//! tried before bold, bold before italic, images before links.
//!
//! Rules flagged `verbatim` (code, images, links) claim their regions in a
//! first pass: the rendered HTML is set aside and a placeholder token takes
//! its place, so no later rule can rewrite code or a URL. Multiline claims
//! run before line claims, which keeps backticks inside a fenced block from
//! being read as inline code. The placeholders are restored once the text
//! rules and the paragraph fallback are done.

use crate::fence::is_blank;
use afmdocs_core::{escape_html, Block, InlineSpan};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// =============================================================================
// Regex patterns
// =============================================================================

/// `#` to `######`, one space, heading text
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6}) (.+)$").unwrap());

/// `***text***` or `___text___`
static BOLD_ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*\*([^*\s](?:.*?[^\s])?)\*\*\*|___([^_\s](?:.*?[^\s])?)___").unwrap()
});

/// `**text**` or `__text__`
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^*\s](?:.*?[^\s])?)\*\*|__([^_\s](?:.*?[^\s])?)__").unwrap()
});

/// `*text*` or `_text_`
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*|_([^_\s](?:[^_]*[^_\s])?)_").unwrap()
});

/// `` `code` ``
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// ```` ```lang ```` through a closing ```` ``` ```` line
static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^```[ \t]*([^\s`]*)[ \t]*\n(.*?)^```[ \t]*$").unwrap()
});

/// Consecutive lines indented by four spaces or a tab
static INDENTED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:(?: {4}|\t)[^\n]*(?:\n|$))+").unwrap());

/// `![alt](url)`
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]*)\)").unwrap());

/// `[text](url)`
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]*)\)").unwrap());

/// A line of three or more `*`, `-` or `_`
static HR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\*{3,}|-{3,}|_{3,})[ \t]*$").unwrap());

/// Opening or closing block-level HTML tag at the start of a line
static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^</?(?:address|article|aside|blockquote|details|div|dl|fieldset|figure|footer|form|h[1-6]|header|hr|main|nav|ol|p|pre|section|table|ul)(?:[\s/>]|$)",
    )
    .unwrap()
});

/// Placeholder for a claimed region
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").unwrap());

const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';

/// Whether a line begins with a block-level HTML tag.
pub fn starts_with_block_tag(line: &str) -> bool {
    BLOCK_TAG_RE.is_match(line.trim_start())
}

// =============================================================================
// Rule table
// =============================================================================

/// How a rule's pattern is applied to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Matched against each line on its own
    Line,
    /// Matched against the whole block; matches may span lines
    Multiline,
    /// The handler receives the whole block
    WholeBlock,
}

/// Kind of output a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Block-level HTML (headings, code blocks, rules, paragraphs)
    Block,
    /// Text-level markup, also applied to list items and table cells
    Inline,
}

type Handler = fn(&Captures<'_>, &str, &mut Pass) -> Option<String>;

enum Action {
    Replace {
        pattern: &'static LazyLock<Regex>,
        handler: Handler,
    },
    Whole(fn(&str, &Pass) -> String),
}

/// A (pattern, handler, scope) entry of the rule table.
pub struct Rule {
    /// Short name, used in diagnostics and tests
    pub name: &'static str,
    pub scope: Scope,
    pub level: Level,
    /// Claims its matches before any text rule runs
    pub verbatim: bool,
    action: Action,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("level", &self.level)
            .field("verbatim", &self.verbatim)
            .finish()
    }
}

/// The rule table, in precedence order.
pub static RULES: [Rule; 11] = [
    Rule {
        name: "heading",
        scope: Scope::Line,
        level: Level::Block,
        verbatim: false,
        action: Action::Replace {
            pattern: &HEADING_RE,
            handler: heading,
        },
    },
    Rule {
        name: "bold_italic",
        scope: Scope::Line,
        level: Level::Inline,
        verbatim: false,
        action: Action::Replace {
            pattern: &BOLD_ITALIC_RE,
            handler: bold_italic,
        },
    },
    Rule {
        name: "bold",
        scope: Scope::Line,
        level: Level::Inline,
        verbatim: false,
        action: Action::Replace {
            pattern: &BOLD_RE,
            handler: bold,
        },
    },
    Rule {
        name: "italic",
        scope: Scope::Line,
        level: Level::Inline,
        verbatim: false,
        action: Action::Replace {
            pattern: &ITALIC_RE,
            handler: italic,
        },
    },
    Rule {
        name: "inline_code",
        scope: Scope::Line,
        level: Level::Inline,
        verbatim: true,
        action: Action::Replace {
            pattern: &INLINE_CODE_RE,
            handler: inline_code,
        },
    },
    Rule {
        name: "fenced_code",
        scope: Scope::Multiline,
        level: Level::Block,
        verbatim: true,
        action: Action::Replace {
            pattern: &FENCED_CODE_RE,
            handler: fenced_code,
        },
    },
    Rule {
        name: "indented_code",
        scope: Scope::Multiline,
        level: Level::Block,
        verbatim: true,
        action: Action::Replace {
            pattern: &INDENTED_CODE_RE,
            handler: indented_code,
        },
    },
    Rule {
        name: "image",
        scope: Scope::Line,
        level: Level::Inline,
        verbatim: true,
        action: Action::Replace {
            pattern: &IMAGE_RE,
            handler: image,
        },
    },
    Rule {
        name: "link",
        scope: Scope::Line,
        level: Level::Inline,
        verbatim: true,
        action: Action::Replace {
            pattern: &LINK_RE,
            handler: link,
        },
    },
    Rule {
        name: "horizontal_rule",
        scope: Scope::Line,
        level: Level::Block,
        verbatim: false,
        action: Action::Replace {
            pattern: &HR_RE,
            handler: horizontal_rule,
        },
    },
    Rule {
        name: "paragraph",
        scope: Scope::WholeBlock,
        level: Level::Block,
        verbatim: false,
        action: Action::Whole(wrap_paragraphs),
    },
];

impl Rule {
    /// Apply this rule to `text`, rewriting every match.
    fn apply(&self, text: &str, pass: &mut Pass) -> String {
        match &self.action {
            Action::Whole(transform) => transform(text, pass),
            Action::Replace { pattern, handler } => match self.scope {
                Scope::Line => {
                    let mut lines = Vec::new();
                    for line in text.split('\n') {
                        lines.push(replace_matches(pattern, *handler, line, pass));
                    }
                    lines.join("\n")
                }
                Scope::Multiline | Scope::WholeBlock => {
                    replace_matches(pattern, *handler, text, pass)
                }
            },
        }
    }
}

fn replace_matches(re: &Regex, handler: Handler, haystack: &str, pass: &mut Pass) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;

    for caps in re.captures_iter(haystack) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&haystack[last..whole.start()]);
        match handler(&caps, haystack, pass) {
            Some(replacement) => out.push_str(&replacement),
            // Rejected match stays literal
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&haystack[last..]);

    out
}

// =============================================================================
// Engine
// =============================================================================

/// Escaping choices for one rule pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleOptions {
    /// Escape plain text before markup is inserted (table cells in strict mode)
    pub escape_text: bool,
    /// Escape the text of links
    pub escape_link_text: bool,
}

/// State of one rule pass: regions claimed by verbatim rules.
struct Pass {
    claimed: Vec<Claimed>,
    options: RuleOptions,
}

struct Claimed {
    html: String,
    block: bool,
}

impl Pass {
    fn new(options: RuleOptions) -> Self {
        Self {
            claimed: Vec::new(),
            options,
        }
    }

    /// Set rendered HTML aside and return the placeholder standing in for it.
    fn claim(&mut self, html: String, block: bool) -> String {
        self.claimed.push(Claimed { html, block });
        format!("{}{}{}", TOKEN_OPEN, self.claimed.len() - 1, TOKEN_CLOSE)
    }

    /// Whether a line is block-level output that must not be wrapped.
    fn is_block_line(&self, line: &str) -> bool {
        let line = line.trim();
        if let Some(caps) = TOKEN_RE.captures(line) {
            if caps.get(0).map(|m| m.as_str().len()) == Some(line.len()) {
                let index = caps[1].parse::<usize>().ok();
                return index
                    .and_then(|i| self.claimed.get(i))
                    .is_some_and(|c| c.block);
            }
        }
        starts_with_block_tag(line)
    }

    /// Claim every placeholder delimiter already present in the input, so
    /// literal text can never be mistaken for a placeholder.
    fn protect_delimiters(&mut self, text: &str) -> String {
        if !text.contains([TOKEN_OPEN, TOKEN_CLOSE]) {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if c == TOKEN_OPEN || c == TOKEN_CLOSE {
                out.push_str(&self.claim(c.to_string(), false));
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Put every claimed region back in place of its placeholder.
    ///
    /// A claimed region only refers to regions claimed before it, so the
    /// recursion always terminates.
    fn restore(&self, text: &str) -> String {
        if !text.contains(TOKEN_OPEN) {
            return text.to_string();
        }
        TOKEN_RE
            .replace_all(text, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.claimed.get(i))
                    .map(|c| self.restore(&c.html))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// The verbatim rules in the order they claim: multiline before line.
fn claiming_rules(level: Option<Level>) -> Vec<&'static Rule> {
    let mut rules: Vec<&Rule> = RULES
        .iter()
        .filter(|r| r.verbatim && level.map_or(true, |l| r.level == l))
        .collect();
    rules.sort_by_key(|r| r.scope != Scope::Multiline);
    rules
}

/// Apply the full rule table to one block of text.
///
/// # Example
///
/// ```
/// use afmdocs_parser::inline::{apply_rules, RuleOptions};
///
/// let html = apply_rules("# Title\nSome **bold** text", RuleOptions::default());
/// assert_eq!(html, "<h1>Title</h1>\n<p>Some <strong>bold</strong> text</p>");
/// ```
pub fn apply_rules(text: &str, options: RuleOptions) -> String {
    let mut pass = Pass::new(options);
    let mut text = pass.protect_delimiters(text);

    for rule in claiming_rules(None) {
        text = rule.apply(&text, &mut pass);
    }
    if options.escape_text {
        text = escape_html(&text);
    }
    for rule in RULES.iter().filter(|r| !r.verbatim) {
        text = rule.apply(&text, &mut pass);
    }

    pass.restore(&text)
}

/// Apply only the text-level rules (code, images, links, emphasis).
///
/// Used for list items and table cells, which are never headings or
/// paragraphs of their own.
pub fn apply_inline(text: &str, options: RuleOptions) -> String {
    let mut pass = Pass::new(options);
    let mut text = pass.protect_delimiters(text);

    for rule in claiming_rules(Some(Level::Inline)) {
        text = rule.apply(&text, &mut pass);
    }
    if options.escape_text {
        text = escape_html(&text);
    }
    for rule in RULES
        .iter()
        .filter(|r| !r.verbatim && r.level == Level::Inline)
    {
        text = rule.apply(&text, &mut pass);
    }

    pass.restore(&text)
}

/// Apply only the emphasis rules.
fn apply_emphasis(text: &str, pass: &mut Pass) -> String {
    let mut text = text.to_string();
    for rule in RULES
        .iter()
        .filter(|r| !r.verbatim && r.level == Level::Inline)
    {
        text = rule.apply(&text, pass);
    }
    text
}

// =============================================================================
// Handlers
// =============================================================================

fn heading(caps: &Captures<'_>, _line: &str, _pass: &mut Pass) -> Option<String> {
    let level = caps[1].len() as u8;
    let text = caps[2].trim().to_string();
    Some(Block::Heading { level, text }.to_html())
}

/// Content of whichever alternative matched, or `None` when an underscore
/// delimiter sits inside a word.
fn emphasis_content<'h>(caps: &Captures<'h>, haystack: &str) -> Option<&'h str> {
    if let Some(star) = caps.get(1) {
        return Some(star.as_str());
    }
    let underscore = caps.get(2)?;
    let whole = caps.get(0)?;
    let before = haystack[..whole.start()].chars().next_back();
    let after = haystack[whole.end()..].chars().next();
    if before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric) {
        return None;
    }
    Some(underscore.as_str())
}

fn bold_italic(caps: &Captures<'_>, line: &str, _pass: &mut Pass) -> Option<String> {
    let content = emphasis_content(caps, line)?;
    Some(InlineSpan::BoldItalic(content.to_string()).to_html())
}

fn bold(caps: &Captures<'_>, line: &str, _pass: &mut Pass) -> Option<String> {
    let content = emphasis_content(caps, line)?;
    Some(InlineSpan::Bold(content.to_string()).to_html())
}

fn italic(caps: &Captures<'_>, line: &str, _pass: &mut Pass) -> Option<String> {
    let content = emphasis_content(caps, line)?;
    Some(InlineSpan::Italic(content.to_string()).to_html())
}

fn inline_code(caps: &Captures<'_>, _line: &str, pass: &mut Pass) -> Option<String> {
    let html = InlineSpan::InlineCode(caps[1].to_string()).to_html();
    Some(pass.claim(html, false))
}

fn fenced_code(caps: &Captures<'_>, _block: &str, pass: &mut Pass) -> Option<String> {
    let lang = Some(&caps[1]).filter(|l| !l.is_empty()).map(String::from);
    let code = caps[2].strip_suffix('\n').unwrap_or(&caps[2]).to_string();
    let html = Block::FencedCodeBlock { lang, code }.to_html();
    Some(pass.claim(html, true))
}

fn indented_code(caps: &Captures<'_>, _block: &str, pass: &mut Pass) -> Option<String> {
    let matched = &caps[0];
    let lines: Vec<&str> = matched
        .strip_suffix('\n')
        .unwrap_or(matched)
        .split('\n')
        .map(|line| {
            line.strip_prefix("    ")
                .or_else(|| line.strip_prefix('\t'))
                .unwrap_or(line)
        })
        .collect();

    let start = lines.iter().position(|l| !is_blank(l))?;
    let end = lines.iter().rposition(|l| !is_blank(l))?;
    let code = lines[start..=end].join("\n");

    let mut replacement = pass.claim(Block::IndentedCodeBlock { code }.to_html(), true);
    if matched.ends_with('\n') {
        replacement.push('\n');
    }
    Some(replacement)
}

fn image(caps: &Captures<'_>, _line: &str, pass: &mut Pass) -> Option<String> {
    let html = InlineSpan::Image {
        alt: caps[1].to_string(),
        url: caps[2].to_string(),
    }
    .to_html();
    Some(pass.claim(html, false))
}

fn link(caps: &Captures<'_>, _line: &str, pass: &mut Pass) -> Option<String> {
    let text = if pass.options.escape_link_text {
        escape_html(&caps[1])
    } else {
        caps[1].to_string()
    };
    let text = apply_emphasis(&text, pass);
    let html = InlineSpan::Link {
        text,
        url: caps[2].to_string(),
    }
    .to_html();
    Some(pass.claim(html, false))
}

fn horizontal_rule(_caps: &Captures<'_>, _line: &str, _pass: &mut Pass) -> Option<String> {
    Some(Block::HorizontalRule.to_html())
}

/// Wrap each run of lines that is not block-level output in `<p>`.
fn wrap_paragraphs(text: &str, pass: &Pass) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    fn flush(run: &mut Vec<&str>, out: &mut Vec<String>) {
        let body = run.join("\n");
        let body = body.trim();
        if !body.is_empty() {
            out.push(
                Block::Paragraph {
                    text: body.to_string(),
                }
                .to_html(),
            );
        }
        run.clear();
    }

    for line in text.split('\n') {
        if pass.is_block_line(line) {
            flush(&mut run, &mut out);
            out.push(line.trim().to_string());
        } else if is_blank(line) {
            flush(&mut run, &mut out);
        } else {
            run.push(line);
        }
    }
    flush(&mut run, &mut out);

    out.join("\n")
}
