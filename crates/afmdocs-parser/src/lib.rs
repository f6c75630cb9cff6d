//! afmdocs Parser
//!
//! A rule-driven Markdown to HTML engine. Conversion is a fixed sequence
//! of passes rather than a single grammar:
//!
//! 1. Block pre-processors (tables, blockquotes, ordered lists, unordered
//!    lists) recognize multi-line constructs in the whole document and
//!    resolve them before anything else can read their text as prose.
//! 2. The remaining text is split into blocks on blank lines.
//! 3. Each block is passed through (finished HTML, horizontal rules) or
//!    run through the [inline rule table](inline::RULES).
//! 4. Rendered blocks are joined with one blank line, in source order.
//!
//! # Example
//!
//! ```
//! use afmdocs_parser::MarkdownProcessor;
//!
//! let processor = MarkdownProcessor::new();
//! let html = processor.process("# Hello\n\nSome *text*.");
//! assert_eq!(html, "<h1>Hello</h1>\n\n<p>Some <em>text</em>.</p>");
//! ```

pub mod fence;
pub mod inline;
pub mod list;
pub mod quote;
pub mod segment;
pub mod table;

pub use inline::{apply_inline, apply_rules, Rule, RuleOptions, Scope, RULES};
pub use list::ListKind;
pub use segment::Segment;

use afmdocs_core::{default_diagnostics, escape_html, AfmdocsError, Block, Diagnostics, Result};
use fence::split_blocks;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Regex for a block that is nothing but a horizontal rule
static HR_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:\*{3,}|-{3,}|_{3,})[ \t]*$").unwrap());

/// Default maximum blockquote nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Deepest blockquote nesting rendered before giving up
    pub max_depth: usize,
    /// Escape table cell text and link text, which are emitted raw otherwise
    pub strict_escaping: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_escaping: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Failed blocks degrade to literal text
    Lenient,
    /// The first failure is returned
    Strict,
}

/// The conversion engine.
///
/// Holds only its options and a diagnostics handle; every call to
/// [`process`](Self::process) is independent of the others.
pub struct MarkdownProcessor {
    options: Options,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MarkdownProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownProcessor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl MarkdownProcessor {
    /// Create a processor with default options, logging through `log`.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a processor with specific options.
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            diagnostics: default_diagnostics(),
        }
    }

    /// Replace the diagnostics sink.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Convert Markdown to an HTML fragment.
    ///
    /// Never fails: a block that cannot be rendered is emitted as its
    /// escaped source text and a warning is reported.
    pub fn process(&self, text: &str) -> String {
        let text = normalize_newlines(text);
        match self.render_fragment(&text, 0, Mode::Lenient) {
            Ok(html) => html,
            Err(e) => {
                self.diagnostics.warn(&format!("rendering document as text: {}", e));
                Block::Paragraph {
                    text: escape_html(&text),
                }
                .to_html()
            }
        }
    }

    /// Convert Markdown to an HTML fragment, returning the first failure.
    ///
    /// # Example
    ///
    /// ```
    /// use afmdocs_core::AfmdocsError;
    /// use afmdocs_parser::{MarkdownProcessor, Options};
    ///
    /// let processor = MarkdownProcessor::with_options(Options {
    ///     max_depth: 1,
    ///     ..Options::default()
    /// });
    /// assert!(processor.try_process("> one level").is_ok());
    /// assert!(matches!(
    ///     processor.try_process("> > two levels"),
    ///     Err(AfmdocsError::RecursionLimitExceeded { limit: 1 })
    /// ));
    /// ```
    pub fn try_process(&self, text: &str) -> Result<String> {
        self.render_fragment(&normalize_newlines(text), 0, Mode::Strict)
    }

    /// Read a Markdown file, convert it, and write the HTML fragment.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<()> {
        let text = std::fs::read_to_string(input).map_err(|e| AfmdocsError::read(input, e))?;
        let html = self.process(&text);
        std::fs::write(output, html).map_err(|e| AfmdocsError::write(output, e))?;
        self.diagnostics.debug(&format!(
            "converted {} -> {}",
            input.display(),
            output.display()
        ));
        Ok(())
    }

    fn rule_options(&self) -> RuleOptions {
        RuleOptions {
            escape_text: false,
            escape_link_text: self.options.strict_escaping,
        }
    }

    fn cell_options(&self) -> RuleOptions {
        RuleOptions {
            escape_text: self.options.strict_escaping,
            escape_link_text: self.options.strict_escaping,
        }
    }

    /// Run the four block pre-processors in order.
    fn preprocess(&self, text: &str) -> Vec<Segment> {
        let diagnostics = self.diagnostics.as_ref();
        let cells = self.cell_options();
        let rules = self.rule_options();

        let segments = vec![Segment::Markdown(text.to_string())];
        let segments = segment::expand(segments, |t| table::split_tables(t, cells, diagnostics));
        let segments = segment::expand(segments, quote::split_quotes);
        let segments = segment::expand(segments, |t| {
            list::split_lists(t, ListKind::Ordered, rules)
        });
        segment::expand(segments, |t| list::split_lists(t, ListKind::Unordered, rules))
    }

    /// Render `text` found at blockquote nesting `depth`.
    fn render_fragment(&self, text: &str, depth: usize, mode: Mode) -> Result<String> {
        let mut rendered = Vec::new();

        for segment in self.preprocess(text) {
            match segment {
                Segment::Markdown(markdown) => {
                    for block in split_blocks(&markdown) {
                        rendered.push(self.render_block(&block));
                    }
                }
                Segment::Block(block) => rendered.push(block.to_html()),
                Segment::Quote { source, body } => match self.render_quote(&body, depth, mode) {
                    Ok(html) => rendered.push(html),
                    Err(e) if mode == Mode::Lenient => {
                        self.diagnostics
                            .warn(&format!("rendering blockquote as text: {}", e));
                        rendered.push(
                            Block::Paragraph {
                                text: escape_html(&source),
                            }
                            .to_html(),
                        );
                    }
                    Err(e) => return Err(e),
                },
            }
        }

        Ok(rendered.join("\n\n"))
    }

    fn render_quote(&self, body: &str, depth: usize, mode: Mode) -> Result<String> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(AfmdocsError::RecursionLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        let inner = self.render_fragment(body, depth, mode)?;
        Ok(Block::BlockQuote { inner }.to_html())
    }

    /// Route one blank-line-delimited block.
    fn render_block(&self, text: &str) -> String {
        if HR_BLOCK_RE.is_match(text) {
            return Block::HorizontalRule.to_html();
        }
        let first_line = text.lines().next().unwrap_or("");
        if inline::starts_with_block_tag(first_line) {
            return Block::RawHtml {
                text: text.to_string(),
            }
            .to_html();
        }
        apply_rules(text, self.rule_options())
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Convert Markdown with a default [`MarkdownProcessor`].
///
/// # Example
///
/// ```
/// assert_eq!(afmdocs_parser::process("# Title"), "<h1>Title</h1>");
/// ```
pub fn process(text: &str) -> String {
    MarkdownProcessor::new().process(text)
}
