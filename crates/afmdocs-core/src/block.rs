//! Document model.
//!
//! A document is an ordered sequence of [`Block`]s. Text inside a block is
//! rewritten into [`InlineSpan`]s by the inline rules. Both types know how
//! to render themselves as HTML; text fields hold content that has already
//! been through the inline rules, so only code, URLs and alt text are
//! escaped here.

use crate::escape::escape_html;

/// A top-level structural unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#`-prefixed heading, level 1 to 6
    Heading { level: u8, text: String },
    /// Plain prose
    Paragraph { text: String },
    /// Code between ``` fences, with an optional info string
    FencedCodeBlock { lang: Option<String>, code: String },
    /// Code indented by four spaces or a tab
    IndentedCodeBlock { code: String },
    /// Quoted content, already rendered
    BlockQuote { inner: String },
    /// Numbered list items, rendered in source order
    OrderedList { items: Vec<String> },
    /// Bulleted list items
    UnorderedList { items: Vec<String> },
    /// Pipe table; every row has as many cells as the header
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// `---`, `***` or `___` on a line of its own
    HorizontalRule,
    /// Finished HTML, emitted untouched
    RawHtml { text: String },
}

impl Block {
    /// Render this block as an HTML fragment.
    ///
    /// # Example
    ///
    /// ```
    /// use afmdocs_core::Block;
    ///
    /// let block = Block::Heading { level: 2, text: "Setup".into() };
    /// assert_eq!(block.to_html(), "<h2>Setup</h2>");
    /// ```
    pub fn to_html(&self) -> String {
        match self {
            Block::Heading { level, text } => {
                let level = (*level).clamp(1, 6);
                format!("<h{level}>{text}</h{level}>")
            }
            Block::Paragraph { text } => format!("<p>{}</p>", text),
            Block::FencedCodeBlock { lang, code } => format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                escape_html(lang.as_deref().unwrap_or("")),
                escape_html(code)
            ),
            Block::IndentedCodeBlock { code } => {
                format!("<pre><code>{}</code></pre>", escape_html(code))
            }
            Block::BlockQuote { inner } => format!("<blockquote>{}</blockquote>", inner),
            Block::OrderedList { items } => format!("<ol>{}</ol>", list_items(items)),
            Block::UnorderedList { items } => format!("<ul>{}</ul>", list_items(items)),
            Block::Table { header, rows } => {
                let mut html = String::from("<table><thead><tr>");
                for cell in header {
                    html.push_str(&format!("<th>{}</th>", cell));
                }
                html.push_str("</tr></thead><tbody>");
                for row in rows {
                    html.push_str("<tr>");
                    for cell in row {
                        html.push_str(&format!("<td>{}</td>", cell));
                    }
                    html.push_str("</tr>");
                }
                html.push_str("</tbody></table>");
                html
            }
            Block::HorizontalRule => "<hr>".to_string(),
            Block::RawHtml { text } => text.clone(),
        }
    }
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", item))
        .collect()
}

/// Text-level markup within a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    /// Plain text, emitted as-is
    Text(String),
    /// `**text**` or `__text__`
    Bold(String),
    /// `*text*` or `_text_`
    Italic(String),
    /// `***text***` or `___text___`
    BoldItalic(String),
    /// `` `code` ``
    InlineCode(String),
    /// `[text](url)`
    Link { text: String, url: String },
    /// `![alt](url)`
    Image { alt: String, url: String },
}

impl InlineSpan {
    /// Render this span as HTML.
    ///
    /// # Example
    ///
    /// ```
    /// use afmdocs_core::InlineSpan;
    ///
    /// let code = InlineSpan::InlineCode("a<b".into());
    /// assert_eq!(code.to_html(), "<code>a&lt;b</code>");
    /// ```
    pub fn to_html(&self) -> String {
        match self {
            InlineSpan::Text(text) => text.clone(),
            InlineSpan::Bold(text) => format!("<strong>{}</strong>", text),
            InlineSpan::Italic(text) => format!("<em>{}</em>", text),
            InlineSpan::BoldItalic(text) => format!("<strong><em>{}</em></strong>", text),
            InlineSpan::InlineCode(code) => format!("<code>{}</code>", escape_html(code)),
            InlineSpan::Link { text, url } => {
                format!("<a href=\"{}\">{}</a>", escape_html(url), text)
            }
            InlineSpan::Image { alt, url } => format!(
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(url),
                escape_html(alt)
            ),
        }
    }
}
