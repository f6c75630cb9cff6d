//! Page templates.
//!
//! A template is an HTML page with `${title}`, `${content}` and
//! `${site_name}` placeholders. The theme's `base.html` is used when it
//! exists; otherwise a built-in page is used and a warning is reported.

use afmdocs_core::{escape_html, AfmdocsError, Diagnostics, Result};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Regex for `${name}` placeholders
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// File name of the base template inside a theme directory.
pub const BASE_TEMPLATE: &str = "base.html";

/// Page used when the theme provides none.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>${title} - ${site_name}</title>
</head>
<body>
<header><a href="index.html">${site_name}</a></header>
<main>
${content}
</main>
</body>
</html>
"#;

/// Frames converted fragments as complete pages.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    template: String,
    site_name: String,
}

impl TemplateEngine {
    /// Load `base.html` from `theme_dir`, or fall back to the built-in page.
    ///
    /// A missing directory or file is not an error; a file that exists but
    /// cannot be read is.
    pub fn new(
        theme_dir: Option<&Path>,
        site_name: &str,
        diagnostics: &Arc<dyn Diagnostics>,
    ) -> Result<Self> {
        let template = match theme_dir.map(|dir| dir.join(BASE_TEMPLATE)) {
            Some(path) if path.is_file() => {
                std::fs::read_to_string(&path).map_err(|e| AfmdocsError::read(&path, e))?
            }
            Some(path) => {
                diagnostics.warn(&format!(
                    "theme template {} not found, using the default template",
                    path.display()
                ));
                DEFAULT_TEMPLATE.to_string()
            }
            None => {
                diagnostics.warn("no theme_dir configured, using the default template");
                DEFAULT_TEMPLATE.to_string()
            }
        };

        Ok(Self::from_template(template, site_name))
    }

    /// Build an engine around template text.
    pub fn from_template(template: impl Into<String>, site_name: &str) -> Self {
        Self {
            template: template.into(),
            site_name: site_name.to_string(),
        }
    }

    /// The template text in use.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute a page's placeholders.
    ///
    /// Substitution is a single pass: `${...}` sequences inside the
    /// substituted values are left as they are. Unknown placeholders stay
    /// literal.
    ///
    /// # Example
    ///
    /// ```
    /// use afmdocs_render::TemplateEngine;
    ///
    /// let engine = TemplateEngine::from_template("<h1>${title}</h1>${content}", "Site");
    /// assert_eq!(engine.render_page("<p>x</p>", "A & B"), "<h1>A &amp; B</h1><p>x</p>");
    /// ```
    pub fn render_page(&self, html_content: &str, title: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.template, |caps: &Captures<'_>| match &caps[1] {
                "title" => escape_html(title),
                "content" => html_content.to_string(),
                "site_name" => escape_html(&self.site_name),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}
