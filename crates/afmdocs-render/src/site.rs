//! Site building.
//!
//! Every `*.md` file below `docs_dir` becomes an HTML page at the same
//! relative path below `site_dir`. The configured homepage becomes
//! `index.html`.

use crate::template::TemplateEngine;
use afmdocs_config::SiteSettings;
use afmdocs_core::{AfmdocsError, Diagnostics, Result};
use afmdocs_parser::fence::fence_mask;
use afmdocs_parser::{MarkdownProcessor, Options};
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

/// Regex for the first level-1 heading, used as the page title
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^# \s*(.+?)\s*$").unwrap());

/// One generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub source: PathBuf,
    pub output: PathBuf,
    pub title: String,
}

/// What a build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: Vec<Page>,
}

/// Builds a whole site from a docs directory.
pub struct SiteBuilder {
    settings: SiteSettings,
    processor: MarkdownProcessor,
    templates: TemplateEngine,
    diagnostics: Arc<dyn Diagnostics>,
}

impl SiteBuilder {
    /// Prepare a build: set up the engine and load the theme template.
    pub fn new(settings: SiteSettings, diagnostics: Arc<dyn Diagnostics>) -> Result<Self> {
        let processor = MarkdownProcessor::with_options(Options {
            max_depth: settings.markdown.max_depth,
            strict_escaping: settings.markdown.strict_escaping,
        })
        .with_diagnostics(diagnostics.clone());
        let templates =
            TemplateEngine::new(settings.theme_dir.as_deref(), &settings.site_name, &diagnostics)?;

        Ok(Self {
            settings,
            processor,
            templates,
            diagnostics,
        })
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// All Markdown sources below `docs_dir`, in sorted order.
    pub fn sources(&self) -> Result<Vec<PathBuf>> {
        let docs_dir = &self.settings.docs_dir;
        if !docs_dir.is_dir() {
            return Err(AfmdocsError::read(
                docs_dir,
                io::Error::new(io::ErrorKind::NotFound, "docs directory not found"),
            ));
        }

        let pattern = format!(
            "{}/**/*.md",
            glob::Pattern::escape(&docs_dir.to_string_lossy())
        );
        let entries = glob::glob(&pattern)
            .map_err(|e| AfmdocsError::Pattern(format!("{}: {}", pattern, e)))?;

        let mut sources = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => sources.push(path),
                Ok(_) => {}
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(AfmdocsError::read(path, e.into()));
                }
            }
        }
        sources.sort();

        Ok(sources)
    }

    /// Where the page for `source` is written.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let relative = source
            .strip_prefix(&self.settings.docs_dir)
            .unwrap_or(source);
        if relative == Path::new(&self.settings.homepage) {
            self.settings.site_dir.join("index.html")
        } else {
            self.settings.site_dir.join(relative).with_extension("html")
        }
    }

    /// Convert, frame and write one page.
    pub fn build_page(&self, source: &Path) -> Result<Page> {
        let markdown =
            std::fs::read_to_string(source).map_err(|e| AfmdocsError::read(source, e))?;
        let fallback = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = page_title(&markdown, &fallback);

        let content = self.processor.process(&markdown);
        let page = self.templates.render_page(&content, &title);

        let output = self.output_path(source);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AfmdocsError::write(parent, e))?;
        }
        std::fs::write(&output, page).map_err(|e| AfmdocsError::write(&output, e))?;

        self.diagnostics.debug(&format!(
            "wrote {} from {}",
            output.display(),
            source.display()
        ));

        Ok(Page {
            source: source.to_path_buf(),
            output,
            title,
        })
    }

    /// Build every page.
    pub fn build(&self) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        for source in self.sources()? {
            report.pages.push(self.build_page(&source)?);
        }
        Ok(report)
    }
}

/// Title of a page: its first level-1 heading outside code fences, else
/// `fallback`.
///
/// # Example
///
/// ```
/// use afmdocs_render::page_title;
///
/// assert_eq!(page_title("intro\n# Getting Started\n", "x"), "Getting Started");
/// assert_eq!(page_title("## Only h2", "setup"), "setup");
/// ```
pub fn page_title(markdown: &str, fallback: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let fenced = fence_mask(&lines);
    lines
        .iter()
        .zip(fenced)
        .filter(|(_, in_fence)| !in_fence)
        .find_map(|(line, _)| TITLE_RE.captures(line).map(|caps| caps[1].to_string()))
        .unwrap_or_else(|| fallback.to_string())
}
