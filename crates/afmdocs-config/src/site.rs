//! Typed view of the keys the site builder consumes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one site build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Directory holding the Markdown sources
    pub docs_dir: PathBuf,

    /// Directory the HTML pages are written to
    pub site_dir: PathBuf,

    /// Directory holding `base.html`; the built-in template is used without one
    #[serde(default)]
    pub theme_dir: Option<PathBuf>,

    /// Substituted for `${site_name}` in templates
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Source file rendered as the site's `index.html`
    #[serde(default = "default_homepage")]
    pub homepage: String,

    /// Engine settings
    #[serde(default)]
    pub markdown: MarkdownSettings,
}

/// The `[markdown]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownSettings {
    /// Deepest blockquote nesting rendered
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Escape table cells and link text
    #[serde(default)]
    pub strict_escaping: bool,
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            strict_escaping: false,
        }
    }
}

fn default_site_name() -> String {
    "Documentation".to_string()
}

fn default_homepage() -> String {
    "homepage.md".to_string()
}

fn default_max_depth() -> usize {
    32
}

impl SiteSettings {
    /// Make relative directories relative to `base` (the config file's directory).
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.docs_dir = resolve(self.docs_dir);
        self.site_dir = resolve(self.site_dir);
        self.theme_dir = self.theme_dir.map(resolve);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_keys() {
        let settings: SiteSettings = toml::from_str(
            r#"
            docs_dir = "docs"
            site_dir = "site"
            "#,
        )
        .unwrap();
        assert_eq!(settings.homepage, "homepage.md");
        assert_eq!(settings.site_name, "Documentation");
        assert_eq!(settings.theme_dir, None);
        assert_eq!(settings.markdown, MarkdownSettings::default());
    }

    #[test]
    fn test_resolve_paths() {
        let settings = SiteSettings {
            docs_dir: PathBuf::from("docs"),
            site_dir: PathBuf::from("/abs/site"),
            theme_dir: Some(PathBuf::from("theme")),
            site_name: default_site_name(),
            homepage: default_homepage(),
            markdown: MarkdownSettings::default(),
        }
        .resolve_paths(Path::new("/project"));

        assert_eq!(settings.docs_dir, PathBuf::from("/project/docs"));
        assert_eq!(settings.site_dir, PathBuf::from("/abs/site"));
        assert_eq!(settings.theme_dir, Some(PathBuf::from("/project/theme")));
    }
}
