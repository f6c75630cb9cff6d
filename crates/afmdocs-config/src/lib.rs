//! afmdocs Config
//!
//! This crate handles configuration loading and management
//! for afmdocs, reading a TOML file (by default `afmdocs.toml`).
//!
//! # Overview
//!
//! Values from the file are layered over built-in defaults, key by key.
//! A missing configuration file is an error: defaults only fill in keys
//! of a file that exists. Callers that want defaults alone ask for them
//! explicitly with [`Config::default()`].
//!
//! # Example
//!
//! ```no_run
//! use afmdocs_config::Config;
//! use std::path::Path;
//!
//! let config = Config::load_from(Path::new("afmdocs.toml")).unwrap();
//! let settings = config.settings().unwrap();
//! println!("building {}", settings.site_name);
//! ```

mod site;

pub use site::{MarkdownSettings, SiteSettings};

use afmdocs_core::{AfmdocsError, Result};
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "afmdocs.toml";

/// Default TOML configuration string.
const DEFAULT_TOML: &str = r#"site_name = "Documentation"
homepage  = "homepage.md"

[markdown]
max_depth       = 32
strict_escaping = false
"#;

/// A loaded configuration: a TOML table plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    values: Table,
    source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        // Parse the default TOML to ensure consistency
        let values = DEFAULT_TOML
            .parse::<Table>()
            .expect("Default TOML should be valid");
        Self {
            values,
            source: None,
        }
    }
}

impl Config {
    /// Returns the default TOML configuration string.
    ///
    /// # Example
    ///
    /// ```
    /// use afmdocs_config::Config;
    /// let toml = Config::default_toml();
    /// assert!(toml.contains("homepage"));
    /// assert!(toml.contains("[markdown]"));
    /// ```
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }

    /// Load configuration from a specific path, layered over the defaults.
    ///
    /// Fails with [`AfmdocsError::ConfigNotFound`] if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AfmdocsError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| AfmdocsError::read(path, e))?;
        let mut config = Self::parse(&content, &path.display().to_string())?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration from TOML text, layered over the defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use afmdocs_config::Config;
    ///
    /// let config = Config::from_toml_str("site_name = \"Handbook\"").unwrap();
    /// assert_eq!(config.get_str_or("site_name", "?"), "Handbook");
    /// assert_eq!(config.get_str_or("homepage", "?"), "homepage.md");
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, "<string>")
    }

    fn parse(text: &str, origin: &str) -> Result<Self> {
        let values = text
            .parse::<Table>()
            .map_err(|e| AfmdocsError::ConfigParse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        let mut config = Self::default();
        config.merge(&Config {
            values,
            source: None,
        });
        Ok(config)
    }

    /// Merge another config into this one.
    ///
    /// Values from `other` take precedence. Nested tables are merged key
    /// by key rather than replaced.
    pub fn merge(&mut self, other: &Config) {
        merge_tables(&mut self.values, &other.values);
        if other.source.is_some() {
            self.source.clone_from(&other.source);
        }
    }

    /// The file this configuration was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Look up a key. Dotted keys reach into tables: `markdown.max_depth`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        parts.try_fold(self.values.get(first)?, |value, part| {
            value.as_table()?.get(part)
        })
    }

    /// Look up a string value, falling back to `default`.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Look up a key that must be present.
    pub fn require(&self, key: &str) -> Result<&Value> {
        self.get(key)
            .ok_or_else(|| AfmdocsError::KeyNotFound(key.to_string()))
    }

    /// Look up a string key that must be present.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| AfmdocsError::InvalidValue {
                key: key.to_string(),
                expected: "a string",
            })
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Typed settings for a site build.
    ///
    /// `docs_dir` and `site_dir` are required. Relative directories are
    /// taken relative to the configuration file.
    pub fn settings(&self) -> Result<SiteSettings> {
        self.require_str("docs_dir")?;
        self.require_str("site_dir")?;

        let settings: SiteSettings = Value::Table(self.values.clone())
            .try_into()
            .map_err(|e: toml::de::Error| AfmdocsError::ConfigParse {
                path: self
                    .source
                    .as_ref()
                    .map_or_else(|| "<string>".to_string(), |p| p.display().to_string()),
                message: e.to_string(),
            })?;

        let base = self
            .source
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        Ok(settings.resolve_paths(base))
    }
}

fn merge_tables(base: &mut Table, other: &Table) {
    for (key, value) in other {
        match (base.get_mut(key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
