//! Command-line interface for afmdocs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// afmdocs - A small Markdown-to-HTML documentation site generator.
///
/// Converts a directory of Markdown files into a static HTML site, or a
/// single document into an HTML fragment.
#[derive(Parser, Debug)]
#[command(
    name = "afmdocs",
    version,
    about = "A small Markdown-to-HTML documentation site generator",
    after_help = "Examples:\n  \
                  afmdocs build\n  \
                  afmdocs build -c docs/afmdocs.toml\n  \
                  afmdocs convert README.md -o README.html\n  \
                  cat notes.md | afmdocs convert --strict-escaping"
)]
pub struct Cli {
    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "loglevel", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the site described by a configuration file
    Build {
        /// Configuration file
        #[arg(short = 'c', long = "config", default_value = afmdocs_config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },

    /// Convert one Markdown document to an HTML fragment
    Convert {
        /// Input file (reads from stdin if not provided or "-")
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Output file (writes to stdout if not provided)
        #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Deepest blockquote nesting rendered
        #[arg(long = "max-depth", default_value_t = afmdocs_parser::DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Escape table cells and link text
        #[arg(long = "strict-escaping")]
        strict_escaping: bool,
    },
}

impl Command {
    /// The input file of a `convert`, if it names one.
    pub fn input_file(&self) -> Option<&PathBuf> {
        match self {
            Command::Convert {
                input: Some(path), ..
            } if path.as_os_str() != "-" => Some(path),
            _ => None,
        }
    }
}
