//! afmdocs - A small Markdown-to-HTML documentation site generator.
//!
//! This binary provides the CLI interface: `build` turns a docs directory
//! into a site, `convert` turns one document into an HTML fragment.

mod cli;

use afmdocs_config::Config;
use afmdocs_core::{default_diagnostics, AfmdocsError, Result};
use afmdocs_parser::{MarkdownProcessor, Options};
use afmdocs_render::SiteBuilder;
use clap::Parser as ClapParser;
use cli::{Cli, Command};
use log::{debug, error, info, LevelFilter};
use std::io::{self, Read, Write};
use std::path::Path;

fn main() {
    let cli = <Cli as ClapParser>::parse();

    // Set up logging
    setup_logging(&cli.log_level);
    info!("afmdocs v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Set up logging based on the log level argument.
fn setup_logging(level: &str) {
    env_logger::Builder::new()
        .filter_level(level_filter(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    }
}

/// Main application logic.
fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Build { config } => run_build(config),
        Command::Convert {
            output,
            max_depth,
            strict_escaping,
            ..
        } => {
            let options = Options {
                max_depth: *max_depth,
                strict_escaping: *strict_escaping,
            };
            run_convert(cli.command.input_file().map(|p| p.as_path()), output.as_deref(), options)
        }
    }
}

/// Build the whole site.
fn run_build(config_path: &Path) -> Result<()> {
    let config = Config::load_from(config_path)?;
    let settings = config.settings()?;
    debug!("Loaded settings: {:?}", settings);

    let builder = SiteBuilder::new(settings, default_diagnostics())?;
    let report = builder.build()?;
    println!(
        "Built {} page(s) into {}",
        report.pages.len(),
        builder.settings().site_dir.display()
    );
    Ok(())
}

/// Convert one document.
fn run_convert(input: Option<&Path>, output: Option<&Path>, options: Options) -> Result<()> {
    let processor = MarkdownProcessor::with_options(options);

    match (input, output) {
        (Some(input), Some(output)) => {
            info!("Converting {} to {}", input.display(), output.display());
            processor.process_file(input, output)
        }
        (input, output) => {
            let markdown = match input {
                Some(path) => {
                    std::fs::read_to_string(path).map_err(|e| AfmdocsError::read(path, e))?
                }
                None => {
                    info!("Reading from stdin");
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };

            let html = processor.process(&markdown);
            match output {
                Some(path) => {
                    std::fs::write(path, html).map_err(|e| AfmdocsError::write(path, e))?
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    writeln!(stdout, "{}", html)?;
                    stdout.flush()?;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("DEBUG"), LevelFilter::Debug);
        assert_eq!(level_filter("error"), LevelFilter::Error);
        assert_eq!(level_filter("nonsense"), LevelFilter::Warn);
    }

    #[test]
    fn test_run_convert_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.md");
        let output = dir.path().join("out.html");
        std::fs::write(&input, "# Title\n\n- a\n- b").unwrap();

        run_convert(Some(&input), Some(&output), Options::default()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "<h1>Title</h1>\n\n<ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_run_build_missing_config() {
        let err = run_build(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, AfmdocsError::ConfigNotFound(_)));
    }
}
