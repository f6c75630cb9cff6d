//! Integration tests for afmdocs.
//!
//! These tests drive the public API and the `afmdocs` binary end to end:
//! whole documents through the engine, and whole sites from a
//! configuration file.

use std::fs;
use std::path::Path;
use std::process::Command;

use afmdocs_config::Config;
use afmdocs_core::{AfmdocsError, CollectingDiagnostics};
use afmdocs_parser::{MarkdownProcessor, Options};
use afmdocs_render::SiteBuilder;

/// Write a small docs project into `root` and return its config path.
fn write_project(root: &Path) -> std::path::PathBuf {
    let docs = root.join("docs");
    let theme = root.join("theme");
    fs::create_dir_all(docs.join("guide")).unwrap();
    fs::create_dir_all(&theme).unwrap();

    fs::write(
        docs.join("homepage.md"),
        "# Welcome\n\nStart with the [guide](guide/install.html).",
    )
    .unwrap();
    fs::write(
        docs.join("guide/install.md"),
        "# Install\n\n1. Download\n2. Run `setup.sh`\n\n> **Note:** needs a shell",
    )
    .unwrap();
    fs::write(
        theme.join("base.html"),
        "<html><title>${title} | ${site_name}</title><body>${content}</body></html>",
    )
    .unwrap();

    let config = root.join("afmdocs.toml");
    fs::write(
        &config,
        "site_name = \"Handbook\"\ndocs_dir = \"docs\"\nsite_dir = \"site\"\ntheme_dir = \"theme\"\n",
    )
    .unwrap();
    config
}

// =============================================================================
// Engine
// =============================================================================

#[test]
fn test_document_examples() {
    let processor = MarkdownProcessor::new();
    assert_eq!(
        processor.process("# Title\n\nSome **bold** text."),
        "<h1>Title</h1>\n\n<p>Some <strong>bold</strong> text.</p>"
    );
    assert_eq!(
        processor.process("- a\n- b\n- c"),
        "<ul><li>a</li><li>b</li><li>c</li></ul>"
    );
    assert_eq!(
        processor.process("```rust\nlet x = 1 < 2;\n```"),
        "<pre><code class=\"language-rust\">let x = 1 &lt; 2;</code></pre>"
    );
}

#[test]
fn test_processor_is_reusable() {
    let processor = MarkdownProcessor::new();
    let first = processor.process("> *a*\n\n- b");
    let second = processor.process("> *a*\n\n- b");
    assert_eq!(first, second);
    assert_eq!(
        first,
        "<blockquote><p><em>a</em></p></blockquote>\n\n<ul><li>b</li></ul>"
    );
}

#[test]
fn test_lenient_failure_is_reported() {
    let diagnostics = CollectingDiagnostics::shared();
    let processor = MarkdownProcessor::with_options(Options {
        max_depth: 0,
        ..Options::default()
    })
    .with_diagnostics(diagnostics.clone());

    assert_eq!(processor.process("intro\n\n> quoted"), "<p>intro</p>\n\n<p>&gt; quoted</p>");
    assert_eq!(diagnostics.warnings().len(), 1);
    assert!(matches!(
        processor.try_process("> quoted"),
        Err(AfmdocsError::RecursionLimitExceeded { limit: 0 })
    ));
}

// =============================================================================
// Site Building
// =============================================================================

#[test]
fn test_build_site_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_project(dir.path());

    let settings = Config::load_from(&config_path).unwrap().settings().unwrap();
    let diagnostics = CollectingDiagnostics::shared();
    let builder = SiteBuilder::new(settings, diagnostics.clone()).unwrap();
    let report = builder.build().unwrap();

    let outputs: Vec<_> = report
        .pages
        .iter()
        .map(|page| page.output.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        outputs,
        vec![
            Path::new("site/guide/install.html").to_path_buf(),
            Path::new("site/index.html").to_path_buf(),
        ]
    );
    assert!(diagnostics.warnings().is_empty());

    let index = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
    assert_eq!(
        index,
        "<html><title>Welcome | Handbook</title><body><h1>Welcome</h1>\n\n\
         <p>Start with the <a href=\"guide/install.html\">guide</a>.</p></body></html>"
    );

    let install = fs::read_to_string(dir.path().join("site/guide/install.html")).unwrap();
    assert!(install.contains("<ol><li>Download</li><li>Run <code>setup.sh</code></li></ol>"));
    assert!(install.contains("<blockquote><p><strong>Note:</strong> needs a shell</p></blockquote>"));
}

#[test]
fn test_build_without_theme_uses_default_template() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_project(dir.path());
    fs::remove_dir_all(dir.path().join("theme")).unwrap();

    let settings = Config::load_from(&config_path).unwrap().settings().unwrap();
    let diagnostics = CollectingDiagnostics::shared();
    SiteBuilder::new(settings, diagnostics.clone())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(diagnostics.warnings().len(), 1);
    let index = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
    assert!(index.contains("<title>Welcome - Handbook</title>"));
}

// =============================================================================
// Binary
// =============================================================================

fn afmdocs() -> Command {
    Command::new(env!("CARGO_BIN_EXE_afmdocs"))
}

#[test]
fn test_cli_build() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_project(dir.path());

    let status = afmdocs()
        .args(["build", "-c"])
        .arg(&config_path)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.path().join("site/index.html").is_file());
    assert!(dir.path().join("site/guide/install.html").is_file());
}

#[test]
fn test_cli_build_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = afmdocs()
        .args(["build", "-c"])
        .arg(dir.path().join("afmdocs.toml"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration file not found"));
}

#[test]
fn test_cli_convert_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("note.md");
    let output = dir.path().join("note.html");
    fs::write(&input, "| a | b |\n|---|---|\n| <i>1</i> | 2 |").unwrap();

    let status = afmdocs()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--strict-escaping")
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "<table><thead><tr><th>a</th><th>b</th></tr></thead>\
         <tbody><tr><td>&lt;i&gt;1&lt;/i&gt;</td><td>2</td></tr></tbody></table>"
    );
}
