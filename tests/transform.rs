//! End-to-end tests over `fixtures/wiki`, through the library and the binary.
//!
//! Run with: `cargo test --test transform`

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use wiki2html::config::{load_config, load_config_file};
use wiki2html::transform::WikiToHtml;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/wiki")
}

/// Copy the fixture wiki into a fresh temp directory.
fn fixture_wiki() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for entry in std::fs::read_dir(fixtures_dir()).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name))
        .unwrap_or_else(|e| panic!("failed to read {name}: {e}"))
}

fn wiki2html(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_wiki2html"))
        .args(args)
        .output()
        .expect("failed to run wiki2html")
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

#[test]
fn transform_writes_pages_and_menus() {
    let src = fixture_wiki();
    let dest = TempDir::new().unwrap();
    let config = load_config(src.path()).unwrap();

    let mut wiki = WikiToHtml::new(src.path(), dest.path(), config).unwrap();
    let report = wiki.transform().unwrap();

    assert_eq!(
        report.pages,
        vec![
            "en:Help.html",
            "en:Help:Getting-Started.html",
            "en:Help:Guides:Install.html",
            "en:Help:Guides:Upgrade.html",
            "fr_ca:Help.html",
            "fr_ca:Help:Guides:Install.html",
        ]
    );
    assert_eq!(report.menus, vec!["en:_menu_.html", "fr_ca:_menu_.html"]);
    assert!(!dest.path().join("Home.html").exists());
    assert!(!dest.path().join("notes.html").exists());
}

#[test]
fn pages_render_markdown_with_post_rules() {
    let src = fixture_wiki();
    let dest = TempDir::new().unwrap();
    let mut wiki = WikiToHtml::new(src.path(), dest.path(), load_config(src.path()).unwrap())
        .unwrap();
    wiki.transform().unwrap();

    let install = read(dest.path(), "en:Help:Guides:Install.html");
    assert!(install.starts_with("<h1 id=\"install\">Install</h1>\n"));
    assert!(install.contains("<table class=\"grid\">"));
    assert!(install.contains("<code>make install</code>"));

    let upgrade = read(dest.path(), "en:Help:Guides:Upgrade.html");
    assert!(upgrade.contains("<a href=\"./#/Help%3AGuides%3AInstall\">Install</a>"));
}

#[test]
fn menus_follow_priority_then_descending_order() {
    let src = fixture_wiki();
    let dest = TempDir::new().unwrap();
    let mut wiki = WikiToHtml::new(src.path(), dest.path(), load_config(src.path()).unwrap())
        .unwrap();
    wiki.transform().unwrap();

    assert_eq!(
        read(dest.path(), "en:_menu_.html"),
        concat!(
            "<ul>",
            r#"<li><a href="./#/Help%3AGetting-Started">Getting Started</a></li>"#,
            "<li><span>Guides</span><ul>",
            r#"<li><a href="./#/Help%3AGuides%3AUpgrade">Upgrade</a></li>"#,
            r#"<li><a href="./#/Help%3AGuides%3AInstall">Install</a></li>"#,
            "</ul></li>",
            "</ul>",
        )
    );
    assert_eq!(
        read(dest.path(), "fr_ca:_menu_.html"),
        concat!(
            "<ul>",
            "<li><span>Guides</span><ul>",
            r#"<li><a href="./#/Help%3AGuides%3AInstall">Install</a></li>"#,
            "</ul></li>",
            "</ul>",
        )
    );
}

#[test]
fn missing_destination_is_rejected() {
    let src = fixture_wiki();
    let missing = src.path().join("missing");
    let mut wiki = WikiToHtml::new(src.path(), &missing, load_config(src.path()).unwrap())
        .unwrap();
    let err = wiki.transform().unwrap_err();
    assert_eq!(err.to_string(), "Invalid SRC/DEST folder options");
}

// ---------------------------------------------------------------------------
// Binary
// ---------------------------------------------------------------------------

#[test]
fn cli_build_creates_output_directory() {
    let src = fixture_wiki();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("dist");

    let result = wiki2html(&[
        "build",
        "--source",
        src.path().to_str().unwrap(),
        "--output",
        dest.to_str().unwrap(),
    ]);
    assert!(
        result.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("001 en:Help.html"));
    assert!(stdout.contains("Generated 6 pages, 2 menus"));
    assert!(dest.join("en:_menu_.html").is_file());
}

#[test]
fn cli_check_prints_menu_tree_without_writing() {
    let src = fixture_wiki();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("dist");

    let result = wiki2html(&[
        "check",
        "--source",
        src.path().to_str().unwrap(),
        "--output",
        dest.to_str().unwrap(),
    ]);
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("001 en (4 pages)"));
    assert!(stdout.contains("        Link: en%3AHelp"));
    assert!(stdout.contains("Found 6 pages in 2 locales"));
    assert!(!dest.exists());
}

#[test]
fn cli_gen_config_is_loadable() {
    let result = wiki2html(&["gen-config"]);
    assert!(result.status.success());

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("wiki.toml");
    std::fs::write(&path, &result.stdout).unwrap();
    let config = load_config_file(&path).unwrap();
    assert_eq!(config.separator, ":");
    assert_eq!(config.menu_file, "_menu_.html");
}

#[test]
fn cli_translations_prints_json() {
    let src = fixture_wiki();
    let result = wiki2html(&["translations", "--source", src.path().to_str().unwrap()]);
    assert!(result.status.success());

    let table: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(table["en"]["Getting Started"], "Getting Started");
    assert_eq!(table["fr_ca"]["Guides"], "Guides");
}

#[test]
fn cli_missing_config_file_fails() {
    let src = fixture_wiki();
    let result = wiki2html(&[
        "check",
        "--source",
        src.path().to_str().unwrap(),
        "--config",
        src.path().join("nope.toml").to_str().unwrap(),
    ]);
    assert!(!result.status.success());
}
