//! Packaging a theme directory into a distribution archive.

#![cfg(feature = "cli")]

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use themekit::package::{DIST_DIR, PackageOptions, package_theme, package_theme_with};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn theme_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", r#"{"name": "ember", "version": "1.4.0", "engines": {"ghost": ">=5.0.0"}}"#);
    write(root, "index.hbs", "{{!< default}}");
    write(root, "partials/post-card.hbs", "<article></article>");
    write(root, "assets/built/main.min.js", "console.log(1)");
    write(root, "node_modules/gulp/index.js", "module.exports = {}");
    write(root, "ember-1.3.0.zip", "old build");
    write(root, ".gitignore", "node_modules\n");
    write(root, ".git/HEAD", "ref: refs/heads/main\n");
    write(root, ".github/workflows/deploy.yml", "on: push\n");
    dir
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[test]
fn test_package_contents() {
    let dir = theme_dir();
    let dist = dir.path().join(DIST_DIR);

    let path = package_theme(dir.path(), &dist).unwrap();

    assert_eq!(path, dist.join("ember-1.4.0.zip"));
    assert_eq!(
        archive_names(&path),
        vec![
            "assets/built/main.min.js",
            "index.hbs",
            "package.json",
            "partials/post-card.hbs",
        ]
    );
}

#[test]
fn test_package_content_round_trips() {
    let dir = theme_dir();
    let out = tempfile::tempdir().unwrap();

    let path = package_theme(dir.path(), out.path()).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    let mut file = archive.by_name("partials/post-card.hbs").unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    assert_eq!(content, "<article></article>");
}

#[test]
fn test_repackaging_ignores_previous_build() {
    let dir = theme_dir();
    let dist = dir.path().join(DIST_DIR);

    package_theme(dir.path(), &dist).unwrap();
    write(dir.path(), "package.json", r#"{"name": "ember", "version": "1.4.1"}"#);
    let path = package_theme(dir.path(), &dist).unwrap();

    assert!(path.ends_with("ember-1.4.1.zip"));
    assert!(!archive_names(&path).iter().any(|n| n.starts_with("dist")));
    assert_eq!(fs::read_dir(&dist).unwrap().count(), 2);
}

#[test]
fn test_missing_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.hbs", "");

    assert!(package_theme(dir.path(), dir.path().join(DIST_DIR)).is_err());
}

#[test]
fn test_hidden_files_not_packaged() {
    let dir = theme_dir();

    let path = package_theme(dir.path(), dir.path().join(DIST_DIR)).unwrap();

    let names = archive_names(&path);
    assert!(!names.iter().any(|n| n.starts_with(".git")), "{names:?}");
    assert!(!names.iter().any(|n| n.split('/').any(|part| part.starts_with('.'))));
}

#[test]
fn test_nested_output_dir_not_repackaged() {
    let dir = theme_dir();
    let out = dir.path().join("build/releases");

    package_theme(dir.path(), &out).unwrap();
    write(dir.path(), "package.json", r#"{"name": "ember", "version": "1.5.0"}"#);
    let path = package_theme(dir.path(), &out).unwrap();

    let names = archive_names(&path);
    assert!(!names.iter().any(|n| n.starts_with("build/")), "{names:?}");
    assert!(names.contains(&"index.hbs".to_string()));
}

#[test]
fn test_custom_compression_levels() {
    let dir = theme_dir();

    for level in [1, 9, 42] {
        let out = tempfile::tempdir().unwrap();
        let options = PackageOptions {
            compression_level: level,
        };

        let path = package_theme_with(dir.path(), out.path(), &options).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("index.hbs")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "{{!< default}}", "level {level}");
    }
}
