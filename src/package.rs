//! Theme distribution archive.
//!
//! A theme directory is zipped as `dist/{name}-{version}.zip`, with the name
//! and version taken from its `package.json`. Dependencies, earlier builds,
//! stray archives at the top level and dot-prefixed entries at any depth
//! stay out of the package.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};

/// Directories never packaged, relative to the theme root.
const EXCLUDED_DIRS: &[&str] = &["node_modules", "dist"];

/// Default output directory, relative to the theme root.
pub const DIST_DIR: &str = "dist";

/// The `package.json` fields packaging needs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
}

impl PackageManifest {
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join("package.json");
        let json = fs::read_to_string(&path)?;
        let manifest: Self = serde_json::from_str(&json)?;
        if manifest.name.trim().is_empty() {
            return Err(Error::InvalidManifest("empty `name`".into()));
        }
        if manifest.version.trim().is_empty() {
            return Err(Error::InvalidManifest("empty `version`".into()));
        }
        Ok(manifest)
    }

    pub fn archive_name(&self) -> String {
        format!("{}-{}.zip", self.name, self.version)
    }
}

/// Archive settings.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Deflate level, 1-9. Higher values are treated as 9.
    pub compression_level: u32,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            compression_level: 6,
        }
    }
}

/// Zip the theme in `dir` into `out_dir` with default options.
///
/// Returns the path of the written archive.
pub fn package_theme(dir: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<PathBuf> {
    package_theme_with(dir.as_ref(), out_dir.as_ref(), &PackageOptions::default())
}

/// [`package_theme`] with explicit archive settings. An output directory
/// inside `dir` is never packaged itself.
pub fn package_theme_with(dir: &Path, out_dir: &Path, options: &PackageOptions) -> Result<PathBuf> {
    let manifest = PackageManifest::read(dir)?;

    fs::create_dir_all(out_dir)?;
    let skip = nested_output_dir(dir, out_dir)?;
    if let Some(rel) = &skip {
        debug!(dir = %rel, "output directory excluded from package");
    }
    let mut files = Vec::new();
    walk(dir, "", skip.as_deref(), &mut files)?;
    files.sort();

    let out_path = out_dir.join(manifest.archive_name());
    let writer = BufWriter::new(File::create(&out_path)?);
    write_archive(dir, &files, writer, options)?;

    info!(
        path = %out_path.display(),
        files = files.len(),
        "theme packaged"
    );
    Ok(out_path)
}

/// Archive paths of every file to package, sorted, with `/` separators.
pub fn collect_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    walk(dir, "", None, &mut files)?;
    files.sort();
    Ok(files)
}

/// Archive-style path of `out_dir` when it lies inside `dir`.
fn nested_output_dir(dir: &Path, out_dir: &Path) -> io::Result<Option<String>> {
    let dir = dir.canonicalize()?;
    let out_dir = out_dir.canonicalize()?;
    let Ok(rel) = out_dir.strip_prefix(&dir) else {
        return Ok(None);
    };
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    Ok(parts
        .filter(|parts| !parts.is_empty())
        .map(|parts| parts.join("/")))
}

fn walk(dir: &Path, prefix: &str, skip: Option<&str>, files: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        if name.starts_with('.') {
            debug!(prefix, name, "hidden entry excluded from package");
            continue;
        }
        let top_level = prefix.is_empty();
        let rel = if top_level {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if top_level && EXCLUDED_DIRS.contains(&name) {
                debug!(dir = name, "excluded from package");
                continue;
            }
            if skip == Some(rel.as_str()) {
                continue;
            }
            walk(&entry.path(), &rel, skip, files)?;
        } else if file_type.is_file() {
            if top_level && is_archive(name) {
                debug!(file = name, "excluded from package");
                continue;
            }
            files.push(rel);
        }
    }
    Ok(())
}

fn is_archive(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

fn write_archive<W: Write + io::Seek>(
    dir: &Path,
    files: &[String],
    writer: W,
    options: &PackageOptions,
) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(options.compression_level.min(9))));

    for rel in files {
        let content = fs::read(dir.join(rel))?;
        zip.start_file(rel.as_str(), deflated)?;
        zip.write_all(&content)?;
    }

    zip.finish()?.flush()?;
    Ok(())
}
