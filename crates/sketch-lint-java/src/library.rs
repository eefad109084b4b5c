//! Listing the types of the library namespace.
//!
//! A wildcard import of the library namespace allows every type the namespace
//! declares. These listers find those names in an unpacked class directory,
//! a source tree, or a packaged archive.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use sketch_lint_core::source::resolve_source_dir;
use sketch_lint_core::{Config, LibraryError, LibraryTypeLister};
use tracing::debug;
use walkdir::WalkDir;

fn namespace_dir(namespace: &str) -> PathBuf {
    namespace.split('.').collect()
}

/// Returns the type name for a file name with `extension`, skipping inner
/// classes (`Outer$Inner.class`).
fn type_name(file_name: &str, extension: &str) -> Option<String> {
    let stem = file_name.strip_suffix(extension)?;
    if stem.is_empty() || stem.contains('$') || stem == "package-info" {
        return None;
    }
    Some(stem.to_string())
}

/// Lists types from files directly under the namespace directory.
fn list_dir(root: &Path, namespace: &str, extension: &str) -> Result<BTreeSet<String>, LibraryError> {
    let dir = root.join(namespace_dir(namespace));
    if !dir.is_dir() {
        return Err(LibraryError::NotFound(dir));
    }
    let mut types = BTreeSet::new();
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| LibraryError::Io {
            path: dir.clone(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str().and_then(|n| type_name(n, extension)) {
            types.insert(name);
        }
    }
    Ok(types)
}

/// Reads compiled classes from an unpacked class directory.
#[derive(Debug, Clone)]
pub struct ClassDirLister {
    dir: PathBuf,
}

impl ClassDirLister {
    /// Creates a lister rooted at `dir` (e.g., `target/classes`).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl LibraryTypeLister for ClassDirLister {
    fn describe(&self) -> String {
        format!("class directory {}", self.dir.display())
    }

    fn list_types(&self, namespace: &str) -> Result<BTreeSet<String>, LibraryError> {
        list_dir(&self.dir, namespace, ".class")
    }
}

/// Reads library sources from a source tree.
#[derive(Debug, Clone)]
pub struct SourceDirLister {
    dir: PathBuf,
}

impl SourceDirLister {
    /// Creates a lister rooted at `dir` (e.g., `lib/src/main/java`).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl LibraryTypeLister for SourceDirLister {
    fn describe(&self) -> String {
        format!("source directory {}", self.dir.display())
    }

    fn list_types(&self, namespace: &str) -> Result<BTreeSet<String>, LibraryError> {
        list_dir(&self.dir, namespace, ".java")
    }
}

/// Reads class entries from a packaged `.jar` archive.
#[derive(Debug, Clone)]
pub struct ArchiveLister {
    path: PathBuf,
}

impl ArchiveLister {
    /// Creates a lister for the archive at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LibraryTypeLister for ArchiveLister {
    fn describe(&self) -> String {
        format!("archive {}", self.path.display())
    }

    fn list_types(&self, namespace: &str) -> Result<BTreeSet<String>, LibraryError> {
        if !self.path.is_file() {
            return Err(LibraryError::NotFound(self.path.clone()));
        }
        let file = File::open(&self.path).map_err(|e| LibraryError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        let archive = zip::ZipArchive::new(file).map_err(|e| LibraryError::Archive {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let prefix = format!("{}/", namespace.replace('.', "/"));
        let types: BTreeSet<String> = archive
            .file_names()
            .filter_map(|entry| entry.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .filter_map(|rest| type_name(rest, ".class"))
            .collect();
        debug!("{} lists {} type(s) in {namespace}", self.describe(), types.len());
        Ok(types)
    }
}

/// Merges the results of several listers.
///
/// Fails only when every inner lister fails; the first error is returned.
pub struct ChainLister {
    listers: Vec<Box<dyn LibraryTypeLister>>,
}

impl ChainLister {
    /// Creates a chain over `listers`, queried in order.
    #[must_use]
    pub fn new(listers: Vec<Box<dyn LibraryTypeLister>>) -> Self {
        Self { listers }
    }
}

impl LibraryTypeLister for ChainLister {
    fn describe(&self) -> String {
        self.listers
            .iter()
            .map(|l| l.describe())
            .collect::<Vec<_>>()
            .join(" + ")
    }

    fn list_types(&self, namespace: &str) -> Result<BTreeSet<String>, LibraryError> {
        let mut merged = BTreeSet::new();
        let mut first_error = None;
        let mut any_ok = false;
        for lister in &self.listers {
            match lister.list_types(namespace) {
                Ok(types) => {
                    any_ok = true;
                    merged.extend(types);
                }
                Err(e) => {
                    debug!("{} unavailable: {e}", lister.describe());
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) if !any_ok => Err(e),
            _ => Ok(merged),
        }
    }
}

/// Builds a lister from the `[library]` configuration.
///
/// Relative paths resolve against `root`. Every configured location that
/// exists is used (source tree, then class directory, then archive); several
/// are merged. With no `[library]` location set, the project's source
/// directory and every existing marker search directory (such as
/// `target/classes`) are used, so a library kept beside the sketch or
/// compiled into the project is found. Returns `None` when no location exists.
#[must_use]
pub fn lister_from_config(root: &Path, config: &Config) -> Option<Box<dyn LibraryTypeLister>> {
    let library = &config.library;
    let mut listers: Vec<Box<dyn LibraryTypeLister>> = Vec::new();

    if library.is_configured() {
        if let Some(dir) = library.source_dir.as_ref().map(|d| root.join(d)) {
            if dir.is_dir() {
                listers.push(Box::new(SourceDirLister::new(dir)));
            }
        }
        if let Some(dir) = library.class_dir.as_ref().map(|d| root.join(d)) {
            if dir.is_dir() {
                listers.push(Box::new(ClassDirLister::new(dir)));
            }
        }
        if let Some(path) = library.archive.as_ref().map(|p| root.join(p)) {
            if path.is_file() {
                listers.push(Box::new(ArchiveLister::new(path)));
            }
        }
    } else {
        let source_dir = match &config.analyzer.source_dir {
            Some(dir) => root.join(dir),
            None => resolve_source_dir(root),
        };
        if source_dir.is_dir() {
            listers.push(Box::new(SourceDirLister::new(source_dir)));
        }
        for dir in config.marker.search.iter().map(|d| root.join(d)) {
            if dir.is_dir() {
                listers.push(Box::new(ClassDirLister::new(dir)));
            }
        }
    }

    debug!("Library listers: {}", listers.len());
    match listers.len() {
        0 => None,
        1 => listers.pop(),
        _ => Some(Box::new(ChainLister::new(listers))),
    }
}
