//! Source discovery for a sketch project.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Candidate source layouts, in priority order.
const SOURCE_LAYOUTS: &[&str] = &["src/main/java", "src"];

/// Resolves the source directory of a project.
///
/// Tries the nested `src/main/java` layout, then a flat `src`, then the
/// project root. The first existing directory wins.
#[must_use]
pub fn resolve_source_dir(root: &Path) -> PathBuf {
    for layout in SOURCE_LAYOUTS {
        let candidate = root.join(layout);
        if candidate.is_dir() {
            debug!("Using source directory {}", candidate.display());
            return candidate;
        }
    }
    debug!("Using project root as source directory");
    root.to_path_buf()
}

/// Files found by [`discover_sources`].
#[derive(Debug, Default)]
pub struct Discovered {
    /// Source files, sorted by path.
    pub files: Vec<PathBuf>,
    /// Entries the walker could not read. The walk continued past them.
    pub skipped: Vec<WalkFailure>,
}

/// A directory entry the walker could not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkFailure {
    /// The entry, when the walker reports it.
    pub path: Option<PathBuf>,
    /// Walker message.
    pub message: String,
}

impl From<ignore::Error> for WalkFailure {
    fn from(err: ignore::Error) -> Self {
        Self {
            path: error_path(&err).map(Path::to_path_buf),
            message: err.to_string(),
        }
    }
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child),
        ignore::Error::Partial(errs) => errs.iter().find_map(error_path),
        _ => None,
    }
}

/// Walks `dir` and returns source files with one of `extensions`, sorted.
///
/// An entry that cannot be walked is logged, recorded in
/// [`Discovered::skipped`], and the walk goes on.
///
/// # Errors
///
/// Returns an error if an exclude pattern is invalid.
pub fn discover_sources(
    dir: &Path,
    extensions: &[&str],
    exclude: &[String],
    respect_gitignore: bool,
) -> Result<Discovered, DiscoveryError> {
    let patterns = exclude
        .iter()
        .map(|p| glob::Pattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = ignore::WalkBuilder::new(dir);
    builder
        .hidden(false)
        .git_ignore(respect_gitignore)
        .git_global(false)
        .git_exclude(respect_gitignore)
        .require_git(false);

    let mut found = Discovered::default();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                found.skipped.push(WalkFailure::from(e));
                continue;
            }
        };
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e));
        if !matches_ext {
            continue;
        }

        if is_excluded(path, dir, &patterns) {
            debug!("Excluding: {}", path.display());
            continue;
        }

        found.files.push(path.to_path_buf());
    }

    found.files.sort();
    Ok(found)
}

fn is_excluded(path: &Path, dir: &Path, patterns: &[glob::Pattern]) -> bool {
    let relative = path.strip_prefix(dir).unwrap_or(path);
    patterns
        .iter()
        .any(|p| p.matches_path(path) || p.matches_path(relative))
}

/// Errors raised while discovering source files.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class X {}").unwrap();
    }

    #[test]
    fn prefers_nested_layout() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src/main/java")).unwrap();
        assert_eq!(
            resolve_source_dir(tmp.path()),
            tmp.path().join("src/main/java")
        );
    }

    #[test]
    fn falls_back_to_flat_src_then_root() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(resolve_source_dir(tmp.path()), tmp.path().to_path_buf());

        fs::create_dir_all(tmp.path().join("src")).unwrap();
        assert_eq!(resolve_source_dir(tmp.path()), tmp.path().join("src"));
    }

    #[test]
    fn discovers_sorted_java_files_and_skips_excludes() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b/Second.java"));
        touch(&tmp.path().join("a/First.java"));
        touch(&tmp.path().join("a/notes.txt"));
        touch(&tmp.path().join("build/Generated.java"));

        let found =
            discover_sources(tmp.path(), &["java"], &["**/build/**".to_string()], true).unwrap();
        assert!(found.skipped.is_empty());
        let names: Vec<_> = found
            .files
            .iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("a/First.java"), PathBuf::from("b/Second.java")]
        );
    }

    #[test]
    fn walk_failure_keeps_the_entry_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ignore::Error::WithDepth {
            depth: 2,
            err: Box::new(ignore::Error::WithPath {
                path: PathBuf::from("src/locked"),
                err: Box::new(ignore::Error::Io(io)),
            }),
        };
        let failure = WalkFailure::from(err);
        assert_eq!(failure.path, Some(PathBuf::from("src/locked")));
        assert!(failure.message.contains("denied"));
    }

    #[test]
    fn invalid_exclude_pattern_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = discover_sources(tmp.path(), &["java"], &["[".to_string()], true).unwrap_err();
        assert!(matches!(err, DiscoveryError::Glob(_)));
    }
}
