//! Detection of the marker left by the upstream compile-time pass.
//!
//! Only the presence of the file matters; its content is never read.

use std::path::{Path, PathBuf};

use crate::config::MarkerConfig;
use crate::types::{Location, Severity, Suggestion, Violation};

/// Rule code for a missing marker.
pub const CODE: &str = "SK901";

/// Rule name for a missing marker.
pub const NAME: &str = "marker-missing";

/// Returns the first marker file found in the configured search directories.
#[must_use]
pub fn find_marker(root: &Path, config: &MarkerConfig) -> Option<PathBuf> {
    config
        .search
        .iter()
        .map(|dir| root.join(dir).join(&config.file))
        .find(|candidate| candidate.is_file())
}

/// Diagnostic emitted when no marker is found.
#[must_use]
pub fn missing_marker(root: &Path, config: &MarkerConfig) -> Violation {
    let searched: Vec<String> = config
        .search
        .iter()
        .map(|d| d.display().to_string())
        .collect();
    Violation::new(
        CODE,
        NAME,
        Severity::Error,
        Location::new(root.to_path_buf(), 0, 0),
        format!(
            "static-validation marker missing: {} not found in {}",
            config.file,
            searched.join(", ")
        ),
    )
    .with_suggestion(Suggestion::new(
        "Enable annotation processing in your IDE or build tool (Maven/Gradle) and rebuild",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_marker_in_any_search_dir() {
        let tmp = TempDir::new().unwrap();
        let config = MarkerConfig::default();
        assert!(find_marker(tmp.path(), &config).is_none());

        let dir = tmp.path().join("build/classes/java/main");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(&config.file), "").unwrap();
        assert_eq!(
            find_marker(tmp.path(), &config),
            Some(dir.join("javono-processor.marker"))
        );
    }

    #[test]
    fn missing_marker_names_searched_dirs() {
        let v = missing_marker(Path::new("."), &MarkerConfig::default());
        assert_eq!(v.code, CODE);
        assert!(v.message.contains("static-validation marker missing"));
        assert!(v.message.contains("target/classes"));
        assert!(v.suggestion.is_some());
    }
}
