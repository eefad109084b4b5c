//! Configuration types for sketch-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::role::Dialect;

/// Top-level configuration for sketch-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Names making up the sketch dialect.
    #[serde(default)]
    pub dialect: Dialect,

    /// Where library namespace types are listed from.
    #[serde(default)]
    pub library: LibraryConfig,

    /// Upstream compile-time pass marker.
    #[serde(default)]
    pub marker: MarkerConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a configurable diagnostic is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a configurable diagnostic.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets a boolean rule option, falling back to `default`.
    #[must_use]
    pub fn rule_bool(&self, rule_name: &str, key: &str, default: bool) -> bool {
        self.rules
            .get(rule_name)
            .map_or(default, |c| c.get_bool(key, default))
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Project root directory (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Source directory override, relative to the root.
    ///
    /// When unset the first existing of `src/main/java`, `src`, and the
    /// root itself is used.
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    /// Glob patterns to exclude from discovery.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Whether a file that fails to parse fails the run.
    #[serde(default)]
    pub fail_on_parse_error: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            source_dir: None,
            exclude: default_excludes(),
            respect_gitignore: true,
            fail_on_parse_error: false,
        }
    }
}

/// Locations the library namespace can be listed from.
///
/// Relative paths are resolved against the project root. Every location
/// that exists contributes; their type names are merged. When none is set,
/// the project's own source directory and build output directories are
/// searched instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Source tree containing the library (`<dir>/javono/lib/*.java`).
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    /// Unpacked class directory (`<dir>/javono/lib/*.class`).
    #[serde(default)]
    pub class_dir: Option<PathBuf>,

    /// Packaged archive (`.jar`).
    #[serde(default)]
    pub archive: Option<PathBuf>,
}

impl LibraryConfig {
    /// Returns true when at least one location is set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.source_dir.is_some() || self.class_dir.is_some() || self.archive.is_some()
    }
}

/// Marker file left by the upstream compile-time pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Marker file name.
    #[serde(default = "default_marker_file")]
    pub file: String,

    /// Build output directories searched for the marker, relative to the root.
    #[serde(default = "default_marker_search")]
    pub search: Vec<PathBuf>,

    /// Whether a missing marker fails an otherwise successful run.
    #[serde(default = "default_true")]
    pub required: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            file: default_marker_file(),
            search: default_marker_search(),
            required: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_excludes() -> Vec<String> {
    vec![
        "**/build/**".to_string(),
        "**/target/**".to_string(),
        "**/out/**".to_string(),
    ]
}

fn default_marker_file() -> String {
    "javono-processor.marker".to_string()
}

fn default_marker_search() -> Vec<PathBuf> {
    [
        "target/classes",
        "build/classes/java/main",
        "build/resources/main",
        "out/production",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Per-rule configuration.
///
/// Sketch rules read only their options from here. `enabled` and `severity`
/// apply to the diagnostics in [`crate::CONFIGURABLE_DIAGNOSTICS`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether the diagnostic is reported.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for the diagnostic.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
