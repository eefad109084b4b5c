//! One-call validation for build orchestrators and test suites.
//!
//! Configuration is read from `sketch-lint.toml` (or `.sketch-lint.toml`) in
//! the project root when present; otherwise defaults apply.

use sketch_lint_core::{
    Analyzer, AnalyzerError, Config, ConfigError, Severity, ValidationReport, OUTPUT_PREFIX,
};
use sketch_lint_java::{lister_from_config, JavaSourceParser};
use sketch_lint_rules::configured_rules;
use std::path::{Path, PathBuf};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["sketch-lint.toml", ".sketch-lint.toml"];

/// Errors that stop a validation run before a verdict is reached.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// The project configuration could not be loaded.
    #[error("failed to load config {}: {source}", .path.display())]
    Config {
        /// The config file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ConfigError,
    },

    /// The analyzer could not be built or run.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

/// Loads the project configuration from `root`, or defaults.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_config(root: &Path) -> Result<Config, ValidateError> {
    let Some(path) = CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
    else {
        return Ok(Config::default());
    };
    tracing::debug!("Using config {}", path.display());
    Config::from_file(&path).map_err(|source| ValidateError::Config { path, source })
}

/// Builds an analyzer with the Java frontend, the configured library
/// lister, and every configured rule.
///
/// # Errors
///
/// Returns an error if the root does not exist.
pub fn analyzer_for(root: &Path, config: Config) -> Result<Analyzer, AnalyzerError> {
    let lister = lister_from_config(root, &config);
    let mut builder = Analyzer::builder()
        .root(root)
        .parser(JavaSourceParser::new())
        .rules(configured_rules(&config))
        .config(config);
    if let Some(lister) = lister {
        builder = builder.library_lister(lister);
    }
    builder.build()
}

/// Validates the project at `root` and returns the full report.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the source tree
/// cannot be walked. Rule findings are part of the report, not errors.
pub fn validate(root: impl AsRef<Path>) -> Result<ValidationReport, ValidateError> {
    let root = root.as_ref();
    let config = load_config(root)?;
    let analyzer = analyzer_for(root, config)?;
    Ok(analyzer.analyze()?)
}

/// Validates the project at `root`, prints the report, and returns whether
/// it passed.
///
/// Diagnostics go to standard error and informational lines to standard
/// output, each prefixed with `[sketch-lint]`.
///
/// # Errors
///
/// See [`validate`].
pub fn validate_project(root: impl AsRef<Path>) -> Result<bool, ValidateError> {
    let report = validate(root)?;
    report.print_report();
    Ok(report.passed())
}

/// Like [`validate_project`], but terminates the process with status 1 when
/// validation fails or cannot run.
pub fn validate_project_or_exit(root: impl AsRef<Path>) {
    match validate_project(root) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{OUTPUT_PREFIX} {e}");
            std::process::exit(1);
        }
    }
}

/// Validates the project at `root` from a test.
///
/// # Panics
///
/// Panics with a formatted report if any error-severity diagnostic is found,
/// or if validation cannot run.
pub fn assert_sketch_valid(root: impl AsRef<Path>) {
    let report = validate(root).unwrap_or_else(|e| panic!("sketch-lint: {e}"));
    if report.has_violations_at(Severity::Error) {
        panic!("{}", report.format_test_report(Severity::Error));
    }
}
