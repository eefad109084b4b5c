//! Core analyzer orchestrating one validation run.

use crate::allow_list::{AllowList, LibraryTypeLister};
use crate::config::Config;
use crate::context::SketchContext;
use crate::index::SketchIndex;
use crate::marker;
use crate::parser::{ParseFailure, ParserBox, SourceParser};
use crate::rule::{Rule, RuleBox};
use crate::source::{discover_sources, resolve_source_dir, DiscoveryError};
use crate::syntax::{SourceUnit, Span};
use crate::types::{Location, Severity, SketchSummary, Suggestion, ValidationReport, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rule code for a file that could not be read or parsed.
pub const PARSE_FAILURE_CODE: &str = "SK900";
/// Rule name for a file that could not be read or parsed.
pub const PARSE_FAILURE_NAME: &str = "parse-failure";
/// Rule code for a library namespace that could not be listed.
pub const LIBRARY_UNAVAILABLE_CODE: &str = "SK902";
/// Rule name for a library namespace that could not be listed.
pub const LIBRARY_UNAVAILABLE_NAME: &str = "library-unavailable";

/// Diagnostics whose `enabled`/`severity` may be set in `[rules.<name>]`.
///
/// Sketch rules are not listed: they always run and keep their own severity.
pub const CONFIGURABLE_DIAGNOSTICS: &[&str] = &[PARSE_FAILURE_NAME, LIBRARY_UNAVAILABLE_NAME];

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving the project root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The project root does not exist.
    #[error("project root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// No source parser was configured.
    #[error("no source parser configured")]
    MissingParser,

    /// Source discovery failed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    parser: Option<ParserBox>,
    rules: Vec<RuleBox>,
    library: Option<Box<dyn LibraryTypeLister>>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: Option<bool>,
    require_marker: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root directory.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the source parser.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the lister used to expand wildcard library imports.
    #[must_use]
    pub fn library_lister(mut self, lister: Box<dyn LibraryTypeLister>) -> Self {
        self.library = Some(lister);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether a parse failure is an error (default: from config, false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = Some(fail);
        self
    }

    /// Sets whether the marker is required (default: from config, true).
    #[must_use]
    pub fn require_marker(mut self, require: bool) -> Self {
        self.require_marker = Some(require);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no parser was set or the root directory doesn't exist.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let parser = self.parser.ok_or(AnalyzerError::MissingParser)?;
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };
        if !root.is_dir() {
            return Err(AnalyzerError::RootNotFound(root));
        }

        let mut ignored: Vec<&String> = config
            .rules
            .iter()
            .filter(|(name, rule)| {
                !CONFIGURABLE_DIAGNOSTICS.contains(&name.as_str())
                    && (rule.enabled.is_some() || rule.severity.is_some())
            })
            .map(|(name, _)| name)
            .collect();
        ignored.sort();
        for name in ignored {
            warn!("Ignoring enabled/severity in [rules.{name}]: sketch rules always run");
        }

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        Ok(Analyzer {
            fail_on_parse_error: self
                .fail_on_parse_error
                .unwrap_or(config.analyzer.fail_on_parse_error),
            require_marker: self.require_marker.unwrap_or(config.marker.required),
            root,
            parser,
            rules: self.rules,
            library: self.library,
            exclude_patterns,
            config,
        })
    }
}

/// The main analyzer that orchestrates a validation run.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    parser: ParserBox,
    rules: Vec<RuleBox>,
    library: Option<Box<dyn LibraryTypeLister>>,
    exclude_patterns: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
    require_marker: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the directory sources are discovered in.
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        match &self.config.analyzer.source_dir {
            Some(dir) => self.root.join(dir),
            None => resolve_source_dir(&self.root),
        }
    }

    /// Runs discovery, classification, every rule, and the marker check.
    ///
    /// Every unit is parsed and classified before any rule runs. Rule
    /// diagnostics never abort the run; only environment failures do.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is invalid. Unreadable entries
    /// and files become parse-failure diagnostics instead.
    pub fn analyze(&self) -> Result<ValidationReport, AnalyzerError> {
        info!("Starting validation at {}", self.root.display());

        let source_dir = self.source_dir();
        let discovered = discover_sources(
            &source_dir,
            self.parser.extensions(),
            &self.exclude_patterns,
            self.config.analyzer.respect_gitignore,
        )?;
        info!(
            "Found {} {} file(s) in {}",
            discovered.files.len(),
            self.parser.language_id(),
            source_dir.display()
        );

        let mut report = ValidationReport::new();
        for skipped in discovered.skipped {
            let path = skipped.path.as_deref().unwrap_or(&source_dir);
            report.violations.extend(self.parse_failure(ParseFailure {
                path: self.relative(path),
                message: format!("failed to walk: {}", skipped.message),
                span: Span::default(),
            }));
        }
        let units = self.load_units(&discovered.files, &mut report);

        let dialect = &self.config.dialect;
        let mut index = SketchIndex::new(dialect);
        for unit in &units {
            index.add_unit(unit);
        }

        match index.finalize(&self.root) {
            Err(diagnostics) => report.violations.extend(diagnostics),
            Ok(resolved) => {
                info!(
                    "Sketch declaration found: {} ({})",
                    resolved.name(),
                    resolved.sketch.file().display()
                );
                report.sketch = Some(SketchSummary {
                    name: resolved.name().to_string(),
                    file: resolved.sketch.file().to_path_buf(),
                });

                let (allow_list, failure) =
                    AllowList::for_unit(resolved.sketch.unit, dialect, self.library.as_deref());
                if let Some(e) = failure {
                    warn!("Library namespace unavailable: {e}");
                    report.violations.extend(self.library_unavailable(
                        resolved.sketch.unit,
                        &dialect.library_namespace,
                        &e.to_string(),
                    ));
                }

                let ctx = SketchContext::new(&self.root, &resolved, &allow_list, dialect);
                for rule in &self.rules {
                    let violations = rule.check(&ctx);
                    debug!("{} reported {} violation(s)", rule.name(), violations.len());
                    report.violations.extend(violations);
                }
            }
        }

        report.sort();

        if !report.has_errors() {
            match marker::find_marker(&self.root, &self.config.marker) {
                Some(found) => {
                    info!("Static-validation marker detected: {}", found.display());
                    report.marker = Some(found);
                }
                None if self.require_marker => {
                    report
                        .violations
                        .push(marker::missing_marker(&self.root, &self.config.marker));
                }
                None => debug!("Marker not found; not required"),
            }
        }

        info!(
            "Validation complete: {} violation(s) in {} file(s)",
            report.violations.len(),
            report.files_checked
        );

        Ok(report)
    }

    /// Reads and parses every file, turning failures into diagnostics.
    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }

    fn load_units(&self, files: &[PathBuf], report: &mut ValidationReport) -> Vec<SourceUnit> {
        let mut units = Vec::with_capacity(files.len());
        for path in files {
            let relative = self.relative(path);
            debug!("Parsing: {}", relative.display());

            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read {}: {}", relative.display(), e);
                    report.violations.extend(self.parse_failure(ParseFailure {
                        path: relative,
                        message: format!("failed to read file: {e}"),
                        span: Span::default(),
                    }));
                    continue;
                }
            };

            match self.parser.parse(&relative, &text) {
                Ok(unit) => {
                    report.files_checked += 1;
                    units.push(unit);
                }
                Err(failure) => {
                    warn!("Failed to parse {failure}");
                    report.violations.extend(self.parse_failure(failure));
                }
            }
        }
        units
    }

    /// Severity of a configurable diagnostic, or `None` when it is disabled.
    fn configured_severity(&self, name: &str, default: Severity) -> Option<Severity> {
        if !self.config.is_rule_enabled(name) {
            debug!("Diagnostic {name} disabled by configuration");
            return None;
        }
        Some(self.config.rule_severity(name).unwrap_or(default))
    }

    fn parse_failure(&self, failure: ParseFailure) -> Option<Violation> {
        let default = if self.fail_on_parse_error {
            Severity::Error
        } else {
            Severity::Warning
        };
        let severity = self.configured_severity(PARSE_FAILURE_NAME, default)?;
        Some(Violation::new(
            PARSE_FAILURE_CODE,
            PARSE_FAILURE_NAME,
            severity,
            Location::from_span(failure.path, failure.span),
            format!("parse failure: {}", failure.message),
        ))
    }

    fn library_unavailable(
        &self,
        unit: &SourceUnit,
        namespace: &str,
        reason: &str,
    ) -> Option<Violation> {
        let severity = self.configured_severity(LIBRARY_UNAVAILABLE_NAME, Severity::Warning)?;
        let span = unit
            .imports
            .iter()
            .find(|i| i.wildcard && i.path == namespace)
            .map_or_else(Span::default, |i| i.span);
        Some(
            Violation::new(
                LIBRARY_UNAVAILABLE_CODE,
                LIBRARY_UNAVAILABLE_NAME,
                severity,
                Location::from_span(unit.path.clone(), span),
                format!("cannot list types of {namespace}.*: {reason}"),
            )
            .with_suggestion(Suggestion::new(
                "Set [library] source_dir, class_dir, or archive in sketch-lint.toml, or import library types explicitly",
            )),
        )
    }
}
