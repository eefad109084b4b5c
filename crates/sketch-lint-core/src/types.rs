//! Core types for validation diagnostics and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::syntax::Span;

/// Prefix put in front of every line the validator prints.
pub const OUTPUT_PREFIX: &str = "[sketch-lint]";

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail validation.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that fails validation.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location from a syntax span.
    #[must_use]
    pub fn from_span(file: PathBuf, span: Span) -> Self {
        Self {
            file,
            line: span.line,
            column: span.column,
            offset: span.offset,
            length: span.length,
        }
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }
}

/// A labeled span for additional context in violations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A hint on how to fix a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A diagnostic produced during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "SK021").
    pub code: String,
    /// Rule name (e.g., "no-recursion").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    pub labels: Vec<Label>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this violation.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{OUTPUT_PREFIX} {} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        for label in &self.labels {
            let _ = writeln!(
                output,
                "  = note: {} ({}:{})",
                label.message,
                label.location.file.display(),
                label.location.line
            );
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }

    fn sort_key(&self) -> (&PathBuf, usize, usize, &str, &str) {
        (
            &self.location.file,
            self.location.line,
            self.location.column,
            self.code.as_str(),
            self.message.as_str(),
        )
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// The sketch declaration a run settled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchSummary {
    /// Declared name of the sketch class.
    pub name: String,
    /// File that declares it, relative to the project root.
    pub file: PathBuf,
}

/// Result of one validation run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All diagnostics found.
    pub violations: Vec<Violation>,
    /// Number of files parsed.
    pub files_checked: usize,
    /// The unique sketch declaration, when discovery succeeded.
    pub sketch: Option<SketchSummary>,
    /// Marker file confirming the upstream compile-time pass, when found.
    pub marker: Option<PathBuf>,
}

impl ValidationReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns true when validation passed: no error-severity diagnostics.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.has_errors()
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Returns violations reported by the given rule code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.code == code).collect()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let errors = self.by_severity(Severity::Error).len();
        let warnings = self.by_severity(Severity::Warning).len();
        let infos = self.by_severity(Severity::Info).len();
        (errors, warnings, infos)
    }

    /// Sorts violations by file, line, column, then code.
    ///
    /// Keeps repeated runs over an unchanged project byte-identical.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    /// Prints the report: diagnostics to stderr, informational lines to stdout.
    pub fn print_report(&self) {
        let (errors, warnings, infos) = self.count_by_severity();

        for violation in &self.violations {
            if violation.severity == Severity::Info {
                print!("{}", violation.format());
            } else {
                eprint!("{}", violation.format());
            }
        }

        if let Some(sketch) = &self.sketch {
            println!(
                "{OUTPUT_PREFIX} Sketch declaration found: {} ({})",
                sketch.name,
                sketch.file.display()
            );
        }
        if let Some(marker) = &self.marker {
            println!(
                "{OUTPUT_PREFIX} Static-validation marker detected: {}",
                marker.display()
            );
        }

        let summary = format!(
            "{OUTPUT_PREFIX} Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
            self.files_checked
        );
        if errors > 0 {
            eprintln!("{summary}");
        } else {
            println!("{summary}");
        }
    }

    /// Formats violations as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()` messages.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Violation> = self
            .violations
            .iter()
            .filter(|v| v.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== sketch-lint: {} violation(s) ===\n",
            failing.len()
        );

        for v in &failing {
            let _ = writeln!(
                report,
                "{} [{}] at {}:{}:{}",
                v.rule,
                v.code,
                v.location.file.display(),
                v.location.line,
                v.location.column,
            );
            let _ = writeln!(report, "  {}: {}", v.severity, v.message);
            if let Some(suggestion) = &v.suggestion {
                let _ = writeln!(report, "  = help: {}", suggestion.message);
            }
            let _ = writeln!(report);
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) in {} file(s)",
            errors, warnings, infos, self.files_checked
        );

        report
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "SK021",
            "no-recursion",
            severity,
            Location::new(PathBuf::from("src/Blink.java"), 42, 10),
            "user routines form a cycle: a -> b -> a",
        )
    }

    #[test]
    fn violation_format_includes_help() {
        let v = make_violation(Severity::Error)
            .with_suggestion(Suggestion::new("Unroll the recursion into a loop"));
        let formatted = v.format();
        assert!(formatted.starts_with("[sketch-lint] SK021 no-recursion"));
        assert!(formatted.contains("= help: Unroll the recursion into a loop"));
    }

    #[test]
    fn violation_format_snapshot() {
        let v = make_violation(Severity::Error)
            .with_label(Label::new(
                Location::new(PathBuf::from("src/Blink.java"), 7, 5),
                "b calls a",
            ))
            .with_suggestion(Suggestion::new("Unroll the recursion into a loop"));
        insta::assert_snapshot!(v.format().trim_end(), @r"
[sketch-lint] SK021 no-recursion at src/Blink.java:42:10
  error: user routines form a cycle: a -> b -> a
  = note: b calls a (src/Blink.java:7)
  = help: Unroll the recursion into a loop
");
    }

    #[test]
    fn violation_format_includes_labels() {
        let v = make_violation(Severity::Error).with_label(Label::new(
            Location::new(PathBuf::from("src/Other.java"), 3, 1),
            "also declared here",
        ));
        assert!(v.format().contains("= note: also declared here (src/Other.java:3)"));
    }

    #[test]
    fn violation_display_is_compact() {
        let v = make_violation(Severity::Error);
        assert_eq!(
            format!("{v}"),
            "src/Blink.java:42:10: error [SK021] user routines form a cycle: a -> b -> a"
        );
    }

    #[test]
    fn warnings_do_not_fail_the_report() {
        let mut report = ValidationReport::new();
        report.violations.push(make_violation(Severity::Warning));
        assert!(report.passed());
        assert!(report.has_violations_at(Severity::Warning));
        assert!(!report.has_violations_at(Severity::Error));
    }

    #[test]
    fn sort_orders_by_location_then_code() {
        let mut report = ValidationReport::new();
        let mut later = make_violation(Severity::Error);
        later.location.line = 50;
        let mut other_code = make_violation(Severity::Error);
        other_code.code = "SK013".into();
        report.violations = vec![later, make_violation(Severity::Error), other_code];
        report.sort();

        let keys: Vec<(usize, &str)> = report
            .violations
            .iter()
            .map(|v| (v.location.line, v.code.as_str()))
            .collect();
        assert_eq!(keys, vec![(42, "SK013"), (42, "SK021"), (50, "SK021")]);
    }

    #[test]
    fn format_test_report_filters_by_severity() {
        let mut report = ValidationReport::new();
        report.files_checked = 5;
        report.violations.push(make_violation(Severity::Warning));
        report.violations.push(make_violation(Severity::Error));

        let text = report.format_test_report(Severity::Error);
        assert!(text.contains("1 violation(s)"));
        assert!(text.contains("1 error(s)"));
        assert!(text.contains("1 warning(s)"));
    }
}
