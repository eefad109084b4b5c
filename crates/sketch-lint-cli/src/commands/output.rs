//! Shared output formatting for validation results.

use anyhow::Result;
use miette::{NamedSource, Report};
use sketch_lint_core::{Severity, ValidationReport, ViolationDiagnostic, OUTPUT_PREFIX};
use std::path::Path;

use crate::OutputFormat;

/// Print validation results in the specified format.
pub fn print(report: &ValidationReport, root: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => report.print_report(),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
        OutputFormat::Rich => print_rich(report, root),
    }
    Ok(())
}

fn print_json(report: &ValidationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &ValidationReport) {
    for violation in &report.violations {
        println!("{violation}");
    }
}

fn print_rich(report: &ValidationReport, root: &Path) {
    for violation in &report.violations {
        let diagnostic = Report::new(ViolationDiagnostic::from(violation));
        let source = std::fs::read_to_string(root.join(&violation.location.file)).ok();
        let name = violation.location.file.display().to_string();
        let rendered = match source {
            Some(text) if violation.location.line > 0 => {
                diagnostic.with_source_code(NamedSource::new(name, text))
            }
            _ => diagnostic,
        };
        if violation.severity == Severity::Info {
            println!("{rendered:?}");
        } else {
            eprintln!("{rendered:?}");
        }
    }

    let (errors, warnings, infos) = report.count_by_severity();
    if let Some(sketch) = &report.sketch {
        println!(
            "{OUTPUT_PREFIX} Sketch declaration found: {} ({})",
            sketch.name,
            sketch.file.display()
        );
    }
    println!(
        "{OUTPUT_PREFIX} Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
        report.files_checked
    );
}
