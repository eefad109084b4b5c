//! Check command implementation.

use anyhow::{Context, Result};
use sketch_lint_core::{Analyzer, Config, RuleBox};
use sketch_lint_java::{lister_from_config, JavaSourceParser};
use sketch_lint_rules::{configured_rules, Preset};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Arguments of the check command.
pub struct CheckArgs<'a> {
    /// Project root.
    pub path: &'a Path,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules_filter: Option<&'a str>,
    /// Preset to use instead of the configured rules.
    pub preset: Option<Preset>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Skip the marker check.
    pub no_marker: bool,
    /// Where the configuration comes from.
    pub source: &'a ConfigSource,
}

/// Runs the check command.
pub fn run(args: &CheckArgs<'_>) -> Result<()> {
    let config = load_config(args.source)?;

    let lister = lister_from_config(args.path, &config);
    let rules = match (args.rules_filter, args.preset) {
        (Some(filter), _) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(configured_rules(&config), &names)
        }
        (None, Some(preset)) => preset.rules(),
        (None, None) => configured_rules(&config),
    };

    let mut builder = Analyzer::builder()
        .root(args.path)
        .parser(JavaSourceParser::new())
        .config(config)
        .excludes(args.exclude.iter().cloned())
        .rules(rules);
    if let Some(lister) = lister {
        builder = builder.library_lister(lister);
    }
    if args.no_marker {
        builder = builder.require_marker(false);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Validating {} with {} rules",
        args.path.display(),
        analyzer.rule_count()
    );

    let report = analyzer.analyze().context("Validation failed")?;

    super::output::print(&report, analyzer.root(), args.format)?;

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Keeps the rules whose name or code is listed.
fn filter_rules(rules: Vec<RuleBox>, names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        if !rules.iter().any(|r| r.name() == *name || r.code() == *name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }
    rules
        .into_iter()
        .filter(|r| names.contains(&r.name()) || names.contains(&r.code()))
        .collect()
}
