//! List rules command implementation.

use sketch_lint_core::{
    LIBRARY_UNAVAILABLE_CODE, LIBRARY_UNAVAILABLE_NAME, MULTIPLE_SKETCHES_CODE,
    MULTIPLE_SKETCHES_NAME, NO_SKETCH_CODE, NO_SKETCH_NAME, PARSE_FAILURE_CODE, PARSE_FAILURE_NAME,
};
use sketch_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for (code, name, description) in [
        (NO_SKETCH_CODE, NO_SKETCH_NAME, "No class carries the sketch tag"),
        (
            MULTIPLE_SKETCHES_CODE,
            MULTIPLE_SKETCHES_NAME,
            "More than one class carries the sketch tag",
        ),
    ] {
        println!("{code:<10} {name:<25} {description}");
    }

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    for (code, name, description) in [
        (PARSE_FAILURE_CODE, PARSE_FAILURE_NAME, "A source file could not be parsed"),
        (
            sketch_lint_core::marker::CODE,
            sketch_lint_core::marker::NAME,
            "Build output lacks the compile-time validation marker",
        ),
        (
            LIBRARY_UNAVAILABLE_CODE,
            LIBRARY_UNAVAILABLE_NAME,
            "Library types for a wildcard import could not be listed",
        ),
    ] {
        println!("{code:<10} {name:<25} {description}");
    }

    println!("\nPresets:");
    println!("  recommended  - All rules with default options (default)");
    println!("  strict       - Also rejects static calls on library types");
    println!("  relaxed      - Fields need no role tag");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  sketch-lint check --rules no-recursion,cross-role-calls");
    println!("  sketch-lint check --rules SK021,SK022,SK023");
}
