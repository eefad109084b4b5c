//! # sketch-lint
//!
//! Static validator for embedded-device sketches written in a restricted
//! Java dialect.
//!
//! This is the facade crate: it re-exports the core framework, the Java
//! frontend, and the built-in rules, and offers one-call entry points.
//!
//! ## Build Integration
//!
//! ```rust,ignore
//! // Returns Ok(false) and prints diagnostics when the sketch is invalid.
//! let passed = sketch_lint::validate_project("path/to/project")?;
//!
//! // Or stop the build directly:
//! sketch_lint::validate_project_or_exit("path/to/project");
//! ```
//!
//! ## `cargo test` Integration
//!
//! ```rust,ignore
//! #[test]
//! fn sketch_is_valid() {
//!     sketch_lint::assert_sketch_valid(env!("CARGO_MANIFEST_DIR"));
//! }
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use sketch_lint::{Analyzer, java::JavaSourceParser, rules::recommended_rules};
//!
//! let report = Analyzer::builder()
//!     .root("./blink")
//!     .parser(JavaSourceParser::new())
//!     .rules(recommended_rules())
//!     .build()?
//!     .analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export core types and traits
pub use sketch_lint_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use sketch_lint_rules::*;
}

/// Java frontend and library listers.
pub mod java {
    pub use sketch_lint_java::*;
}

mod runner;

pub use runner::{
    analyzer_for, assert_sketch_valid, load_config, validate, validate_project,
    validate_project_or_exit, ValidateError,
};
