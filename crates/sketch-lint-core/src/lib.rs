//! # sketch-lint-core
//!
//! Core framework for validating embedded-device sketches.
//!
//! A sketch is a single restricted class written in a JVM-family language.
//! This crate holds everything that does not depend on a particular parser:
//!
//! - the syntax model a frontend produces ([`SourceUnit`], [`Declaration`], [`Member`])
//! - role tags and the dialect naming them ([`RoleTag`], [`Dialect`])
//! - the declaration classifier ([`SketchIndex`])
//! - the [`Rule`], [`SourceParser`], and [`LibraryTypeLister`] seams
//! - the [`Analyzer`] orchestrating a run into a [`ValidationReport`]
//!
//! ## Example
//!
//! ```ignore
//! use sketch_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./blink")
//!     .parser(JavaSourceParser::new())
//!     .rule(NoRecursion::new())
//!     .build()?;
//!
//! let report = analyzer.analyze()?;
//! report.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod allow_list;
mod analyzer;
mod config;
mod context;
mod index;
mod parser;
mod role;
mod rule;
mod syntax;
mod types;

pub mod marker;
pub mod source;

pub use allow_list::{AllowList, LibraryError, LibraryTypeLister};
pub use analyzer::{
    Analyzer, AnalyzerBuilder, AnalyzerError, CONFIGURABLE_DIAGNOSTICS, LIBRARY_UNAVAILABLE_CODE,
    LIBRARY_UNAVAILABLE_NAME,
    PARSE_FAILURE_CODE, PARSE_FAILURE_NAME,
};
pub use config::{AnalyzerConfig, Config, ConfigError, LibraryConfig, MarkerConfig, RuleConfig};
pub use context::SketchContext;
pub use index::{
    ResolvedSketch, SketchIndex, SketchRef, StrayRoutine, Tagged, MULTIPLE_SKETCHES_CODE,
    MULTIPLE_SKETCHES_NAME, NO_SKETCH_CODE, NO_SKETCH_NAME,
};
pub use parser::{ParseFailure, ParserBox, SourceParser};
pub use role::{Dialect, RolePolicy, RoleTag};
pub use rule::{Rule, RuleBox};
pub use syntax::{
    Annotation, Body, CallSite, Constructor, Declaration, DeclarationKind, Field, Import,
    Initializer, LocalVar, Member, Modifier, Modifiers, Param, Receiver, Routine, SourceUnit,
    Span, TypeKind, TypeRef, Visibility,
};
pub use types::{
    Label, Location, Severity, SketchSummary, Suggestion, ValidationReport, Violation,
    ViolationDiagnostic, OUTPUT_PREFIX,
};
