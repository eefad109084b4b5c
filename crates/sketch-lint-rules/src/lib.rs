//! # sketch-lint-rules
//!
//! Built-in sketch rules for sketch-lint.
//!
//! Each rule inspects the resolved sketch through a
//! [`SketchContext`](sketch_lint_core::SketchContext) and reports
//! independently. Discovery (SK001/SK002), parse failures (SK900), the
//! build marker (SK901), and library listing (SK902) are handled by the
//! analyzer in `sketch-lint-core`.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | SK010 | `sketch-declaration` | Sketch is a public, non-abstract class with no supertypes |
//! | SK011 | `no-inner-types` | No nested, local, or anonymous types |
//! | SK012 | `no-constructors` | No constructors or initializer blocks |
//! | SK013 | `no-try-blocks` | No try statements |
//! | SK014 | `no-thrown-errors` | No throws clauses |
//! | SK015 | `require-role-tags` | Every member carries exactly one role tag |
//! | SK016 | `field-rules` | Private fields of allow-listed types |
//! | SK017 | `lifecycle-routines` | Exactly one well-formed init and loop routine |
//! | SK018 | `user-routines` | Private user routines with allow-listed signatures |
//! | SK020 | `local-calls` | Local calls name a routine of the sketch |
//! | SK021 | `no-recursion` | Acyclic user-routine call graph |
//! | SK022 | `cross-role-calls` | Nothing calls init or loop |
//! | SK023 | `external-calls` | Receivers are allow-listed objects |
//! | SK024 | `local-variable-types` | Locals use allow-listed types |
//!
//! ## Usage
//!
//! ```ignore
//! use sketch_lint_core::Analyzer;
//! use sketch_lint_java::JavaSourceParser;
//! use sketch_lint_rules::recommended_rules;
//!
//! let analyzer = Analyzer::builder()
//!     .root(".")
//!     .parser(JavaSourceParser::new())
//!     .rules(recommended_rules())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod call_graph;
mod cross_role_calls;
mod external_calls;
mod field_rules;
mod lifecycle_routines;
mod local_calls;
mod local_variable_types;
mod no_constructors;
mod no_inner_types;
mod no_recursion;
mod no_thrown_errors;
mod no_try_blocks;
mod presets;
mod require_role_tags;
mod sketch_declaration;
mod user_routines;
mod util;

#[cfg(test)]
mod test_support;

pub use call_graph::CallGraph;
pub use cross_role_calls::CrossRoleCalls;
pub use external_calls::ExternalCalls;
pub use field_rules::FieldRules;
pub use lifecycle_routines::LifecycleRoutines;
pub use local_calls::LocalCalls;
pub use local_variable_types::LocalVariableTypes;
pub use no_constructors::NoConstructors;
pub use no_inner_types::NoInnerTypes;
pub use no_recursion::NoRecursion;
pub use no_thrown_errors::NoThrownErrors;
pub use no_try_blocks::NoTryBlocks;
pub use presets::{
    all_rules, configured_rules, recommended_rules, relaxed_rules, strict_rules, Preset,
};
pub use require_role_tags::RequireRoleTags;
pub use sketch_declaration::SketchDeclaration;
pub use user_routines::UserRoutines;

/// Re-export core types for convenience.
pub use sketch_lint_core::{Rule, Severity, Violation};
