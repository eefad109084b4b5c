//! Rule trait for defining sketch rules.

use crate::context::SketchContext;
use crate::types::{Severity, Violation};

/// A rule checked against the resolved sketch.
///
/// Rules run only after discovery settled on exactly one sketch declaration.
/// Each rule reports independently; the analyzer collects every diagnostic.
///
/// # Example
///
/// ```ignore
/// use sketch_lint_core::{Rule, SketchContext, Violation, Severity};
///
/// pub struct NoEmptySketch;
///
/// impl Rule for NoEmptySketch {
///     fn name(&self) -> &'static str { "no-empty-sketch" }
///     fn code(&self) -> &'static str { "SK099" }
///
///     fn check(&self, ctx: &SketchContext) -> Vec<Violation> {
///         let decl = ctx.sketch.declaration();
///         if decl.members.is_empty() {
///             vec![Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 ctx.location(decl.span),
///                 "sketch has no members",
///             )]
///         } else {
///             vec![]
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-recursion").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "SK021").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks the sketch and returns any violations found.
    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
            vec![Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                ctx.location(ctx.sketch.declaration().span),
                "Test violation",
            )]
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.description(), "A test rule");
        assert_eq!(rule.default_severity(), Severity::Error);
    }
}
