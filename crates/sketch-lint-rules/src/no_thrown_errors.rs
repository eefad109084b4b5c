//! Rule to forbid `throws` clauses on sketch routines.

use sketch_lint_core::{Rule, SketchContext, Suggestion, Violation};

/// Rule code for no-thrown-errors.
pub const CODE: &str = "SK014";

/// Rule name for no-thrown-errors.
pub const NAME: &str = "no-thrown-errors";

/// Forbids routines that declare thrown types.
#[derive(Debug, Clone, Default)]
pub struct NoThrownErrors;

impl NoThrownErrors {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoThrownErrors {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids routines declaring thrown types"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        ctx.sketch
            .declaration()
            .routines()
            .filter(|r| !r.throws.is_empty())
            .map(|r| {
                let thrown: Vec<String> = r.throws.iter().map(ToString::to_string).collect();
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location(r.span),
                    format!(
                        "routine `{}` must not declare thrown types: {}",
                        r.name,
                        thrown.join(", ")
                    ),
                )
                .with_suggestion(Suggestion::new("Remove the throws clause"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check_sketch, sketch, LIFECYCLE};

    #[test]
    fn test_detects_throws_clause() {
        let violations = check_sketch(
            &NoThrownErrors::new(),
            &sketch("private void f() throws Exception, java.io.IOException {}"),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "routine `f` must not declare thrown types: Exception, java.io.IOException"
        );
    }

    #[test]
    fn test_routines_without_throws_pass() {
        assert!(check_sketch(&NoThrownErrors::new(), &sketch(LIFECYCLE)).is_empty());
    }
}
