//! Rule to forbid try statements in the sketch.

use sketch_lint_core::{Rule, SketchContext, Suggestion, Violation};

use crate::util::owned_bodies;

/// Rule code for no-try-blocks.
pub const CODE: &str = "SK013";

/// Rule name for no-try-blocks.
pub const NAME: &str = "no-try-blocks";

/// Forbids `try` statements, including try-with-resources, in every body.
#[derive(Debug, Clone, Default)]
pub struct NoTryBlocks;

impl NoTryBlocks {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoTryBlocks {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids try statements in the sketch"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        owned_bodies(ctx.sketch.declaration())
            .into_iter()
            .flat_map(|owned| {
                owned.body.try_blocks.iter().map(move |span| {
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        ctx.location(*span),
                        format!("try block not allowed in {}", owned.owner),
                    )
                    .with_suggestion(Suggestion::new(
                        "The device has no exception runtime; check results explicitly",
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check_sketch, sketch};

    fn check(members: &str) -> Vec<Violation> {
        check_sketch(&NoTryBlocks::new(), &sketch(members))
    }

    #[test]
    fn test_detects_try_catch_and_try_with_resources() {
        let violations = check(
            r"
    @JavonoEmbeddedLoop
    private void loop() {
        try { tick(); } catch (RuntimeException e) { }
        try (Serial s = open()) { }
    }
",
        );
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| v.message == "try block not allowed in routine `loop`"));
        assert!(violations[0].location.line < violations[1].location.line);
    }

    #[test]
    fn test_nested_try_counts_each() {
        let violations = check(
            "private void f() { try { try { } finally { } } finally { } }",
        );
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_plain_body_passes() {
        assert!(check("private void f() { if (true) { g(); } }").is_empty());
    }
}
