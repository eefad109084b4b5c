//! Rule to forbid recursion among user routines.
//!
//! # Rationale
//!
//! The target devices have small fixed stacks and no overflow detection.
//! Any cycle in the user-routine call graph, direct or mutual, is rejected.
//!
//! Only the first cycle found is reported, once per sketch.

use sketch_lint_core::{Label, Rule, SketchContext, Suggestion, Violation};

use crate::call_graph::CallGraph;

/// Rule code for no-recursion.
pub const CODE: &str = "SK021";

/// Rule name for no-recursion.
pub const NAME: &str = "no-recursion";

/// Forbids cycles in the user-routine call graph.
#[derive(Debug, Clone, Default)]
pub struct NoRecursion;

impl NoRecursion {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoRecursion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids direct and mutual recursion among user routines"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let graph = CallGraph::from_context(ctx);
        let Some(cycle) = graph.find_cycle() else {
            return Vec::new();
        };
        tracing::debug!("Call cycle in {}: {:?}", ctx.sketch_name(), cycle);

        let edges: Vec<(&str, &str)> = cycle
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
            .collect();
        let Some(&(first_caller, first_callee)) = edges.first() else {
            return Vec::new();
        };
        let span = graph
            .call_span(first_caller, first_callee)
            .unwrap_or(ctx.sketch.declaration().span);

        let mut v = Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location(span),
            format!(
                "user routines form a cycle in sketch `{}` ({}): {}",
                ctx.sketch_name(),
                ctx.sketch_file().display(),
                cycle.join(" -> ")
            ),
        )
        .with_suggestion(Suggestion::new("Unroll the recursion into a loop"));
        for &(caller, callee) in edges.iter().skip(1) {
            if let Some(span) = graph.call_span(caller, callee) {
                v = v.with_label(Label::new(
                    ctx.location(span),
                    format!("{caller} calls {callee}"),
                ));
            }
        }

        vec![v]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check_sketch, sketch, LIFECYCLE};

    fn check(members: &str) -> Vec<Violation> {
        check_sketch(&NoRecursion::new(), &sketch(&format!("{LIFECYCLE}\n{members}")))
    }

    #[test]
    fn test_call_chain_passes() {
        let violations = check(
            r"
    @JavonoEmbeddedUserMethod
    private void a() { b(); c(); }

    @JavonoEmbeddedUserMethod
    private void b() { c(); }

    @JavonoEmbeddedUserMethod
    private void c() {}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_detects_self_recursion() {
        let violations = check(
            "@JavonoEmbeddedUserMethod\nprivate int fact(int n) { return n * fact(n - 1); }",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.ends_with(": fact -> fact"));
        assert!(violations[0].labels.is_empty());
    }

    #[test]
    fn test_detects_mutual_recursion_once() {
        let violations = check(
            r"
    @JavonoEmbeddedUserMethod
    private void ping() { pong(); }

    @JavonoEmbeddedUserMethod
    private void pong() { this.ping(); }
",
        );
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(
            v.message,
            "user routines form a cycle in sketch `Blink` (src/Sketch.java): ping -> pong -> ping"
        );
        assert_eq!(v.labels.len(), 1);
        assert_eq!(v.labels[0].message, "pong calls ping");
    }

    #[test]
    fn test_lifecycle_routines_are_not_nodes() {
        let violations = check(
            r"
    @JavonoEmbeddedUserMethod
    private void helper() { loop(); }
",
        );
        assert!(violations.is_empty());
    }
}
