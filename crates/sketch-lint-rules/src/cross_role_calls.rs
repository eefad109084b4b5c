//! Rule to forbid calls into lifecycle routines.
//!
//! Init and loop are entry points driven by the firmware runtime. Calling
//! them from inside the sketch, including a routine calling itself by name,
//! breaks the run-once / run-forever contract.

use sketch_lint_core::{RoleTag, Rule, SketchContext, Suggestion, Violation};

use crate::util::owned_bodies;

/// Rule code for cross-role-calls.
pub const CODE: &str = "SK022";

/// Rule name for cross-role-calls.
pub const NAME: &str = "cross-role-calls";

/// Flags local calls whose caller role may not call the callee role.
#[derive(Debug, Clone, Default)]
pub struct CrossRoleCalls;

impl CrossRoleCalls {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for CrossRoleCalls {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids calling the init or loop routine from inside the sketch"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for owned in owned_bodies(ctx.sketch.declaration()) {
            let Some(routine) = owned.routine else {
                continue;
            };
            let Some(caller) = ctx.sketch.role_of_routine(&routine.name) else {
                continue;
            };
            if caller == RoleTag::Sketch {
                continue;
            }

            for call in owned.body.calls.iter().filter(|c| c.receiver.is_local()) {
                let Some(callee) = ctx.sketch.role_of_routine(&call.name) else {
                    continue;
                };
                if callee == RoleTag::Sketch || caller.may_call(callee) {
                    continue;
                }
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        ctx.location(call.span),
                        format!(
                            "{} calling {}: `{}` calls {} routine `{}`",
                            caller.short_name(),
                            callee.short_name(),
                            routine.name,
                            ctx.dialect.tag_name(callee),
                            call.name
                        ),
                    )
                    .with_suggestion(Suggestion::new(
                        "Move the shared code into a user routine and call that instead",
                    )),
                );
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check_sketch, sketch};

    fn check(members: &str) -> Vec<Violation> {
        check_sketch(&CrossRoleCalls::new(), &sketch(members))
    }

    #[test]
    fn test_calls_to_user_routines_pass() {
        let violations = check(
            r"
    @JavonoEmbeddedInit
    private void setup() { configure(); }

    @JavonoEmbeddedLoop
    private void loop() { configure(); }

    @JavonoEmbeddedUserMethod
    private void configure() {}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_detects_loop_calling_init() {
        let violations = check(
            r"
    @JavonoEmbeddedInit
    private void setup() {}

    @JavonoEmbeddedLoop
    private void loop() { setup(); }
",
        );
        assert_eq!(violations.len(), 1);
        insta::assert_snapshot!(violations[0].format().trim_end(), @r"
[sketch-lint] SK022 cross-role-calls at src/Sketch.java:10:27
  error: loop calling init: `loop` calls @JavonoEmbeddedInit routine `setup`
  = help: Move the shared code into a user routine and call that instead
");
    }

    #[test]
    fn test_detects_every_forbidden_pair() {
        let violations = check(
            r"
    @JavonoEmbeddedInit
    private void setup() { loop(); this.setup(); }

    @JavonoEmbeddedLoop
    private void loop() { loop(); }

    @JavonoEmbeddedUserMethod
    private void helper() { setup(); loop(); }
",
        );
        let prefixes: Vec<&str> = violations
            .iter()
            .map(|v| v.message.split(':').next().unwrap_or_default())
            .collect();
        assert_eq!(
            prefixes,
            vec![
                "init calling loop",
                "init calling init",
                "loop calling loop",
                "user routine calling init",
                "user routine calling loop",
            ]
        );
    }
}
