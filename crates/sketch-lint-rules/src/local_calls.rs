//! Rule requiring local calls to name a routine of the sketch.

use sketch_lint_core::{Receiver, Rule, SketchContext, Suggestion, Violation};

use crate::util::owned_bodies;

/// Rule code for local-calls.
pub const CODE: &str = "SK020";

/// Rule name for local-calls.
pub const NAME: &str = "local-calls";

/// Flags calls without a receiver (or on `this`) to routines the sketch
/// does not declare.
#[derive(Debug, Clone, Default)]
pub struct LocalCalls;

impl LocalCalls {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for LocalCalls {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires local calls to name a routine declared in the sketch"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let decl = ctx.sketch.declaration();
        let declared = decl.routine_names();
        let mut violations = Vec::new();

        for owned in owned_bodies(decl) {
            for call in owned
                .body
                .calls
                .iter()
                .filter(|c| c.receiver.is_local() && !declared.contains(c.name.as_str()))
            {
                let written = if call.receiver == Receiver::SelfRef {
                    format!("this.{}", call.name)
                } else {
                    call.name.clone()
                };
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        ctx.location(call.span),
                        format!("call to undefined local routine `{written}` in {}", owned.owner),
                    )
                    .with_suggestion(Suggestion::new(format!(
                        "Declare `{}` in sketch `{}` or call it on a library object",
                        call.name,
                        ctx.sketch_name()
                    ))),
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
        check_sketch(&LocalCalls::new(), &sketch(members))
    }

    #[test]
    fn test_declared_calls_pass() {
        let violations = check(
            r"
    @JavonoEmbeddedLoop
    private void loop() { blink(); this.blink(); }

    @JavonoEmbeddedUserMethod
    private void blink() {}
",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_detects_undefined_calls() {
        let violations = check(
            r"
    @JavonoEmbeddedLoop
    private void loop() { delay(100); this.tick(); }
",
        );
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].message,
            "call to undefined local routine `delay` in routine `loop`"
        );
        assert_eq!(
            violations[1].message,
            "call to undefined local routine `this.tick` in routine `loop`"
        );
    }

    #[test]
    fn test_receiver_calls_are_not_local() {
        assert!(check("private void f(GPIO g) { g.write(1); }").is_empty());
    }

    #[test]
    fn test_field_initializers_are_checked() {
        let violations = check("private int x = compute();");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.ends_with("in initializer of field `x`"));
    }
}
