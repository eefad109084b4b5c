//! Rule restricting calls with an explicit receiver.
//!
//! A receiver is accepted only when it is a plain identifier whose declared
//! type is on the allow-list. Identifiers resolve against the enclosing
//! routine's parameters and locals first, then the sketch fields. With
//! `allow_static_library_calls` an identifier naming a library type is
//! accepted as a static call.
//!
//! # Configuration
//!
//! ```toml
//! [rules.external-calls]
//! allow_static_library_calls = false
//! ```

use sketch_lint_core::{CallSite, Receiver, Rule, SketchContext, Suggestion, TypeRef, Violation};

use crate::util::{owned_bodies, OwnedBody};

/// Rule code for external-calls.
pub const CODE: &str = "SK023";

/// Rule name for external-calls.
pub const NAME: &str = "external-calls";

/// Restricts receivers of external calls to allow-listed objects.
#[derive(Debug, Clone)]
pub struct ExternalCalls {
    /// Whether `Type.call()` on a library type is allowed.
    pub allow_static_library_calls: bool,
}

impl Default for ExternalCalls {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalCalls {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_static_library_calls: true,
        }
    }

    /// Sets whether static calls on library types are allowed.
    #[must_use]
    pub fn allow_static_library_calls(mut self, allow: bool) -> Self {
        self.allow_static_library_calls = allow;
        self
    }

    /// Returns the reason a call is rejected, or `None` when it is legal.
    fn rejection(
        &self,
        ctx: &SketchContext<'_>,
        owned: &OwnedBody<'_>,
        call: &CallSite,
    ) -> Option<String> {
        match &call.receiver {
            Receiver::None | Receiver::SelfRef => None,
            Receiver::Super => Some("calls through `super` have no target in the sketch".into()),
            Receiver::Expression(expr) => Some(format!(
                "receiver `{expr}` is not a plain variable or library type"
            )),
            Receiver::Identifier(name) => match resolve(ctx, owned, name) {
                Some(ty) if ctx.allow_list.allows(ty) => None,
                Some(ty) => Some(format!("receiver `{name}` has disallowed type `{ty}`")),
                None if ctx.allow_list.is_library_type(name) => {
                    if self.allow_static_library_calls {
                        None
                    } else {
                        Some(format!("static calls on library type `{name}` are disabled"))
                    }
                }
                None => Some(format!(
                    "receiver `{name}` does not resolve to a variable or library type"
                )),
            },
        }
    }
}

/// Declared type of `name` as seen from `owned`.
fn resolve<'a>(ctx: &SketchContext<'a>, owned: &OwnedBody<'a>, name: &str) -> Option<&'a TypeRef> {
    owned
        .routine
        .and_then(|r| r.params.iter().find(|p| p.name == name).map(|p| &p.ty))
        .or_else(|| owned.body.local_type(name))
        .or_else(|| {
            ctx.sketch
                .declaration()
                .fields()
                .find(|f| f.name == name)
                .map(|f| &f.ty)
        })
}

impl Rule for ExternalCalls {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Allows external calls only on objects of allow-listed types"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for owned in owned_bodies(ctx.sketch.declaration()) {
            for call in &owned.body.calls {
                let Some(reason) = self.rejection(ctx, &owned, call) else {
                    continue;
                };
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        ctx.location(call.span),
                        format!("external call not allowed: `{}` in {}", call.text, owned.owner),
                    )
                    .with_suggestion(Suggestion::new(format!(
                        "{reason}; call routines on {}",
                        ctx.allow_list.describe()
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

    fn check(rule: &ExternalCalls, members: &str) -> Vec<Violation> {
        check_sketch(rule, &sketch(members))
    }

    #[test]
    fn test_allow_listed_receivers_pass() {
        let violations = check(
            &ExternalCalls::new(),
            r"
    private GPIO led;
    private String label;

    @JavonoEmbeddedUserMethod
    private void run(Serial port) {
        Timer t = Timer.start(5);
        led.write(1);
        port.print(label.length());
        t.stop();
        GPIO.reset();
    }
",
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_detects_system_out() {
        let violations = check(
            &ExternalCalls::new(),
            "private void f() { System.out.println(1); }",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "external call not allowed: `System.out.println(1)` in routine `f`"
        );
    }

    #[test]
    fn test_detects_unlisted_receiver_type() {
        let violations = check(
            &ExternalCalls::new(),
            "private Motor m;\nprivate void f() { m.spin(); }",
        );
        assert_eq!(violations.len(), 1);
        let help = &violations[0].suggestion.as_ref().unwrap().message;
        assert!(help.starts_with("receiver `m` has disallowed type `Motor`"));
    }

    #[test]
    fn test_locals_shadow_fields() {
        let violations = check(
            &ExternalCalls::new(),
            "private GPIO pin;\nprivate void f(Motor pin) { pin.write(1); }",
        );
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_detects_super_and_unknown_receivers() {
        let violations = check(
            &ExternalCalls::new(),
            "private void f() { super.toString(); Math.abs(1); make().go(); }",
        );
        assert_eq!(violations.len(), 3);
        let help = &violations[1].suggestion.as_ref().unwrap().message;
        assert!(help.contains("`Math` does not resolve"));
    }

    #[test]
    fn test_static_library_calls_can_be_disabled() {
        let rule = ExternalCalls::new().allow_static_library_calls(false);
        let violations = check(&rule, "private void f() { GPIO.reset(); }");
        assert_eq!(violations.len(), 1);
    }
}
