//! Rule to forbid type declarations nested in the sketch.

use sketch_lint_core::{DeclarationKind, Rule, SketchContext, Suggestion, Violation};

use crate::util::owned_bodies;

/// Rule code for no-inner-types.
pub const CODE: &str = "SK011";

/// Rule name for no-inner-types.
pub const NAME: &str = "no-inner-types";

/// Forbids member, local, and anonymous type declarations inside the sketch.
#[derive(Debug, Clone, Default)]
pub struct NoInnerTypes;

impl NoInnerTypes {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoInnerTypes {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids nested, local, and anonymous type declarations in the sketch"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let decl = ctx.sketch.declaration();
        let help = Suggestion::new("Inner or nested types are not allowed; use fields and user routines");
        let mut violations: Vec<Violation> = decl
            .inner_types()
            .map(|inner| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location(inner.span),
                    format!("inner {} `{}` not allowed in sketch `{}`", inner.kind, inner.name, decl.name),
                )
                .with_suggestion(help.clone())
            })
            .collect();

        for owned in owned_bodies(decl) {
            for nested in &owned.body.nested_types {
                let message = if nested.kind == DeclarationKind::Anonymous {
                    let base = nested
                        .superclass
                        .as_ref()
                        .map_or_else(String::new, |t| format!(" of `{t}`"));
                    format!("anonymous class{base} not allowed in {}", owned.owner)
                } else {
                    format!("local {} `{}` not allowed in {}", nested.kind, nested.name, owned.owner)
                };
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        ctx.location(nested.span),
                        message,
                    )
                    .with_suggestion(help.clone()),
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
        check_sketch(&NoInnerTypes::new(), &sketch(members))
    }

    #[test]
    fn test_flat_sketch_passes() {
        assert!(check("private int x;").is_empty());
    }

    #[test]
    fn test_detects_member_types() {
        let violations = check("class Helper {}\ninterface Callback {}\nenum Mode { ON }");
        assert_eq!(violations.len(), 3);
        assert!(violations[0].message.contains("inner class `Helper`"));
        assert!(violations[1].message.contains("inner interface `Callback`"));
        assert!(violations[2].message.contains("inner enum `Mode`"));
    }

    #[test]
    fn test_detects_local_and_anonymous_classes() {
        let violations = check(
            r"
    @JavonoEmbeddedUserMethod
    private void work() {
        class Local {}
        Object o = new Object() { };
    }
",
        );
        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.contains("local class `Local` not allowed in routine `work`"));
        assert!(violations[1].message.contains("anonymous class of `Object`"));
    }
}
