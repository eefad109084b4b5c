//! Rule checking field modifiers and field types.

use sketch_lint_core::{Modifier, Rule, SketchContext, Suggestion, Violation};

/// Rule code for field-rules.
pub const CODE: &str = "SK016";

/// Rule name for field-rules.
pub const NAME: &str = "field-rules";

/// Requires fields to be `private` (optionally `final`) and of an
/// allow-listed type.
#[derive(Debug, Clone, Default)]
pub struct FieldRules;

impl FieldRules {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for FieldRules {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires private (or private final) fields of allow-listed types"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field in ctx.sketch.declaration().fields() {
            let location = ctx.location(field.span);
            let allowed_modifiers = field
                .modifiers
                .iter()
                .all(|m| matches!(m, Modifier::Private | Modifier::Final))
                && field.modifiers.contains(Modifier::Private);
            if !allowed_modifiers {
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        location.clone(),
                        format!(
                            "field `{}` has disallowed modifiers `{}`",
                            field.name,
                            field.modifiers.describe()
                        ),
                    )
                    .with_suggestion(Suggestion::new(
                        "Fields may only be `private` or `private final`",
                    )),
                );
            }
            if !ctx.allow_list.allows(&field.ty) {
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        location,
                        format!("field `{}` has disallowed type `{}`", field.name, field.ty),
                    )
                    .with_suggestion(Suggestion::new(format!(
                        "Use {}",
                        ctx.allow_list.describe()
                    ))),
                );
            }
        }

        violations
    }
}
