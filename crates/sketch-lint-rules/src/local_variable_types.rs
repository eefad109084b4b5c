//! Rule requiring allow-listed types for local variables.

use sketch_lint_core::{Rule, SketchContext, Suggestion, TypeKind, Violation};

use crate::util::owned_bodies;

/// Rule code for local-variable-types.
pub const CODE: &str = "SK024";

/// Rule name for local-variable-types.
pub const NAME: &str = "local-variable-types";

/// Requires every local variable to declare an allow-listed type.
#[derive(Debug, Clone, Default)]
pub struct LocalVariableTypes;

impl LocalVariableTypes {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for LocalVariableTypes {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires local variables to use allow-listed types; `var` is rejected"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for owned in owned_bodies(ctx.sketch.declaration()) {
            for local in owned.body.locals.iter().filter(|l| !ctx.allow_list.allows(&l.ty)) {
                let help = if local.ty.kind == TypeKind::Inferred {
                    "Declare the type explicitly".to_string()
                } else {
                    format!("Use {}", ctx.allow_list.describe())
                };
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        ctx.location(local.span),
                        format!(
                            "local variable `{}` in {} has disallowed type `{}`",
                            local.name, owned.owner, local.ty
                        ),
                    )
                    .with_suggestion(Suggestion::new(help)),
                );
            }
        }

        violations
    }
}
