//! Rule checking programmer-defined helper routines.

use sketch_lint_core::{RoleTag, Rule, SketchContext, Suggestion, Violation};

use crate::util::policy_violations;

/// Rule code for user-routines.
pub const CODE: &str = "SK018";

/// Rule name for user-routines.
pub const NAME: &str = "user-routines";

/// Requires user routines to live in the sketch, be private and non-static,
/// and use allow-listed parameter and return types.
#[derive(Debug, Clone, Default)]
pub struct UserRoutines;

impl UserRoutines {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UserRoutines {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires private, non-static user routines with allow-listed signatures"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let tag = ctx.dialect.tag_name(RoleTag::UserRoutine);
        let types_help = format!("Use {}", ctx.allow_list.describe());
        let mut violations = Vec::new();

        for tagged in ctx
            .sketch
            .routines()
            .filter(|t| t.roles == [RoleTag::UserRoutine])
        {
            let routine = tagged.item;
            violations.extend(policy_violations(
                ctx,
                routine,
                RoleTag::UserRoutine,
                CODE,
                NAME,
                self.default_severity(),
            ));

            if !ctx.allow_list.allows_return(&routine.return_type) {
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        ctx.location(routine.span),
                        format!(
                            "{tag} routine `{}` has disallowed return type `{}`",
                            routine.name, routine.return_type
                        ),
                    )
                    .with_suggestion(Suggestion::new(format!(
                        "Return void or use {}",
                        ctx.allow_list.describe()
                    ))),
                );
            }
            for param in routine
                .params
                .iter()
                .filter(|p| !ctx.allow_list.allows(&p.ty))
            {
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        ctx.location(param.span),
                        format!(
                            "parameter `{}` of `{}` has disallowed type `{}`",
                            param.name, routine.name, param.ty
                        ),
                    )
                    .with_suggestion(Suggestion::new(types_help.clone())),
                );
            }
        }

        for stray in ctx
            .sketch
            .strays
            .iter()
            .filter(|s| s.role == RoleTag::UserRoutine)
        {
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.stray_location(stray),
                    format!(
                        "{tag} routine `{}` declared outside the sketch, in `{}`",
                        stray.routine.name, stray.owner
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Move it into sketch `{}`",
                    ctx.sketch_name()
                ))),
            );
        }

        violations
    }
}
