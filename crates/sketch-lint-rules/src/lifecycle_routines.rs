//! Rule checking the init and loop routines.
//!
//! # Rationale
//!
//! The firmware runtime calls exactly one init routine once and exactly one
//! loop routine forever after. Both are generated as plain `void f(void)`
//! functions, so neither can take arguments, return a value, or be static.
//!
//! Routines carrying several role tags count toward the totals here but are
//! only reported by `require-role-tags`.

use sketch_lint_core::{Label, RoleTag, Routine, Rule, SketchContext, Suggestion, Violation};

use crate::util::policy_violations;

/// Rule code for lifecycle-routines.
pub const CODE: &str = "SK017";

/// Rule name for lifecycle-routines.
pub const NAME: &str = "lifecycle-routines";

/// Requires exactly one well-formed init and loop routine in the sketch.
#[derive(Debug, Clone, Default)]
pub struct LifecycleRoutines;

impl LifecycleRoutines {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check_count(
        &self,
        ctx: &SketchContext<'_>,
        role: RoleTag,
        routines: &[&Routine],
    ) -> Option<Violation> {
        let tag = ctx.dialect.tag_name(role);
        match routines {
            [] => Some(
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location(ctx.sketch.declaration().span),
                    format!("missing {tag} routine in sketch `{}`", ctx.sketch_name()),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Add exactly one `private void` routine annotated with {tag}"
                ))),
            ),
            [_] => None,
            [first, rest @ ..] => {
                let names: Vec<&str> = routines.iter().map(|r| r.name.as_str()).collect();
                let mut v = Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location(first.span),
                    format!(
                        "multiple {tag} routines ({}): {}",
                        routines.len(),
                        names.join(", ")
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Keep exactly one routine annotated with {tag}"
                )));
                for other in rest {
                    v = v.with_label(Label::new(
                        ctx.location(other.span),
                        format!("`{}` is also tagged {tag}", other.name),
                    ));
                }
                Some(v)
            }
        }
    }
}

impl Rule for LifecycleRoutines {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires exactly one private void no-argument init and loop routine"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for role in [RoleTag::InitRoutine, RoleTag::LoopRoutine] {
            let routines = ctx.sketch.routines_with(role);
            violations.extend(self.check_count(ctx, role, &routines));

            for tagged in ctx.sketch.routines().filter(|t| t.roles == [role]) {
                violations.extend(policy_violations(
                    ctx,
                    tagged.item,
                    role,
                    CODE,
                    NAME,
                    self.default_severity(),
                ));
            }
        }

        for stray in ctx.sketch.strays.iter().filter(|s| s.role.is_lifecycle()) {
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.stray_location(stray),
                    format!(
                        "{} routine `{}` declared outside the sketch, in `{}`",
                        ctx.dialect.tag_name(stray.role),
                        stray.routine.name,
                        stray.owner
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
