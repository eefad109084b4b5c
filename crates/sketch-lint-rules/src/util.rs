//! Helpers shared by several rules.

use sketch_lint_core::{
    Body, Declaration, Member, RoleTag, Routine, Severity, SketchContext, Suggestion, Violation,
};

/// A body of the sketch together with a human-readable owner.
pub(crate) struct OwnedBody<'a> {
    /// Owner description, e.g. routine `setup`.
    pub owner: String,
    /// The routine owning the body, when it is one.
    pub routine: Option<&'a Routine>,
    /// The statements to inspect.
    pub body: &'a Body,
}

/// Every body of `decl` in member order.
pub(crate) fn owned_bodies(decl: &Declaration) -> Vec<OwnedBody<'_>> {
    decl.members
        .iter()
        .filter_map(|member| match member {
            Member::Routine(r) => r.body.as_ref().map(|body| OwnedBody {
                owner: format!("routine `{}`", r.name),
                routine: Some(r),
                body,
            }),
            Member::Constructor(c) => Some(OwnedBody {
                owner: format!("constructor `{}`", c.name),
                routine: None,
                body: &c.body,
            }),
            Member::Initializer(i) => Some(OwnedBody {
                owner: if i.is_static {
                    "static initializer".to_string()
                } else {
                    "initializer block".to_string()
                },
                routine: None,
                body: &i.body,
            }),
            Member::Field(f) => f.initializer.as_ref().map(|body| OwnedBody {
                owner: format!("initializer of field `{}`", f.name),
                routine: None,
                body,
            }),
            Member::InnerType(_) => None,
        })
        .collect()
}

/// Checks a routine against the policy of `role`.
pub(crate) fn policy_violations(
    ctx: &SketchContext<'_>,
    routine: &Routine,
    role: RoleTag,
    code: &'static str,
    name: &'static str,
    severity: Severity,
) -> Vec<Violation> {
    let Some(policy) = role.policy() else {
        return Vec::new();
    };
    let tag = ctx.dialect.tag_name(role);
    let location = ctx.location(routine.span);
    let mut violations = Vec::new();
    let mut report = |message: String, help: &str| {
        violations.push(
            Violation::new(code, name, severity, location.clone(), message)
                .with_suggestion(Suggestion::new(help)),
        );
    };

    let visibility = routine.modifiers.visibility();
    if visibility != policy.visibility {
        report(
            format!(
                "{tag} routine `{}` must be {}, found {visibility}",
                routine.name, policy.visibility
            ),
            "Declare the routine private",
        );
    }
    if !policy.allow_static && routine.modifiers.contains(sketch_lint_core::Modifier::Static) {
        report(
            format!("{tag} routine `{}` must not be static", routine.name),
            "Remove the `static` modifier",
        );
    }
    if policy.void_only && !routine.return_type.is_void() {
        report(
            format!(
                "{tag} routine `{}` must return void, found `{}`",
                routine.name, routine.return_type
            ),
            "Change the return type to void",
        );
    }
    if !policy.allow_params && !routine.params.is_empty() {
        report(
            format!(
                "{tag} routine `{}` must not take parameters, found {}",
                routine.name,
                routine.params.len()
            ),
            "Remove the parameters and keep state in fields",
        );
    }
    violations
}
