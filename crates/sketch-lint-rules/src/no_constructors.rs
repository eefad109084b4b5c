//! Rule to forbid constructors and initializer blocks in the sketch.
//!
//! The firmware runtime never instantiates the sketch the way the JVM would,
//! so construction-time code has no place to run. Initialization belongs in
//! the init routine.

use sketch_lint_core::{Member, RoleTag, Rule, SketchContext, Suggestion, Violation};

/// Rule code for no-constructors.
pub const CODE: &str = "SK012";

/// Rule name for no-constructors.
pub const NAME: &str = "no-constructors";

/// Forbids constructors and initializer blocks.
#[derive(Debug, Clone, Default)]
pub struct NoConstructors;

impl NoConstructors {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoConstructors {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids constructors and initializer blocks in the sketch"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let decl = ctx.sketch.declaration();
        let help = Suggestion::new(format!(
            "Remove it and initialize in the {} routine",
            ctx.dialect.tag_name(RoleTag::InitRoutine)
        ));

        decl.members
            .iter()
            .filter_map(|member| match member {
                Member::Constructor(c) => Some((
                    c.span,
                    format!("constructor not allowed in sketch `{}`", decl.name),
                )),
                Member::Initializer(i) => Some((
                    i.span,
                    format!(
                        "{} not allowed in sketch `{}`",
                        if i.is_static { "static initializer" } else { "initializer block" },
                        decl.name
                    ),
                )),
                _ => None,
            })
            .map(|(span, message)| {
                Violation::new(CODE, NAME, self.default_severity(), ctx.location(span), message)
                    .with_suggestion(help.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check_sketch, sketch, LIFECYCLE};

    fn check(members: &str) -> Vec<Violation> {
        check_sketch(&NoConstructors::new(), &sketch(members))
    }

    #[test]
    fn test_sketch_without_constructor_passes() {
        assert!(check(LIFECYCLE).is_empty());
    }

    #[test]
    fn test_detects_constructor() {
        let violations = check("public Blink() {}");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert!(violations[0].message.contains("constructor not allowed"));
        let help = &violations[0].suggestion.as_ref().unwrap().message;
        assert!(help.contains("@JavonoEmbeddedInit"));
    }

    #[test]
    fn test_detects_initializer_blocks() {
        let violations = check("{ }\nstatic { }");
        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.starts_with("initializer block"));
        assert!(violations[1].message.starts_with("static initializer"));
    }
}
