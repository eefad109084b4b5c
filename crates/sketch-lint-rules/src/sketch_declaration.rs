//! Rule checking the shape of the sketch declaration itself.
//!
//! # Rationale
//!
//! The sketch is translated into a single firmware translation unit. It must
//! be a plain, instantiable class with no supertypes to pull in.
//!
//! # Detected Patterns
//!
//! ```java
//! @JavonoEmbeddedSketch
//! class Blink extends Base implements Runnable { }   // not public, extends, implements
//! ```

use sketch_lint_core::{DeclarationKind, Modifier, Rule, SketchContext, Suggestion, Violation};

/// Rule code for sketch-declaration.
pub const CODE: &str = "SK010";

/// Rule name for sketch-declaration.
pub const NAME: &str = "sketch-declaration";

/// Supertypes equivalent to declaring none.
const IMPLICIT_ROOTS: &[&str] = &["Object", "java.lang.Object"];

/// Requires the sketch to be a public, concrete, standalone class.
#[derive(Debug, Clone, Default)]
pub struct SketchDeclaration;

impl SketchDeclaration {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for SketchDeclaration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires the sketch to be a public, non-abstract class without extends or implements"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let decl = ctx.sketch.declaration();
        let location = ctx.location(decl.span);
        let mut violations = Vec::new();
        let mut report = |message: String, help: &str| {
            violations.push(
                Violation::new(CODE, NAME, self.default_severity(), location.clone(), message)
                    .with_suggestion(Suggestion::new(help)),
            );
        };

        if decl.kind != DeclarationKind::Class {
            report(
                format!("sketch `{}` must be a class, found {}", decl.name, decl.kind),
                "Declare the sketch with `public class`",
            );
        }
        if !decl.modifiers.contains(Modifier::Public) {
            report(
                format!(
                    "sketch class `{}` must be public, found {}",
                    decl.name,
                    decl.modifiers.visibility()
                ),
                "Add the `public` modifier",
            );
        }
        if decl.modifiers.contains(Modifier::Abstract) {
            report(
                format!("sketch class `{}` must not be abstract", decl.name),
                "Remove the `abstract` modifier",
            );
        }
        if let Some(superclass) = &decl.superclass {
            if !IMPLICIT_ROOTS.contains(&superclass.text.as_str()) {
                report(
                    format!(
                        "inheritance not allowed: `{}` extends `{superclass}`",
                        decl.name
                    ),
                    "Keep the sketch standalone; move shared code into user routines",
                );
            }
        }
        if !decl.interfaces.is_empty() {
            let names: Vec<String> = decl.interfaces.iter().map(ToString::to_string).collect();
            report(
                format!(
                    "interface implementation not allowed: `{}` implements {}",
                    decl.name,
                    names.join(", ")
                ),
                "Remove the implements clause",
            );
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check_sketch;

    fn check(src: &str) -> Vec<Violation> {
        check_sketch(&SketchDeclaration::new(), src)
    }

    #[test]
    fn test_plain_public_class_passes() {
        assert!(check("@JavonoEmbeddedSketch public class Blink {}").is_empty());
        assert!(check("@JavonoEmbeddedSketch public class Blink extends Object {}").is_empty());
        assert!(
            check("@JavonoEmbeddedSketch public class Blink extends java.lang.Object {}").is_empty()
        );
    }

    #[test]
    fn test_detects_inheritance() {
        let violations = check("@JavonoEmbeddedSketch public class Blink extends Base {}");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert!(violations[0].message.contains("inheritance not allowed"));
        assert!(violations[0].message.contains("Base"));
    }

    #[test]
    fn test_detects_interfaces() {
        let violations =
            check("@JavonoEmbeddedSketch public class Blink implements Runnable, Cloneable {}");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Runnable, Cloneable"));
    }

    #[test]
    fn test_detects_visibility_and_abstract() {
        let violations = check("@JavonoEmbeddedSketch abstract class Blink {}");
        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.contains("must be public"));
        assert!(violations[1].message.contains("abstract"));
    }

    #[test]
    fn test_detects_non_class_sketch() {
        let violations = check("@JavonoEmbeddedSketch public interface Blink {}");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("must be a class, found interface"));
    }
}
