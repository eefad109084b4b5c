//! Role tags and the policy table attached to each role.
//!
//! A role tag is an annotation whose simple name matches one of the names
//! configured in [`Dialect`]. Legality of modifiers, signatures, and calls is
//! expressed as plain data in [`RolePolicy`] so it can be audited and tested
//! without a type checker.

use serde::{Deserialize, Serialize};

use crate::syntax::{Annotation, Visibility};

/// Role a declaration or member plays in a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleTag {
    /// The sketch declaration itself.
    Sketch,
    /// The one-shot initialization routine.
    InitRoutine,
    /// The repeating routine.
    LoopRoutine,
    /// A programmer-defined helper routine.
    UserRoutine,
}

impl RoleTag {
    /// Roles a sketch member may carry.
    pub const MEMBER_ROLES: [Self; 3] = [Self::InitRoutine, Self::LoopRoutine, Self::UserRoutine];

    /// Short lowercase name used in messages.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Sketch => "sketch",
            Self::InitRoutine => "init",
            Self::LoopRoutine => "loop",
            Self::UserRoutine => "user routine",
        }
    }

    /// Returns true for the init and loop routines.
    #[must_use]
    pub fn is_lifecycle(self) -> bool {
        matches!(self, Self::InitRoutine | Self::LoopRoutine)
    }

    /// Whether a routine with this role may call a routine with `callee`'s
    /// role through a local name.
    ///
    /// Lifecycle routines are entry points owned by the firmware runtime:
    /// nothing inside the sketch may call them, including themselves.
    /// Calls between user routines are allowed here and checked for cycles
    /// separately.
    #[must_use]
    pub fn may_call(self, callee: Self) -> bool {
        match callee {
            Self::InitRoutine | Self::LoopRoutine | Self::Sketch => false,
            Self::UserRoutine => true,
        }
    }

    /// Policy for routines carrying this role. `None` for [`RoleTag::Sketch`].
    #[must_use]
    pub fn policy(self) -> Option<RolePolicy> {
        match self {
            Self::Sketch => None,
            Self::InitRoutine | Self::LoopRoutine => Some(RolePolicy {
                visibility: Visibility::Private,
                allow_static: false,
                void_only: true,
                allow_params: false,
                exactly_one: true,
            }),
            Self::UserRoutine => Some(RolePolicy {
                visibility: Visibility::Private,
                allow_static: false,
                void_only: false,
                allow_params: true,
                exactly_one: false,
            }),
        }
    }
}

impl std::fmt::Display for RoleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Shape requirements for routines of one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePolicy {
    /// Required access level.
    pub visibility: Visibility,
    /// Whether `static` is permitted.
    pub allow_static: bool,
    /// Whether the routine must return `void`.
    pub void_only: bool,
    /// Whether the routine may declare parameters.
    pub allow_params: bool,
    /// Whether the sketch must declare exactly one routine with this role.
    pub exactly_one: bool,
}

/// Names that make up the sketch dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Annotation marking the sketch declaration.
    pub sketch_tag: String,
    /// Annotation marking the init routine.
    pub init_tag: String,
    /// Annotation marking the loop routine.
    pub loop_tag: String,
    /// Annotation marking user routines.
    pub user_tag: String,
    /// Namespace of the device library (`javono.lib`).
    pub library_namespace: String,
    /// The built-in text type.
    pub text_type: String,
    /// Namespace the text type lives in when written fully qualified.
    pub text_type_namespace: String,
    /// Permitted primitive types.
    pub primitives: Vec<String>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            sketch_tag: "JavonoEmbeddedSketch".to_string(),
            init_tag: "JavonoEmbeddedInit".to_string(),
            loop_tag: "JavonoEmbeddedLoop".to_string(),
            user_tag: "JavonoEmbeddedUserMethod".to_string(),
            library_namespace: "javono.lib".to_string(),
            text_type: "String".to_string(),
            text_type_namespace: "java.lang".to_string(),
            primitives: ["int", "float", "boolean", "char"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Dialect {
    /// Resolves an annotation to the role it denotes.
    #[must_use]
    pub fn role_of(&self, annotation: &Annotation) -> Option<RoleTag> {
        let name = annotation.simple_name();
        if name == self.sketch_tag {
            Some(RoleTag::Sketch)
        } else if name == self.init_tag {
            Some(RoleTag::InitRoutine)
        } else if name == self.loop_tag {
            Some(RoleTag::LoopRoutine)
        } else if name == self.user_tag {
            Some(RoleTag::UserRoutine)
        } else {
            None
        }
    }

    /// All role tags carried by a set of annotations, in source order.
    #[must_use]
    pub fn roles_of(&self, annotations: &[Annotation]) -> Vec<RoleTag> {
        annotations.iter().filter_map(|a| self.role_of(a)).collect()
    }

    /// Annotation name written for a role, with the leading `@`.
    #[must_use]
    pub fn tag_name(&self, role: RoleTag) -> String {
        let name = match role {
            RoleTag::Sketch => &self.sketch_tag,
            RoleTag::InitRoutine => &self.init_tag,
            RoleTag::LoopRoutine => &self.loop_tag,
            RoleTag::UserRoutine => &self.user_tag,
        };
        format!("@{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Span;

    fn annotation(name: &str) -> Annotation {
        Annotation {
            name: name.to_string(),
            span: Span::default(),
        }
    }

    #[test]
    fn resolves_simple_and_qualified_tags() {
        let dialect = Dialect::default();
        assert_eq!(
            dialect.role_of(&annotation("JavonoEmbeddedLoop")),
            Some(RoleTag::LoopRoutine)
        );
        assert_eq!(
            dialect.role_of(&annotation("javono.annotations.JavonoEmbeddedInit")),
            Some(RoleTag::InitRoutine)
        );
        assert_eq!(dialect.role_of(&annotation("Override")), None);
    }

    #[test]
    fn roles_of_keeps_duplicates() {
        let dialect = Dialect::default();
        let roles = dialect.roles_of(&[
            annotation("JavonoEmbeddedInit"),
            annotation("Deprecated"),
            annotation("JavonoEmbeddedLoop"),
        ]);
        assert_eq!(roles, vec![RoleTag::InitRoutine, RoleTag::LoopRoutine]);
    }

    #[test]
    fn lifecycle_routines_are_never_callable() {
        for caller in RoleTag::MEMBER_ROLES {
            assert!(!caller.may_call(RoleTag::InitRoutine));
            assert!(!caller.may_call(RoleTag::LoopRoutine));
            assert!(caller.may_call(RoleTag::UserRoutine));
        }
    }

    #[test]
    fn policy_table_matches_roles() {
        let init = RoleTag::InitRoutine.policy().unwrap();
        assert!(init.void_only && !init.allow_params && init.exactly_one);
        let user = RoleTag::UserRoutine.policy().unwrap();
        assert!(!user.void_only && user.allow_params && !user.exactly_one);
        assert_eq!(user.visibility, Visibility::Private);
        assert!(RoleTag::Sketch.policy().is_none());
    }

    #[test]
    fn tag_name_uses_configured_names() {
        let dialect = Dialect {
            init_tag: "Setup".into(),
            ..Dialect::default()
        };
        assert_eq!(dialect.tag_name(RoleTag::InitRoutine), "@Setup");
    }
}
