//! Rule requiring every sketch member to carry exactly one role tag.
//!
//! Untagged members are collected into a single diagnostic so a sketch with
//! many helpers produces one readable message. Members with several tags, or
//! with the sketch tag, are reported one by one.
//!
//! # Configuration
//!
//! ```toml
//! [rules.require-role-tags]
//! tag_fields = false   # only routines need a tag
//! ```

use sketch_lint_core::{
    Annotation, Label, Location, RoleTag, Rule, SketchContext, Suggestion, Violation,
};

/// Rule code for require-role-tags.
pub const CODE: &str = "SK015";

/// Rule name for require-role-tags.
pub const NAME: &str = "require-role-tags";

/// Requires one member role tag on each routine and (optionally) field.
#[derive(Debug, Clone)]
pub struct RequireRoleTags {
    /// Whether fields must be tagged too.
    pub tag_fields: bool,
}

impl Default for RequireRoleTags {
    fn default() -> Self {
        Self::new()
    }
}

impl RequireRoleTags {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { tag_fields: true }
    }

    /// Sets whether fields must be tagged.
    #[must_use]
    pub fn tag_fields(mut self, tag_fields: bool) -> Self {
        self.tag_fields = tag_fields;
        self
    }

    fn member_tags(ctx: &SketchContext<'_>) -> String {
        RoleTag::MEMBER_ROLES
            .iter()
            .map(|r| ctx.dialect.tag_name(*r))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A sketch member with the role tags it carries.
struct TaggedMember<'a> {
    kind: &'static str,
    name: &'a str,
    annotations: &'a [Annotation],
    roles: &'a [RoleTag],
    location: Location,
}

impl Rule for RequireRoleTags {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires every sketch member to carry exactly one role tag"
    }

    fn check(&self, ctx: &SketchContext<'_>) -> Vec<Violation> {
        let mut members: Vec<TaggedMember<'_>> = Vec::new();
        if self.tag_fields {
            members.extend(ctx.sketch.fields().map(|f| TaggedMember {
                kind: "field",
                name: &f.item.name,
                annotations: &f.item.annotations,
                roles: f.roles,
                location: ctx.location(f.item.span),
            }));
        }
        members.extend(ctx.sketch.routines().map(|r| TaggedMember {
            kind: "routine",
            name: &r.item.name,
            annotations: &r.item.annotations,
            roles: r.roles,
            location: ctx.location(r.item.span),
        }));
        members.sort_by_key(|m| (m.location.line, m.location.column));

        let tags = Self::member_tags(ctx);
        let mut violations = Vec::new();

        let untagged: Vec<&TaggedMember<'_>> = members.iter().filter(|m| m.roles.is_empty()).collect();
        if let Some(first) = untagged.first() {
            let names: Vec<String> = untagged
                .iter()
                .map(|m| format!("{} `{}`", m.kind, m.name))
                .collect();
            let mut v = Violation::new(
                CODE,
                NAME,
                self.default_severity(),
                first.location.clone(),
                format!(
                    "every member of sketch `{}` must carry a role tag; untagged: {}",
                    ctx.sketch_name(),
                    names.join(", ")
                ),
            )
            .with_suggestion(Suggestion::new(format!("Annotate each member with one of {tags}")));
            for m in untagged.iter().skip(1) {
                v = v.with_label(Label::new(
                    m.location.clone(),
                    format!("{} `{}` has no role tag", m.kind, m.name),
                ));
            }
            violations.push(v);
        }

        for m in &members {
            let misplaced_sketch_tag = m.roles.contains(&RoleTag::Sketch);
            if m.roles.len() < 2 && !misplaced_sketch_tag {
                continue;
            }
            let written: Vec<String> = m
                .annotations
                .iter()
                .filter(|a| ctx.dialect.role_of(a).is_some())
                .map(|a| format!("@{}", a.simple_name()))
                .collect();
            let message = if misplaced_sketch_tag {
                format!(
                    "{} `{}` carries the sketch tag {}",
                    m.kind,
                    m.name,
                    ctx.dialect.tag_name(RoleTag::Sketch)
                )
            } else {
                format!(
                    "{} `{}` carries {} role tags: {}",
                    m.kind,
                    m.name,
                    m.roles.len(),
                    written.join(", ")
                )
            };
            violations.push(
                Violation::new(CODE, NAME, self.default_severity(), m.location.clone(), message)
                    .with_suggestion(Suggestion::new(format!("Keep exactly one of {tags}"))),
            );
        }

        violations
    }
}
