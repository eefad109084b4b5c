//! Declaration classifier and the per-run sketch index.
//!
//! Units are added one at a time with [`SketchIndex::add_unit`]. Nothing is
//! decided until [`SketchIndex::finalize`], so a sketch may live in any file
//! and every duplicate is reported in the same run.

use std::path::Path;

use crate::role::{Dialect, RoleTag};
use crate::syntax::{Declaration, Field, Routine, SourceUnit, Span};
use crate::types::{Label, Location, Severity, Suggestion, Violation};

/// Rule code for a project without a sketch declaration.
pub const NO_SKETCH_CODE: &str = "SK001";
/// Rule name for a project without a sketch declaration.
pub const NO_SKETCH_NAME: &str = "no-sketch";
/// Rule code for projects declaring several sketches.
pub const MULTIPLE_SKETCHES_CODE: &str = "SK002";
/// Rule name for projects declaring several sketches.
pub const MULTIPLE_SKETCHES_NAME: &str = "multiple-sketches";

/// A declaration carrying the sketch tag, together with its file.
#[derive(Debug, Clone, Copy)]
pub struct SketchRef<'a> {
    /// The unit declaring the sketch.
    pub unit: &'a SourceUnit,
    /// The sketch declaration.
    pub declaration: &'a Declaration,
}

impl SketchRef<'_> {
    /// File declaring the sketch.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.unit.path
    }

    /// Location of a span inside the sketch's file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        Location::from_span(self.unit.path.clone(), span)
    }
}

/// A role-tagged routine declared outside every sketch candidate.
#[derive(Debug, Clone, Copy)]
pub struct StrayRoutine<'a> {
    /// Unit declaring the routine.
    pub unit: &'a SourceUnit,
    /// Name of the enclosing declaration.
    pub owner: &'a str,
    /// The routine.
    pub routine: &'a Routine,
    /// Role tag it carries.
    pub role: RoleTag,
}

/// A member of the sketch with the role tags it carries.
#[derive(Debug, Clone, Copy)]
pub struct Tagged<'a, T> {
    /// The member.
    pub item: &'a T,
    /// Role tags in source order.
    pub roles: &'a [RoleTag],
}

/// Accumulator built while scanning units.
#[derive(Debug)]
pub struct SketchIndex<'a> {
    dialect: &'a Dialect,
    candidates: Vec<SketchRef<'a>>,
    strays: Vec<StrayRoutine<'a>>,
    units_seen: usize,
}

impl<'a> SketchIndex<'a> {
    /// Creates an empty index.
    #[must_use]
    pub fn new(dialect: &'a Dialect) -> Self {
        Self {
            dialect,
            candidates: Vec::new(),
            strays: Vec::new(),
            units_seen: 0,
        }
    }

    /// Classifies the top-level declarations of one unit.
    pub fn add_unit(&mut self, unit: &'a SourceUnit) {
        self.units_seen += 1;
        for declaration in &unit.declarations {
            let roles = self.dialect.roles_of(&declaration.annotations);
            if roles.contains(&RoleTag::Sketch) {
                tracing::debug!(
                    "Sketch candidate {} in {}",
                    declaration.name,
                    unit.path.display()
                );
                self.candidates.push(SketchRef { unit, declaration });
            } else {
                self.collect_strays(unit, declaration);
            }
        }
    }

    fn collect_strays(&mut self, unit: &'a SourceUnit, declaration: &'a Declaration) {
        for routine in declaration.routines() {
            for role in self.dialect.roles_of(&routine.annotations) {
                if role != RoleTag::Sketch {
                    self.strays.push(StrayRoutine {
                        unit,
                        owner: &declaration.name,
                        routine,
                        role,
                    });
                }
            }
        }
        for inner in declaration.inner_types() {
            self.collect_strays(unit, inner);
        }
    }

    /// Settles on the single sketch declaration.
    ///
    /// # Errors
    ///
    /// Returns discovery diagnostics when zero or several candidates exist.
    /// Several candidates produce one diagnostic per candidate.
    pub fn finalize(self, root: &Path) -> Result<ResolvedSketch<'a>, Vec<Violation>> {
        match self.candidates.len() {
            0 => {
                let tag = self.dialect.tag_name(RoleTag::Sketch);
                Err(vec![Violation::new(
                    NO_SKETCH_CODE,
                    NO_SKETCH_NAME,
                    Severity::Error,
                    Location::new(root.to_path_buf(), 0, 0),
                    format!(
                        "no sketch found: no class annotated with {tag} in {} file(s)",
                        self.units_seen
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Annotate exactly one public class with {tag}"
                )))])
            }
            1 => {
                let sketch = self.candidates[0];
                Ok(ResolvedSketch::new(sketch, self.strays, self.dialect))
            }
            n => {
                let all: Vec<String> = self
                    .candidates
                    .iter()
                    .map(|c| format!("{} ({})", c.declaration.name, c.unit.path.display()))
                    .collect();
                Err(self
                    .candidates
                    .iter()
                    .map(|c| {
                        let mut v = Violation::new(
                            MULTIPLE_SKETCHES_CODE,
                            MULTIPLE_SKETCHES_NAME,
                            Severity::Error,
                            c.location(c.declaration.span),
                            format!(
                                "multiple sketch declarations: {n} classes annotated with {}: {}",
                                self.dialect.tag_name(RoleTag::Sketch),
                                all.join(", ")
                            ),
                        )
                        .with_suggestion(Suggestion::new("Keep only one sketch class per project"));
                        for other in self
                            .candidates
                            .iter()
                            .filter(|o| !std::ptr::eq(o.declaration, c.declaration))
                        {
                            v = v.with_label(Label::new(
                                other.location(other.declaration.span),
                                format!("{} is also a sketch", other.declaration.name),
                            ));
                        }
                        v
                    })
                    .collect())
            }
        }
    }
}

/// The unique sketch with its members grouped by role.
#[derive(Debug)]
pub struct ResolvedSketch<'a> {
    /// The sketch declaration and its file.
    pub sketch: SketchRef<'a>,
    /// Role-tagged routines found outside the sketch.
    pub strays: Vec<StrayRoutine<'a>>,
    routine_roles: Vec<(&'a Routine, Vec<RoleTag>)>,
    field_roles: Vec<(&'a Field, Vec<RoleTag>)>,
}

impl<'a> ResolvedSketch<'a> {
    fn new(sketch: SketchRef<'a>, strays: Vec<StrayRoutine<'a>>, dialect: &Dialect) -> Self {
        let routine_roles = sketch
            .declaration
            .routines()
            .map(|r| (r, dialect.roles_of(&r.annotations)))
            .collect();
        let field_roles = sketch
            .declaration
            .fields()
            .map(|f| (f, dialect.roles_of(&f.annotations)))
            .collect();
        Self {
            sketch,
            strays,
            routine_roles,
            field_roles,
        }
    }

    /// The sketch declaration.
    #[must_use]
    pub fn declaration(&self) -> &'a Declaration {
        self.sketch.declaration
    }

    /// Name of the sketch declaration.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.sketch.declaration.name
    }

    /// Routines of the sketch with their role tags.
    pub fn routines(&self) -> impl Iterator<Item = Tagged<'_, Routine>> {
        self.routine_roles.iter().map(|(item, roles)| Tagged {
            item: *item,
            roles: roles.as_slice(),
        })
    }

    /// Fields of the sketch with their role tags.
    pub fn fields(&self) -> impl Iterator<Item = Tagged<'_, Field>> {
        self.field_roles.iter().map(|(item, roles)| Tagged {
            item: *item,
            roles: roles.as_slice(),
        })
    }

    /// Routines carrying `role` (possibly among other tags).
    #[must_use]
    pub fn routines_with(&self, role: RoleTag) -> Vec<&'a Routine> {
        self.routine_roles
            .iter()
            .filter(|(_, roles)| roles.contains(&role))
            .map(|(r, _)| *r)
            .collect()
    }

    /// The user routines.
    #[must_use]
    pub fn user_routines(&self) -> Vec<&'a Routine> {
        self.routines_with(RoleTag::UserRoutine)
    }

    /// The single role of the routine named `name`, when it has exactly one.
    ///
    /// Overloads sharing a name resolve to the first declared one that carries
    /// a single tag.
    #[must_use]
    pub fn role_of_routine(&self, name: &str) -> Option<RoleTag> {
        self.routine_roles
            .iter()
            .filter(|(r, _)| r.name == name)
            .find_map(|(_, roles)| match roles.as_slice() {
                [role] => Some(*role),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Annotation, DeclarationKind, Member, Modifiers, TypeRef};
    use std::path::PathBuf;

    fn tag(name: &str) -> Annotation {
        Annotation {
            name: name.into(),
            span: Span::default(),
        }
    }

    fn routine(name: &str, tags: &[&str]) -> Member {
        Member::Routine(Routine {
            name: name.into(),
            modifiers: Modifiers::default(),
            annotations: tags.iter().map(|t| tag(t)).collect(),
            return_type: TypeRef::void(),
            params: vec![],
            throws: vec![],
            body: None,
            span: Span::default(),
        })
    }

    fn unit(path: &str, decls: Vec<Declaration>) -> SourceUnit {
        SourceUnit {
            path: PathBuf::from(path),
            declarations: decls,
            ..SourceUnit::default()
        }
    }

    fn sketch(name: &str, members: Vec<Member>) -> Declaration {
        let mut d = Declaration::new(name, DeclarationKind::Class, Span::new(3, 14, 40, 5));
        d.annotations.push(tag("JavonoEmbeddedSketch"));
        d.members = members;
        d
    }

    #[test]
    fn no_candidates_reports_no_sketch() {
        let dialect = Dialect::default();
        let units = vec![unit("A.java", vec![Declaration::new(
            "A",
            DeclarationKind::Class,
            Span::default(),
        )])];
        let mut index = SketchIndex::new(&dialect);
        for u in &units {
            index.add_unit(u);
        }
        let errors = index.finalize(Path::new(".")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, NO_SKETCH_CODE);
        assert!(errors[0].message.contains("no sketch found"));
    }

    #[test]
    fn sketches_across_files_are_all_reported() {
        let dialect = Dialect::default();
        let units = vec![
            unit("A.java", vec![sketch("A", vec![])]),
            unit("B.java", vec![sketch("B", vec![])]),
        ];
        let mut index = SketchIndex::new(&dialect);
        for u in &units {
            index.add_unit(u);
        }
        let errors = index.finalize(Path::new(".")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == MULTIPLE_SKETCHES_CODE));
        assert_eq!(errors[0].location.file, PathBuf::from("A.java"));
        assert_eq!(errors[1].location.file, PathBuf::from("B.java"));
        assert!(errors[0].message.contains("B (B.java)"));
        assert_eq!(errors[0].labels.len(), 1);
    }

    #[test]
    fn resolved_sketch_groups_routines_by_role() {
        let dialect = Dialect::default();
        let units = vec![unit(
            "Blink.java",
            vec![sketch(
                "Blink",
                vec![
                    routine("setup", &["JavonoEmbeddedInit"]),
                    routine("loop", &["JavonoEmbeddedLoop"]),
                    routine("blink", &["JavonoEmbeddedUserMethod"]),
                    routine("odd", &["JavonoEmbeddedUserMethod", "JavonoEmbeddedLoop"]),
                ],
            )],
        )];
        let mut index = SketchIndex::new(&dialect);
        index.add_unit(&units[0]);
        let resolved = index.finalize(Path::new(".")).unwrap();

        assert_eq!(resolved.name(), "Blink");
        assert_eq!(resolved.routines_with(RoleTag::InitRoutine).len(), 1);
        assert_eq!(resolved.routines_with(RoleTag::LoopRoutine).len(), 2);
        assert_eq!(resolved.role_of_routine("blink"), Some(RoleTag::UserRoutine));
        assert_eq!(resolved.role_of_routine("odd"), None);
        let odd = resolved.routines().find(|t| t.item.name == "odd").unwrap();
        assert_eq!(odd.roles.len(), 2);
    }

    #[test]
    fn tagged_routines_outside_sketch_are_strays() {
        let dialect = Dialect::default();
        let mut helper = Declaration::new("Helper", DeclarationKind::Class, Span::default());
        helper.members.push(routine("assist", &["JavonoEmbeddedUserMethod"]));
        let units = vec![
            unit("Blink.java", vec![sketch("Blink", vec![])]),
            unit("Helper.java", vec![helper]),
        ];
        let mut index = SketchIndex::new(&dialect);
        for u in &units {
            index.add_unit(u);
        }
        let resolved = index.finalize(Path::new(".")).unwrap();
        assert_eq!(resolved.strays.len(), 1);
        assert_eq!(resolved.strays[0].owner, "Helper");
        assert_eq!(resolved.strays[0].role, RoleTag::UserRoutine);
    }
}
