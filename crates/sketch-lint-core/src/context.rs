//! Context handed to sketch rules.

use std::path::Path;

use crate::allow_list::AllowList;
use crate::index::{ResolvedSketch, StrayRoutine};
use crate::role::Dialect;
use crate::syntax::Span;
use crate::types::Location;

/// Everything a rule needs to check the resolved sketch.
///
/// Built once per run after classification succeeded. Rules only read from it.
#[derive(Debug, Clone, Copy)]
pub struct SketchContext<'a> {
    /// Project root.
    pub root: &'a Path,
    /// The unique sketch and the strays found around it.
    pub sketch: &'a ResolvedSketch<'a>,
    /// Types the sketch may use.
    pub allow_list: &'a AllowList,
    /// Annotation and type names of the dialect.
    pub dialect: &'a Dialect,
}

impl<'a> SketchContext<'a> {
    /// Creates a new sketch context.
    #[must_use]
    pub fn new(
        root: &'a Path,
        sketch: &'a ResolvedSketch<'a>,
        allow_list: &'a AllowList,
        dialect: &'a Dialect,
    ) -> Self {
        Self {
            root,
            sketch,
            allow_list,
            dialect,
        }
    }

    /// Name of the sketch declaration.
    #[must_use]
    pub fn sketch_name(&self) -> &'a str {
        self.sketch.name()
    }

    /// File declaring the sketch, relative to the root.
    #[must_use]
    pub fn sketch_file(&self) -> &'a Path {
        &self.sketch.sketch.unit.path
    }

    /// Location of a span inside the sketch's file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        Location::from_span(self.sketch_file().to_path_buf(), span)
    }

    /// Location of a stray routine.
    #[must_use]
    pub fn stray_location(&self, stray: &StrayRoutine<'_>) -> Location {
        Location::from_span(stray.unit.path.clone(), stray.routine.span)
    }
}
