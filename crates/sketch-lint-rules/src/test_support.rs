//! Runs a single rule over in-memory Java sources.

use std::collections::BTreeSet;
use std::path::Path;

use sketch_lint_core::{
    AllowList, Dialect, LibraryError, LibraryTypeLister, Rule, SketchContext, SketchIndex,
    SourceParser, SourceUnit, Violation,
};
use sketch_lint_java::JavaSourceParser;

/// Library types listed for `import javono.lib.*;`.
pub(crate) const LIBRARY_TYPES: &[&str] = &["GPIO", "Serial", "Timer"];

struct FixedLister;

impl LibraryTypeLister for FixedLister {
    fn describe(&self) -> String {
        "fixed".into()
    }

    fn list_types(&self, _namespace: &str) -> Result<BTreeSet<String>, LibraryError> {
        Ok(LIBRARY_TYPES.iter().map(|s| (*s).to_string()).collect())
    }
}

fn parse(path: &str, src: &str) -> SourceUnit {
    JavaSourceParser::new()
        .parse(Path::new(path), src)
        .expect("test source must parse")
}

/// Checks one file holding the sketch.
pub(crate) fn check_sketch(rule: &dyn Rule, src: &str) -> Vec<Violation> {
    check_files(rule, &[("src/Sketch.java", src)])
}

/// Checks several files; exactly one must declare the sketch.
pub(crate) fn check_files(rule: &dyn Rule, files: &[(&str, &str)]) -> Vec<Violation> {
    let units: Vec<SourceUnit> = files.iter().map(|(p, s)| parse(p, s)).collect();
    let dialect = Dialect::default();
    let mut index = SketchIndex::new(&dialect);
    for unit in &units {
        index.add_unit(unit);
    }
    let resolved = index
        .finalize(Path::new("."))
        .expect("test project must declare one sketch");
    let (allow_list, _) = AllowList::for_unit(resolved.sketch.unit, &dialect, Some(&FixedLister));
    let ctx = SketchContext::new(Path::new("."), &resolved, &allow_list, &dialect);
    rule.check(&ctx)
}

/// Wraps members in a valid sketch header with a wildcard library import.
pub(crate) fn sketch(members: &str) -> String {
    format!(
        "import javono.lib.*;\n\n@JavonoEmbeddedSketch\npublic class Blink {{\n{members}\n}}\n"
    )
}

/// Valid init and loop routines.
pub(crate) const LIFECYCLE: &str = r"
    @JavonoEmbeddedInit
    private void setup() {}

    @JavonoEmbeddedLoop
    private void loop() {}
";
