//! The set of types a sketch may use.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::role::Dialect;
use crate::syntax::{SourceUnit, TypeKind, TypeRef};

/// Errors raised while listing the types of the library namespace.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The library location does not exist.
    #[error("library location not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error while reading the library.
    #[error("failed to read library at {}: {source}", path.display())]
    Io {
        /// Location being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The packaged archive could not be opened.
    #[error("invalid library archive {}: {message}", path.display())]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Reader error message.
        message: String,
    },
}

/// Lists the type names available in a library namespace.
///
/// Implementations query an unpacked class directory, a source tree, or a
/// packaged archive.
pub trait LibraryTypeLister: Send + Sync {
    /// Short description of where types are read from, for logs.
    fn describe(&self) -> String;

    /// Lists simple type names declared directly in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying location cannot be read.
    fn list_types(&self, namespace: &str) -> Result<BTreeSet<String>, LibraryError>;
}

/// Type names permitted as field, parameter, return, or local types and as
/// receivers of external calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    primitives: BTreeSet<String>,
    text_type: String,
    text_type_namespace: String,
    library_namespace: String,
    library_types: BTreeSet<String>,
    wildcard: bool,
}

impl AllowList {
    /// Creates the fixed part of the allow-list: primitives and the text type.
    #[must_use]
    pub fn new(dialect: &Dialect) -> Self {
        Self {
            primitives: dialect.primitives.iter().cloned().collect(),
            text_type: dialect.text_type.clone(),
            text_type_namespace: dialect.text_type_namespace.clone(),
            library_namespace: dialect.library_namespace.clone(),
            library_types: BTreeSet::new(),
            wildcard: false,
        }
    }

    /// Seeds the allow-list from the imports of `unit`.
    ///
    /// Explicit imports from the library namespace add their simple name.
    /// A wildcard import of the namespace adds every type `lister` reports.
    /// Returns the allow-list and, when listing failed, the error so the
    /// caller can report it.
    #[must_use]
    pub fn for_unit(
        unit: &SourceUnit,
        dialect: &Dialect,
        lister: Option<&dyn LibraryTypeLister>,
    ) -> (Self, Option<LibraryError>) {
        let mut list = Self::new(dialect);
        let namespace = dialect.library_namespace.as_str();
        let prefix = format!("{namespace}.");

        for import in unit.imports.iter().filter(|i| !i.is_static) {
            if import.wildcard && import.path == namespace {
                list.wildcard = true;
            } else if !import.wildcard && import.path.starts_with(&prefix) {
                if let Some((_, name)) = import.path.rsplit_once('.') {
                    list.library_types.insert(name.to_string());
                }
            }
        }

        let mut failure = None;
        if list.wildcard {
            match lister {
                Some(lister) => match lister.list_types(namespace) {
                    Ok(types) => {
                        tracing::debug!(
                            "Listed {} library types from {}",
                            types.len(),
                            lister.describe()
                        );
                        list.library_types.extend(types);
                    }
                    Err(e) => failure = Some(e),
                },
                None => {
                    failure = Some(LibraryError::NotFound(PathBuf::from(
                        namespace.replace('.', "/"),
                    )));
                }
            }
        }

        (list, failure)
    }

    /// Library types currently on the list.
    #[must_use]
    pub fn library_types(&self) -> &BTreeSet<String> {
        &self.library_types
    }

    /// Returns true if `name` is a library type on the list.
    #[must_use]
    pub fn is_library_type(&self, name: &str) -> bool {
        self.library_types.contains(name)
    }

    /// Returns true if a simple type name is on the list.
    #[must_use]
    pub fn allows_name(&self, name: &str) -> bool {
        self.primitives.contains(name) || name == self.text_type || self.is_library_type(name)
    }

    /// Returns true if `ty` may be used as a field, parameter, or local type.
    #[must_use]
    pub fn allows(&self, ty: &TypeRef) -> bool {
        match ty.kind {
            TypeKind::Primitive => self.primitives.contains(&ty.text),
            TypeKind::Simple => self.allows_name(&ty.text),
            TypeKind::Qualified => match ty.split_qualified() {
                Some((ns, name)) if ns == self.library_namespace => {
                    !self.wildcard || self.library_types.is_empty() || self.is_library_type(name)
                }
                Some((ns, name)) => ns == self.text_type_namespace && name == self.text_type,
                None => false,
            },
            TypeKind::Void | TypeKind::Array | TypeKind::Generic | TypeKind::Inferred => false,
        }
    }

    /// Returns true if `ty` may be used as a routine return type.
    #[must_use]
    pub fn allows_return(&self, ty: &TypeRef) -> bool {
        ty.is_void() || self.allows(ty)
    }

    /// Human-readable description of what is allowed, for help messages.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut names: Vec<&str> = self.primitives.iter().map(String::as_str).collect();
        names.push(&self.text_type);
        format!(
            "{}, or types from {}",
            names.join(", "),
            self.library_namespace
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Import, Span};

    struct FixedLister(Vec<&'static str>);

    impl LibraryTypeLister for FixedLister {
        fn describe(&self) -> String {
            "fixed".into()
        }

        fn list_types(&self, _namespace: &str) -> Result<BTreeSet<String>, LibraryError> {
            Ok(self.0.iter().map(|s| (*s).to_string()).collect())
        }
    }

    fn unit_with_imports(imports: &[(&str, bool)]) -> SourceUnit {
        SourceUnit {
            imports: imports
                .iter()
                .map(|(path, wildcard)| Import {
                    path: (*path).to_string(),
                    is_static: false,
                    wildcard: *wildcard,
                    span: Span::default(),
                })
                .collect(),
            ..SourceUnit::default()
        }
    }

    fn simple(name: &str) -> TypeRef {
        TypeRef::new(name, TypeKind::Simple)
    }

    #[test]
    fn fixed_types_always_allowed() {
        let list = AllowList::new(&Dialect::default());
        assert!(list.allows(&TypeRef::new("int", TypeKind::Primitive)));
        assert!(list.allows(&simple("String")));
        assert!(list.allows(&TypeRef::new("java.lang.String", TypeKind::Qualified)));
        assert!(!list.allows(&TypeRef::new("double", TypeKind::Primitive)));
        assert!(!list.allows(&simple("Thread")));
        assert!(!list.allows(&TypeRef::new("int[]", TypeKind::Array)));
        assert!(!list.allows(&TypeRef::void()));
        assert!(list.allows_return(&TypeRef::void()));
    }

    #[test]
    fn explicit_import_adds_simple_name() {
        let unit = unit_with_imports(&[("javono.lib.GPIO", false), ("java.util.List", false)]);
        let (list, failure) = AllowList::for_unit(&unit, &Dialect::default(), None);
        assert!(failure.is_none());
        assert!(list.allows(&simple("GPIO")));
        assert!(!list.allows(&simple("List")));
    }

    #[test]
    fn wildcard_import_uses_lister() {
        let unit = unit_with_imports(&[("javono.lib", true)]);
        let lister = FixedLister(vec!["GPIO", "Serial"]);
        let (list, failure) = AllowList::for_unit(&unit, &Dialect::default(), Some(&lister));
        assert!(failure.is_none());
        assert!(list.allows(&simple("Serial")));
        assert!(!list.allows(&simple("Wifi")));
    }

    #[test]
    fn wildcard_without_lister_reports_failure() {
        let unit = unit_with_imports(&[("javono.lib", true)]);
        let (list, failure) = AllowList::for_unit(&unit, &Dialect::default(), None);
        assert!(matches!(failure, Some(LibraryError::NotFound(_))));
        assert!(list.library_types().is_empty());
    }

    #[test]
    fn qualified_library_type_is_allowed() {
        let list = AllowList::new(&Dialect::default());
        assert!(list.allows(&TypeRef::new("javono.lib.GPIO", TypeKind::Qualified)));
        assert!(!list.allows(&TypeRef::new("java.util.List", TypeKind::Qualified)));
    }
}
