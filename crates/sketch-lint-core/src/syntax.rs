//! Language-neutral syntax model handed from a parser frontend to the validator.
//!
//! A [`SourceUnit`] is produced once per file and never mutated afterwards.
//! Routine bodies are not kept as trees: the frontend reduces each body to the
//! facts the rules need ([`Body`]), which keeps this crate independent of any
//! particular parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Position of a syntax element inside its file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Length in bytes.
    pub length: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }
}

/// One parsed source file.
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Package declaration, if any.
    pub package: Option<String>,
    /// Import declarations in source order.
    pub imports: Vec<Import>,
    /// Top-level type declarations.
    pub declarations: Vec<Declaration>,
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Imported name without the trailing `.*` (e.g. `javono.lib.GPIO`).
    pub path: String,
    /// `import static ...`
    pub is_static: bool,
    /// `import some.namespace.*;`
    pub wildcard: bool,
    /// Where the import is written.
    pub span: Span,
}

/// Declaration-level and member-level modifier keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `static`
    Static,
    /// `final`
    Final,
    /// `abstract`
    Abstract,
    /// `synchronized`
    Synchronized,
    /// `transient`
    Transient,
    /// `volatile`
    Volatile,
    /// `native`
    Native,
    /// `strictfp`
    Strictfp,
    /// `default`
    Default,
    /// `sealed`
    Sealed,
    /// `non-sealed`
    NonSealed,
}

impl Modifier {
    /// Maps a modifier keyword to its variant.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let modifier = match keyword {
            "public" => Self::Public,
            "protected" => Self::Protected,
            "private" => Self::Private,
            "static" => Self::Static,
            "final" => Self::Final,
            "abstract" => Self::Abstract,
            "synchronized" => Self::Synchronized,
            "transient" => Self::Transient,
            "volatile" => Self::Volatile,
            "native" => Self::Native,
            "strictfp" => Self::Strictfp,
            "default" => Self::Default,
            "sealed" => Self::Sealed,
            "non-sealed" => Self::NonSealed,
            _ => return None,
        };
        Some(modifier)
    }

    /// The keyword as written in source.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Static => "static",
            Self::Final => "final",
            Self::Abstract => "abstract",
            Self::Synchronized => "synchronized",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
            Self::Native => "native",
            Self::Strictfp => "strictfp",
            Self::Default => "default",
            Self::Sealed => "sealed",
            Self::NonSealed => "non-sealed",
        }
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Access level derived from the modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// No access modifier.
    Package,
    /// `private`
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Protected => write!(f, "protected"),
            Self::Package => write!(f, "package-private"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// An ordered set of modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers(BTreeSet<Modifier>);

impl Modifiers {
    /// Creates a modifier set.
    #[must_use]
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        Self(modifiers.into_iter().collect())
    }

    /// Adds a modifier.
    pub fn insert(&mut self, modifier: Modifier) {
        self.0.insert(modifier);
    }

    /// Returns true if `modifier` is present.
    #[must_use]
    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    /// Iterates over the modifiers in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }

    /// Returns true when no modifier is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Access level implied by the modifiers.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        if self.contains(Modifier::Public) {
            Visibility::Public
        } else if self.contains(Modifier::Protected) {
            Visibility::Protected
        } else if self.contains(Modifier::Private) {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }

    /// Space-separated keywords, `<none>` when empty.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "<none>".to_string();
        }
        self.iter()
            .map(Modifier::keyword)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An annotation applied to a declaration or member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Name as written, possibly qualified (`a.b.Tag`).
    pub name: String,
    /// Where the annotation is written.
    pub span: Span,
}

impl Annotation {
    /// The last segment of the annotation name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Shape of a written type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `void`
    Void,
    /// A primitive keyword type (`int`, `char`, ...).
    Primitive,
    /// A single identifier (`String`, `GPIO`).
    Simple,
    /// A dotted name (`java.lang.String`).
    Qualified,
    /// Any array type.
    Array,
    /// A parameterized type (`List<String>`).
    Generic,
    /// Local type inference (`var`).
    Inferred,
}

/// A type reference as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Source text, whitespace-normalized.
    pub text: String,
    /// Shape of the type.
    pub kind: TypeKind,
}

impl TypeRef {
    /// Creates a type reference.
    #[must_use]
    pub fn new(text: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// The `void` pseudo-type.
    #[must_use]
    pub fn void() -> Self {
        Self::new("void", TypeKind::Void)
    }

    /// Returns true for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Void
    }

    /// Splits a qualified name into namespace and simple name.
    #[must_use]
    pub fn split_qualified(&self) -> Option<(&str, &str)> {
        if self.kind == TypeKind::Qualified {
            self.text.rsplit_once('.')
        } else {
            None
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `record`
    Record,
    /// `@interface`
    AnnotationType,
    /// `new T() { ... }`
    Anonymous,
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::AnnotationType => "annotation type",
            Self::Anonymous => "anonymous class",
        };
        f.write_str(s)
    }
}

/// A type declaration and its members.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Declared name (`<anonymous>` for anonymous classes).
    pub name: String,
    /// Declaration kind.
    pub kind: DeclarationKind,
    /// Modifier keywords.
    pub modifiers: Modifiers,
    /// Annotations on the declaration.
    pub annotations: Vec<Annotation>,
    /// `extends` clause of a class.
    pub superclass: Option<TypeRef>,
    /// `implements` clause (or `extends` list of an interface).
    pub interfaces: Vec<TypeRef>,
    /// Members in source order.
    pub members: Vec<Member>,
    /// Span of the declaration name.
    pub span: Span,
}

impl Declaration {
    /// Creates an empty declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DeclarationKind, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::default(),
            annotations: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            span,
        }
    }

    /// Iterates over routine members.
    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.members.iter().filter_map(|m| match m {
            Member::Routine(r) => Some(r),
            _ => None,
        })
    }

    /// Iterates over field members.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }

    /// Iterates over constructors.
    pub fn constructors(&self) -> impl Iterator<Item = &Constructor> {
        self.members.iter().filter_map(|m| match m {
            Member::Constructor(c) => Some(c),
            _ => None,
        })
    }

    /// Iterates over member type declarations.
    pub fn inner_types(&self) -> impl Iterator<Item = &Declaration> {
        self.members.iter().filter_map(|m| match m {
            Member::InnerType(d) => Some(d),
            _ => None,
        })
    }

    /// Iterates over every body in the declaration: routines, constructors,
    /// and initializer blocks.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.members.iter().filter_map(|m| match m {
            Member::Routine(r) => r.body.as_ref(),
            Member::Constructor(c) => Some(&c.body),
            Member::Initializer(i) => Some(&i.body),
            Member::Field(f) => f.initializer.as_ref(),
            Member::InnerType(_) => None,
        })
    }

    /// Names of all routines declared directly in this declaration.
    #[must_use]
    pub fn routine_names(&self) -> BTreeSet<&str> {
        self.routines().map(|r| r.name.as_str()).collect()
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone)]
pub enum Member {
    /// A field (one per declarator).
    Field(Field),
    /// A method.
    Routine(Routine),
    /// A constructor.
    Constructor(Constructor),
    /// A nested type declaration.
    InnerType(Declaration),
    /// An instance or static initializer block.
    Initializer(Initializer),
}

/// A field declaration.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Modifier keywords.
    pub modifiers: Modifiers,
    /// Annotations on the field.
    pub annotations: Vec<Annotation>,
    /// Declared type.
    pub ty: TypeRef,
    /// Facts about the initializer expression, if any.
    pub initializer: Option<Body>,
    /// Span of the field name.
    pub span: Span,
}

/// A routine (method) declaration.
#[derive(Debug, Clone)]
pub struct Routine {
    /// Routine name.
    pub name: String,
    /// Modifier keywords.
    pub modifiers: Modifiers,
    /// Annotations on the routine.
    pub annotations: Vec<Annotation>,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Formal parameters.
    pub params: Vec<Param>,
    /// Declared thrown types.
    pub throws: Vec<TypeRef>,
    /// Body facts; `None` for abstract or native routines.
    pub body: Option<Body>,
    /// Span of the routine name.
    pub span: Span,
}

/// A constructor declaration.
#[derive(Debug, Clone)]
pub struct Constructor {
    /// Constructor name (the class name).
    pub name: String,
    /// Modifier keywords.
    pub modifiers: Modifiers,
    /// Formal parameters.
    pub params: Vec<Param>,
    /// Declared thrown types.
    pub throws: Vec<TypeRef>,
    /// Body facts.
    pub body: Body,
    /// Span of the constructor name.
    pub span: Span,
}

/// An initializer block.
#[derive(Debug, Clone)]
pub struct Initializer {
    /// `static { ... }`
    pub is_static: bool,
    /// Body facts.
    pub body: Body,
    /// Span of the block.
    pub span: Span,
}

/// A formal parameter.
#[derive(Debug, Clone)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Span of the parameter.
    pub span: Span,
}

/// Facts extracted from a routine body.
#[derive(Debug, Clone, Default)]
pub struct Body {
    /// Every call expression, in source order.
    pub calls: Vec<CallSite>,
    /// Every `try` statement.
    pub try_blocks: Vec<Span>,
    /// Every local variable declaration.
    pub locals: Vec<LocalVar>,
    /// Local and anonymous type declarations.
    pub nested_types: Vec<Declaration>,
}

impl Body {
    /// Looks up the declared type of a local variable by name.
    #[must_use]
    pub fn local_type(&self, name: &str) -> Option<&TypeRef> {
        self.locals.iter().find(|l| l.name == name).map(|l| &l.ty)
    }
}

/// What a call expression is invoked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// `foo()`
    None,
    /// `this.foo()`
    SelfRef,
    /// `super.foo()`
    Super,
    /// `name.foo()`; `name` may be a variable or a type.
    Identifier(String),
    /// Any other receiver expression (`a.b.foo()`, `bar().foo()`).
    Expression(String),
}

impl Receiver {
    /// Returns true for calls that resolve against the enclosing declaration.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::None | Self::SelfRef)
    }
}

/// A call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Called routine name.
    pub name: String,
    /// Receiver of the call.
    pub receiver: Receiver,
    /// Full source text of the call, for messages.
    pub text: String,
    /// Span of the call.
    pub span: Span,
}

/// A local variable declaration.
#[derive(Debug, Clone)]
pub struct LocalVar {
    /// Variable name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Span of the variable name.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_defaults_to_package() {
        assert_eq!(Modifiers::default().visibility(), Visibility::Package);
        assert_eq!(
            Modifiers::new([Modifier::Private, Modifier::Final]).visibility(),
            Visibility::Private
        );
    }

    #[test]
    fn modifiers_describe_in_stable_order() {
        let mods = Modifiers::new([Modifier::Static, Modifier::Public]);
        assert_eq!(mods.describe(), "public static");
        assert_eq!(Modifiers::default().describe(), "<none>");
    }

    #[test]
    fn modifier_keywords_round_trip() {
        for kw in ["public", "non-sealed", "transient"] {
            let m = Modifier::from_keyword(kw).unwrap();
            assert_eq!(m.keyword(), kw);
        }
        assert!(Modifier::from_keyword("class").is_none());
    }

    #[test]
    fn annotation_simple_name_strips_qualifier() {
        let a = Annotation {
            name: "com.example.Tag".into(),
            span: Span::default(),
        };
        assert_eq!(a.simple_name(), "Tag");
    }

    #[test]
    fn qualified_type_splits_namespace() {
        let t = TypeRef::new("javono.lib.GPIO", TypeKind::Qualified);
        assert_eq!(t.split_qualified(), Some(("javono.lib", "GPIO")));
        assert!(TypeRef::new("GPIO", TypeKind::Simple).split_qualified().is_none());
    }
}
