//! Java source parser using Tree-sitter.

use std::path::Path;

use sketch_lint_core::{
    Annotation, Body, CallSite, Constructor, Declaration, DeclarationKind, Field, Import,
    Initializer, LocalVar, Member, Modifier, Modifiers, Param, ParseFailure, Receiver, Routine,
    SourceParser, SourceUnit, Span, TypeKind, TypeRef,
};
use tree_sitter::{Language, Node, Parser};

use crate::kind::{self, NodeExt};

/// Turns Java source into a [`SourceUnit`].
///
/// A tree with any ERROR or MISSING node is rejected as a whole; the failure
/// names the first bad position in document order.
pub struct JavaSourceParser {
    language: Language,
}

impl JavaSourceParser {
    /// Creates a new Java parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }
}

impl Default for JavaSourceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for JavaSourceParser {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn parse(&self, path: &Path, source: &str) -> Result<SourceUnit, ParseFailure> {
        let failure = |message: String, span: Span| ParseFailure {
            path: path.to_path_buf(),
            message,
            span,
        };

        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| failure(format!("failed to load java grammar: {e}"), Span::default()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| failure("parser produced no tree".into(), Span::default()))?;
        let root = tree.root_node();

        if root.has_error() {
            let (message, span) = first_error(root, source)
                .unwrap_or_else(|| ("syntax error".to_string(), span_of(root)));
            return Err(failure(message, span));
        }

        let mut unit = SourceUnit {
            path: path.to_path_buf(),
            ..SourceUnit::default()
        };
        let extractor = Extractor { src: source };

        for node in root.named_child_nodes() {
            match node.kind() {
                kind::PACKAGE_DECLARATION => {
                    unit.package = node
                        .named_child_nodes()
                        .into_iter()
                        .find(|c| c.kind() != kind::ANNOTATION && c.kind() != kind::MARKER_ANNOTATION)
                        .map(|c| c.text(source).to_string());
                }
                kind::IMPORT_DECLARATION => {
                    if let Some(import) = extractor.import(node) {
                        unit.imports.push(import);
                    }
                }
                k if kind::is_type_declaration(k) => {
                    unit.declarations.push(extractor.declaration(node));
                }
                _ => {}
            }
        }

        tracing::debug!(
            "Parsed {}: {} import(s), {} declaration(s)",
            path.display(),
            unit.imports.len(),
            unit.declarations.len()
        );
        Ok(unit)
    }
}

fn span_of(node: Node<'_>) -> Span {
    let start = node.start_position();
    Span::new(
        start.row + 1,
        start.column + 1,
        node.start_byte(),
        node.end_byte().saturating_sub(node.start_byte()),
    )
}

/// Finds the first ERROR or MISSING node in document order.
fn first_error(node: Node<'_>, src: &str) -> Option<(String, Span)> {
    if node.is_missing() {
        return Some((format!("missing `{}`", node.kind()), span_of(node)));
    }
    if node.is_error() {
        let text = node.text(src);
        let snippet: String = text.chars().take(40).collect();
        let message = if snippet.trim().is_empty() {
            "syntax error".to_string()
        } else {
            format!("syntax error near `{}`", snippet.trim())
        };
        return Some((message, span_of(node)));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(|child| first_error(child, src))
}

/// Stateless helpers bound to one source text.
#[derive(Clone, Copy)]
struct Extractor<'s> {
    src: &'s str,
}

impl<'s> Extractor<'s> {
    fn text(self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.src.as_bytes()).unwrap_or("")
    }

    fn import(self, node: Node<'_>) -> Option<Import> {
        let name = node
            .named_child_nodes()
            .into_iter()
            .find(|c| c.kind() != kind::ASTERISK)?;
        Some(Import {
            path: self.text(name).to_string(),
            is_static: node.child_by_kind(kind::STATIC).is_some(),
            wildcard: node.child_by_kind(kind::ASTERISK).is_some(),
            span: span_of(node),
        })
    }

    /// Modifier keywords and annotations of a declaration or member.
    fn modifiers(self, node: Node<'_>) -> (Modifiers, Vec<Annotation>) {
        let mut modifiers = Modifiers::default();
        let mut annotations = Vec::new();
        if let Some(mods) = node.child_by_kind(kind::MODIFIERS) {
            let mut cursor = mods.walk();
            for child in mods.children(&mut cursor) {
                match child.kind() {
                    kind::MARKER_ANNOTATION | kind::ANNOTATION => {
                        if let Some(name) = child.child_by_field_name("name") {
                            annotations.push(Annotation {
                                name: self.text(name).to_string(),
                                span: span_of(child),
                            });
                        }
                    }
                    keyword => {
                        if let Some(m) = Modifier::from_keyword(keyword) {
                            modifiers.insert(m);
                        }
                    }
                }
            }
        }
        (modifiers, annotations)
    }

    fn type_ref(self, node: Node<'_>) -> TypeRef {
        let text: String = self.text(node).split_whitespace().collect::<Vec<_>>().join(" ");
        let kind = match node.kind() {
            kind::VOID_TYPE => TypeKind::Void,
            kind::INTEGRAL_TYPE | kind::FLOATING_POINT_TYPE | kind::BOOLEAN_TYPE => {
                TypeKind::Primitive
            }
            kind::TYPE_IDENTIFIER if text == "var" => TypeKind::Inferred,
            kind::TYPE_IDENTIFIER => TypeKind::Simple,
            kind::SCOPED_TYPE_IDENTIFIER => TypeKind::Qualified,
            kind::GENERIC_TYPE => TypeKind::Generic,
            kind::ARRAY_TYPE => TypeKind::Array,
            kind::ANNOTATED_TYPE => {
                if let Some(inner) = node.named_child_nodes().into_iter().last() {
                    return self.type_ref(inner);
                }
                TypeKind::Simple
            }
            _ => TypeKind::Simple,
        };
        TypeRef::new(text, kind)
    }

    fn field_type(self, node: Node<'_>) -> TypeRef {
        node.child_by_field_name("type")
            .map_or_else(|| TypeRef::new("", TypeKind::Simple), |t| self.type_ref(t))
    }

    fn declaration(self, node: Node<'_>) -> Declaration {
        let kind = match node.kind() {
            kind::INTERFACE_DECLARATION => DeclarationKind::Interface,
            kind::ENUM_DECLARATION => DeclarationKind::Enum,
            kind::RECORD_DECLARATION => DeclarationKind::Record,
            kind::ANNOTATION_TYPE_DECLARATION => DeclarationKind::AnnotationType,
            _ => DeclarationKind::Class,
        };
        let name_node = node.child_by_field_name("name");
        let span = name_node.map_or_else(|| span_of(node), span_of);
        let name = name_node.map_or("", |n| self.text(n));

        let mut decl = Declaration::new(name, kind, span);
        (decl.modifiers, decl.annotations) = self.modifiers(node);

        decl.superclass = node
            .child_by_field_name("superclass")
            .and_then(|s| s.named_child_nodes().into_iter().next())
            .map(|t| self.type_ref(t));

        let interface_clause = node
            .child_by_field_name("interfaces")
            .or_else(|| node.child_by_kind(kind::EXTENDS_INTERFACES));
        if let Some(clause) = interface_clause {
            let list = clause.child_by_kind(kind::TYPE_LIST).unwrap_or(clause);
            decl.interfaces = list
                .named_child_nodes()
                .into_iter()
                .map(|t| self.type_ref(t))
                .collect();
        }

        if let Some(body) = node.child_by_field_name("body") {
            decl.members = self.members(body);
        }
        decl
    }

    fn members(self, body: Node<'_>) -> Vec<Member> {
        let mut members = Vec::new();
        for child in body.named_child_nodes() {
            match child.kind() {
                kind::FIELD_DECLARATION | kind::CONSTANT_DECLARATION => {
                    members.extend(self.fields(child).into_iter().map(Member::Field));
                }
                kind::METHOD_DECLARATION => members.push(Member::Routine(self.routine(child))),
                kind::CONSTRUCTOR_DECLARATION | kind::COMPACT_CONSTRUCTOR_DECLARATION => {
                    members.push(Member::Constructor(self.constructor(child)));
                }
                kind::BLOCK => members.push(Member::Initializer(Initializer {
                    is_static: false,
                    body: self.body(child),
                    span: span_of(child),
                })),
                kind::STATIC_INITIALIZER => members.push(Member::Initializer(Initializer {
                    is_static: true,
                    body: child
                        .child_by_kind(kind::BLOCK)
                        .map(|b| self.body(b))
                        .unwrap_or_default(),
                    span: span_of(child),
                })),
                kind::ENUM_BODY_DECLARATIONS => members.extend(self.members(child)),
                k if kind::is_type_declaration(k) => {
                    members.push(Member::InnerType(self.declaration(child)));
                }
                _ => {}
            }
        }
        members
    }

    fn fields(self, node: Node<'_>) -> Vec<Field> {
        let (modifiers, annotations) = self.modifiers(node);
        let ty = self.field_type(node);
        node.field_children("declarator")
            .into_iter()
            .filter_map(|declarator| {
                let name = declarator.child_by_field_name("name")?;
                Some(Field {
                    name: self.text(name).to_string(),
                    modifiers: modifiers.clone(),
                    annotations: annotations.clone(),
                    ty: ty.clone(),
                    initializer: declarator.child_by_field_name("value").map(|v| self.body(v)),
                    span: span_of(name),
                })
            })
            .collect()
    }

    fn routine(self, node: Node<'_>) -> Routine {
        let (modifiers, annotations) = self.modifiers(node);
        let name = node.child_by_field_name("name");
        Routine {
            name: name.map_or("", |n| self.text(n)).to_string(),
            modifiers,
            annotations,
            return_type: node
                .child_by_field_name("type")
                .map_or_else(TypeRef::void, |t| self.type_ref(t)),
            params: self.params(node),
            throws: self.throws(node),
            body: node.child_by_field_name("body").map(|b| self.body(b)),
            span: name.map_or_else(|| span_of(node), span_of),
        }
    }

    fn constructor(self, node: Node<'_>) -> Constructor {
        let (modifiers, _) = self.modifiers(node);
        let name = node.child_by_field_name("name");
        Constructor {
            name: name.map_or("", |n| self.text(n)).to_string(),
            modifiers,
            params: self.params(node),
            throws: self.throws(node),
            body: node
                .child_by_field_name("body")
                .map(|b| self.body(b))
                .unwrap_or_default(),
            span: name.map_or_else(|| span_of(node), span_of),
        }
    }

    fn params(self, node: Node<'_>) -> Vec<Param> {
        let Some(list) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut params = Vec::new();
        for param in list.named_child_nodes() {
            match param.kind() {
                kind::FORMAL_PARAMETER => {
                    if let Some(name) = param.child_by_field_name("name") {
                        params.push(Param {
                            name: self.text(name).to_string(),
                            ty: self.field_type(param),
                            span: span_of(name),
                        });
                    }
                }
                kind::SPREAD_PARAMETER => {
                    let element = param
                        .named_child_nodes()
                        .into_iter()
                        .find(|c| c.kind() != kind::MODIFIERS && c.kind() != kind::VARIABLE_DECLARATOR);
                    let name = param
                        .child_by_kind(kind::VARIABLE_DECLARATOR)
                        .and_then(|d| d.child_by_field_name("name"));
                    if let (Some(element), Some(name)) = (element, name) {
                        params.push(Param {
                            name: self.text(name).to_string(),
                            ty: TypeRef::new(format!("{}...", self.text(element)), TypeKind::Array),
                            span: span_of(name),
                        });
                    }
                }
                _ => {}
            }
        }
        params
    }

    fn throws(self, node: Node<'_>) -> Vec<TypeRef> {
        node.child_by_kind(kind::THROWS)
            .map(|t| {
                t.named_child_nodes()
                    .into_iter()
                    .map(|ty| self.type_ref(ty))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn body(self, node: Node<'_>) -> Body {
        let mut visitor = BodyVisitor {
            ex: self,
            body: Body::default(),
        };
        visitor.visit(node);
        visitor.body
    }
}

/// Collects body facts from a statement or expression subtree.
///
/// Nested type declarations are recorded whole and not descended into, so
/// their calls never count as calls of the enclosing routine.
struct BodyVisitor<'s> {
    ex: Extractor<'s>,
    body: Body,
}

impl BodyVisitor<'_> {
    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            kind::TRY_STATEMENT | kind::TRY_WITH_RESOURCES_STATEMENT => {
                let start = span_of(node);
                self.body
                    .try_blocks
                    .push(Span::new(start.line, start.column, start.offset, 3));
            }
            kind::LOCAL_VARIABLE_DECLARATION => {
                let ty = self.ex.field_type(node);
                for declarator in node.field_children("declarator") {
                    if let Some(name) = declarator.child_by_field_name("name") {
                        self.push_local(name, ty.clone());
                    }
                }
            }
            kind::ENHANCED_FOR_STATEMENT | kind::RESOURCE => {
                if let Some(name) = node.child_by_field_name("name") {
                    if node.child_by_field_name("type").is_some() {
                        let ty = self.ex.field_type(node);
                        self.push_local(name, ty);
                    }
                }
            }
            kind::CATCH_FORMAL_PARAMETER => {
                if let Some(name) = node.child_by_field_name("name") {
                    let ty = node.child_by_kind(kind::CATCH_TYPE).map_or_else(
                        || TypeRef::new("", TypeKind::Simple),
                        |c| match c.named_child_nodes().as_slice() {
                            [single] => self.ex.type_ref(*single),
                            _ => TypeRef::new(self.ex.text(c), TypeKind::Simple),
                        },
                    );
                    self.push_local(name, ty);
                }
            }
            kind::METHOD_INVOCATION => self.push_call(node),
            kind::OBJECT_CREATION_EXPRESSION => {
                if let Some(class_body) = node.child_by_kind(kind::CLASS_BODY) {
                    let mut anonymous = Declaration::new(
                        "<anonymous>",
                        DeclarationKind::Anonymous,
                        span_of(node),
                    );
                    anonymous.superclass = node.child_by_field_name("type").map(|t| self.ex.type_ref(t));
                    anonymous.members = self.ex.members(class_body);
                    self.body.nested_types.push(anonymous);

                    let mut cursor = node.walk();
                    let children: Vec<Node<'_>> = node
                        .named_children(&mut cursor)
                        .filter(|c| c.kind() != kind::CLASS_BODY)
                        .collect();
                    for child in children {
                        self.visit(child);
                    }
                    return;
                }
            }
            k if kind::is_type_declaration(k) => {
                self.body.nested_types.push(self.ex.declaration(node));
                return;
            }
            _ => {}
        }

        for child in node.named_child_nodes() {
            self.visit(child);
        }
    }

    fn push_local(&mut self, name: Node<'_>, ty: TypeRef) {
        self.body.locals.push(LocalVar {
            name: self.ex.text(name).to_string(),
            ty,
            span: span_of(name),
        });
    }

    fn push_call(&mut self, node: Node<'_>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let receiver = match node.child_by_field_name("object") {
            None if node.child_by_field_name("super").is_some() => Receiver::Super,
            None => Receiver::None,
            Some(object) => match object.kind() {
                kind::THIS => Receiver::SelfRef,
                kind::SUPER => Receiver::Super,
                kind::IDENTIFIER => Receiver::Identifier(self.ex.text(object).to_string()),
                _ => Receiver::Expression(self.ex.text(object).to_string()),
            },
        };
        self.body.calls.push(CallSite {
            name: self.ex.text(name).to_string(),
            receiver,
            text: self.ex.text(node).split_whitespace().collect::<Vec<_>>().join(" "),
            span: span_of(node),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(src: &str) -> SourceUnit {
        JavaSourceParser::new()
            .parse(Path::new("src/Blink.java"), src)
            .expect("valid java")
    }

    fn first_routine<'a>(unit: &'a SourceUnit, name: &str) -> &'a Routine {
        unit.declarations[0]
            .routines()
            .find(|r| r.name == name)
            .unwrap()
    }

    const BLINK: &str = r#"
package demo;

import javono.lib.GPIO;
import javono.lib.*;
import static javono.lib.Pins.LED;

@JavonoEmbeddedSketch
public class Blink extends Object implements Runnable {
    @JavonoEmbeddedUserMethod
    private final GPIO led = new GPIO(13), other;

    @JavonoEmbeddedInit
    private void setup() {
        led.mode(1);
    }

    @JavonoEmbeddedLoop
    private void loop() {
        int count = 0;
        for (String s : names()) { toggle(s); }
        this.toggle("x");
        System.out.println("tick");
    }

    @JavonoEmbeddedUserMethod
    private int toggle(String label, int... rest) throws Exception {
        try { led.write(1); } catch (IllegalStateException | RuntimeException e) { }
        Runnable r = new Runnable() { public void run() { hidden(); } };
        class Local {}
        return 0;
    }
}
"#;

    #[test]
    fn extracts_package_and_imports() {
        let unit = parse(BLINK);
        assert_eq!(unit.path, PathBuf::from("src/Blink.java"));
        assert_eq!(unit.package.as_deref(), Some("demo"));
        assert_eq!(unit.imports.len(), 3);

        assert_eq!(unit.imports[0].path, "javono.lib.GPIO");
        assert!(!unit.imports[0].wildcard);
        assert_eq!(unit.imports[1].path, "javono.lib");
        assert!(unit.imports[1].wildcard);
        assert!(unit.imports[2].is_static);
    }

    #[test]
    fn extracts_class_header() {
        let unit = parse(BLINK);
        let decl = &unit.declarations[0];
        assert_eq!(decl.name, "Blink");
        assert_eq!(decl.kind, DeclarationKind::Class);
        assert!(decl.modifiers.contains(Modifier::Public));
        assert_eq!(decl.annotations[0].name, "JavonoEmbeddedSketch");
        assert_eq!(decl.superclass.as_ref().unwrap().text, "Object");
        assert_eq!(decl.interfaces.len(), 1);
        assert_eq!(decl.interfaces[0].text, "Runnable");
        assert_eq!(decl.span.line, 9);
    }

    #[test]
    fn one_field_per_declarator() {
        let unit = parse(BLINK);
        let fields: Vec<&Field> = unit.declarations[0].fields().collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "led");
        assert_eq!(fields[1].name, "other");
        assert_eq!(fields[0].ty, TypeRef::new("GPIO", TypeKind::Simple));
        assert!(fields[0].modifiers.contains(Modifier::Final));
        assert!(fields[0].initializer.is_some());
        assert!(fields[1].initializer.is_none());
    }

    #[test]
    fn extracts_routine_signature() {
        let unit = parse(BLINK);
        let toggle = first_routine(&unit, "toggle");
        assert_eq!(toggle.return_type, TypeRef::new("int", TypeKind::Primitive));
        assert_eq!(toggle.params.len(), 2);
        assert_eq!(toggle.params[0].ty, TypeRef::new("String", TypeKind::Simple));
        assert_eq!(toggle.params[1].name, "rest");
        assert_eq!(toggle.params[1].ty.kind, TypeKind::Array);
        assert_eq!(toggle.throws[0].text, "Exception");

        let setup = first_routine(&unit, "setup");
        assert!(setup.return_type.is_void());
        assert!(setup.params.is_empty());
        assert_eq!(setup.annotations[0].name, "JavonoEmbeddedInit");
    }

    #[test]
    fn classifies_call_receivers() {
        let unit = parse(BLINK);
        let body = first_routine(&unit, "loop").body.as_ref().unwrap();
        let calls: Vec<(&str, &Receiver)> =
            body.calls.iter().map(|c| (c.name.as_str(), &c.receiver)).collect();
        assert_eq!(
            calls,
            vec![
                ("names", &Receiver::None),
                ("toggle", &Receiver::None),
                ("toggle", &Receiver::SelfRef),
                ("println", &Receiver::Expression("System.out".into())),
            ]
        );

        let setup = first_routine(&unit, "setup").body.as_ref().unwrap();
        assert_eq!(setup.calls[0].receiver, Receiver::Identifier("led".into()));
        assert_eq!(setup.calls[0].text, "led.mode(1)");
    }

    #[test]
    fn collects_locals() {
        let unit = parse(BLINK);
        let body = first_routine(&unit, "loop").body.as_ref().unwrap();
        assert_eq!(body.local_type("count").unwrap().text, "int");
        assert_eq!(body.local_type("s").unwrap().text, "String");
    }

    #[test]
    fn collects_try_blocks_and_nested_types() {
        let unit = parse(BLINK);
        let body = first_routine(&unit, "toggle").body.as_ref().unwrap();
        assert_eq!(body.try_blocks.len(), 1);
        assert_eq!(body.nested_types.len(), 2);
        assert_eq!(body.nested_types[0].kind, DeclarationKind::Anonymous);
        assert_eq!(body.nested_types[1].name, "Local");
        assert!(body.local_type("e").is_some());
        // calls inside the anonymous class belong to it, not to `toggle`
        assert!(body.calls.iter().all(|c| c.name != "hidden"));
        assert!(body.calls.iter().any(|c| c.name == "write"));
    }

    #[test]
    fn var_is_inferred() {
        let unit = parse(
            "class A { void f() { var x = 1; double[] d = null; java.util.List<String> l = null; } }",
        );
        let body = unit.declarations[0].routines().next().unwrap().body.as_ref().unwrap();
        assert_eq!(body.local_type("x").unwrap().kind, TypeKind::Inferred);
        assert_eq!(body.local_type("d").unwrap().kind, TypeKind::Array);
        assert_eq!(body.local_type("l").unwrap().kind, TypeKind::Generic);
    }

    #[test]
    fn extracts_members_of_every_kind() {
        let unit = parse(
            r"
public class A {
    static { init(); }
    { other(); }
    public A(int x) throws Exception {}
    interface Inner {}
    enum Mode { ON, OFF; private int level; }
}
",
        );
        let decl = &unit.declarations[0];
        assert_eq!(decl.constructors().count(), 1);
        assert_eq!(decl.constructors().next().unwrap().params.len(), 1);
        let inner: Vec<&Declaration> = decl.inner_types().collect();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[0].kind, DeclarationKind::Interface);
        assert_eq!(inner[1].kind, DeclarationKind::Enum);
        assert_eq!(inner[1].fields().count(), 1);
        let initializers = decl
            .members
            .iter()
            .filter(|m| matches!(m, Member::Initializer(_)))
            .count();
        assert_eq!(initializers, 2);
    }

    #[test]
    fn syntax_error_is_a_parse_failure() {
        let err = JavaSourceParser::new()
            .parse(Path::new("Broken.java"), "public class Broken {\n  void f( {\n}\n")
            .unwrap_err();
        assert_eq!(err.path, PathBuf::from("Broken.java"));
        assert!(err.span.line >= 1);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn other_declaration_kinds() {
        let unit = parse("interface I extends A, B {} record R(int x) {} @interface T {}");
        let kinds: Vec<DeclarationKind> = unit.declarations.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DeclarationKind::Interface,
                DeclarationKind::Record,
                DeclarationKind::AnnotationType
            ]
        );
        assert_eq!(unit.declarations[0].interfaces.len(), 2);
    }
}
