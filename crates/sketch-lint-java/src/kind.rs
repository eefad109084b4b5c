//! Tree-sitter Java node kinds and node helpers.
//!
//! Use these constants with `node.kind()` for pattern matching.

use tree_sitter::Node;

// Top-level
pub const PACKAGE_DECLARATION: &str = "package_declaration";
pub const IMPORT_DECLARATION: &str = "import_declaration";
pub const ASTERISK: &str = "asterisk";
pub const STATIC: &str = "static";

// Type declarations
pub const CLASS_DECLARATION: &str = "class_declaration";
pub const INTERFACE_DECLARATION: &str = "interface_declaration";
pub const ENUM_DECLARATION: &str = "enum_declaration";
pub const RECORD_DECLARATION: &str = "record_declaration";
pub const ANNOTATION_TYPE_DECLARATION: &str = "annotation_type_declaration";
pub const EXTENDS_INTERFACES: &str = "extends_interfaces";
pub const TYPE_LIST: &str = "type_list";
pub const ENUM_BODY_DECLARATIONS: &str = "enum_body_declarations";
pub const CLASS_BODY: &str = "class_body";

// Members
pub const MODIFIERS: &str = "modifiers";
pub const MARKER_ANNOTATION: &str = "marker_annotation";
pub const ANNOTATION: &str = "annotation";
pub const FIELD_DECLARATION: &str = "field_declaration";
pub const CONSTANT_DECLARATION: &str = "constant_declaration";
pub const METHOD_DECLARATION: &str = "method_declaration";
pub const CONSTRUCTOR_DECLARATION: &str = "constructor_declaration";
pub const COMPACT_CONSTRUCTOR_DECLARATION: &str = "compact_constructor_declaration";
pub const STATIC_INITIALIZER: &str = "static_initializer";
pub const BLOCK: &str = "block";
pub const FORMAL_PARAMETER: &str = "formal_parameter";
pub const SPREAD_PARAMETER: &str = "spread_parameter";
pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
pub const THROWS: &str = "throws";

// Types
pub const VOID_TYPE: &str = "void_type";
pub const INTEGRAL_TYPE: &str = "integral_type";
pub const FLOATING_POINT_TYPE: &str = "floating_point_type";
pub const BOOLEAN_TYPE: &str = "boolean_type";
pub const TYPE_IDENTIFIER: &str = "type_identifier";
pub const SCOPED_TYPE_IDENTIFIER: &str = "scoped_type_identifier";
pub const GENERIC_TYPE: &str = "generic_type";
pub const ARRAY_TYPE: &str = "array_type";
pub const ANNOTATED_TYPE: &str = "annotated_type";
pub const CATCH_TYPE: &str = "catch_type";

// Statements
pub const TRY_STATEMENT: &str = "try_statement";
pub const TRY_WITH_RESOURCES_STATEMENT: &str = "try_with_resources_statement";
pub const RESOURCE: &str = "resource";
pub const CATCH_FORMAL_PARAMETER: &str = "catch_formal_parameter";
pub const LOCAL_VARIABLE_DECLARATION: &str = "local_variable_declaration";
pub const ENHANCED_FOR_STATEMENT: &str = "enhanced_for_statement";

// Expressions
pub const METHOD_INVOCATION: &str = "method_invocation";
pub const OBJECT_CREATION_EXPRESSION: &str = "object_creation_expression";
pub const IDENTIFIER: &str = "identifier";
pub const THIS: &str = "this";
pub const SUPER: &str = "super";

/// Returns true for every node kind that declares a type.
pub fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        CLASS_DECLARATION
            | INTERFACE_DECLARATION
            | ENUM_DECLARATION
            | RECORD_DECLARATION
            | ANNOTATION_TYPE_DECLARATION
    )
}

/// Helper extension trait for tree-sitter Node.
pub trait NodeExt<'a> {
    /// Get the text content of this node from the source.
    fn text(&self, source: &'a str) -> &'a str;

    /// Find first child with the given kind.
    fn child_by_kind(&self, kind: &str) -> Option<Node<'a>>;

    /// All named children.
    fn named_child_nodes(&self) -> Vec<Node<'a>>;

    /// All children carrying a field name.
    fn field_children(&self, field: &str) -> Vec<Node<'a>>;
}

impl<'a> NodeExt<'a> for Node<'a> {
    fn text(&self, source: &'a str) -> &'a str {
        self.utf8_text(source.as_bytes()).unwrap_or("")
    }

    fn child_by_kind(&self, kind: &str) -> Option<Node<'a>> {
        let mut cursor = self.walk();
        let found = self.children(&mut cursor).find(|child| child.kind() == kind);
        found
    }

    fn named_child_nodes(&self) -> Vec<Node<'a>> {
        let mut cursor = self.walk();
        self.named_children(&mut cursor).collect()
    }

    fn field_children(&self, field: &str) -> Vec<Node<'a>> {
        let mut cursor = self.walk();
        self.children_by_field_name(field, &mut cursor).collect()
    }
}
