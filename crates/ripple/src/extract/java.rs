//! Java syntax walking with tree-sitter-java.

use std::path::Path;

use tracing::trace;

use super::{FieldInfo, JavaUnit};
use crate::error::ExtractError;

/// Tree-sitter node kind constants for the Java grammar.
mod node_kinds {
    // Compilation unit
    pub const PACKAGE_DECLARATION: &str = "package_declaration";
    pub const IMPORT_DECLARATION: &str = "import_declaration";

    // Type declarations
    pub const CLASS_DECLARATION: &str = "class_declaration";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";
    pub const ENUM_DECLARATION: &str = "enum_declaration";
    pub const RECORD_DECLARATION: &str = "record_declaration";

    // Members
    pub const ENUM_BODY_DECLARATIONS: &str = "enum_body_declarations";
    pub const FIELD_DECLARATION: &str = "field_declaration";
    pub const CONSTRUCTOR_DECLARATION: &str = "constructor_declaration";
    pub const METHOD_DECLARATION: &str = "method_declaration";
    pub const FORMAL_PARAMETER: &str = "formal_parameter";
    pub const SPREAD_PARAMETER: &str = "spread_parameter";

    // Modifiers & annotations
    pub const MODIFIERS: &str = "modifiers";
    pub const MARKER_ANNOTATION: &str = "marker_annotation";
    pub const ANNOTATION: &str = "annotation";
    pub const FINAL: &str = "final";
    pub const STATIC: &str = "static";
    pub const ASTERISK: &str = "asterisk";

    // Names & types
    pub const IDENTIFIER: &str = "identifier";
    pub const SCOPED_IDENTIFIER: &str = "scoped_identifier";
    pub const TYPE_IDENTIFIER: &str = "type_identifier";
    pub const SCOPED_TYPE_IDENTIFIER: &str = "scoped_type_identifier";
    pub const GENERIC_TYPE: &str = "generic_type";
    pub const TYPE_ARGUMENTS: &str = "type_arguments";
    pub const WILDCARD: &str = "wildcard";
    pub const ARRAY_TYPE: &str = "array_type";
    pub const ANNOTATED_TYPE: &str = "annotated_type";
}

const TEST_ANNOTATION: &str = "Test";

/// Parse Java source into a syntax tree.
///
/// # Errors
///
/// Returns a parse error when the grammar cannot be loaded or the parser
/// produces no tree.
pub fn parse_source(path: &Path, content: &str) -> Result<tree_sitter::Tree, ExtractError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| ExtractError::parse_failed(path.to_path_buf(), e.to_string()))?;
    parser
        .parse(content, None)
        .ok_or_else(|| ExtractError::parse_failed(path.to_path_buf(), "parser returned no tree"))
}

/// Extract the unit of one Java file.
///
/// Returns `Ok(None)` when the file declares no top-level type.
///
/// # Errors
///
/// Returns a parse error when the syntax tree contains errors.
pub fn extract_unit(path: &Path, content: &str) -> Result<Option<JavaUnit>, ExtractError> {
    let tree = parse_source(path, content)?;
    let root = tree.root_node();

    if root.has_error() {
        let message = match first_error_position(&root) {
            Some((row, column)) => format!("syntax error at {}:{}", row + 1, column + 1),
            None => "syntax error".to_string(),
        };
        return Err(ExtractError::parse_failed(path.to_path_buf(), message));
    }

    let source = content.as_bytes();
    let Some(declaration) = first_type_declaration(&root) else {
        trace!(path = %path.display(), "No type declaration, skipping");
        return Ok(None);
    };
    let Some(type_name) = declaration
        .child_by_field_name("name")
        .and_then(|n| node_text(&n, source))
    else {
        return Ok(None);
    };

    let mut unit = JavaUnit {
        path: path.to_path_buf(),
        package: extract_package(&root, source),
        type_name: type_name.to_string(),
        annotations: annotations_of(&declaration, source),
        imports: extract_imports(&root, source),
        fields: Vec::new(),
        constructor_param_types: Vec::new(),
        has_test_method: contains_test_method(&root, source),
    };

    if declaration.kind() == node_kinds::RECORD_DECLARATION {
        if let Some(params) = declaration.child_by_field_name("parameters") {
            collect_parameter_types(&params, source, &mut unit.constructor_param_types);
        }
    }

    if let Some(body) = declaration.child_by_field_name("body") {
        extract_members(&body, source, &mut unit);
    }

    Ok(Some(unit))
}

fn node_text<'a>(node: &tree_sitter::Node, source: &'a [u8]) -> Option<&'a str> {
    node.utf8_text(source).ok()
}

/// Last segment of a possibly dotted name.
fn simple_name(text: &str) -> &str {
    text.rsplit('.').next().unwrap_or(text)
}

fn first_error_position(node: &tree_sitter::Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let start = node.start_position();
        return Some((start.row, start.column));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find_map(|child| first_error_position(&child))
}

fn first_type_declaration<'tree>(
    root: &tree_sitter::Node<'tree>,
) -> Option<tree_sitter::Node<'tree>> {
    use node_kinds::{
        CLASS_DECLARATION, ENUM_DECLARATION, INTERFACE_DECLARATION, RECORD_DECLARATION,
    };

    let mut cursor = root.walk();
    root.named_children(&mut cursor).find(|child| {
        matches!(
            child.kind(),
            CLASS_DECLARATION | INTERFACE_DECLARATION | ENUM_DECLARATION | RECORD_DECLARATION
        )
    })
}

fn extract_package(root: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    use node_kinds::{IDENTIFIER, PACKAGE_DECLARATION, SCOPED_IDENTIFIER};

    let mut cursor = root.walk();
    let package = root
        .named_children(&mut cursor)
        .find(|child| child.kind() == PACKAGE_DECLARATION)?;

    let mut inner = package.walk();
    let name = package
        .named_children(&mut inner)
        .find(|child| matches!(child.kind(), IDENTIFIER | SCOPED_IDENTIFIER))?;
    node_text(&name, source).map(ToString::to_string)
}

/// Non-static, non-wildcard import paths in declaration order.
fn extract_imports(root: &tree_sitter::Node, source: &[u8]) -> Vec<String> {
    use node_kinds::{ASTERISK, IDENTIFIER, IMPORT_DECLARATION, SCOPED_IDENTIFIER, STATIC};

    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for import in root
        .named_children(&mut cursor)
        .filter(|child| child.kind() == IMPORT_DECLARATION)
    {
        let mut is_static = false;
        let mut is_wildcard = false;
        let mut path = None;

        let mut inner = import.walk();
        for child in import.children(&mut inner) {
            match child.kind() {
                STATIC => is_static = true,
                ASTERISK => is_wildcard = true,
                IDENTIFIER | SCOPED_IDENTIFIER => path = node_text(&child, source),
                _ => {}
            }
        }

        if is_static || is_wildcard {
            continue;
        }
        if let Some(path) = path {
            imports.push(path.to_string());
        }
    }
    imports
}

/// Annotation simple names from a declaration's `modifiers` child.
fn annotations_of(node: &tree_sitter::Node, source: &[u8]) -> Vec<String> {
    use node_kinds::{ANNOTATION, MARKER_ANNOTATION};

    let Some(modifiers) = modifiers_of(node) else {
        return Vec::new();
    };

    let mut annotations = Vec::new();
    let mut cursor = modifiers.walk();
    for child in modifiers.named_children(&mut cursor) {
        if matches!(child.kind(), MARKER_ANNOTATION | ANNOTATION) {
            if let Some(name) = child
                .child_by_field_name("name")
                .and_then(|n| node_text(&n, source))
            {
                annotations.push(simple_name(name).to_string());
            }
        }
    }
    annotations
}

fn modifiers_of<'tree>(node: &tree_sitter::Node<'tree>) -> Option<tree_sitter::Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() == node_kinds::MODIFIERS)
}

fn has_modifier(node: &tree_sitter::Node, modifier: &str) -> bool {
    let Some(modifiers) = modifiers_of(node) else {
        return false;
    };
    let mut cursor = modifiers.walk();
    modifiers
        .children(&mut cursor)
        .any(|child| child.kind() == modifier)
}

/// Fields and constructors declared directly in a type body.
fn extract_members(body: &tree_sitter::Node, source: &[u8], unit: &mut JavaUnit) {
    use node_kinds::{CONSTRUCTOR_DECLARATION, ENUM_BODY_DECLARATIONS, FIELD_DECLARATION, FINAL};

    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            FIELD_DECLARATION => {
                let mut type_names = Vec::new();
                if let Some(ty) = member.child_by_field_name("type") {
                    collect_type_names(&ty, source, &mut type_names);
                }
                unit.fields.push(FieldInfo {
                    annotations: annotations_of(&member, source),
                    is_final: has_modifier(&member, FINAL),
                    type_names,
                });
            }
            CONSTRUCTOR_DECLARATION => {
                if let Some(params) = member.child_by_field_name("parameters") {
                    collect_parameter_types(&params, source, &mut unit.constructor_param_types);
                }
            }
            // Enum constants come first; members live in a nested block.
            ENUM_BODY_DECLARATIONS => extract_members(&member, source, unit),
            _ => {}
        }
    }
}

fn collect_parameter_types(params: &tree_sitter::Node, source: &[u8], out: &mut Vec<String>) {
    use node_kinds::{FORMAL_PARAMETER, SPREAD_PARAMETER};

    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            FORMAL_PARAMETER => {
                if let Some(ty) = param.child_by_field_name("type") {
                    collect_type_names(&ty, source, out);
                }
            }
            SPREAD_PARAMETER => {
                let mut inner = param.walk();
                for child in param.named_children(&mut inner) {
                    collect_type_names(&child, source, out);
                }
            }
            _ => {}
        }
    }
}

/// Collect every class name a type mentions.
///
/// `Map<String, List<Order>>` yields `Map`, `String`, `List`, `Order`;
/// scoped names keep their last segment; primitives yield nothing.
fn collect_type_names(node: &tree_sitter::Node, source: &[u8], out: &mut Vec<String>) {
    use node_kinds::{
        ANNOTATED_TYPE, ARRAY_TYPE, GENERIC_TYPE, SCOPED_TYPE_IDENTIFIER, TYPE_ARGUMENTS,
        TYPE_IDENTIFIER, WILDCARD,
    };

    match node.kind() {
        TYPE_IDENTIFIER => {
            if let Some(text) = node_text(node, source) {
                out.push(text.to_string());
            }
        }
        SCOPED_TYPE_IDENTIFIER => {
            if let Some(text) = node_text(node, source) {
                out.push(simple_name(text).to_string());
            }
        }
        GENERIC_TYPE | TYPE_ARGUMENTS | WILDCARD | ARRAY_TYPE | ANNOTATED_TYPE => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_type_names(&child, source, out);
            }
        }
        _ => {}
    }
}

/// Whether any method anywhere in the file is annotated `@Test`.
fn contains_test_method(node: &tree_sitter::Node, source: &[u8]) -> bool {
    if node.kind() == node_kinds::METHOD_DECLARATION
        && annotations_of(node, source)
            .iter()
            .any(|a| a == TEST_ANNOTATION)
    {
        return true;
    }
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .any(|child| contains_test_method(&child, source))
}
