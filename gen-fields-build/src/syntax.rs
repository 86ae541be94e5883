//! Go source parsing on top of tree-sitter-go.

use tree_sitter::{Node, Parser, Tree};

use crate::error::SyntaxError;

/// Node kinds allowed directly under `source_file`.
const TOP_LEVEL_KINDS: &[&str] = &[
    "package_clause",
    "import_declaration",
    "type_declaration",
    "const_declaration",
    "var_declaration",
    "function_declaration",
    "method_declaration",
    "comment",
];

/// A parsed Go file: the source text, its syntax tree and its package name.
#[derive(Debug, Clone)]
pub struct GoFile {
    source: String,
    tree: Tree,
    package: String,
}

impl GoFile {
    /// Parse Go source, rejecting anything that does not form a valid file:
    /// syntax errors, a missing package clause, imports after declarations
    /// and statements outside function bodies.
    pub fn parse(source: impl Into<String>) -> Result<Self, SyntaxError> {
        let source = source.into();
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|err| SyntaxError::new(1, 1, format!("failed to load Go grammar: {err}")))?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| SyntaxError::new(1, 1, "parser returned no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(first_error(root, &source).unwrap_or_else(|| SyntaxError::new(1, 1, "syntax error")));
        }
        let package = check_top_level(root, &source)?;

        Ok(Self { source, tree, package })
    }

    /// Name from the `package` clause.
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        node_text(node, &self.source)
    }
}

fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

fn error_at(node: Node<'_>, message: impl Into<String>) -> SyntaxError {
    let point = node.start_position();
    SyntaxError::new(point.row + 1, point.column + 1, message)
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node<'_>, source: &str) -> Option<SyntaxError> {
    if node.is_missing() {
        return Some(error_at(node, format!("missing {:?}", node.kind())));
    }
    if node.is_error() {
        let near: String = node_text(node, source).lines().next().unwrap_or("").chars().take(24).collect();
        return Some(error_at(node, format!("unexpected {near:?}")));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(err) = first_error(child, source) {
            return Some(err);
        }
    }
    None
}

/// Validate the declaration layout of the file and return its package name.
fn check_top_level(root: Node<'_>, source: &str) -> Result<String, SyntaxError> {
    let mut package = None;
    let mut seen_declaration = false;

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        let kind = child.kind();
        if kind == "comment" {
            continue;
        }
        if !TOP_LEVEL_KINDS.contains(&kind) {
            return Err(error_at(child, "non-declaration statement outside function body"));
        }
        match (kind, package.is_some()) {
            ("package_clause", false) => package = Some(child),
            ("package_clause", true) => return Err(error_at(child, "unexpected package clause")),
            (_, false) => return Err(error_at(child, "expected 'package' clause")),
            ("import_declaration", true) if seen_declaration => {
                return Err(error_at(child, "imports must appear before other declarations"));
            }
            ("import_declaration", true) => {}
            _ => seen_declaration = true,
        }
    }

    let clause = package.ok_or_else(|| SyntaxError::new(1, 1, "expected 'package' clause"))?;
    let mut clause_cursor = clause.walk();
    let name = clause
        .named_children(&mut clause_cursor)
        .find(|node| node.kind() == "package_identifier")
        .ok_or_else(|| error_at(clause, "expected package name"))?;
    Ok(node_text(name, source).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name() {
        let file = GoFile::parse("// Package ipinfo wraps the API.\npackage ipinfo\n\nimport \"net\"\n").unwrap();
        assert_eq!(file.package(), "ipinfo");
        assert_eq!(file.root().kind(), "source_file");
        assert_eq!(file.text(file.root()), file.source());
    }

    #[test]
    fn test_accepts_full_declarations() {
        let src = r#"package ipinfo

import (
	"net"
	"strings"
)

const (
	limit = 10 * 2
	name  = "x"
)

var defaults = map[string][]int{"a": {1, 2}}

type Pair[K comparable, V any] struct {
	Key   K `json:"key"`
	Value V `json:"value"`
}

func (c *Client) Do(req *Request, v interface{}) (*Response, error) {
loop:
	for i := 0; i < limit; i++ {
		switch {
		case i > 2:
			break loop
		default:
		}
	}
	return nil, nil
}
"#;
        assert_eq!(GoFile::parse(src).unwrap().package(), "ipinfo");
    }

    #[test]
    fn test_missing_package_clause() {
        let err = GoFile::parse("type Info struct{}\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("package"));
        assert!(GoFile::parse("").is_err());
    }

    #[test]
    fn test_statement_outside_function() {
        let err = GoFile::parse("package p\n\nx := 1\n").unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_import_after_declaration() {
        let err = GoFile::parse("package p\n\ntype T int\n\nimport \"net\"\n").unwrap_err();
        assert_eq!(err.line, 5);
        assert!(err.message.contains("imports"));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(GoFile::parse("package p\n\ntype Info struct {\n").is_err());
        assert!(GoFile::parse("package p\n\nvar s = `open\n").is_err());
        assert!(GoFile::parse("package p\n\nfunc f() {\n\treturn )\n}\n").is_err());
    }
}
