//! Canonical layout for generated Go source.
//!
//! The text must parse as a Go file. Lines are re-indented with tabs by
//! bracket nesting, trailing whitespace is dropped, blank-line runs collapse
//! to one and the file ends with a single newline. Lines inside multi-line
//! raw strings and block comments are left untouched.

use tree_sitter::Node;

use crate::error::SyntaxError;
use crate::syntax::GoFile;

/// Nodes formatted as a single token even though tree-sitter gives them
/// children.
const ATOMIC_KINDS: &[&str] = &["raw_string_literal", "interpreted_string_literal", "rune_literal", "comment"];

/// A source token reduced to what layout needs: its kind and its line span
/// (1-based, inclusive).
struct Leaf {
    kind: &'static str,
    line: usize,
    end_line: usize,
}

impl Leaf {
    fn is_opener(&self) -> bool {
        matches!(self.kind, "(" | "[" | "{")
    }

    fn is_closer(&self) -> bool {
        matches!(self.kind, ")" | "]" | "}")
    }
}

struct Open {
    line: usize,
    indent: bool,
}

/// Format Go source text, failing if it does not parse.
pub fn format_source(src: &str) -> Result<String, SyntaxError> {
    let file = GoFile::parse(src)?;
    let mut leaves = Vec::new();
    collect_leaves(file.root(), &mut leaves);
    let lines: Vec<&str> = src.lines().collect();

    let mut by_line: Vec<Vec<&Leaf>> = (0..lines.len() + 2).map(|_| Vec::new()).collect();
    let mut verbatim = vec![false; lines.len() + 2];
    let mut keep_tail = vec![false; lines.len() + 2];
    for leaf in &leaves {
        if leaf.line >= by_line.len() {
            continue;
        }
        if leaf.end_line > leaf.line {
            keep_tail[leaf.line] = true;
            for line in leaf.line + 1..=leaf.end_line.min(lines.len()) {
                verbatim[line] = true;
            }
        }
        by_line[leaf.line].push(leaf);
    }
    let mut out = String::with_capacity(src.len());
    let mut stack: Vec<Open> = Vec::new();
    let mut pending_blank = false;

    for (idx, raw) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let toks = by_line[line_no].as_slice();

        if verbatim[line_no] {
            track(&mut stack, toks, line_no);
            out.push_str(raw);
            out.push('\n');
            pending_blank = false;
            continue;
        }

        let text = if keep_tail[line_no] { raw.trim_start() } else { raw.trim() };
        if text.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }

        let leading = toks.iter().take_while(|t| t.is_closer()).count();
        for _ in 0..leading {
            stack.pop();
        }
        let mut level = stack.iter().filter(|open| open.indent).count();
        if toks.first().is_some_and(|t| matches!(t.kind, "case" | "default")) {
            level = level.saturating_sub(1);
        }
        track(&mut stack, &toks[leading..], line_no);

        for _ in 0..level {
            out.push('\t');
        }
        out.push_str(text);
        out.push('\n');
    }

    Ok(out)
}

/// Gather the tokens of the tree in source order. Statement terminators
/// that tree-sitter records as newline tokens are left out.
fn collect_leaves(node: Node<'_>, leaves: &mut Vec<Leaf>) {
    let kind = node.kind();
    let atomic = ATOMIC_KINDS.contains(&kind);
    if node.child_count() == 0 || atomic {
        if kind != "\n" && node.start_byte() < node.end_byte() {
            let line = node.start_position().row + 1;
            // Only literals and comments may run across lines.
            let end_line = if atomic { node.end_position().row + 1 } else { line };
            leaves.push(Leaf { kind, line, end_line });
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_leaves(child, leaves);
    }
}

/// Apply a line's brackets to the stack. The earliest opener left unclosed
/// at the end of the line indents the lines that follow.
fn track(stack: &mut Vec<Open>, toks: &[&Leaf], line: usize) {
    for tok in toks {
        if tok.is_opener() {
            stack.push(Open { line, indent: false });
        } else if tok.is_closer() {
            stack.pop();
        }
    }
    if let Some(open) = stack.iter_mut().find(|open| open.line == line) {
        open.indent = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::FieldDescriptor;
    use crate::template;

    #[test]
    fn test_rendered_template_is_already_canonical() {
        let fields = vec![
            FieldDescriptor {
                name: "Hostname".to_string(),
                key: "hostname".to_string(),
            },
            FieldDescriptor {
                name: "Org".to_string(),
                key: "org".to_string(),
            },
        ];
        let rendered = template::render("ipinfo", &fields);
        assert_eq!(format_source(&rendered).unwrap(), rendered);
    }

    #[test]
    fn test_reindents_and_collapses_blank_lines() {
        let src = "\n\npackage p\n\n\n\nfunc f() {\nif x {\n    return\n}\n}   \n\n\n";
        assert_eq!(
            format_source(src).unwrap(),
            "package p\n\nfunc f() {\n\tif x {\n\t\treturn\n\t}\n}\n"
        );
    }

    #[test]
    fn test_one_level_per_line_for_nested_openers() {
        let src = "package p\n\nfunc f() {\nv, err := g(s, func() (interface{}, error) {\nreturn h(s)\n})\n_ = v\n}\n";
        assert_eq!(
            format_source(src).unwrap(),
            "package p\n\nfunc f() {\n\tv, err := g(s, func() (interface{}, error) {\n\t\treturn h(s)\n\t})\n\t_ = v\n}\n"
        );
    }

    #[test]
    fn test_case_labels_align_with_switch() {
        let src = "package p\n\nfunc f(x int) {\nswitch x {\ncase 1:\nreturn\ndefault:\n}\n}\n";
        assert_eq!(
            format_source(src).unwrap(),
            "package p\n\nfunc f(x int) {\n\tswitch x {\n\tcase 1:\n\t\treturn\n\tdefault:\n\t}\n}\n"
        );
    }

    #[test]
    fn test_raw_string_lines_are_verbatim() {
        let src = "package p\n\nvar s = `a\n    b  \n`\n";
        assert_eq!(format_source(src).unwrap(), src);
    }

    #[test]
    fn test_idempotent() {
        let src = "package p\nimport (\n\"net\"\n  )\ntype T struct {\n      A string `json:\"a\"`\n}\n";
        let once = format_source(src).unwrap();
        assert_eq!(
            once,
            "package p\nimport (\n\t\"net\"\n)\ntype T struct {\n\tA string `json:\"a\"`\n}\n"
        );
        assert_eq!(format_source(&once).unwrap(), once);
    }

    #[test]
    fn test_malformed_source_fails() {
        assert!(format_source("package p\n\nfunc f() {\n").is_err());
        assert!(format_source("x := 1\n").is_err());
    }
}
