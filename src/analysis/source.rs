//! Source-file session and tree-walk scaffolding.
//!
//! A `SourceFile` owns everything one analysis run needs: the raw text, the
//! raw lines (for indentation recovery, which must never trust node column
//! metadata), and the parsed tree. Both analyses borrow it read-only and the
//! whole session is dropped when the run ends; nothing is cached across runs.

use std::fs;
use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser, Tree};

use crate::error::{AnalysisError, Result};

/// UTF-8 byte-order mark, stripped before decoding.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Node kinds that do not carry a usable line position.
///
/// `module` and `block` are structural containers whose start position is
/// just their first statement's; `comment` is trivia; the `string_*` kinds
/// are sub-tokens of a string literal, not constructs of their own.
const POSITIONLESS_KINDS: &[&str] = &[
    "module",
    "block",
    "comment",
    "string_start",
    "string_content",
    "string_end",
];

/// A loaded and parsed source file.
pub struct SourceFile {
    path: PathBuf,
    text: String,
    lines: Vec<String>,
    tree: Tree,
}

impl SourceFile {
    /// Read, decode, and parse the file at `path`.
    ///
    /// A leading UTF-8 BOM is tolerated and stripped. The file handle is
    /// released as soon as the bytes are in memory, on failure and success
    /// alike.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| AnalysisError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|_| AnalysisError::Decode {
                path: path.to_path_buf(),
            })?
            .to_owned();
        Self::from_text(path, text)
    }

    /// Parse already-decoded source text.
    pub fn from_text(path: &Path, text: String) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_python::LANGUAGE.into())?;

        let parse_err = || AnalysisError::Parse {
            path: path.to_path_buf(),
        };
        let tree = parser.parse(&text, None).ok_or_else(parse_err)?;
        if tree.root_node().has_error() {
            return Err(parse_err());
        }

        let lines = text.lines().map(str::to_owned).collect();
        Ok(Self {
            path: path.to_path_buf(),
            text,
            lines,
            tree,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.text
    }

    /// Raw source line by 1-based line number.
    pub fn line(&self, lineno: usize) -> Option<&str> {
        self.lines.get(lineno.checked_sub(1)?).map(String::as_str)
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get the source text of a node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }
}

/// Visit every node in the tree, outermost-first (preorder).
///
/// Indentation recovery depends on this order: the first node visited on a
/// line determines that line's recorded indentation.
pub fn for_each_node<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Whether a node carries a line position both analyses may use.
///
/// The analogue of a Python AST node having `lineno`/`col_offset`
/// attributes: anonymous tokens and the kinds in `POSITIONLESS_KINDS`
/// don't qualify.
pub fn carries_position(node: Node) -> bool {
    node.is_named() && !POSITIONLESS_KINDS.contains(&node.kind())
}

/// Whether a node is a bare string-literal statement, or the string inside
/// one. Such nodes (docstrings being the common case) are excluded from both
/// output mappings.
pub fn is_docstring_flagged(node: Node) -> bool {
    match node.kind() {
        "expression_statement" => is_bare_string_stmt(node),
        "string" => node.parent().is_some_and(is_bare_string_stmt),
        _ => false,
    }
}

fn is_bare_string_stmt(stmt: Node) -> bool {
    stmt.kind() == "expression_statement"
        && stmt.named_child_count() == 1
        && stmt.named_child(0).is_some_and(|c| c.kind() == "string")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceFile {
        SourceFile::from_text(Path::new("test.py"), source.to_string()).unwrap()
    }

    #[test]
    fn test_line_lookup_is_one_based() {
        let file = parse("import os\nx = 1\n");
        assert_eq!(file.line(1), Some("import os"));
        assert_eq!(file.line(2), Some("x = 1"));
        assert_eq!(file.line(0), None);
        assert_eq!(file.line(3), None);
    }

    #[test]
    fn test_invalid_syntax_is_a_parse_error() {
        let err = SourceFile::from_text(Path::new("bad.py"), "def f(:\n".to_string());
        assert!(matches!(err, Err(crate::error::AnalysisError::Parse { .. })));
    }

    #[test]
    fn test_docstring_statement_is_flagged() {
        let file = parse("\"\"\"module doc\"\"\"\nx = 'literal'\n");
        let mut flagged = Vec::new();
        for_each_node(file.root(), |node| {
            if is_docstring_flagged(node) {
                flagged.push((node.kind(), node.start_position().row + 1));
            }
        });
        // Both the statement and its string, but not the string assigned to x.
        assert!(flagged.contains(&("expression_statement", 1)));
        assert!(flagged.contains(&("string", 1)));
        assert!(!flagged.iter().any(|&(_, line)| line == 2));
    }

    #[test]
    fn test_preorder_visits_outer_nodes_first() {
        let file = parse("x = y.z()\n");
        let mut kinds = Vec::new();
        for_each_node(file.root(), |node| {
            if node.is_named() {
                kinds.push(node.kind());
            }
        });
        let stmt = kinds.iter().position(|&k| k == "expression_statement").unwrap();
        let assign = kinds.iter().position(|&k| k == "assignment").unwrap();
        let call = kinds.iter().position(|&k| k == "call").unwrap();
        assert!(stmt < assign && assign < call);
    }
}
