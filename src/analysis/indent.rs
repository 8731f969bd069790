//! Indentation recovery from raw source text.
//!
//! Node column metadata is useless here: for `if a == 1:` the first
//! positioned sub-token may sit at the column of `a`, not at the line's
//! leading whitespace. So the true indentation is recovered by counting the
//! leading run of spaces in the raw line hosting each node.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::source::{carries_position, for_each_node, is_docstring_flagged, SourceFile};

lazy_static! {
    /// Longest match at line start wins.
    static ref LEADING_SPACES: Regex = Regex::new(r"^ *").unwrap();
}

/// The fixed indentation unit of the analyzed source.
pub const INDENT_UNIT: usize = 4;

/// Sparse ascending map of 1-based line number to indentation width.
pub type LineIndentMap = BTreeMap<usize, usize>;

/// A recovered indentation that is not a multiple of [`INDENT_UNIT`].
///
/// Malformed or mixed-indentation input; surfaced as a diagnostic, never
/// silently coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndentWarning {
    pub line: usize,
    pub width: usize,
}

impl std::fmt::Display for IndentWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: indentation of {} is not a multiple of {}",
            self.line, self.width, INDENT_UNIT
        )
    }
}

/// Result of indentation recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndentAnalysis {
    pub indents: LineIndentMap,
    pub warnings: Vec<IndentWarning>,
}

/// Recover each line's indentation from the raw source.
///
/// First node wins per line: the preorder walk reaches enclosing nodes
/// before their descendants, and later nodes on an already-recorded line are
/// ignored.
pub fn line_indents(file: &SourceFile) -> IndentAnalysis {
    let mut indents = LineIndentMap::new();

    for_each_node(file.root(), |node| {
        if !carries_position(node) {
            return;
        }
        if is_docstring_flagged(node) {
            return;
        }
        let lineno = node.start_position().row + 1;
        if indents.contains_key(&lineno) {
            return;
        }
        let Some(raw) = file.line(lineno) else {
            return;
        };
        let width = LEADING_SPACES
            .find(raw)
            .map(|m| m.end())
            .unwrap_or_default();
        indents.insert(lineno, width);
    });

    let warnings = indents
        .iter()
        .filter(|(_, &width)| width % INDENT_UNIT != 0)
        .map(|(&line, &width)| IndentWarning { line, width })
        .collect();

    IndentAnalysis { indents, warnings }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn indents_of(source: &str) -> IndentAnalysis {
        let file = SourceFile::from_text(Path::new("test.py"), source.to_string()).unwrap();
        line_indents(&file)
    }

    #[test]
    fn test_nested_blocks() {
        let source = "def func():\n    if a == 1:\n        pass\n";
        let analysis = indents_of(source);
        assert_eq!(
            analysis.indents,
            BTreeMap::from([(1, 0), (2, 4), (3, 8)])
        );
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_docstring_line_is_excluded() {
        let source = "\"\"\"doc\"\"\"\nimport os\n";
        let analysis = indents_of(source);
        assert!(!analysis.indents.contains_key(&1));
        assert_eq!(analysis.indents.get(&2), Some(&0));
    }

    #[test]
    fn test_blank_lines_are_absent() {
        let source = "import os\n\n\nimport sys\n";
        let analysis = indents_of(source);
        assert_eq!(analysis.indents, BTreeMap::from([(1, 0), (4, 0)]));
    }

    #[test]
    fn test_off_unit_indentation_warns_without_coercing() {
        let source = "if a:\n   pass\n";
        let analysis = indents_of(source);
        assert_eq!(analysis.indents.get(&2), Some(&3));
        assert_eq!(
            analysis.warnings,
            vec![IndentWarning { line: 2, width: 3 }]
        );
    }

    #[test]
    fn test_keys_are_strictly_ascending() {
        let source = "import os\n\ndef f():\n    x = 1\n    return x\n";
        let analysis = indents_of(source);
        let keys: Vec<usize> = analysis.indents.keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(keys, sorted);
    }
}
