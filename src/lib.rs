//! linefacts - per-line static analysis of Python source files.
//!
//! linefacts parses a single file with tree-sitter and derives two
//! line-indexed views used by downstream tooling:
//!
//! - an indentation map recovering each line's true leading whitespace from
//!   the raw text (node column metadata reflects a sub-token's column, not
//!   the line's indentation, and is never consulted)
//! - a classification map resolving every syntax node on a line to a
//!   `(kind, value)` descriptor, with nested wrappers (calls, expression
//!   statements, subscripts) collapsed to the value that matters
//!
//! # Architecture
//!
//! - `analysis`: the core - source session, node resolution, indentation
//!   recovery, and line classification
//! - `report`: bucket layer and output formatting (pretty, JSON)
//! - `cli`: command-line surface
//! - `error`: the fatal-error taxonomy (read, decode, parse)

pub mod analysis;
pub mod cli;
pub mod error;
pub mod report;

pub use analysis::{
    classify_lines, classify_path, indents_for_path, line_indents, Descriptor, IndentAnalysis,
    IndentWarning, LineDescriptorMap, LineIndentMap, NodeKind, SourceFile, Value,
};
pub use error::{AnalysisError, Result};
pub use report::{bucket_names, NameBuckets};
