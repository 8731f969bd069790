//! Line-indexed analysis of a single Python source file.
//!
//! Two independent views are derived from one parsed tree:
//!
//! - [`line_indents`]: line number to indentation width, recovered from the
//!   raw source text (node column metadata is never consulted).
//! - [`classify_lines`]: line number to the ordered `(kind, value)`
//!   descriptors of every syntax node starting on that line.
//!
//! Both are pure, synchronous, read-only traversals over the session held in
//! a [`SourceFile`]. Repeated runs over an unmodified file produce identical
//! mappings.

mod classify;
mod indent;
mod resolve;
pub(crate) mod source;

use std::path::Path;

use crate::error::Result;

pub use classify::{classify_lines, LineDescriptorMap};
pub use indent::{line_indents, IndentAnalysis, IndentWarning, LineIndentMap, INDENT_UNIT};
pub use resolve::{resolve_node, Descriptor, NodeKind, Value};
pub use source::SourceFile;

/// Load `path` and recover its line indentation map.
pub fn indents_for_path(path: &Path) -> Result<IndentAnalysis> {
    let file = SourceFile::load(path)?;
    Ok(line_indents(&file))
}

/// Load `path` and classify its nodes by line.
pub fn classify_path(path: &Path) -> Result<LineDescriptorMap> {
    let file = SourceFile::load(path)?;
    Ok(classify_lines(&file))
}
