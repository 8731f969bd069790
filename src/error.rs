//! Error taxonomy for the analysis core.
//!
//! Read and parse failures are fatal: nothing partial is ever returned.
//! Unrecognized syntax-node variants are not errors at all; the resolver
//! degrades to a textual dump for those (see `analysis::resolve`).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid UTF-8 (after BOM stripping).
    #[error("{} is not valid UTF-8 text", path.display())]
    Decode { path: PathBuf },

    /// The parser rejected the file, or the tree contains ERROR nodes.
    #[error("{} is not syntactically valid Python", path.display())]
    Parse { path: PathBuf },

    /// The bundled grammar is incompatible with the tree-sitter runtime.
    #[error("grammar rejected by tree-sitter: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
