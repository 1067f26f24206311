//! Parser trait definition

use crate::parser::types::Entry;

/// Trait for parsing requirements files
pub trait Parser: Send + Sync {
    /// Parse the content and extract the declared entries in file order
    fn parse(&self, content: &str) -> Result<Vec<Entry>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Invalid YAML syntax
    #[error("invalid syntax at line {line}")]
    InvalidSyntax { line: usize },

    /// A YAML node that cannot appear at this position
    #[error("unexpected yaml node {kind} at line {line}")]
    UnexpectedNode { line: usize, kind: String },

    /// Tree-sitter related error
    #[error("tree-sitter error: {0}")]
    TreeSitter(String),
}
