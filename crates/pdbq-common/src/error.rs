//! Error types for pdbq record validation

use thiserror::Error;

/// Result type alias for pdbq model operations
pub type Result<T> = std::result::Result<T, PdbqError>;

/// Errors raised while constructing or interpreting records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdbqError {
    #[error("Invalid structure identifier '{0}': expected 4 ASCII alphanumeric characters")]
    InvalidIdentifier(String),

    #[error("Unknown query kind: {0}")]
    UnknownQueryKind(String),

    #[error("Unknown comparator: {0}")]
    UnknownComparator(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
