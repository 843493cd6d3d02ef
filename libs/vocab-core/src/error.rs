//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using ImportError.
pub type Result<T> = std::result::Result<T, ImportError>;

/// A grade string outside `again`, `learning`, `known`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid grade {value:?}: expected again, learning or known")]
pub struct InvalidGradeError {
    pub value: String,
}

/// Errors that can occur while importing a vocabulary CSV.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),
}
