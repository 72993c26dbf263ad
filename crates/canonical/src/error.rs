use thiserror::Error;

/// Failures of [`canonicalize`](crate::canonicalize).
///
/// Text that normalizes to nothing is not among them: the caller decides
/// whether an empty document is an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid canonical config: {0}")]
    InvalidConfig(String),
    /// The document name was empty or whitespace.
    #[error("document name must not be blank")]
    MissingDocId,
}
