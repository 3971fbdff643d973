//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure the core can report maps to exactly one variant, so callers
/// can pick a response from [`DomainError::code`] without looking at message
/// text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was empty or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A product with the same (trimmed, case-sensitive) name already exists.
    #[error("product \"{0}\" already exists")]
    DuplicateProduct(String),

    /// A product name was referenced that the catalog does not know.
    #[error("unknown product \"{0}\"")]
    UnknownProduct(String),

    /// The persistence layer failed or could not be reached.
    ///
    /// The payload carries the storage detail for logs; it is deliberately
    /// not part of the `Display` output.
    #[error("storage unavailable")]
    StorageUnavailable(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn duplicate_product(name: impl Into<String>) -> Self {
        Self::DuplicateProduct(name.into())
    }

    pub fn unknown_product(name: impl Into<String>) -> Self {
        Self::UnknownProduct(name.into())
    }

    pub fn storage_unavailable(detail: impl Into<String>) -> Self {
        Self::StorageUnavailable(detail.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::DuplicateProduct(_) => "duplicate_product",
            DomainError::UnknownProduct(_) => "unknown_product",
            DomainError::StorageUnavailable(_) => "storage_unavailable",
        }
    }

    /// Internal detail of a storage failure, for logging only.
    pub fn storage_detail(&self) -> Option<&str> {
        match self {
            DomainError::StorageUnavailable(detail) => Some(detail),
            _ => None,
        }
    }
}
