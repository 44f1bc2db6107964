use thiserror::Error;

use crate::types::Status;

/// Boundary-level validation failures. Raised before any state is touched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("price must be a positive number, got {0}")]
    NonPositivePrice(f64),
    #[error("location must not be empty")]
    EmptyLocation,
    #[error("location exceeds {max} bytes")]
    LocationTooLong { max: usize },
    #[error("page must be at least 1")]
    ZeroPage,
    #[error("limit must be at least 1")]
    ZeroLimit,
    #[error("limit {got} exceeds maximum of {max}")]
    LimitTooLarge { got: usize, max: usize },
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteBound { field: &'static str, value: f64 },
    #[error("invalid status: {0}")]
    UnknownStatus(String),
    #[error("invalid sort key: {0}")]
    UnknownSortKey(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Property does not exist.")]
    NotFound(String),
    #[error("You are not authorized to modify the status of this property.")]
    Unauthorized { property_id: String, requester: String },
    #[error("Property is already in the requested status.")]
    NoOp(Status),
    #[error("Property is already shortlisted.")]
    AlreadyShortlisted(String),
    #[error("Property is not in your shortlist.")]
    NotInShortlist(String),
    #[error("Your shortlist has no properties currently.")]
    EmptyShortlist,
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Flat error classification handed to transport adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    NoOp,
    AlreadyShortlisted,
    NotInShortlist,
    EmptyShortlist,
    Validation,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Unauthorized { .. } => ErrorKind::Unauthorized,
            CatalogError::NoOp(_) => ErrorKind::NoOp,
            CatalogError::AlreadyShortlisted(_) => ErrorKind::AlreadyShortlisted,
            CatalogError::NotInShortlist(_) => ErrorKind::NotInShortlist,
            CatalogError::EmptyShortlist => ErrorKind::EmptyShortlist,
            CatalogError::Validation(_) => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
