//! Error types for Kindred Core

use crate::store::StoreError;
use thiserror::Error;

/// Result type alias using Kindred's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Kindred error types
#[derive(Error, Debug)]
pub enum Error {
    /// A relationship tag outside the closed seven-kind set.
    #[error("Invalid relationship type: {0}")]
    InvalidRelationshipType(String),

    /// Store failure, propagated unchanged from the backend.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
