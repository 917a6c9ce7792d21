//! Error types for coordinator operations.

use thiserror::Error;

use crate::Feature;

/// Result type for coordinator operations.
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

/// Errors that can occur while coordinating page interactions.
///
/// None of these are fatal to the page. Each one disables a single optional
/// enhancement while leaving content and navigation usable.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// A required DOM node is absent.
    #[error("Element not found: {0}")]
    MissingElement(String),

    /// A required browser API is absent.
    #[error("Unsupported capability: {0}")]
    Unsupported(Feature),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A DOM call was rejected by the host.
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// Configuration or snapshot (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
