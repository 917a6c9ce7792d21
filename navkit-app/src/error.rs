//! Error types for the browser binding.

use navkit_core::CoordinatorError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result type for browser binding operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to JavaScript.
#[derive(Debug, Error)]
pub enum AppError {
    /// Not running in a window context.
    #[error("No window object")]
    NoWindow,

    /// The window has no document.
    #[error("No document object")]
    NoDocument,

    /// A coordinator operation failed.
    #[error(transparent)]
    Core(#[from] CoordinatorError),

    /// A browser API threw.
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl AppError {
    /// Wrap a thrown JavaScript value.
    pub(crate) fn js(value: &JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
