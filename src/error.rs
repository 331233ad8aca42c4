//! Error types for card_inventory

use crate::models::FieldError;
use axum::http::StatusCode;
use thiserror::Error;

/// Unified error type for card_inventory operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Filesystem or socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Submitted form failed validation
    #[error("Invalid input: {}", describe(.0))]
    Validation(Vec<FieldError>),
    /// No inventory row with this id
    #[error("No card with id {0}")]
    NotFound(i64),
    /// Path segment that is not a card id at all
    #[error("Invalid card id: {0}")]
    InvalidId(String),
    /// Request body could not be read as a form
    #[error("Invalid form submission: {message}")]
    InvalidForm { status: StatusCode, message: String },
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Short alias used by callers outside the crate
pub type Error = InventoryError;

/// Result alias for card_inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
