//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// User not found.
    #[error("user not found: {username}")]
    UserNotFound { username: String },

    /// Article not found or deleted.
    #[error("article not found: {id}")]
    ArticleNotFound { id: u64 },

    /// Comment not found or deleted.
    #[error("comment not found: {id}")]
    CommentNotFound { id: u64 },

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true if the error refers to a record that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UserNotFound { .. }
                | StoreError::ArticleNotFound { .. }
                | StoreError::CommentNotFound { .. }
        )
    }
}
