use vellum_types::{ContentAddress, NotFound, TypeError};

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// No payload is stored at the address.
    #[error("content not found: {0}")]
    NotFound(ContentAddress),

    /// Stored bytes no longer hash to their address.
    #[error("corrupt content {address}: {reason}")]
    Corrupt {
        address: ContentAddress,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration option or required field was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The backend cannot serve requests (e.g. a poisoned lock).
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Type(#[from] TypeError),
}

impl NotFound for ContentError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for content store operations.
pub type ContentResult<T> = Result<T, ContentError>;
