use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid resource id {input:?}: {reason}")]
    InvalidResourceId { input: String, reason: String },

    #[error("content size mismatch: declared {declared}, actual {actual}")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("content bytes are not materialized")]
    NotMaterialized,

    /// A builder option rejected its input.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

/// Identifies "absent" conditions without matching on error messages.
///
/// Every vellum error enum implements this, so a boundary layer can map
/// absence to a different response than validation or backend failures.
pub trait NotFound {
    fn is_not_found(&self) -> bool;
}

impl NotFound for TypeError {
    fn is_not_found(&self) -> bool {
        false
    }
}
