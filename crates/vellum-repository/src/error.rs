use thiserror::Error;
use vellum_content::ContentError;
use vellum_store::StoreError;
use vellum_types::{NotFound, ResourceId};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Appending requires the resource to already have a head revision.
    #[error("no existing ledger to append to: {0}")]
    NoHead(ResourceId),

    #[error("repository is closed")]
    Closed,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("content error: {0}")]
    Content(#[from] ContentError),
}

impl NotFound for RepositoryError {
    fn is_not_found(&self) -> bool {
        match self {
            Self::Store(e) => e.is_not_found(),
            Self::Content(e) => e.is_not_found(),
            Self::NoHead(_) | Self::Closed | Self::Config(_) => false,
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Whether `err` reports an absent resource or payload.
pub fn is_not_found<E: NotFound + ?Sized>(err: &E) -> bool {
    err.is_not_found()
}
