//! Repository API for vellum.
//!
//! [`Repository`] composes a ledger [`Store`] and a [`ContentStore`] into
//! the document operations: read and write ledger revisions, put and fetch
//! payloads, and query revision history by tags and author.
//!
//! The [`params`] module decodes request parameters at the boundary, and
//! [`is_not_found`] lets that boundary tell absence apart from validation
//! and backend failures.
//!
//! [`Store`]: vellum_store::Store
//! [`ContentStore`]: vellum_content::ContentStore

pub mod config;
pub mod error;
pub mod params;
pub mod repository;

pub use config::RepositoryConfig;
pub use error::{is_not_found, RepositoryError, RepositoryResult};
pub use params::{
    InsertQueryParams, LedgerQueryParams, ParamsError, QueryBehavior, SelectQueryParams,
    DEFAULT_MAX_CONTENT_LENGTH,
};
pub use repository::Repository;

// Re-export key types
pub use vellum_types::{
    build_query, with_author_id, with_tags, Content, ContentAddress, Ledger, NotFound, Query,
    ResourceId, Tags,
};
