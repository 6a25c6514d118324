//! Foundation types for vellum, a versioned document and content store.
//!
//! Every other vellum crate depends on `vellum-types`.
//!
//! # Key Types
//!
//! - [`ResourceId`] -- UUID naming one logical document
//! - [`Tags`] -- deduplicated tag set with subset matching
//! - [`Query`] -- tag and author filter, built from fallible [`QueryOption`]s
//! - [`ContentAddress`] -- opaque locator of an immutable payload
//! - [`Content`] -- payload bytes plus address, type and size
//! - [`Ledger`] -- one revision of a document's metadata
//! - [`NotFound`] -- predicate implemented by every vellum error type

pub mod content;
pub mod error;
pub mod ledger;
pub mod query;
pub mod resource;
pub mod tags;

pub use content::{
    build_content, with_address, with_bytes, with_content_type, with_size, Content,
    ContentAddress, ContentBuilder, ContentOption, DEFAULT_CONTENT_TYPE,
};
pub use error::{NotFound, TypeError};
pub use ledger::Ledger;
pub use query::{build_query, with_author_id, with_tags, Query, QueryOption};
pub use resource::ResourceId;
pub use tags::Tags;
