//! Content-addressed payload storage for vellum.
//!
//! Payloads are immutable byte strings identified by a [`ContentAddress`]
//! derived from their BLAKE3 digest. Ledger metadata refers to payloads by
//! address only; this crate never sees tags, authors or revisions.
//!
//! # Storage Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`InMemoryContentStore`] -- `HashMap`-based store for tests and embedding
//! - [`LocalContentStore`] -- files under a root directory
//!
//! Remote object stores are provided by external clients; [`RemoteConfig`]
//! is the validated configuration handed to them.
//!
//! [`ContentAddress`]: vellum_types::ContentAddress

pub mod config;
pub mod error;
pub mod hasher;
pub mod local;
pub mod memory;
pub mod traits;

pub use config::{
    build_config, with_bucket, with_id, with_region, with_secret, with_token,
    ContentStoreConfig, RemoteConfig, RemoteConfigBuilder, RemoteOption,
};
pub use error::{ContentError, ContentResult};
pub use hasher::AddressHasher;
pub use local::LocalContentStore;
pub use memory::InMemoryContentStore;
pub use traits::ContentStore;
