//! Ledger metadata storage for vellum.
//!
//! A store keeps, for every [`ResourceId`], an append-only chain of
//! [`Entity`] revisions. The last element of a chain is its head. Stores
//! never delete individual revisions; [`Store::drop_all`] resets everything.
//!
//! # Backends
//!
//! All backends implement the [`Store`] trait:
//!
//! - [`VirtualStore`] -- in-memory reference implementation
//! - [`JournalStore`] -- in-memory index rebuilt from an append-only file
//!
//! # Design Rules
//!
//! 1. Inserting onto an unknown resource creates its chain.
//! 2. `get` answers "what is the head"; it does not filter by query.
//! 3. `get_multiple` filters by tag subset and author, in insertion order,
//!    and never reports `NotFound`.
//! 4. Every operation is atomic with respect to every other.
//!
//! [`ResourceId`]: vellum_types::ResourceId

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod journal;
pub mod traits;
pub mod virtual_store;

pub use config::StoreConfig;
pub use entity::Entity;
pub use error::{StoreError, StoreResult};
pub use filter::{filter_entities, matches};
pub use journal::JournalStore;
pub use traits::Store;
pub use virtual_store::VirtualStore;
