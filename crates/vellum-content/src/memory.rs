use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use tracing::debug;
use vellum_types::{Content, ContentAddress};

use crate::error::{ContentError, ContentResult};
use crate::hasher::AddressHasher;
use crate::traits::ContentStore;

#[derive(Clone)]
struct StoredContent {
    content_type: String,
    bytes: Bytes,
}

/// In-memory, HashMap-based content store.
///
/// Intended for tests and embedding. Payloads are held behind a `RwLock`;
/// `Bytes` makes reads cheap clones of the stored buffer.
pub struct InMemoryContentStore {
    contents: RwLock<HashMap<ContentAddress, StoredContent>>,
}

impl InMemoryContentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            contents: RwLock::new(HashMap::new()),
        }
    }

    /// Number of distinct payloads stored.
    pub fn len(&self) -> ContentResult<usize> {
        Ok(self.contents.read().map_err(poisoned)?.len())
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> ContentResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Total bytes across all stored payloads.
    pub fn total_bytes(&self) -> ContentResult<u64> {
        let map = self.contents.read().map_err(poisoned)?;
        Ok(map.values().map(|c| c.bytes.len() as u64).sum())
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> ContentError {
    ContentError::Unavailable(format!("lock poisoned: {e}"))
}

impl ContentStore for InMemoryContentStore {
    fn put(&self, bytes: &[u8], content_type: &str) -> ContentResult<ContentAddress> {
        let address = AddressHasher::CONTENT.address(bytes);
        let mut map = self.contents.write().map_err(poisoned)?;
        // First write wins; identical bytes always map to the same address.
        map.entry(address.clone()).or_insert_with(|| StoredContent {
            content_type: content_type.to_string(),
            bytes: Bytes::copy_from_slice(bytes),
        });
        debug!(address = %address, len = bytes.len(), "content stored in memory");
        Ok(address)
    }

    fn get(&self, address: &ContentAddress) -> ContentResult<Content> {
        let map = self.contents.read().map_err(poisoned)?;
        let stored = map
            .get(address)
            .ok_or_else(|| ContentError::NotFound(address.clone()))?;
        Ok(Content::new(
            address.clone(),
            stored.content_type.clone(),
            stored.bytes.clone(),
        ))
    }

    fn exists(&self, address: &ContentAddress) -> ContentResult<bool> {
        let map = self.contents.read().map_err(poisoned)?;
        Ok(map.contains_key(address))
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("content_count", &self.len().ok())
            .finish()
    }
}
