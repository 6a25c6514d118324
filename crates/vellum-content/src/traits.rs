use vellum_types::{Content, ContentAddress};

use crate::error::ContentResult;

/// Content-addressable payload store.
///
/// All implementations must satisfy these invariants:
/// - Payloads are immutable once written; writing identical bytes again
///   returns the same address and stores nothing new.
/// - Absence is reported as [`ContentError::NotFound`], never as a panic.
/// - Implementations may block on I/O. Callers must not hold unrelated
///   locks across these calls.
///
/// [`ContentError::NotFound`]: crate::ContentError::NotFound
pub trait ContentStore: Send + Sync {
    /// Store `bytes` and return their address.
    fn put(&self, bytes: &[u8], content_type: &str) -> ContentResult<ContentAddress>;

    /// Load the payload at `address`, fully materialized.
    fn get(&self, address: &ContentAddress) -> ContentResult<Content>;

    fn exists(&self, address: &ContentAddress) -> ContentResult<bool>;

    /// Store a materialized [`Content`] and return it with its stored
    /// address filled in.
    fn put_content(&self, content: Content) -> ContentResult<Content> {
        let address = self.put(content.bytes()?, content.content_type())?;
        Ok(content.with_stored_address(address))
    }
}
