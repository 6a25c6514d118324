use vellum_types::{Query, ResourceId};

use crate::entity::Entity;
use crate::error::StoreResult;

/// Persistence for ledger revision chains.
///
/// Implementations must be `Send + Sync` and make every operation atomic
/// with respect to every other: no caller observes a partially appended
/// chain or a partially cleared store.
pub trait Store: Send + Sync {
    /// Append `entity` to the chain for `entity.resource_id`, creating the
    /// chain if absent. Reusing a resource id is the normal way to add a
    /// revision and is never an error.
    fn insert(&self, entity: Entity) -> StoreResult<()>;

    /// Return the head of the resource's chain.
    ///
    /// The query is accepted for symmetry with [`Store::get_multiple`] but
    /// the head is returned whether or not it matches. An absent or empty
    /// chain is [`StoreError::NotFound`].
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    fn get(&self, resource_id: &ResourceId, query: &Query) -> StoreResult<Entity>;

    /// Every revision of the resource matching `query`, in insertion order.
    ///
    /// Unknown resources yield an empty vector, never `NotFound`.
    fn get_multiple(&self, resource_id: &ResourceId, query: &Query) -> StoreResult<Vec<Entity>>;

    /// Remove every resource atomically.
    fn drop_all(&self) -> StoreResult<()>;

    /// Start background work or open underlying resources.
    fn run(&self) -> StoreResult<()>;

    /// Stop background work and release resources. Safe to call repeatedly.
    fn stop(&self);
}
