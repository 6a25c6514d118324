use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};
use vellum_types::{Query, ResourceId};

use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};
use crate::filter::filter_entities;
use crate::traits::Store;

/// In-memory reference [`Store`].
///
/// Chains are kept in a map from the resource id's string form to a vector
/// of entities. A single mutex guards the whole map and is never held
/// across I/O.
pub struct VirtualStore {
    entities: Mutex<HashMap<String, Vec<Entity>>>,
}

impl VirtualStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entities: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Vec<Entity>>>> {
        self.entities
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    /// Number of resources with at least one revision.
    pub fn len(&self) -> StoreResult<usize> {
        let map = self.lock()?;
        Ok(map.values().filter(|chain| !chain.is_empty()).count())
    }

    /// Whether no resource has a revision.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Revision count of one resource.
    pub fn revisions(&self, resource_id: &ResourceId) -> StoreResult<usize> {
        let map = self.lock()?;
        Ok(map.get(&resource_id.to_string()).map_or(0, Vec::len))
    }
}

impl Default for VirtualStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for VirtualStore {
    fn insert(&self, entity: Entity) -> StoreResult<()> {
        let resource_id = entity.resource_id;
        let mut map = self.lock()?;
        let chain = map.entry(resource_id.to_string()).or_default();
        chain.push(entity);
        debug!(resource_id = %resource_id, revisions = chain.len(), "entity inserted");
        Ok(())
    }

    fn get(&self, resource_id: &ResourceId, _query: &Query) -> StoreResult<Entity> {
        let map = self.lock()?;
        map.get(&resource_id.to_string())
            .and_then(|chain| chain.last())
            .cloned()
            .ok_or(StoreError::NotFound(*resource_id))
    }

    fn get_multiple(&self, resource_id: &ResourceId, query: &Query) -> StoreResult<Vec<Entity>> {
        let map = self.lock()?;
        Ok(map
            .get(&resource_id.to_string())
            .map(|chain| filter_entities(chain, query))
            .unwrap_or_default())
    }

    fn drop_all(&self) -> StoreResult<()> {
        let mut map = self.lock()?;
        let dropped = map.len();
        map.clear();
        info!(resources = dropped, "virtual store dropped");
        Ok(())
    }

    fn run(&self) -> StoreResult<()> {
        Ok(())
    }

    fn stop(&self) {}
}

impl std::fmt::Debug for VirtualStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualStore")
            .field("resource_count", &self.len().ok())
            .finish()
    }
}
