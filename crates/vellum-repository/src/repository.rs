use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};
use vellum_content::ContentStore;
use vellum_store::{Entity, Store, StoreError};
use vellum_types::{Content, Ledger, Query, ResourceId};

use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, RepositoryResult};

/// Ledger revisions and their payloads behind one interface.
///
/// Ledger metadata and payload bytes are addressed independently: a write
/// is a [`Repository::put_content`] followed by a ledger insert or append
/// that refers to the returned address. The repository never holds a store
/// lock while talking to the content store; each store call is one short
/// critical section.
pub struct Repository {
    store: Box<dyn Store>,
    contents: Box<dyn ContentStore>,
    closed: AtomicBool,
}

impl Repository {
    /// Compose `store` and `contents`, starting the store.
    pub fn new(store: Box<dyn Store>, contents: Box<dyn ContentStore>) -> RepositoryResult<Self> {
        store.run()?;
        Ok(Self {
            store,
            contents,
            closed: AtomicBool::new(false),
        })
    }

    /// Build the backends selected by `config`.
    pub fn open(config: &RepositoryConfig) -> RepositoryResult<Self> {
        let store = config.store.build();
        let contents = config.content.open()?;
        let repository = Self::new(store, contents)?;
        info!(store = ?config.store, content = ?config.content, "repository opened");
        Ok(repository)
    }

    fn ensure_open(&self) -> RepositoryResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(RepositoryError::Closed);
        }
        Ok(())
    }

    /// The head revision of `resource_id`.
    pub fn get_ledger(&self, resource_id: &ResourceId, query: &Query) -> RepositoryResult<Ledger> {
        self.ensure_open()?;
        let entity = self.store.get(resource_id, query)?;
        Ok(entity.into())
    }

    /// Store `ledger` as a new revision, assigning a fresh resource id when
    /// it carries the nil id.
    pub fn insert_ledger(&self, mut ledger: Ledger) -> RepositoryResult<Ledger> {
        self.ensure_open()?;
        if ledger.resource_id.is_nil() {
            ledger.resource_id = ResourceId::new();
        }
        self.store.insert(Entity::from(ledger.clone()))?;
        debug!(resource_id = %ledger.resource_id, address = %ledger.address, "ledger inserted");
        Ok(ledger)
    }

    /// Add `ledger` as the next revision of an existing resource.
    ///
    /// Fails with [`RepositoryError::NoHead`] if the resource has no
    /// revisions. The appended ledger takes `resource_id` and records the
    /// previous head's content address as its parent.
    pub fn append_ledger(
        &self,
        resource_id: &ResourceId,
        mut ledger: Ledger,
    ) -> RepositoryResult<Ledger> {
        self.ensure_open()?;
        let head = match self.store.get(resource_id, &Query::new()) {
            Ok(head) => head,
            Err(StoreError::NotFound(_)) => return Err(RepositoryError::NoHead(*resource_id)),
            Err(e) => return Err(e.into()),
        };

        ledger.resource_id = *resource_id;
        ledger.parent_address = Some(head.address);
        self.store.insert(Entity::from(ledger.clone()))?;
        debug!(resource_id = %resource_id, address = %ledger.address, "ledger appended");
        Ok(ledger)
    }

    /// Every revision of `resource_id` matching `query`, oldest first.
    pub fn get_ledgers(
        &self,
        resource_id: &ResourceId,
        query: &Query,
    ) -> RepositoryResult<Vec<Ledger>> {
        self.ensure_open()?;
        let entities = self.store.get_multiple(resource_id, query)?;
        Ok(entities.into_iter().map(Ledger::from).collect())
    }

    /// The payload referenced by the head revision of `resource_id`.
    pub fn get_content(
        &self,
        resource_id: &ResourceId,
        query: &Query,
    ) -> RepositoryResult<Content> {
        self.ensure_open()?;
        let head = self.store.get(resource_id, query)?;
        Ok(self.contents.get(&head.address)?)
    }

    /// Store a materialized payload. No ledger is written; link it with a
    /// subsequent insert or append.
    pub fn put_content(&self, content: Content) -> RepositoryResult<Content> {
        self.ensure_open()?;
        let stored = self.contents.put_content(content)?;
        debug!(address = %stored.address(), size = stored.size(), "content put");
        Ok(stored)
    }

    /// Payloads of every revision of `resource_id` matching `query`, oldest
    /// first.
    pub fn get_contents(
        &self,
        resource_id: &ResourceId,
        query: &Query,
    ) -> RepositoryResult<Vec<Content>> {
        self.ensure_open()?;
        let entities = self.store.get_multiple(resource_id, query)?;
        entities
            .iter()
            .map(|entity| self.contents.get(&entity.address).map_err(Into::into))
            .collect()
    }

    /// Stop the underlying store. Only the first call succeeds; afterwards
    /// every operation reports [`RepositoryError::Closed`].
    pub fn close(&self) -> RepositoryResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(RepositoryError::Closed);
        }
        self.store.stop();
        info!("repository closed");
        Ok(())
    }

    /// Whether [`Repository::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
