use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vellum_types::{ContentAddress, Ledger, ResourceId, Tags};

/// A stored ledger revision.
///
/// Entities are owned by the store; callers receive clones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub resource_id: ResourceId,
    pub parent_address: Option<ContentAddress>,
    pub address: ContentAddress,
    pub size: u64,
    pub content_type: String,
    pub author_id: Option<String>,
    pub tags: Tags,
    pub created_on: DateTime<Utc>,
}

impl Entity {
    /// A bare entity with no content reference, mostly useful in tests.
    pub fn new(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            parent_address: None,
            address: ContentAddress::default(),
            size: 0,
            content_type: String::new(),
            author_id: None,
            tags: Tags::new(),
            created_on: DateTime::<Utc>::default(),
        }
    }

    /// Replace the tag set.
    pub fn with_tags(mut self, tags: impl Into<Tags>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Set the author.
    pub fn with_author_id(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Point the entity at stored content.
    pub fn with_address(mut self, address: impl Into<ContentAddress>) -> Self {
        self.address = address.into();
        self
    }
}

impl From<Ledger> for Entity {
    fn from(ledger: Ledger) -> Self {
        Self {
            resource_id: ledger.resource_id,
            parent_address: ledger.parent_address,
            address: ledger.address,
            size: ledger.size,
            content_type: ledger.content_type,
            author_id: ledger.author_id,
            tags: ledger.tags,
            created_on: ledger.created_on,
        }
    }
}

impl From<Entity> for Ledger {
    fn from(entity: Entity) -> Self {
        Self {
            resource_id: entity.resource_id,
            parent_address: entity.parent_address,
            address: entity.address,
            size: entity.size,
            content_type: entity.content_type,
            author_id: entity.author_id,
            tags: entity.tags,
            created_on: entity.created_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_conversion_preserves_fields() {
        let entity = Entity::new(ResourceId::new())
            .with_tags(vec!["a", "b"])
            .with_author_id("alice")
            .with_address("addr");
        let ledger: Ledger = entity.clone().into();
        assert_eq!(ledger.resource_id, entity.resource_id);
        assert_eq!(ledger.tags, entity.tags);
        let back: Entity = ledger.into();
        assert_eq!(back, entity);
    }
}
