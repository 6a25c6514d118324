use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{Content, ContentAddress};
use crate::resource::ResourceId;
use crate::tags::Tags;

/// One revision of a document's metadata.
///
/// A ledger points at a stored payload by address and carries the tags and
/// authorship used for filtering. Revisions of the same document share a
/// `resource_id`; `parent_address` links an appended revision to the
/// payload of the head it replaced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub resource_id: ResourceId,
    pub parent_address: Option<ContentAddress>,
    pub address: ContentAddress,
    pub size: u64,
    pub content_type: String,
    pub author_id: Option<String>,
    pub tags: Tags,
    pub created_on: DateTime<Utc>,
}

impl Ledger {
    /// An unassigned ledger describing `content`, timestamped now.
    pub fn for_content(content: &Content) -> Self {
        Self {
            resource_id: ResourceId::nil(),
            parent_address: None,
            address: content.address().clone(),
            size: content.size(),
            content_type: content.content_type().to_string(),
            author_id: None,
            tags: Tags::new(),
            created_on: Utc::now(),
        }
    }

    /// Replace the tag set.
    pub fn with_tags(mut self, tags: impl Into<Tags>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Set the author. An empty string is a real author id.
    pub fn with_author_id(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Assign the document this revision belongs to.
    pub fn with_resource_id(mut self, resource_id: ResourceId) -> Self {
        self.resource_id = resource_id;
        self
    }
}
