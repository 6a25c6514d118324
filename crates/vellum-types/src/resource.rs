use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Globally unique identifier of one logical document.
///
/// Every revision of a document shares the same `ResourceId`. The nil id
/// (all zeros) means "not yet assigned"; the repository replaces it with a
/// fresh random id on first insert.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Generate a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The nil identifier.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the unassigned id.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Parse from the canonical hyphenated form (other UUID encodings are
    /// accepted as well).
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| TypeError::InvalidResourceId {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::nil()
    }
}

impl From<Uuid> for ResourceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for ResourceId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(ResourceId::new(), ResourceId::new());
    }

    #[test]
    fn new_id_is_not_nil() {
        assert!(!ResourceId::new().is_nil());
        assert!(ResourceId::nil().is_nil());
        assert!(ResourceId::default().is_nil());
    }

    #[test]
    fn display_parse_roundtrip() {
        let id = ResourceId::new();
        let parsed: ResourceId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = ResourceId::parse("123asd").unwrap_err();
        assert!(matches!(err, TypeError::InvalidResourceId { .. }));
    }

    #[test]
    fn serde_is_transparent() {
        let id = ResourceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
