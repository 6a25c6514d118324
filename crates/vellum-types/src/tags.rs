use std::collections::btree_set;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A deduplicated set of string tags.
///
/// Insertion order is irrelevant; iteration and [`Tags::slice`] are in
/// lexicographic order so serialized forms are deterministic. The empty
/// string is a valid tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeSet<String>);

impl Tags {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Sorted copy of the tags.
    pub fn slice(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `tag` is in the set.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Add a tag. Returns `false` if it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    /// `true` when every tag in `self` is also in `other`.
    pub fn is_subset(&self, other: &Tags) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Iterate the tags in lexicographic order.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for Tags {
    fn from(tags: Vec<S>) -> Self {
        tags.into_iter().collect()
    }
}

impl IntoIterator for Tags {
    type Item = String;
    type IntoIter = btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn duplicates_are_removed() {
        let tags: Tags = vec!["b", "a", "b"].into();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.slice(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_string_is_a_tag() {
        let tags: Tags = vec![""].into();
        assert_eq!(tags.len(), 1);
        assert!(tags.contains(""));
    }

    #[test]
    fn subset_is_not_equality() {
        let query: Tags = vec!["a"].into();
        let entity: Tags = vec!["a", "b"].into();
        assert!(query.is_subset(&entity));
        assert!(!entity.is_subset(&query));
    }

    #[test]
    fn empty_is_subset_of_everything() {
        let entity: Tags = vec!["x"].into();
        assert!(Tags::new().is_subset(&entity));
        assert!(Tags::new().is_subset(&Tags::new()));
    }

    #[test]
    fn insert_reports_novelty() {
        let mut tags = Tags::new();
        assert!(tags.insert("a"));
        assert!(!tags.insert("a"));
    }

    #[test]
    fn serializes_as_sorted_array() {
        let tags: Tags = vec!["z", "m", "a"].into();
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["a","m","z"]"#);
    }

    proptest! {
        #[test]
        fn slice_is_independent_of_insertion_order(
            mut input in proptest::collection::vec(".*", 0..8)
        ) {
            let forward: Tags = input.clone().into();
            input.reverse();
            let backward: Tags = input.into();
            prop_assert_eq!(forward.slice(), backward.slice());
        }
    }
}
