//! Tag-subset and author matching shared by every backend.

use vellum_types::Query;

use crate::entity::Entity;

/// Whether `entity` satisfies `query`.
///
/// - An empty query tag set matches any tags; otherwise every query tag must
///   be present on the entity (extra entity tags are ignored).
/// - A constrained author must equal the entity's author exactly, so
///   `Some("")` matches only an explicitly empty author, never an unset one.
pub fn matches(entity: &Entity, query: &Query) -> bool {
    let tags_match = query.tags().is_empty() || query.tags().is_subset(&entity.tags);
    let author_match = match query.author_id() {
        None => true,
        Some(author) => entity.author_id.as_deref() == Some(author),
    };
    tags_match && author_match
}

/// Clone out the entities of `chain` that match `query`, preserving order.
pub fn filter_entities(chain: &[Entity], query: &Query) -> Vec<Entity> {
    chain
        .iter()
        .filter(|entity| matches(entity, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vellum_types::{build_query, with_author_id, with_tags, ResourceId, Tags};

    fn entity(tags: &[&str]) -> Entity {
        Entity::new(ResourceId::new()).with_tags(tags.to_vec())
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches(&entity(&[]), &Query::new()));
        assert!(matches(&entity(&["a", "b"]), &Query::new()));
    }

    #[test]
    fn subset_matches() {
        let query = build_query(vec![with_tags(["a"])]).unwrap();
        assert!(matches(&entity(&["a", "b"]), &query));
    }

    #[test]
    fn missing_tag_does_not_match() {
        let query = build_query(vec![with_tags(["c"])]).unwrap();
        assert!(!matches(&entity(&["a", "b"]), &query));
        let query = build_query(vec![with_tags(["a", "c"])]).unwrap();
        assert!(!matches(&entity(&["a", "b"]), &query));
    }

    #[test]
    fn author_must_match_exactly() {
        let alice = entity(&[]).with_author_id("alice");
        let unset = entity(&[]);
        let empty = entity(&[]).with_author_id("");

        let query = build_query(vec![with_author_id("alice")]).unwrap();
        assert!(matches(&alice, &query));
        assert!(!matches(&unset, &query));

        let query = build_query(vec![with_author_id("")]).unwrap();
        assert!(matches(&empty, &query));
        assert!(!matches(&unset, &query));
        assert!(!matches(&alice, &query));
    }

    #[test]
    fn both_tests_must_pass() {
        let e = entity(&["a"]).with_author_id("bob");
        let query = build_query(vec![with_tags(["a"]), with_author_id("alice")]).unwrap();
        assert!(!matches(&e, &query));
    }

    #[test]
    fn filter_keeps_order() {
        let chain = vec![
            entity(&["x"]).with_address("1"),
            entity(&["y"]).with_address("2"),
            entity(&["x", "y"]).with_address("3"),
        ];
        let query = build_query(vec![with_tags(["x"])]).unwrap();
        let found: Vec<_> = filter_entities(&chain, &query)
            .into_iter()
            .map(|e| e.address.to_string())
            .collect();
        assert_eq!(found, vec!["1", "3"]);
    }

    fn small_tags() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-d]{0,1}", 0..4)
    }

    proptest! {
        #[test]
        fn tag_subset_law(
            entity_tags in small_tags(),
            query_tags in small_tags(),
            entity_author in proptest::option::of("[ab]{0,1}"),
            query_author in proptest::option::of("[ab]{0,1}"),
        ) {
            let mut e = Entity::new(ResourceId::new()).with_tags(entity_tags.clone());
            e.author_id = entity_author.clone();

            let mut options = vec![with_tags(query_tags.clone())];
            if let Some(author) = query_author.clone() {
                options.push(with_author_id(author));
            }
            let query = build_query(options).unwrap();

            let q: Tags = query_tags.into();
            let et: Tags = entity_tags.into();
            let expected = (q.is_empty() || q.iter().all(|t| et.contains(t)))
                && (query_author.is_none() || query_author == entity_author);
            prop_assert_eq!(matches(&e, &query), expected);
        }
    }
}
