use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::tags::Tags;

/// Filter applied when reading ledgers.
///
/// An empty tag set is an open filter and matches every entity. A `None`
/// author leaves authorship unconstrained, while `Some("")` only matches
/// entities whose author is explicitly empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    tags: Tags,
    author_id: Option<String>,
}

/// One step of query construction. Returning an error aborts the build.
pub type QueryOption = Box<dyn FnOnce(&mut Query) -> Result<(), TypeError> + Send>;

impl Query {
    /// The open query: every tag set and every author match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every match must carry.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Required author, `None` when unconstrained.
    pub fn author_id(&self) -> Option<&str> {
        self.author_id.as_deref()
    }
}

/// Apply `options` in order to an open query.
///
/// The first failing option's error is returned and no query is produced.
pub fn build_query<I>(options: I) -> Result<Query, TypeError>
where
    I: IntoIterator<Item = QueryOption>,
{
    options.into_iter().try_fold(Query::new(), |mut query, option| {
        option(&mut query)?;
        Ok(query)
    })
}

/// Replace the query's tag set.
pub fn with_tags<I, S>(tags: I) -> QueryOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tags: Tags = tags.into_iter().collect();
    Box::new(move |query: &mut Query| {
        query.tags = tags;
        Ok(())
    })
}

/// Constrain the query to one author. An empty string constrains to the
/// explicitly empty author rather than lifting the constraint.
pub fn with_author_id(author_id: impl Into<String>) -> QueryOption {
    let author_id = author_id.into();
    Box::new(move |query: &mut Query| {
        query.author_id = Some(author_id);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_options_is_open_query() {
        let query = build_query(Vec::new()).unwrap();
        assert!(query.tags().is_empty());
        assert!(query.author_id().is_none());
        assert_eq!(query, Query::new());
    }

    #[test]
    fn options_apply_in_order() {
        let query = build_query(vec![
            with_tags(["a", "b"]),
            with_author_id("alice"),
            with_tags(["c"]),
        ])
        .unwrap();
        assert_eq!(query.tags().slice(), vec!["c".to_string()]);
        assert_eq!(query.author_id(), Some("alice"));
    }

    #[test]
    fn empty_author_is_a_constraint() {
        let query = build_query(vec![with_author_id("")]).unwrap();
        assert_eq!(query.author_id(), Some(""));
    }

    #[test]
    fn failing_option_aborts_build() {
        let reject: QueryOption =
            Box::new(|_: &mut Query| Err(TypeError::InvalidOption("bad".into())));
        let err = build_query(vec![with_tags(["a"]), reject, with_author_id("bob")]).unwrap_err();
        assert_eq!(err, TypeError::InvalidOption("bad".into()));
    }

    #[test]
    fn later_options_are_not_run_after_failure() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let reject: QueryOption =
            Box::new(|_: &mut Query| Err(TypeError::InvalidOption("stop".into())));
        let observe: QueryOption = Box::new(move |_: &mut Query| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        assert!(build_query(vec![reject, observe]).is_err());
        assert!(!ran.load(Ordering::SeqCst));
    }
}
