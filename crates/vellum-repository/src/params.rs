//! Request parameter decoding for an HTTP boundary.
//!
//! These helpers turn a request URL or header map into typed parameters and
//! report malformed input as [`ParamsError`]. They never touch a backend, so
//! a caller can reject a request before any store or content I/O happens.

use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::HeaderMap;
use thiserror::Error;
use url::Url;
use vellum_types::{
    build_query, with_author_id, with_tags, NotFound, Query, QueryOption, ResourceId, TypeError,
};

/// Largest accepted payload unless configured otherwise: 5 MiB.
pub const DEFAULT_MAX_CONTENT_LENGTH: i64 = 5 * 1024 * 1024;

const RESOURCE_ID: &str = "resource_id";
const TAGS: &str = "tags";
const AUTHOR_ID: &str = "author_id";

/// Whether absent parameters are an error.
///
/// Parameters that are present are validated either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryBehavior {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("error reading 'resource_id' (required) query")]
    MissingResourceId,

    #[error("error parsing 'resource_id' query: {0}")]
    InvalidResourceId(String),

    #[error("error reading 'content-type' (required) header")]
    MissingContentType,

    #[error("error reading 'content-type' header: not valid text")]
    InvalidContentType,

    #[error("error reading 'content-length' (required) header")]
    MissingContentLength,

    #[error("error parsing 'content-length' header: {0}")]
    InvalidContentLength(String),

    #[error("request body too large: {size} bytes (max {max})")]
    ContentTooLarge { size: i64, max: i64 },

    #[error("request body is empty: content-length {size}")]
    EmptyContent { size: i64 },

    #[error("invalid query: {0}")]
    InvalidQuery(#[from] TypeError),
}

impl NotFound for ParamsError {
    fn is_not_found(&self) -> bool {
        false
    }
}

fn query_value<'a>(url: &'a Url, key: &str) -> Option<std::borrow::Cow<'a, str>> {
    url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn decode_resource_id(url: &Url, behavior: QueryBehavior) -> Result<ResourceId, ParamsError> {
    match query_value(url, RESOURCE_ID) {
        Some(raw) if !raw.is_empty() => {
            ResourceId::parse(&raw).map_err(|e| ParamsError::InvalidResourceId(e.to_string()))
        }
        _ => match behavior {
            QueryBehavior::Required => Err(ParamsError::MissingResourceId),
            QueryBehavior::Optional => Ok(ResourceId::nil()),
        },
    }
}

/// Parameters for reading a document's head.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectQueryParams {
    pub resource_id: ResourceId,
}

impl SelectQueryParams {
    /// Decode `resource_id` from the query string.
    pub fn decode_from(url: &Url, behavior: QueryBehavior) -> Result<Self, ParamsError> {
        Ok(Self {
            resource_id: decode_resource_id(url, behavior)?,
        })
    }
}

/// Parameters describing an uploaded payload, taken from request headers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsertQueryParams {
    pub content_type: String,
    pub content_length: i64,
}

impl InsertQueryParams {
    /// Decode `Content-Type` and `Content-Length`, rejecting lengths outside
    /// `1..=max_content_length`.
    pub fn decode_from(
        headers: &HeaderMap,
        behavior: QueryBehavior,
        max_content_length: i64,
    ) -> Result<Self, ParamsError> {
        let required = behavior == QueryBehavior::Required;
        let mut params = Self::default();

        match headers.get(CONTENT_TYPE) {
            Some(value) => {
                let value = value.to_str().map_err(|_| ParamsError::InvalidContentType)?;
                if value.is_empty() && required {
                    return Err(ParamsError::MissingContentType);
                }
                params.content_type = value.to_string();
            }
            None if required => return Err(ParamsError::MissingContentType),
            None => {}
        }

        match headers.get(CONTENT_LENGTH) {
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|e| ParamsError::InvalidContentLength(e.to_string()))?;
                let size: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| {
                        ParamsError::InvalidContentLength(e.to_string())
                    })?;
                if size > max_content_length {
                    return Err(ParamsError::ContentTooLarge {
                        size,
                        max: max_content_length,
                    });
                }
                if size < 1 {
                    return Err(ParamsError::EmptyContent { size });
                }
                params.content_length = size;
            }
            None if required => return Err(ParamsError::MissingContentLength),
            None => {}
        }

        Ok(params)
    }
}

/// Parameters for reading ledger history: a resource id plus an optional
/// tag and author filter.
///
/// Tags may be repeated (`tags=a&tags=b`) or comma separated (`tags=a,b`).
/// Every piece is kept verbatim, so `tags=` asks for the empty tag and
/// `tags=a,` for `a` plus the empty tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerQueryParams {
    pub resource_id: ResourceId,
    pub tags: Vec<String>,
    pub author_id: Option<String>,
}

impl LedgerQueryParams {
    /// Decode `resource_id`, `tags` and `author_id` from the query string.
    pub fn decode_from(url: &Url, behavior: QueryBehavior) -> Result<Self, ParamsError> {
        let resource_id = decode_resource_id(url, behavior)?;

        let mut tags = Vec::new();
        let mut author_id = None;
        for (key, value) in url.query_pairs() {
            if key == TAGS {
                tags.extend(value.split(',').map(str::to_string));
            } else if key == AUTHOR_ID && author_id.is_none() {
                author_id = Some(value.into_owned());
            }
        }

        Ok(Self {
            resource_id,
            tags,
            author_id,
        })
    }

    /// The store filter these parameters describe.
    pub fn into_query(self) -> Result<Query, ParamsError> {
        let mut options: Vec<QueryOption> = Vec::new();
        if !self.tags.is_empty() {
            options.push(with_tags(self.tags));
        }
        if let Some(author_id) = self.author_id {
            options.push(with_author_id(author_id));
        }
        Ok(build_query(options)?)
    }
}
