use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Content type assumed when none is supplied.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Opaque locator of a stored payload.
///
/// Content-addressed backends derive it from the bytes, so identical
/// payloads share one address. Callers must not interpret its structure.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentAddress(String);

impl ContentAddress {
    /// Wrap a backend-specific locator.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The locator as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no address has been assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({})", self.0)
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContentAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An immutable payload and its metadata.
///
/// The bytes are optional so that metadata can travel without the payload
/// (e.g. when serialized into a response); [`Content::bytes`] reports
/// whether they were materialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    address: ContentAddress,
    content_type: String,
    size: u64,
    #[serde(skip)]
    bytes: Option<Bytes>,
}

impl Content {
    /// Materialized content whose size is taken from `bytes`.
    pub fn new(address: ContentAddress, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            address,
            content_type: content_type.into(),
            size: bytes.len() as u64,
            bytes: Some(bytes),
        }
    }

    /// Where the payload is stored; empty until a backend stores it.
    pub fn address(&self) -> &ContentAddress {
        &self.address
    }

    /// MIME type of the payload.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Payload length in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the payload bytes are present.
    pub fn is_materialized(&self) -> bool {
        self.bytes.is_some()
    }

    /// The payload, or [`TypeError::NotMaterialized`].
    pub fn bytes(&self) -> Result<&Bytes, TypeError> {
        self.bytes.as_ref().ok_or(TypeError::NotMaterialized)
    }

    /// Take the payload, or [`TypeError::NotMaterialized`].
    pub fn into_bytes(self) -> Result<Bytes, TypeError> {
        self.bytes.ok_or(TypeError::NotMaterialized)
    }

    /// Same content with a new address, used once a backend has stored it.
    pub fn with_stored_address(mut self, address: ContentAddress) -> Self {
        self.address = address;
        self
    }
}

/// Mutable state threaded through [`ContentOption`]s.
#[derive(Debug, Default)]
pub struct ContentBuilder {
    address: Option<ContentAddress>,
    content_type: Option<String>,
    size: Option<u64>,
    bytes: Option<Bytes>,
}

/// One step of content construction. Returning an error aborts the build.
pub type ContentOption = Box<dyn FnOnce(&mut ContentBuilder) -> Result<(), TypeError> + Send>;

/// Apply `options` in order and validate the result.
///
/// When both bytes and an explicit size are supplied they must agree.
pub fn build_content<I>(options: I) -> Result<Content, TypeError>
where
    I: IntoIterator<Item = ContentOption>,
{
    let builder = options
        .into_iter()
        .try_fold(ContentBuilder::default(), |mut builder, option| {
            option(&mut builder)?;
            Ok::<_, TypeError>(builder)
        })?;

    let size = match (&builder.bytes, builder.size) {
        (Some(bytes), Some(declared)) if declared != bytes.len() as u64 => {
            return Err(TypeError::SizeMismatch {
                declared,
                actual: bytes.len() as u64,
            });
        }
        (Some(bytes), _) => bytes.len() as u64,
        (None, declared) => declared.unwrap_or(0),
    };

    Ok(Content {
        address: builder.address.unwrap_or_default(),
        content_type: builder
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        size,
        bytes: builder.bytes,
    })
}

/// Attach the payload. The size is taken from it.
pub fn with_bytes(bytes: impl Into<Bytes>) -> ContentOption {
    let bytes = bytes.into();
    Box::new(move |builder: &mut ContentBuilder| {
        builder.bytes = Some(bytes);
        Ok(())
    })
}

/// Set the MIME type. Empty types are rejected.
pub fn with_content_type(content_type: impl Into<String>) -> ContentOption {
    let content_type = content_type.into();
    Box::new(move |builder: &mut ContentBuilder| {
        if content_type.is_empty() {
            return Err(TypeError::InvalidOption("content type is empty".into()));
        }
        builder.content_type = Some(content_type);
        Ok(())
    })
}

/// Set the address of already stored content.
pub fn with_address(address: impl Into<ContentAddress>) -> ContentOption {
    let address = address.into();
    Box::new(move |builder: &mut ContentBuilder| {
        builder.address = Some(address);
        Ok(())
    })
}

/// Declare the size, for metadata-only content or as a check on the bytes.
pub fn with_size(size: u64) -> ContentOption {
    Box::new(move |builder: &mut ContentBuilder| {
        builder.size = Some(size);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_follows_bytes() {
        let content = build_content(vec![with_bytes(&b"hello"[..])]).unwrap();
        assert_eq!(content.size(), 5);
        assert_eq!(content.bytes().unwrap().as_ref(), b"hello");
        assert_eq!(content.content_type(), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn declared_size_must_match_bytes() {
        let err = build_content(vec![with_size(9), with_bytes(&b"abc"[..])]).unwrap_err();
        assert_eq!(
            err,
            TypeError::SizeMismatch {
                declared: 9,
                actual: 3
            }
        );
    }

    #[test]
    fn metadata_only_content_is_not_materialized() {
        let content = build_content(vec![
            with_address("abc123"),
            with_content_type("text/plain"),
            with_size(42),
        ])
        .unwrap();
        assert_eq!(content.size(), 42);
        assert!(!content.is_materialized());
        assert_eq!(content.bytes().unwrap_err(), TypeError::NotMaterialized);
    }

    #[test]
    fn empty_content_type_is_rejected() {
        let err = build_content(vec![with_content_type("")]).unwrap_err();
        assert!(matches!(err, TypeError::InvalidOption(_)));
    }

    #[test]
    fn serialized_form_omits_bytes() {
        let content = Content::new("addr".into(), "text/plain", Bytes::from_static(b"body"));
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["address"], "addr");
        assert_eq!(json["size"], 4);
        assert!(json.get("bytes").is_none());
    }

    #[test]
    fn stored_address_replaces_placeholder() {
        let content = build_content(vec![with_bytes(&b"x"[..])]).unwrap();
        assert!(content.address().is_empty());
        let stored = content.with_stored_address("final".into());
        assert_eq!(stored.address().as_str(), "final");
        assert_eq!(stored.size(), 1);
    }
}
