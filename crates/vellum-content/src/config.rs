use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ContentError, ContentResult};
use crate::local::LocalContentStore;
use crate::memory::InMemoryContentStore;
use crate::traits::ContentStore;

/// Selects the content backend at construction time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentStoreConfig {
    /// Payloads held in process memory.
    #[default]
    Virtual,
    /// Payloads written beneath `root`.
    Local { root: PathBuf },
}

impl ContentStoreConfig {
    /// Construct the configured backend.
    pub fn open(&self) -> ContentResult<Box<dyn ContentStore>> {
        match self {
            Self::Virtual => {
                info!("using in-memory content store");
                Ok(Box::new(InMemoryContentStore::new()))
            }
            Self::Local { root } => {
                info!(root = %root.display(), "using local content store");
                Ok(Box::new(LocalContentStore::open(root.clone())?))
            }
        }
    }
}

/// Credentials and location for an S3-compatible object store.
///
/// Every required field (`id`, `secret`, `region`, `bucket`) is non-empty;
/// `token` is an optional session token. A value can only be obtained from
/// [`build_config`] or by deserializing, and both run the same validation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RemoteConfigBuilder")]
pub struct RemoteConfig {
    id: String,
    secret: String,
    token: String,
    region: String,
    bucket: String,
}

impl RemoteConfig {
    /// Access key id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Secret access key.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Session token, `None` when unset.
    pub fn token(&self) -> Option<&str> {
        Some(self.token.as_str()).filter(|t| !t.is_empty())
    }

    /// Region the bucket lives in.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Bucket payloads are stored in.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .field("token", &self.token().map(|_| "<redacted>"))
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Unvalidated remote settings that [`RemoteOption`]s write into.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteConfigBuilder {
    id: String,
    secret: String,
    token: String,
    region: String,
    bucket: String,
}

impl TryFrom<RemoteConfigBuilder> for RemoteConfig {
    type Error = ContentError;

    fn try_from(builder: RemoteConfigBuilder) -> ContentResult<Self> {
        for (field, value) in [
            ("id", &builder.id),
            ("secret", &builder.secret),
            ("region", &builder.region),
            ("bucket", &builder.bucket),
        ] {
            if value.is_empty() {
                return Err(ContentError::InvalidConfig(format!(
                    "remote {field} is required"
                )));
            }
        }
        Ok(Self {
            id: builder.id,
            secret: builder.secret,
            token: builder.token,
            region: builder.region,
            bucket: builder.bucket,
        })
    }
}

/// One step of remote configuration. Returning an error aborts the build.
pub type RemoteOption = Box<dyn FnOnce(&mut RemoteConfigBuilder) -> ContentResult<()> + Send>;

/// Apply `options` in order, then check the required fields.
pub fn build_config<I>(options: I) -> ContentResult<RemoteConfig>
where
    I: IntoIterator<Item = RemoteOption>,
{
    let builder = options
        .into_iter()
        .try_fold(RemoteConfigBuilder::default(), |mut builder, option| {
            option(&mut builder)?;
            Ok::<_, ContentError>(builder)
        })?;
    RemoteConfig::try_from(builder)
}

/// Set the access key id.
pub fn with_id(id: impl Into<String>) -> RemoteOption {
    let id = id.into();
    Box::new(move |builder: &mut RemoteConfigBuilder| {
        builder.id = id;
        Ok(())
    })
}

/// Set the secret access key.
pub fn with_secret(secret: impl Into<String>) -> RemoteOption {
    let secret = secret.into();
    Box::new(move |builder: &mut RemoteConfigBuilder| {
        builder.secret = secret;
        Ok(())
    })
}

/// Set the optional session token.
pub fn with_token(token: impl Into<String>) -> RemoteOption {
    let token = token.into();
    Box::new(move |builder: &mut RemoteConfigBuilder| {
        builder.token = token;
        Ok(())
    })
}

/// Set the region, e.g. `eu-west-1`.
pub fn with_region(region: impl Into<String>) -> RemoteOption {
    let region = region.into();
    Box::new(move |builder: &mut RemoteConfigBuilder| {
        builder.region = region;
        Ok(())
    })
}

/// Set the bucket payloads are stored in.
pub fn with_bucket(bucket: impl Into<String>) -> RemoteOption {
    let bucket = bucket.into();
    Box::new(move |builder: &mut RemoteConfigBuilder| {
        builder.bucket = bucket;
        Ok(())
    })
}
