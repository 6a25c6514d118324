use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vellum_types::{Content, ContentAddress};

use crate::error::{ContentError, ContentResult};
use crate::hasher::AddressHasher;
use crate::traits::ContentStore;

/// Sidecar metadata written next to each payload file.
#[derive(Debug, Serialize, Deserialize)]
struct Sidecar {
    content_type: String,
    size: u64,
}

/// Content store backed by a directory tree.
///
/// Layout:
/// ```text
/// <root>/<first two hex chars>/<address>        payload bytes
/// <root>/<first two hex chars>/<address>.json   content type and size
/// ```
///
/// Files are written to a temporary file in the same directory and renamed
/// into place, so readers never observe a partial payload. Reads re-hash the
/// bytes and report [`ContentError::Corrupt`] on mismatch.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
}

impl LocalContentStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> ContentResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the shard directories.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn shard_dir(&self, address: &ContentAddress) -> PathBuf {
        self.root.join(&address.as_str()[..2])
    }

    fn data_path(&self, address: &ContentAddress) -> PathBuf {
        self.shard_dir(address).join(address.as_str())
    }

    fn sidecar_path(&self, address: &ContentAddress) -> PathBuf {
        self.shard_dir(address).join(format!("{}.json", address.as_str()))
    }

    fn write_atomic(dir: &Path, target: &Path, data: &[u8]) -> ContentResult<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(target).map_err(|e| ContentError::Io(e.error))?;
        Ok(())
    }
}

fn not_found_or_io(address: &ContentAddress, err: io::Error) -> ContentError {
    if err.kind() == io::ErrorKind::NotFound {
        ContentError::NotFound(address.clone())
    } else {
        ContentError::Io(err)
    }
}

impl ContentStore for LocalContentStore {
    fn put(&self, bytes: &[u8], content_type: &str) -> ContentResult<ContentAddress> {
        let address = AddressHasher::CONTENT.address(bytes);
        let data_path = self.data_path(&address);
        if data_path.exists() {
            debug!(address = %address, "content already stored");
            return Ok(address);
        }

        let dir = self.shard_dir(&address);
        fs::create_dir_all(&dir)?;

        let sidecar = Sidecar {
            content_type: content_type.to_string(),
            size: bytes.len() as u64,
        };
        let sidecar_json = serde_json::to_vec(&sidecar)
            .map_err(|e| ContentError::Serialization(e.to_string()))?;

        // Sidecar first: a payload file is only visible once its metadata is.
        Self::write_atomic(&dir, &self.sidecar_path(&address), &sidecar_json)?;
        Self::write_atomic(&dir, &data_path, bytes)?;

        debug!(address = %address, len = bytes.len(), "content written to disk");
        Ok(address)
    }

    fn get(&self, address: &ContentAddress) -> ContentResult<Content> {
        if !AddressHasher::is_well_formed(address) {
            return Err(ContentError::NotFound(address.clone()));
        }

        let data = fs::read(self.data_path(address)).map_err(|e| not_found_or_io(address, e))?;
        if !AddressHasher::CONTENT.verify(&data, address) {
            warn!(address = %address, "content digest mismatch");
            return Err(ContentError::Corrupt {
                address: address.clone(),
                reason: "digest does not match address".into(),
            });
        }

        let sidecar_raw =
            fs::read(self.sidecar_path(address)).map_err(|e| not_found_or_io(address, e))?;
        let sidecar: Sidecar = serde_json::from_slice(&sidecar_raw)
            .map_err(|e| ContentError::Serialization(e.to_string()))?;
        if sidecar.size != data.len() as u64 {
            return Err(ContentError::Corrupt {
                address: address.clone(),
                reason: format!(
                    "sidecar size {} does not match payload size {}",
                    sidecar.size,
                    data.len()
                ),
            });
        }

        Ok(Content::new(
            address.clone(),
            sidecar.content_type,
            Bytes::from(data),
        ))
    }

    fn exists(&self, address: &ContentAddress) -> ContentResult<bool> {
        if !AddressHasher::is_well_formed(address) {
            return Ok(false);
        }
        Ok(self.data_path(address).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_types::NotFound;

    fn store() -> (tempfile::TempDir, LocalContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::open(dir.path().join("contents")).unwrap();
        (dir, store)
    }

    #[test]
    fn put_then_get() {
        let (_dir, store) = store();
        let address = store.put(b"payload", "text/plain").unwrap();
        let content = store.get(&address).unwrap();
        assert_eq!(content.bytes().unwrap().as_ref(), b"payload");
        assert_eq!(content.content_type(), "text/plain");
        assert_eq!(content.size(), 7);
    }

    #[test]
    fn layout_is_sharded_by_prefix() {
        let (_dir, store) = store();
        let address = store.put(b"layout", "text/plain").unwrap();
        let shard = store.root().join(&address.as_str()[..2]);
        assert!(shard.join(address.as_str()).is_file());
        assert!(shard.join(format!("{}.json", address.as_str())).is_file());
    }

    #[test]
    fn address_matches_in_memory_store() {
        let (_dir, store) = store();
        let memory = crate::InMemoryContentStore::new();
        assert_eq!(
            store.put(b"same bytes", "text/plain").unwrap(),
            memory.put(b"same bytes", "text/plain").unwrap()
        );
    }

    #[test]
    fn put_is_idempotent() {
        let (_dir, store) = store();
        let a = store.put(b"again", "text/plain").unwrap();
        let b = store.put(b"again", "application/json").unwrap();
        assert_eq!(a, b);
        assert_eq!(store.get(&a).unwrap().content_type(), "text/plain");
    }

    #[test]
    fn missing_is_not_found() {
        let (_dir, store) = store();
        let address = AddressHasher::CONTENT.address(b"never stored");
        let err = store.get(&address).unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.exists(&address).unwrap());
    }

    #[test]
    fn malformed_address_is_not_found() {
        let (_dir, store) = store();
        let err = store.get(&ContentAddress::from("../../escape")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn tampered_payload_is_corrupt() {
        let (_dir, store) = store();
        let address = store.put(b"trusted", "text/plain").unwrap();
        fs::write(store.data_path(&address), b"tampered").unwrap();
        let err = store.get(&address).unwrap_err();
        assert!(matches!(err, ContentError::Corrupt { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn reopen_sees_existing_content() {
        let (dir, store) = store();
        let address = store.put(b"durable", "text/plain").unwrap();
        drop(store);

        let reopened = LocalContentStore::open(dir.path().join("contents")).unwrap();
        assert_eq!(
            reopened.get(&address).unwrap().bytes().unwrap().as_ref(),
            b"durable"
        );
    }
}
