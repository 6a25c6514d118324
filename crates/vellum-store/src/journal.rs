use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};
use vellum_types::{Query, ResourceId};

use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};
use crate::filter::filter_entities;
use crate::traits::Store;

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

struct JournalState {
    entities: HashMap<String, Vec<Entity>>,
    /// Open journal file; `None` while stopped.
    file: Option<File>,
    /// Length of the valid, fully written prefix of the journal.
    offset: u64,
}

/// Durable [`Store`] backed by an append-only journal file.
///
/// Queries are answered from an in-memory index identical to
/// [`VirtualStore`](crate::VirtualStore)'s. Every insert is framed and
/// written to the journal before the index is updated:
///
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized Entity)]
/// ```
///
/// [`Store::run`] replays the journal. Replay stops at the first torn or
/// corrupt record and truncates the file there, so later appends always
/// follow a valid prefix. Until `run` succeeds, and after [`Store::stop`],
/// every operation fails with [`StoreError::Unavailable`].
pub struct JournalStore {
    path: PathBuf,
    state: Mutex<JournalState>,
}

impl JournalStore {
    /// Create a store for the journal at `path`. Nothing is read until
    /// [`Store::run`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(JournalState {
                entities: HashMap::new(),
                file: None,
                offset: 0,
            }),
        }
    }

    /// Location of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, JournalState>> {
        self.state
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn running(state: &JournalState) -> StoreResult<()> {
        if state.file.is_none() {
            return Err(StoreError::Unavailable("journal store is not running".into()));
        }
        Ok(())
    }

    fn encode(entity: &Entity) -> StoreResult<Vec<u8>> {
        let payload =
            bincode::serialize(entity).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let length = u32::try_from(payload.len()).map_err(|_| {
            StoreError::Serialization(format!("record of {} bytes is too large", payload.len()))
        })?;
        let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
        frame.extend_from_slice(&length.to_le_bytes());
        frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Decode the valid prefix of `data`. Returns the entities and the
    /// number of bytes they occupy.
    fn replay(data: &[u8]) -> (Vec<Entity>, u64) {
        let mut entities = Vec::new();
        let mut offset = 0usize;

        while offset + HEADER_SIZE <= data.len() {
            let header = &data[offset..offset + HEADER_SIZE];
            let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
            let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

            let start = offset + HEADER_SIZE;
            if length == 0 || start + length > data.len() {
                warn!(offset, length, "torn journal record; stopping replay");
                break;
            }

            let payload = &data[start..start + length];
            if crc32fast::hash(payload) != expected_crc {
                warn!(offset, "journal record failed CRC check; stopping replay");
                break;
            }

            match bincode::deserialize::<Entity>(payload) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(offset, error = %e, "undecodable journal record; stopping replay");
                    break;
                }
            }
            offset = start + length;
        }

        (entities, offset as u64)
    }
}

impl Store for JournalStore {
    fn insert(&self, entity: Entity) -> StoreResult<()> {
        let frame = Self::encode(&entity)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let offset = state.offset;
        let file = state
            .file
            .as_mut()
            .ok_or_else(|| StoreError::Unavailable("journal store is not running".into()))?;

        if let Err(e) = file.write_all(&frame).and_then(|_| file.flush()) {
            // Cut any partial frame so the next append follows a valid prefix.
            if let Err(rollback) = file
                .set_len(offset)
                .and_then(|_| file.seek(SeekFrom::Start(offset)).map(|_| ()))
            {
                warn!(offset, error = %rollback, "failed to roll back partial journal write");
            }
            return Err(StoreError::Io(e));
        }
        state.offset += frame.len() as u64;

        let resource_id = entity.resource_id;
        let chain = state.entities.entry(resource_id.to_string()).or_default();
        chain.push(entity);
        debug!(
            resource_id = %resource_id,
            revisions = chain.len(),
            len = frame.len(),
            "journal append"
        );
        Ok(())
    }

    fn get(&self, resource_id: &ResourceId, _query: &Query) -> StoreResult<Entity> {
        let state = self.lock()?;
        Self::running(&state)?;
        state
            .entities
            .get(&resource_id.to_string())
            .and_then(|chain| chain.last())
            .cloned()
            .ok_or(StoreError::NotFound(*resource_id))
    }

    fn get_multiple(&self, resource_id: &ResourceId, query: &Query) -> StoreResult<Vec<Entity>> {
        let state = self.lock()?;
        Self::running(&state)?;
        Ok(state
            .entities
            .get(&resource_id.to_string())
            .map(|chain| filter_entities(chain, query))
            .unwrap_or_default())
    }

    fn drop_all(&self) -> StoreResult<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let file = state
            .file
            .as_mut()
            .ok_or_else(|| StoreError::Unavailable("journal store is not running".into()))?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        // The index must follow the truncated file even if the sync fails.
        state.offset = 0;
        let dropped = state.entities.len();
        state.entities.clear();
        file.sync_all()?;
        info!(path = %self.path.display(), resources = dropped, "journal store dropped");
        Ok(())
    }

    fn run(&self) -> StoreResult<()> {
        let mut state = self.lock()?;
        if state.file.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.path)?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        let (entities, valid_len) = Self::replay(&data);
        if valid_len < data.len() as u64 {
            warn!(
                path = %self.path.display(),
                valid_len,
                file_len = data.len(),
                "truncating journal after last valid record"
            );
            file.set_len(valid_len)?;
        }
        file.seek(SeekFrom::Start(valid_len))?;

        let mut index: HashMap<String, Vec<Entity>> = HashMap::new();
        let records = entities.len();
        for entity in entities {
            index
                .entry(entity.resource_id.to_string())
                .or_default()
                .push(entity);
        }

        state.entities = index;
        state.offset = valid_len;
        state.file = Some(file);
        info!(path = %self.path.display(), records, "journal store running");
        Ok(())
    }

    fn stop(&self) {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "cannot stop journal store");
                return;
            }
        };
        if let Some(file) = state.file.take() {
            if let Err(e) = file.sync_all() {
                warn!(path = %self.path.display(), error = %e, "journal sync on stop failed");
            }
            info!(path = %self.path.display(), "journal store stopped");
        }
    }
}

impl std::fmt::Debug for JournalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalStore")
            .field("path", &self.path)
            .finish()
    }
}
