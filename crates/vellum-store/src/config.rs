use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::journal::JournalStore;
use crate::traits::Store;
use crate::virtual_store::VirtualStore;

/// Selects the ledger store backend at construction time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-memory chains, lost on exit.
    #[default]
    Virtual,
    /// In-memory chains replayed from a journal file at `path`.
    Journal { path: PathBuf },
}

impl StoreConfig {
    /// Construct the configured backend. The caller is responsible for
    /// calling [`Store::run`].
    pub fn build(&self) -> Box<dyn Store> {
        match self {
            Self::Virtual => {
                info!("using virtual ledger store");
                Box::new(VirtualStore::new())
            }
            Self::Journal { path } => {
                info!(path = %path.display(), "using journal ledger store");
                Box::new(JournalStore::new(path.clone()))
            }
        }
    }
}
