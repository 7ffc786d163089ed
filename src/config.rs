use crate::storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_dir = lookup("TRACKER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let storage = match lookup("TRACKER_STORAGE").as_deref() {
            None | Some("file") => StorageConfig::File(data_dir),
            Some("memory") => StorageConfig::Memory,
            Some(other) => {
                warn!("unknown TRACKER_STORAGE {other:?}, using file storage");
                StorageConfig::File(data_dir)
            }
        };

        Self { port, storage }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub async fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        let store: Arc<dyn KeyValueStore> = match &self.storage {
            StorageConfig::File(dir) => Arc::new(FileStore::open(dir).await?),
            StorageConfig::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(store)
    }
}
