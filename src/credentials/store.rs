use crate::credentials::types::CachedCredential;
use crate::error::{ProxyError, Result};
use async_trait::async_trait;
use moka::future::Cache;
use rustc_hash::FxHashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Key-value home of the cached credential. Expiry is the caller's job;
/// stores keep whatever was last written.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedCredential>>;
    async fn put(&self, key: &str, credential: CachedCredential) -> Result<()>;
}

#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, CachedCredential>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().max_capacity(16).build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CachedCredential>> {
        Ok(self.entries.get(key).await)
    }

    async fn put(&self, key: &str, credential: CachedCredential) -> Result<()> {
        self.entries.insert(key.to_string(), credential).await;
        Ok(())
    }
}

/// Bincode file on disk, mirrored in memory. Every `put` rewrites the file
/// through a temp file and an atomic rename.
#[derive(Clone)]
pub struct FileStore {
    file_path: PathBuf,
    entries: Arc<RwLock<FxHashMap<String, CachedCredential>>>,
}

impl FileStore {
    pub async fn open(file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ProxyError::Store(e.to_string()))?;
        }

        let store = Self {
            file_path,
            entries: Arc::new(RwLock::new(FxHashMap::default())),
        };
        store.load().await?;
        Ok(store)
    }

    async fn load(&self) -> Result<()> {
        if !self.file_path.exists() {
            info!("No credential store at {:?}, starting empty", self.file_path);
            return Ok(());
        }

        let contents = tokio::fs::read(&self.file_path)
            .await
            .map_err(|e| ProxyError::Store(e.to_string()))?;

        match bincode::deserialize::<FxHashMap<String, CachedCredential>>(&contents) {
            Ok(loaded) => {
                info!("Loaded {} credential entries from {:?}", loaded.len(), self.file_path);
                *self.entries.write().await = loaded;
            }
            Err(e) => warn!("Failed to decode credential store (starting fresh): {e}"),
        }
        Ok(())
    }

    async fn write_to_disk(&self, entries: &FxHashMap<String, CachedCredential>) -> Result<()> {
        let serialized = bincode::serialize(entries).map_err(|e| ProxyError::Store(e.to_string()))?;

        let mut temp_path = OsString::from(self.file_path.as_os_str());
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        tokio::fs::write(&temp_path, serialized)
            .await
            .map_err(|e| ProxyError::Store(e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.file_path)
            .await
            .map_err(|e| ProxyError::Store(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<CachedCredential>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, credential: CachedCredential) -> Result<()> {
        // Held across the write so the file never lags a newer in-memory value.
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), credential);
        self.write_to_disk(&entries).await
    }
}
